use crate::error::*;

/// A catalog that maps a game version and an identifier to a download url.
///
/// `Ok(None)` means the catalog has no file for that exact version string;
/// errors are reserved for transport and decoding failures.
pub trait CatalogProvider<Id: ?Sized + Sync>: Send + Sync {
    fn find_download_url(
        &self,
        game_version: &str,
        id: &Id,
    ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send;
}

/// Produces a content digest for a download url.
pub trait ContentHasher: Send + Sync {
    fn hash(&self, url: &str) -> impl Future<Output = Result<String, HashError>> + Send;
}

impl<Id: ?Sized + Sync, P: CatalogProvider<Id>> CatalogProvider<Id> for &P {
    fn find_download_url(
        &self,
        game_version: &str,
        id: &Id,
    ) -> impl Future<Output = Result<Option<String>, ProviderError>> + Send {
        (**self).find_download_url(game_version, id)
    }
}

impl<H: ContentHasher> ContentHasher for &H {
    fn hash(&self, url: &str) -> impl Future<Output = Result<String, HashError>> + Send {
        (**self).hash(url)
    }
}
