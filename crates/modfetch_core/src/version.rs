//! Version fallback search.
//!
//! Catalog files are often tagged only with a release line ("1.17") instead of
//! every patch release ("1.17.1"). When an exact lookup misses, the search
//! retries once with the `major.minor` prefix and then gives up.

use crate::error::ProviderError;
use crate::traits::CatalogProvider;
use tracing::debug;

/// Returns the `major.minor` prefix of a version with at least three components.
///
/// Versions that are already `major.minor` or shorter have no coarser form.
pub fn minor_line(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    let (major, minor, patch) = (parts.next()?, parts.next()?, parts.next());
    patch.map(|_| format!("{major}.{minor}"))
}

/// Looks up `id` at `version`, then at its `major.minor` line.
///
/// The provider is queried at most twice, exact version first.
pub async fn find_with_fallback<Id, P>(
    provider: &P,
    id: &Id,
    version: &str,
) -> Result<Option<String>, ProviderError>
where
    Id: ?Sized + Sync,
    P: CatalogProvider<Id> + ?Sized,
{
    let coarser = minor_line(version);
    let candidates = std::iter::once(version).chain(coarser.as_deref());

    for candidate in candidates {
        if let Some(url) = provider.find_download_url(candidate, id).await? {
            debug!("Matched game version {candidate}");
            return Ok(Some(url));
        }
        debug!("No file tagged {candidate}");
    }

    Ok(None)
}
