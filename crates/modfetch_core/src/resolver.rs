use crate::error::ResolveError;
use crate::manifest::{ModReference, ModSource, ResolvedArtifact};
use crate::traits::{CatalogProvider, ContentHasher};
use crate::version::find_with_fallback;
use tracing::{debug, info};

/// Resolves single mod references into hashed artifacts.
///
/// `C` serves `curseforge` references by numeric id and `M` serves `modrinth`
/// references by slug. Direct urls bypass both.
#[derive(Clone, Debug)]
pub struct ModResolver<C, M, H> {
    curseforge: C,
    modrinth: M,
    hasher: H,
}

impl<C, M, H> ModResolver<C, M, H>
where
    C: CatalogProvider<u64>,
    M: CatalogProvider<str>,
    H: ContentHasher,
{
    pub fn new(curseforge: C, modrinth: M, hasher: H) -> Self {
        Self {
            curseforge,
            modrinth,
            hasher,
        }
    }

    /// Finds the download url for `reference` without hashing it.
    pub async fn resolve_url(
        &self,
        reference: &ModReference,
        game_version: &str,
    ) -> Result<String, ResolveError> {
        let name = &reference.name;
        let found = match reference.source {
            ModSource::CurseForge => {
                let id = reference.value.as_numeric().ok_or_else(|| {
                    ResolveError::InvalidIdentifier {
                        name: name.clone(),
                        value: reference.value.as_text(),
                    }
                })?;
                find_with_fallback(&self.curseforge, &id, game_version).await
            }
            ModSource::Modrinth => {
                let slug = reference.value.as_text();
                find_with_fallback(&self.modrinth, slug.as_str(), game_version).await
            }
            ModSource::DirectUrl => return Ok(reference.value.as_text()),
        };

        found
            .map_err(|source| ResolveError::Provider {
                name: name.clone(),
                source,
            })?
            .ok_or_else(|| ResolveError::UnknownMod {
                name: name.clone(),
                version: game_version.to_string(),
            })
    }

    /// Resolves the download url and hashes it exactly once.
    pub async fn resolve(
        &self,
        reference: &ModReference,
        game_version: &str,
    ) -> Result<ResolvedArtifact, ResolveError> {
        info!("Preparing {} mod: {}", reference.source, reference.name);

        let download_url = self.resolve_url(reference, game_version).await?;
        debug!("Resolved {} to {download_url}", reference.name);

        let content_hash =
            self.hasher
                .hash(&download_url)
                .await
                .map_err(|source| ResolveError::Hash {
                    name: reference.name.clone(),
                    source,
                })?;

        Ok(ResolvedArtifact {
            name: reference.name.clone(),
            client: reference.client,
            server: reference.server,
            download_url,
            content_hash,
        })
    }
}
