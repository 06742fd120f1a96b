use crate::error::{ManifestError, ResolveError};
use crate::manifest::{Manifest, ModList};
use crate::resolver::ModResolver;
use crate::traits::{CatalogProvider, ContentHasher};
use futures::{StreamExt, TryStreamExt, stream};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Clone, Debug, Default)]
pub struct GeneratorConfig {
    /// Maximum number of references resolved at once.
    ///
    /// Defaults to `None`, which resolves the whole list concurrently.
    pub concurrency: Option<usize>,
}

/// Resolves a whole [`ModList`] and renders it as a [`Manifest`].
///
/// Resolution is all or nothing: the first failure aborts the run and no
/// manifest is produced.
#[derive(Clone, Debug)]
pub struct ManifestGenerator<C, M, H> {
    resolver: ModResolver<C, M, H>,
    config: GeneratorConfig,
}

impl<C, M, H> ManifestGenerator<C, M, H>
where
    C: CatalogProvider<u64>,
    M: CatalogProvider<str>,
    H: ContentHasher,
{
    pub fn new(resolver: ModResolver<C, M, H>, config: GeneratorConfig) -> Self {
        Self { resolver, config }
    }

    /// Resolves every reference concurrently, keeping input order.
    pub async fn generate(&self, list: &ModList) -> Result<Manifest, ResolveError> {
        let version = list.minecraft_version.as_str();
        let limit = self
            .config
            .concurrency
            .unwrap_or(list.mods.len())
            .max(1);

        let artifacts = stream::iter(&list.mods)
            .map(|reference| self.resolver.resolve(reference, version))
            .buffered(limit)
            .try_collect::<Vec<_>>()
            .await?;

        info!("Successfully resolved all mods");
        Ok(Manifest::new(artifacts))
    }

    /// Generates the manifest and writes it to `path`, replacing any existing file.
    ///
    /// Nothing is written unless every reference resolves.
    pub async fn generate_to_file(
        &self,
        list: &ModList,
        path: &Path,
    ) -> Result<Manifest, ManifestError> {
        let manifest = self.generate(list).await?;

        info!("Writing output to {}", path.display());
        atomic_write(path, manifest.render().into_bytes()).await?;

        Ok(manifest)
    }
}

async fn atomic_write(path: &Path, data: Vec<u8>) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&path, &data))
        .await
        .map_err(io::Error::other)?
}

/// Writes `data` to a fresh temp file beside the target, then renames it over
/// the target. A symlinked target is replaced through the link.
fn replace_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)?,
        _ => path.to_path_buf(),
    };
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    match fs::metadata(&target) {
        Ok(meta) => fs::set_permissions(tmp.path(), meta.permissions())?,
        Err(_) => set_default_mode(tmp.path())?,
    }

    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

// Temp files are created 0600; a new manifest should be world readable.
#[cfg(unix)]
fn set_default_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
