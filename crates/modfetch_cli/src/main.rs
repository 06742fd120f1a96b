use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use modfetch_core::prelude::*;
use modfetch_curseforge::{CurseForgeClient, CurseForgeConfig};
use modfetch_hash::{PrefetchConfig, PrefetchHasher, Sha256Hasher};
use modfetch_modrinth::{ModrinthClient, ModrinthConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modfetch")]
#[command(about = "Pins a mod list to exact downloads and writes a nix manifest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// CurseForge api root
    #[arg(long, global = true, env = "MODFETCH_CURSEFORGE_URL", default_value = modfetch_curseforge::DEFAULT_BASE_URL)]
    curseforge_url: String,

    /// Modrinth api root
    #[arg(long, global = true, env = "MODFETCH_MODRINTH_URL", default_value = modfetch_modrinth::DEFAULT_BASE_URL)]
    modrinth_url: String,

    /// Timeout in seconds for each catalog request
    #[arg(long, global = true, env = "MODFETCH_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// How download hashes are computed
    #[arg(long, global = true, env = "MODFETCH_HASHER", value_enum, default_value_t = HasherKind::Prefetch)]
    hasher: HasherKind,

    /// Program used by the prefetch hasher
    #[arg(long, global = true, env = "MODFETCH_PREFETCH_PROGRAM", default_value = modfetch_hash::DEFAULT_PREFETCH_PROGRAM)]
    prefetch_program: String,

    /// Timeout in seconds for each hash computation
    #[arg(long, global = true, env = "MODFETCH_PREFETCH_TIMEOUT", default_value_t = 300)]
    prefetch_timeout: u64,

    /// Maximum number of mods resolved at once (default: all)
    #[arg(long, global = true, env = "MODFETCH_CONCURRENCY")]
    concurrency: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the nix manifest for a mod list
    Generate {
        /// The mod list json
        source: PathBuf,
        /// The nix file to write
        target: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HasherKind {
    /// nix-prefetch-url (base32 digest, adds the file to the nix store)
    Prefetch,
    /// Download and hash in process (hex digest)
    Sha256,
}

impl Cli {
    fn curseforge(&self) -> CurseForgeConfig {
        CurseForgeConfig {
            base_url: self.curseforge_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    fn modrinth(&self) -> ModrinthConfig {
        ModrinthConfig {
            base_url: self.modrinth_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    fn prefetch(&self) -> PrefetchConfig {
        PrefetchConfig {
            program: self.prefetch_program.clone(),
            timeout: Duration::from_secs(self.prefetch_timeout),
            ..Default::default()
        }
    }

    fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            concurrency: self.concurrency,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn generate<H: ContentHasher>(
    cli: &Cli,
    hasher: H,
    source: &Path,
    target: &Path,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let list = ModList::from_json(&text)
        .with_context(|| format!("Invalid mod list {}", source.display()))?;

    info!(
        "Resolving {} mods for Minecraft {}",
        list.mods.len(),
        list.minecraft_version
    );

    let resolver = ModResolver::new(
        CurseForgeClient::new(cli.curseforge())?,
        ModrinthClient::new(cli.modrinth())?,
        hasher,
    );
    let generator = ManifestGenerator::new(resolver, cli.generator());

    let manifest = generator.generate_to_file(&list, target).await?;

    info!(
        "✅ Wrote {} mods to {}",
        manifest.len(),
        target.display()
    );
    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate { source, target } => match cli.hasher {
            HasherKind::Prefetch => {
                generate(cli, PrefetchHasher::new(cli.prefetch()), source, target).await
            }
            HasherKind::Sha256 => {
                let hasher = Sha256Hasher::new(Duration::from_secs(cli.prefetch_timeout))?;
                generate(cli, hasher, source, target).await
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_takes_two_positionals() {
        let cli = Cli::try_parse_from(["modfetch", "generate", "mods.json", "mods.nix"]).unwrap();
        let Commands::Generate { source, target } = cli.command;
        assert_eq!(source, PathBuf::from("mods.json"));
        assert_eq!(target, PathBuf::from("mods.nix"));
        assert_eq!(cli.hasher, HasherKind::Prefetch);
        assert_eq!(cli.concurrency, None);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["modfetch"]).is_err());
        assert!(Cli::try_parse_from(["modfetch", "install", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["modfetch", "generate", "only-source"]).is_err());
    }

    #[test]
    fn flags_map_onto_configs() {
        let cli = Cli::try_parse_from([
            "modfetch",
            "generate",
            "in.json",
            "out.nix",
            "--timeout",
            "5",
            "--concurrency",
            "4",
            "--hasher",
            "sha256",
            "--modrinth-url",
            "http://localhost:9000",
        ])
        .unwrap();

        assert_eq!(cli.modrinth().timeout, Duration::from_secs(5));
        assert_eq!(cli.modrinth().base_url, "http://localhost:9000");
        assert_eq!(cli.generator().concurrency, Some(4));
        assert_eq!(cli.hasher, HasherKind::Sha256);
        assert_eq!(cli.prefetch().program, "nix-prefetch-url");
    }

    #[tokio::test]
    async fn missing_mod_list_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.json");
        let target = dir.path().join("mods.nix");
        let cli = Cli::try_parse_from([
            OsStr::new("modfetch"),
            OsStr::new("generate"),
            source.as_os_str(),
            target.as_os_str(),
        ])
        .unwrap();

        let err = run(&cli).await.unwrap_err();

        assert!(format!("{err:#}").starts_with("Failed to read "));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn invalid_mod_list_reports_cause() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mods.json");
        let target = dir.path().join("mods.nix");
        std::fs::write(&source, r#"{ "minecraftVersion": "1.17.1" }"#).unwrap();
        let cli = Cli::try_parse_from([
            OsStr::new("modfetch"),
            OsStr::new("generate"),
            source.as_os_str(),
            target.as_os_str(),
        ])
        .unwrap();

        let err = run(&cli).await.unwrap_err();
        let chain = format!("{err:#}");

        assert!(chain.starts_with("Invalid mod list"));
        assert!(chain.contains("missing field `mods`"));
        assert!(!target.exists());
    }
}
