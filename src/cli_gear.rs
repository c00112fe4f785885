use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tone_match_server::config::FileConfig;
use tone_match_server::gear_store::GearBundle;
use tone_match_server::matching::RegistryOverrides;
use tone_match_server::{MatchPreviewService, MatchRequest, Registries, SqliteGearStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// TOML file whose [registries] section overrides the matching tables.
    #[clap(long, global = true, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validates a JSON bundle of songs, guitars, amps and tones, then
    /// inserts it into the database.
    Import {
        #[clap(value_parser = parse_path)]
        db_path: PathBuf,
        #[clap(value_parser = parse_path)]
        bundle_path: PathBuf,
    },

    /// Prints the match preview of a tone onto a guitar and amp as JSON.
    Match {
        #[clap(value_parser = parse_path)]
        db_path: PathBuf,
        tone_id: String,
        target_guitar_id: String,
        target_amp_id: String,
    },
}

fn load_registries(config: Option<&PathBuf>) -> Result<Registries> {
    let overrides = match config {
        Some(path) => FileConfig::load(path)?.registries.unwrap_or_default(),
        None => RegistryOverrides::default(),
    };
    Ok(Registries::with_overrides(&overrides))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    match cli_args.command {
        Command::Import {
            db_path,
            bundle_path,
        } => {
            let bundle = GearBundle::from_file(&bundle_path)?;
            let store = SqliteGearStore::new(&db_path)?;
            let summary = bundle
                .import_into(&store)
                .with_context(|| format!("Failed to import {:?}", bundle_path))?;
            info!("Import into {:?} complete", db_path);
            println!(
                "Imported {} songs, {} guitars, {} amps, {} tones",
                summary.songs, summary.guitars, summary.amps, summary.tones
            );
        }
        Command::Match {
            db_path,
            tone_id,
            target_guitar_id,
            target_amp_id,
        } => {
            let registries = load_registries(cli_args.config.as_ref())?;
            let store = Arc::new(SqliteGearStore::new(&db_path)?);
            let service = MatchPreviewService::new(store, Arc::new(registries));
            let preview = service
                .build_match_preview(&MatchRequest {
                    tone_id,
                    target_guitar_id,
                    target_amp_id,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
    }

    Ok(())
}
