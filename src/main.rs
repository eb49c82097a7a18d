use std::io;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ladder_bot::config::Settings;
use ladder_bot::csv::write_standings;
use ladder_bot::{JsonStore, Ladder, LadderHandle, bot};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Discord bot for a casual win/loss ladder")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "ladder.toml")]
    config: PathBuf,

    /// Ledger file, overriding the configured one.
    #[arg(long)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Connect to Discord and serve commands (default).
    Run,
    /// Print the current standings as csv and exit.
    ///
    /// The ledger is opened the same way as for `run`: a missing file is
    /// created and a corrupt one is overwritten with an empty ledger.
    Standings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config).context("failed to read configuration")?;
    if let Some(path) = cli.data_file {
        settings.data_file = path;
    }

    let store = JsonStore::new(&settings.data_file);
    let ladder = Ladder::open(store)
        .with_context(|| format!("failed to open ledger at {:?}", settings.data_file))?;

    match cli.mode.unwrap_or(Mode::Run) {
        Mode::Standings => {
            let standings = ladder.ledger().standings();
            write_standings(io::stdout().lock(), &standings)
                .context("failed to write standings")?;
        }
        Mode::Run => {
            let token = settings.token().context("no Discord bot token configured")?;
            info!(path = %settings.data_file.display(), "ledger ready");
            bot::run(token, settings.prefix.clone(), LadderHandle::spawn(ladder))
                .await
                .context("discord client stopped")?;
        }
    }

    Ok(())
}
