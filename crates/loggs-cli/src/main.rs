use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loggs_core::{AppConfig, Catalog, Page};

mod commands;

#[derive(Parser)]
#[command(name = "loggs")]
#[command(author, version, about = "Scroll-driven motion showcase for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run {
        /// Page to open first (defaults to ui.start_page)
        #[arg(short, long)]
        page: Option<Page>,
    },
    /// Step a view headlessly and print one JSON frame per line
    Sample {
        /// View to sample
        view: SampleView,
        /// Number of frames to emit
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,
        /// Seconds between frames
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        /// Scroll input applied before the first frame, in pixels
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        scroll: f64,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleView {
    /// Layered works gallery
    Layers,
    /// Horizontal gallery strip
    Carousel,
    /// Timeline reveal
    Timeline,
    /// Embed card entrance
    Cards,
    /// About page keyhole reveal
    Keyhole,
    /// Startup loader overlay
    Loader,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration if none exists
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Install the subscriber; the TUI logs to a file so the terminal stays clean
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    let to_file = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, to_file)?;
    tracing::debug!(path = %AppConfig::config_path().display(), "Configuration ready");

    match cli.command {
        Some(Commands::Run { page }) => {
            let catalog = Catalog::load(config.catalog_path().as_deref())?;
            commands::run::run(config, catalog, page)
        }
        None => {
            let catalog = Catalog::load(config.catalog_path().as_deref())?;
            commands::run::run(config, catalog, None)
        }
        Some(Commands::Sample {
            view,
            frames,
            dt,
            scroll,
        }) => {
            let catalog = Catalog::load(config.catalog_path().as_deref())?;
            let stdout = std::io::stdout();
            commands::sample::run(
                &config,
                &catalog,
                commands::sample::SampleOptions {
                    view,
                    frames,
                    dt,
                    scroll,
                },
                &mut stdout.lock(),
            )
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
