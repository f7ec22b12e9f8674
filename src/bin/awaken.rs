//! awaken: AI consciousness console simulator
//!
//! Usage:
//!   awaken                          → interactive terminal UI
//!   awaken tui --autostart          → terminal UI, already booting
//!   awaken run --duration 30        → headless transcript on stdout
//!   awaken run --json --seed 7      → reproducible JSON transcript
//!   awaken --dump-config            → print the effective config as TOML
//!   awaken version                  → show version

use awaken::headless::{run_headless, TranscriptFormat};
use awaken_core::{Speed, ThemeName};
use awaken_sim::SimConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "awaken",
    about = "AI consciousness console simulator",
    version = env!("CARGO_PKG_VERSION"),
    long_about = "awaken renders a make-believe AI consciousness terminal.\n\
                   Default: interactive terminal UI (space to start/stop).\n\
                   Use `awaken run` to stream the console to stdout instead."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file (TOML). Default: ./awaken.toml
    #[arg(long, global = true)]
    config: Option<String>,

    /// Speed multiplier, 0.5 to 5.0 in steps of 0.5
    #[arg(long, global = true)]
    speed: Option<f64>,

    /// Theme: default, matrix, cyberpunk, retro
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write logs to a file (the TUI never logs to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Dump the effective config as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI
    Tui {
        /// Start the simulation immediately
        #[arg(long)]
        autostart: bool,
    },
    /// Stream the console to stdout without a UI
    Run {
        /// Seconds to run before shutting down (0 = until Ctrl-C)
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        println!("awaken v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let headless = matches!(cli.command, Some(Commands::Run { .. }));
    let _guard = init_tracing(cli.log_file.as_deref(), headless);

    let config = resolve_config(&cli)?;
    if cli.dump_config {
        println!("{}", config.to_toml());
        return Ok(());
    }

    match cli.command {
        Some(Commands::Run { duration, json }) => {
            let duration = (duration > 0).then(|| Duration::from_secs(duration));
            let format = if json {
                TranscriptFormat::Json
            } else {
                TranscriptFormat::Plain
            };
            let interrupt = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            let mut stdout = std::io::stdout();
            run_headless(config, duration, format, &mut stdout, interrupt).await?;
        }
        Some(Commands::Tui { autostart }) => {
            awaken_tui::run_tui(config, autostart).await?;
        }
        Some(Commands::Version) | None => {
            awaken_tui::run_tui(config, false).await?;
        }
    }

    Ok(())
}

/// stderr output only in headless mode; the TUI owns the screen.
fn init_tracing(log_file: Option<&Path>, stderr: bool) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "awaken.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    let stderr_layer =
        stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awaken=info,awaken_sim=info,awaken_tui=info".into()),
        )
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Defaults, then the TOML file, then command-line flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<SimConfig> {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| expand_tilde(p))
        .unwrap_or_else(|| PathBuf::from("awaken.toml"));
    let mut config = SimConfig::load(&config_path);

    if let Some(speed) = cli.speed {
        config.speed = Speed::new(speed)?;
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.parse::<ThemeName>()?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
