use anyhow::{Context, Result};
use clap::Parser;
use flapper::audio::Audio;
use flapper::{Config, app, logging, term};
use std::path::PathBuf;

/// Flap through the pipes. Space, Up, Enter or a mouse click to flap; q to quit.
#[derive(Parser, Debug)]
#[command(name = "flapper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (TOML). Defaults to the platform config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Disable sound
    #[arg(long)]
    mute: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init(path, &args.log_level)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }

    let mut config = Config::load(args.config.as_deref()).context("failed to load config")?;
    if let Some(seed) = args.seed {
        config.rules.seed = Some(seed);
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    if args.mute {
        config.audio.enabled = false;
    }
    config.validate().context("invalid settings")?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let audio = if config.audio.enabled {
        Audio::open(config.audio.volume)
    } else {
        None
    };

    term::install_panic_hook();
    let best = app::run(&config, audio)?;
    println!("best: {best}");
    Ok(())
}
