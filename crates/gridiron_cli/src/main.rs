//! Gridiron CLI
//!
//! Headless driver for the play core: autoplay a whole game, list the
//! playbook, validate a JSON catalog.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use gridiron_core::engine::config::PROFILE_ENV;
#[cfg(feature = "cli")]
use gridiron_core::{Autopilot, Game, PlayCatalog, Quarter, SimConfig};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Simulate football plays headlessly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Autoplay a full game and print the play-by-play
    Simulate {
        /// Game seed (coverage calls)
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Autopilot seed (play calls); defaults to the game seed
        #[arg(long)]
        autopilot_seed: Option<u64>,

        /// Defensive difficulty, 0.0 (easy) ..= 2.0 (hard)
        #[arg(long, default_value_t = 1.0)]
        difficulty: f32,

        /// Tuning preset (arcade, simulation, default); falls back to GRIDIRON_PROFILE
        #[arg(long)]
        profile: Option<String>,

        /// JSON config file (overrides --profile)
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON play catalog (defaults to the built-in playbook)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Emit every event as one JSON object per line
        #[arg(long, default_value = "false")]
        json: bool,

        /// Seconds the autopilot holds the ball in READ before throwing
        #[arg(long)]
        read_secs: Option<f32>,

        /// Autopilot simulation step (s)
        #[arg(long)]
        tick_secs: Option<f32>,

        /// Safety cap on autopilot steps
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: usize,
    },

    /// List the plays in a catalog
    Plays {
        /// JSON play catalog (defaults to the built-in playbook)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Validate a JSON play catalog
    CheckCatalog {
        /// Catalog file
        file: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            seed,
            autopilot_seed,
            difficulty,
            profile,
            config,
            catalog,
            json,
            read_secs,
            tick_secs,
            max_steps,
        } => {
            let config = load_config(config.as_deref(), profile.as_deref())?;
            let catalog = load_catalog(catalog.as_deref())?;
            anyhow::ensure!(!catalog.is_empty(), "catalog has no selectable plays");

            let mut game = Game::new(config, catalog, difficulty, seed);
            let mut autopilot = Autopilot::new(autopilot_seed.unwrap_or(seed));
            if let Some(read_secs) = read_secs {
                autopilot = autopilot.with_read_secs(read_secs);
            }
            if let Some(tick_secs) = tick_secs {
                autopilot = autopilot.with_tick_secs(tick_secs);
            }
            log::info!("simulating seed={} difficulty={:.2}", seed, difficulty);

            if json {
                let mut steps = 0;
                while !game.is_over() && steps < max_steps {
                    autopilot.step(&mut game)?;
                    for event in game.drain_events() {
                        println!("{}", serde_json::to_string(&event)?);
                    }
                    steps += 1;
                }
            } else {
                autopilot.play_game(&mut game, max_steps)?;
                print_play_by_play(&game);
            }

            if !game.is_over() {
                anyhow::bail!("game did not finish within {} steps", max_steps);
            }
        }

        Commands::Plays { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            println!("{:<16} {:<18} {:<11} ROUTES", "ID", "NAME", "RISK");
            for play in catalog.iter() {
                let routes: Vec<String> = play
                .routes
                .iter()
                .map(|r| format!("{} ({:.0} yd)", r.name, r.length()))
                .collect();
                println!(
                    "{:<16} {:<18} {:<11} {}",
                    play.id,
                    play.name,
                    play.risk.display_name(),
                    routes.join(", ")
                );
            }
        }

        Commands::CheckCatalog { file } => {
            let catalog = load_catalog(Some(file.as_path()))?;
            println!("{} selectable plays", catalog.len());
            for rejected in catalog.rejected() {
                println!("  rejected '{}': {}", rejected.id, rejected.error);
            }
            if !catalog.rejected().is_empty() {
                anyhow::bail!("{} plays rejected", catalog.rejected().len());
            }
            println!("Catalog OK");
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>, profile: Option<&str>) -> Result<SimConfig> {
    let config = match (path, profile) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        (None, Some(profile)) => SimConfig::from_profile(profile),
        (None, None) => {
            log::debug!("no --profile, consulting {}", PROFILE_ENV);
            SimConfig::from_env_or_default()
        }
    };
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "cli")]
fn load_catalog(path: Option<&Path>) -> Result<PlayCatalog> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            PlayCatalog::from_json(&text).with_context(|| format!("parsing catalog {}", path.display()))
        }
        None => Ok(PlayCatalog::builtin()),
    }
}

#[cfg(feature = "cli")]
fn print_play_by_play(game: &Game) {
    for (n, outcome) in game.history().iter().enumerate() {
        let state = &outcome.update.state;
        let timing = outcome
            .attempt
            .map(|a| format!(" [{}]", a.quality.label()))
            .unwrap_or_default();
        println!(
            "{:>3}. {:<14} {:<12}{:<10} {:>+4} yds | {:<5} {}&{} at {:>2} (to {:>3}) | HOME {:>2} - AWAY {:>2}",
            n + 1,
            outcome.play_id,
            outcome.result.label(),
            timing,
            outcome.yards_gained,
            state.quarter.label(),
            state.down,
            state.yards_to_go,
            state.yard_line,
            state.line_to_gain(),
            state.score.home,
            state.score.away
        );
        if outcome.update.quarter_ended && state.quarter == Quarter::Third {
            println!("     --- HALFTIME ---");
        }
    }

    let score = game.drive().score;
    println!("\nFINAL: HOME {} - AWAY {} ({} plays)", score.home, score.away, game.plays_run());
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gridiron CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
