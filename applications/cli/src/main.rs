/// Podcastr CLI - play episode catalogs against a simulated clock
mod driver;

use anyhow::Context;
use clap::{Parser, Subcommand};
use driver::{format_duration, PlayOptions};
use podcastr_playback::{media_channel, Catalog, PlayerConfig, PlayerSession, SimulatedOutput};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podcastr")]
#[command(about = "Podcastr episode player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the episodes in a catalog
    List {
        /// Catalog file (JSON array of episodes)
        #[arg(short, long, env = "PODCASTR_CATALOG")]
        catalog: PathBuf,
    },
    /// Play a catalog, advancing a simulated clock
    Play {
        /// Catalog file (JSON array of episodes)
        #[arg(short, long, env = "PODCASTR_CATALOG")]
        catalog: PathBuf,
        /// Index of the first episode
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Play only the starting episode
        #[arg(long)]
        single: bool,
        /// Turn shuffle on
        #[arg(long)]
        shuffle: bool,
        /// Turn loop on
        #[arg(long = "loop")]
        looping: bool,
        /// Leave newly loaded episodes paused
        #[arg(long)]
        no_autoplay: bool,
        /// Simulated seconds per tick
        #[arg(long, default_value_t = 60)]
        step: u64,
        /// Maximum number of ticks
        #[arg(long, default_value_t = 1000)]
        ticks: usize,
        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podcastr=info,podcastr_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { catalog } => list(&catalog)?,
        Commands::Play {
            catalog,
            start,
            single,
            shuffle,
            looping,
            no_autoplay,
            step,
            ticks,
            config,
        } => {
            let mut player_config = PlayerConfig::load(config.as_deref())?;
            player_config.shuffling |= shuffle;
            player_config.looping |= looping;
            player_config.autoplay &= !no_autoplay;

            let options = PlayOptions {
                start,
                single,
                step,
                max_ticks: ticks,
            };
            play(&catalog, &player_config, &options)?;
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    Catalog::from_path(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn list(path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(path)?;
    for (index, episode) in catalog.episodes().iter().enumerate() {
        println!(
            "{:>3}  {}  {}  ({})",
            index,
            format_duration(episode.duration),
            episode.title,
            episode.members
        );
    }
    Ok(())
}

fn play(path: &Path, config: &PlayerConfig, options: &PlayOptions) -> anyhow::Result<()> {
    let catalog = load_catalog(path)?;
    tracing::info!("Loaded {} episodes from {}", catalog.len(), path.display());

    let (sender, queue) = media_channel();
    let output = SimulatedOutput::new(sender, catalog.episodes());
    let mut session = PlayerSession::new(config, output, queue);

    driver::start(&mut session, catalog.into_episodes(), options)?;
    driver::drive(&mut session, options);

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_play_args_parse() {
        let cli = Cli::try_parse_from([
            "podcastr", "play", "--catalog", "eps.json", "--start", "2", "--loop", "--step", "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Play {
                catalog,
                start,
                looping,
                shuffle,
                step,
                ticks,
                ..
            } => {
                assert_eq!(catalog, PathBuf::from("eps.json"));
                assert_eq!(start, 2);
                assert!(looping);
                assert!(!shuffle);
                assert_eq!(step, 30);
                assert_eq!(ticks, 1000);
            }
            Commands::List { .. } => panic!("expected play"),
        }
    }

    #[test]
    fn test_play_requires_catalog() {
        std::env::remove_var("PODCASTR_CATALOG");
        assert!(Cli::try_parse_from(["podcastr", "play"]).is_err());
    }

    #[test]
    fn test_play_runs_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title":"a","members":"Ana","duration":90,"thumbnail":"a.jpg","url":"a.mp3"}}]"#
        )
        .unwrap();

        let options = PlayOptions {
            start: 0,
            single: false,
            step: 60,
            max_ticks: 10,
        };
        play(file.path(), &PlayerConfig::default(), &options).unwrap();
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let error = list(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/catalog.json"));
    }
}
