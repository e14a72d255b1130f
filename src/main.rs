use anyhow::{Context, Result};
use clap::Parser;
use lohri_village::config::CliConfig;
use lohri_village::{Config, GameInterface, Launch, StoryLoader, VERSION};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "lohri")]
#[command(about = "Celebrate Lohri in your terminal: a bonfire, a story and a village to adorn")]
#[command(version = VERSION)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storyboard JSON to tell instead of the built-in tale
    #[arg(short, long)]
    storyboard: Option<PathBuf>,

    /// Start with the story
    #[arg(long)]
    skip_intro: bool,

    /// Start in the village
    #[arg(long, conflicts_with = "skip_intro")]
    village: bool,

    /// Colour theme (default, dark, bonfire)
    #[arg(short, long)]
    theme: Option<String>,

    /// Do not ring the dhol
    #[arg(short, long)]
    mute: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the built-in storyboard to a file and exit
    #[arg(long, value_name = "PATH")]
    export_storyboard: Option<PathBuf>,
}

impl Cli {
    fn launch(&self) -> Option<Launch> {
        if self.village {
            Some(Launch::Village)
        } else if self.skip_intro {
            Some(Launch::Story)
        } else {
            None
        }
    }
}

// The terminal is the game screen, so logs go to a file unless told otherwise.
fn log_filter(level: &str) -> String {
    format!("lohri={level},lohri_village={level},warn")
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = log_filter(&config.logging.level);

    if config.logging.log_to_file {
        let log_file = &config.logging.log_file;
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("Failed to open log file {:?}", log_file))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let launch = cli.launch();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(CliConfig {
        storyboard: cli.storyboard.clone(),
        log_level: cli.log_level.clone(),
        debug: cli.debug,
        theme: cli.theme.clone(),
        mute: cli.mute,
    });
    config.validate()?;

    init_logging(&config)?;
    info!("Starting Lohri v{}", VERSION);

    let loader = StoryLoader::new(config.paths.storyboard.clone());

    if let Some(path) = cli.export_storyboard {
        let board = loader.export_builtin(&path).await?;
        println!("Wrote \"{}\" ({} panels) to {}", board.title, board.panels.len(), path.display());
        return Ok(());
    }

    let storyboard = loader.load().await?;
    let mut game_interface = GameInterface::new(config, storyboard)?;

    if let Err(e) = game_interface.run(launch).await {
        error!("Game error: {}", e);
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }

    info!("Game session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["lohri", "--debug", "--theme", "bonfire"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.theme.as_deref(), Some("bonfire"));
        assert_eq!(cli.launch(), None);
    }

    #[test]
    fn test_launch_flags() {
        let cli = Cli::try_parse_from(["lohri", "--skip-intro"]).unwrap();
        assert_eq!(cli.launch(), Some(Launch::Story));

        let cli = Cli::try_parse_from(["lohri", "--village", "--mute"]).unwrap();
        assert_eq!(cli.launch(), Some(Launch::Village));
        assert!(cli.mute);

        assert!(Cli::try_parse_from(["lohri", "--village", "--skip-intro"]).is_err());
    }

    #[test]
    fn test_log_filter_covers_binary_and_library() {
        let filter = log_filter("debug");
        assert!(filter.contains("lohri=debug"));
        assert!(filter.contains("lohri_village=debug"));
        assert!(tracing_subscriber::EnvFilter::try_new(&filter).is_ok());
    }
}
