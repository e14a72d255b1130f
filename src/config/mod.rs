use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::utils::{GameError, GameResult};

/// Prefix for environment overrides, e.g. `LOHRI__UI__THEME=dark`.
pub const ENV_PREFIX: &str = "LOHRI";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub timings: TimingConfig,
    pub game: GameTuning,
    pub effects: EffectConfig,
    pub ui: UiConfig,
    pub audio: AudioConfig,
    pub paths: PathConfig,
    pub logging: LoggingConfig,
}

/// Stage and tick timings, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub intro_duration_ms: u64,
    pub dancers_reveal_ms: u64,
    pub greeting_reveal_ms: u64,
    pub story_panel_ms: u64,
    pub decay_interval_ms: u64,
    pub frame_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTuning {
    pub initial_happiness: f64,
    pub refresh_happiness: f64,
    pub placement_band_min: f64,
    pub delete_penalty: f64,
    pub finale_reset: f64,
    pub beat_step: f64,
    pub beat_happiness: f64,
    pub decay_step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    pub toss_ms: u64,
    pub trail_ms: u64,
    pub trail_length: usize,
    pub sky_flash_ms: u64,
    pub sparkle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: String,
    pub canvas_cols: u16,
    pub canvas_rows: u16,
    pub text_width: usize,
    pub show_event_log: bool,
    pub event_log_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub storyboard: Option<PathBuf>,
    pub config_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_to_file: bool,
    pub log_file: PathBuf,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            intro_duration_ms: 8500,
            dancers_reveal_ms: 1200,
            greeting_reveal_ms: 3200,
            story_panel_ms: 4500,
            decay_interval_ms: 200,
            frame_ms: 100,
        }
    }
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            initial_happiness: 25.0,
            refresh_happiness: 25.0,
            placement_band_min: 45.0,
            delete_penalty: 5.0,
            finale_reset: 99.0,
            beat_step: 0.6,
            beat_happiness: 1.2,
            decay_step: 0.05,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            toss_ms: 800,
            trail_ms: 400,
            trail_length: 10,
            sky_flash_ms: 70,
            sparkle_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timings: TimingConfig::default(),
            game: GameTuning::default(),
            effects: EffectConfig::default(),
            ui: UiConfig {
                theme: "default".to_string(),
                canvas_cols: 60,
                canvas_rows: 20,
                text_width: 80,
                show_event_log: true,
                event_log_lines: 4,
            },
            audio: AudioConfig { enabled: true },
            paths: PathConfig {
                storyboard: None,
                config_dir: PathBuf::from("./assets/config"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_to_file: true,
                log_file: PathBuf::from("./assets/logs/lohri.log"),
            },
        }
    }
}

impl TimingConfig {
    pub fn intro_duration(&self) -> Duration {
        Duration::from_millis(self.intro_duration_ms)
    }

    pub fn dancers_reveal(&self) -> Duration {
        Duration::from_millis(self.dancers_reveal_ms)
    }

    pub fn greeting_reveal(&self) -> Duration {
        Duration::from_millis(self.greeting_reveal_ms)
    }

    pub fn story_panel(&self) -> Duration {
        Duration::from_millis(self.story_panel_ms)
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GameError::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| GameError::configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Layers the built-in defaults, an optional TOML file and `LOHRI__*`
    /// environment variables, in that order.
    pub fn load(path: Option<&Path>) -> GameResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                Self::default().save_to_file(path)?;
            }
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        let layered = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(layered.try_deserialize::<Config>()?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GameResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GameError::configuration(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| GameError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_content)
            .map_err(|e| GameError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn default_config_path(&self) -> PathBuf {
        self.paths.config_dir.join("lohri.toml")
    }

    pub fn validate(&self) -> GameResult<()> {
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(GameError::configuration("Invalid logging level")),
        }

        if self.timings.decay_interval_ms == 0 {
            return Err(GameError::configuration("Decay interval must be greater than 0"));
        }
        if self.timings.story_panel_ms == 0 {
            return Err(GameError::configuration("Story panel duration must be greater than 0"));
        }
        if self.timings.frame_ms == 0 {
            return Err(GameError::configuration("Frame interval must be greater than 0"));
        }
        if self.timings.dancers_reveal_ms > self.timings.intro_duration_ms
            || self.timings.greeting_reveal_ms > self.timings.intro_duration_ms
        {
            return Err(GameError::configuration("Intro reveals must happen before the intro ends"));
        }

        let game = &self.game;
        if !(0.0..=100.0).contains(&game.initial_happiness) {
            return Err(GameError::configuration("Initial happiness must be within 0..=100"));
        }
        if !(0.0..100.0).contains(&game.refresh_happiness) {
            return Err(GameError::configuration("Refresh happiness must be below 100"));
        }
        if !(0.0..=100.0).contains(&game.placement_band_min) {
            return Err(GameError::configuration("Placement band must start within 0..=100"));
        }
        if !(0.0..100.0).contains(&game.finale_reset) {
            return Err(GameError::configuration("Finale reset must be below 100"));
        }
        if game.delete_penalty < 0.0 || game.beat_step < 0.0 || game.beat_happiness < 0.0 || game.decay_step < 0.0 {
            return Err(GameError::configuration("Score steps cannot be negative"));
        }

        if self.effects.trail_length == 0 {
            return Err(GameError::configuration("Trail length must be greater than 0"));
        }
        if self.ui.canvas_cols < 20 || self.ui.canvas_rows < 8 {
            return Err(GameError::configuration("Canvas must be at least 20x8 cells"));
        }
        if self.ui.text_width < 40 {
            return Err(GameError::configuration("Text width must be at least 40"));
        }

        Ok(())
    }

    pub fn merge_with_cli(&mut self, cli_config: CliConfig) {
        if let Some(storyboard) = cli_config.storyboard {
            self.paths.storyboard = Some(storyboard);
        }
        if let Some(log_level) = cli_config.log_level {
            self.logging.level = log_level;
        }
        if cli_config.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(theme) = cli_config.theme {
            self.ui.theme = theme;
        }
        if cli_config.mute {
            self.audio.enabled = false;
        }
    }
}

// Configuration that can be overridden by CLI arguments
#[derive(Debug, Default)]
pub struct CliConfig {
    pub storyboard: Option<PathBuf>,
    pub log_level: Option<String>,
    pub debug: bool,
    pub theme: Option<String>,
    pub mute: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.timings.intro_duration_ms, 8500);
        assert_eq!(config.timings.decay_interval_ms, 200);
        assert_eq!(config.game.initial_happiness, 25.0);
        assert_eq!(config.game.refresh_happiness, 25.0);
        assert_eq!(config.game.placement_band_min, 45.0);
        assert_eq!(config.ui.theme, "default");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.timings.decay_interval_ms = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.game.finale_reset = 100.0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.game.refresh_happiness = 100.0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.timings.greeting_reveal_ms = 9000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("lohri.toml");

        let mut original_config = Config::default();
        original_config.ui.theme = "dark".to_string();
        original_config.save_to_file(&config_path).unwrap();

        let loaded_config = Config::from_file(&config_path).unwrap();

        assert_eq!(loaded_config.ui.theme, "dark");
        assert_eq!(original_config.timings.story_panel_ms, loaded_config.timings.story_panel_ms);
        assert_eq!(original_config.logging.level, loaded_config.logging.level);
    }

    #[test]
    fn test_from_file_writes_defaults_when_missing() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("lohri.toml");

        let config = Config::from_file(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(config.ui.canvas_cols, 60);
    }

    #[test]
    fn test_layered_load_reads_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("lohri.toml");

        let mut on_disk = Config::default();
        on_disk.timings.story_panel_ms = 3000;
        on_disk.audio.enabled = false;
        on_disk.save_to_file(&config_path).unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.timings.story_panel_ms, 3000);
        assert!(!config.audio.enabled);
        assert_eq!(config.timings.intro_duration_ms, 8500);
    }

    #[test]
    fn test_layered_load_without_file_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.game.delete_penalty, 5.0);
        assert_eq!(config.effects.trail_length, 10);
    }

    #[test]
    fn test_cli_config_merge() {
        let mut config = Config::default();
        let cli_config = CliConfig {
            log_level: Some("trace".to_string()),
            theme: Some("bonfire".to_string()),
            mute: true,
            ..Default::default()
        };

        config.merge_with_cli(cli_config);

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.ui.theme, "bonfire");
        assert!(!config.audio.enabled);
    }

    #[test]
    fn test_debug_flag_wins_over_level() {
        let mut config = Config::default();
        config.merge_with_cli(CliConfig {
            log_level: Some("warn".to_string()),
            debug: true,
            ..Default::default()
        });
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_timing_durations() {
        let timings = TimingConfig::default();
        assert_eq!(timings.decay_interval(), Duration::from_millis(200));
        assert_eq!(timings.story_panel(), Duration::from_millis(4500));
        assert_eq!(timings.intro_duration(), Duration::from_millis(8500));
    }
}
