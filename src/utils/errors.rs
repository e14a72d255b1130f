use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Story error: {message}")]
    Story { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GameError {
    pub fn story<S: Into<String>>(message: S) -> Self {
        Self::Story {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn terminal<S: Into<String>>(message: S) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = GameError::story("Storyboard has no panels");
        assert!(matches!(error, GameError::Story { .. }));
        assert_eq!(error.to_string(), "Story error: Storyboard has no panels");
    }

    #[test]
    fn test_configuration_error() {
        let error = GameError::configuration("Invalid logging level");
        assert!(matches!(error, GameError::Configuration { .. }));
        assert_eq!(error.to_string(), "Configuration error: Invalid logging level");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: GameError = io.into();
        assert!(matches!(error, GameError::Io(_)));
    }
}
