pub mod core;
pub mod story;
pub mod ui;
pub mod config;
pub mod utils;

pub use crate::core::{CelebrationEngine, GameState, ItemKind, Offering, Stage};
pub use crate::story::{StoryLoader, Storyboard};
pub use crate::ui::{GameInterface, Launch};
pub use crate::config::Config;

// Re-export commonly used types
pub type Result<T> = anyhow::Result<T>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
