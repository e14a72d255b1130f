pub mod audio;
pub mod catalog;
pub mod effects;
pub mod engine;
pub mod events;
pub mod game_state;
pub mod schedule;
pub mod score;
pub mod stage;
pub mod village;

pub use audio::{Silence, TerminalBell, Tone, ToneSink};
pub use catalog::{ItemKind, Offering};
pub use engine::CelebrationEngine;
pub use events::{EventLogger, GameEvent, GameEventHandler, GameEventType};
pub use game_state::{Finale, GameState, Placement, VillageStatistics};
pub use score::{ComboMultiplier, Happiness};
pub use stage::{IntroCinematic, IntroPhase, Stage};
pub use village::{Canvas, PlacedItem, Point, Position, Village};
