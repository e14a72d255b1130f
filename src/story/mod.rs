pub mod story;
pub mod loader;

pub use story::{Storyboard, StoryPanel, StoryPlayer, StoryStep};
pub use loader::StoryLoader;
