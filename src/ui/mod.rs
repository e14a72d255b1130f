pub mod components;
pub mod input;
pub mod interface;
pub mod theme;

pub use components::{Display, Line, Span};
pub use interface::{GameInterface, Launch};
pub use theme::{Theme, ThemeManager};
