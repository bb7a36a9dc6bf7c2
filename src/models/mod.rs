//! Core data models for the roster tracker.

mod event;
mod leaderboard;
mod ranking;
mod roster;
mod window;

pub use event::*;
pub use leaderboard::*;
pub use ranking::*;
pub use roster::*;
pub use window::*;
