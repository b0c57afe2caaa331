//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s and front
//! end commands, and tracks a soft drop hold for terminals that never report
//! key releases.

pub mod hold;
pub mod map;

pub use blockfall_types as types;

pub use hold::SoftDropHold;
pub use map::{handle_key_event, map_key, should_dismiss, should_quit, Command};
