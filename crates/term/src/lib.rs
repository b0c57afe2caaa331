//! Terminal front end for the puzzle engine.
//!
//! The engine writes visual objects into a [`SceneBuffer`]; [`GameView`]
//! turns that table plus a [`Hud`] into a framebuffer of styled cells and
//! [`TerminalRenderer`] flushes it, rewriting only what changed.
//!
//! Field cells are drawn two characters wide so blocks look roughly square
//! in common terminal fonts.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod scene;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Hud, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use scene::{SceneBuffer, VisualObject};
