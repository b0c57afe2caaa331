//! Engine seam - drives a level frame by frame against narrow collaborators.
//!
//! The renderer, the mixer and the dialog system are out of reach of this
//! crate. The game talks to them through the [`Scene`], [`Audio`] and
//! [`GameListener`] traits, which the caller passes into every
//! [`GameController::frame`] call.
//!
//! # Module Structure
//!
//! - [`scene`]: collaborator traits and visual object handles
//! - [`gui`]: dialog view activation
//! - [`config`]: JSON game configuration
//! - [`presenter`]: writes field, falling piece, previews and overlays into the scene
//! - [`controller`]: the per-frame sequence of logic, events, animations and presentation
//! - [`tutorial`]: UFO + sliding window + fade tutorial sequence
//! - [`place`]: play a searched move through regular actions

pub mod config;
pub mod controller;
pub mod gui;
pub mod place;
pub mod presenter;
pub mod scene;
pub mod tutorial;

pub use blockfall_anim as anim;
pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::{ConfigError, GameConfig};
pub use controller::{DialogViews, EngineError, GameController};
pub use gui::{GuiViewManager, ViewId};
pub use place::{apply_move, PlaceError};
pub use presenter::{FieldAnimations, FieldPresenter, Overlay};
pub use scene::{Audio, GameListener, NullAudio, Scene, Sound, VisualId, VisualKind};
pub use tutorial::{TutorialController, TutorialState};
