//! Animation layer.
//!
//! Small, independent state machines driven once per frame. Each one owns a
//! state enum and timers through the shared [`StateMachine`], exposes
//! `update(dt) -> State` plus a few explicit triggers (`start_*`,
//! `go_to_*_state`), and writes nothing but visual values. None of them owns
//! field or piece data; callers pass in what they need and sequence the
//! triggers against the game logic.
//!
//! | animation | states |
//! |-----------|--------|
//! | [`CollapsingFieldAnimation`] | Inactive, Waiting, Active, BlocksBouncing |
//! | [`BlueprintSlotsFilledAnimation`] | Inactive, Animating (per slot: elapsed, scale, opacity) |
//! | [`FallingPieceScaleAnimation`] | Inactive, ScalingUp, ScalingDown |
//! | [`PreviewPiecesAnimation`] | Inactive, Sliding |
//! | [`UfoAnimation`] | Inactive, FlyingIn, Hovering, FlyingAway |
//! | [`FadeEffect`] | Inactive, FadingIn, Covered, FadingOut |
//! | [`SlidingMenuAnimation`] | Inactive, SlidingIn, Shown, SlidingOut |

pub mod blueprint_slots;
pub mod collapsing_field;
pub mod easing;
pub mod fade;
pub mod falling_piece_scale;
pub mod fsm;
pub mod preview_pieces;
pub mod sliding_menu;
pub mod ufo;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use blueprint_slots::{BlueprintSlotsConfig, BlueprintSlotsFilledAnimation, SlotAnimation, SlotsState};
pub use collapsing_field::{CollapseState, CollapsingFieldAnimation, CollapsingFieldConfig};
pub use fade::{FadeConfig, FadeEffect, FadeState};
pub use falling_piece_scale::{FallingPieceScaleAnimation, FallingPieceScaleConfig, ScaleState};
pub use fsm::{StateMachine, Timeout};
pub use preview_pieces::{PreviewPiecesAnimation, PreviewPiecesConfig, PreviewState};
pub use sliding_menu::{MenuState, SlidingMenuAnimation, SlidingMenuConfig};
pub use ufo::{UfoAnimation, UfoConfig, UfoState};
