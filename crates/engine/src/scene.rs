//! Collaborator seams - scene objects, sound and game outcome callbacks
//!
//! The game never talks to a renderer, a mixer or a dialog system directly.
//! It creates visual objects through [`Scene`], plays effects through
//! [`Audio`] and reports level outcomes through [`GameListener`]. Every
//! handle is passed into the frame call; nothing here is global.

use glam::Vec2;

use crate::types::BlockColor;

/// Handle of a visual object created by a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u32);

/// What a visual object stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    FieldBlock,
    BlueprintSlot,
    FallingBlock,
    GhostBlock,
    PreviewBlock,
    Ufo,
    MenuWindow,
    FadeOverlay,
}

/// Scene graph collaborator
///
/// Positions are in field cells with the origin at the top left of the
/// field; `y` grows downwards.
pub trait Scene {
    fn create_visual_object(&mut self, kind: VisualKind) -> VisualId;
    fn set_visible(&mut self, id: VisualId, visible: bool);
    fn set_position(&mut self, id: VisualId, position: Vec2);
    fn set_scale(&mut self, id: VisualId, scale: f32);
    fn set_opacity(&mut self, id: VisualId, opacity: f32);
    fn set_color(&mut self, id: VisualId, color: BlockColor);
}

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Piece shifted sideways or down
    Move,
    Rotate,
    /// Piece merged into the field
    Land,
    Explosion,
    /// Blueprint slots covered
    SlotFilled,
    RowsCleared,
    LevelCompleted,
    NoMovesLeft,
}

pub trait Audio {
    fn play_sound(&mut self, sound: Sound);
}

/// Audio sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_sound(&mut self, _sound: Sound) {}
}

/// Receives level outcomes (the dialog layer in a full game)
pub trait GameListener {
    fn on_no_moves_left(&mut self);
    fn on_level_completed(&mut self, num_stars: u8);
}
