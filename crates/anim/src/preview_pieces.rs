//! Preview pieces animation: when the front preview becomes the falling
//! piece, the remaining previews slide one slot forward and the newly
//! revealed one grows in at the back.

use serde::{Deserialize, Serialize};

use crate::easing::ease_out_cubic;
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewState {
    Inactive,
    Sliding,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewPiecesConfig {
    pub slide_duration: f32,
}

impl Default for PreviewPiecesConfig {
    fn default() -> Self {
        Self {
            slide_duration: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewPiecesAnimation {
    fsm: StateMachine<PreviewState>,
    config: PreviewPiecesConfig,
}

impl PreviewPiecesAnimation {
    pub fn new(config: PreviewPiecesConfig) -> Self {
        let fsm = StateMachine::new("preview_pieces", PreviewState::Inactive).with_timeout(
            PreviewState::Sliding,
            config.slide_duration,
            PreviewState::Inactive,
        );
        Self { fsm, config }
    }

    pub fn state(&self) -> PreviewState {
        self.fsm.state()
    }

    pub fn start_sliding(&mut self) {
        self.fsm.go_to(PreviewState::Sliding);
    }

    pub fn update(&mut self, dt: f32) -> PreviewState {
        self.fsm.update(dt)
    }

    fn eased(&self) -> f32 {
        match self.fsm.state() {
            PreviewState::Inactive => 1.0,
            PreviewState::Sliding => ease_out_cubic(self.fsm.progress(self.config.slide_duration)),
        }
    }

    /// How far (in slots) each preview still sits behind its resting place
    pub fn slot_offset(&self) -> f32 {
        1.0 - self.eased()
    }

    /// Scale of the preview in the last slot
    pub fn new_piece_scale(&self) -> f32 {
        self.eased()
    }

    pub fn reset(&mut self) {
        self.fsm.go_to(PreviewState::Inactive);
    }
}

impl Default for PreviewPiecesAnimation {
    fn default() -> Self {
        Self::new(PreviewPiecesConfig::default())
    }
}
