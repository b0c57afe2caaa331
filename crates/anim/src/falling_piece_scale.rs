//! Falling piece scale animation.
//!
//! A freshly spawned piece grows from its preview scale to full size. It can
//! also be shrunk back (for example when the level restarts under it).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::easing::{ease_in_cubic, ease_out_cubic, lerp};
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleState {
    Inactive,
    ScalingUp,
    ScalingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingPieceScaleConfig {
    pub scale_up_duration: f32,
    pub scale_down_duration: f32,
}

impl Default for FallingPieceScaleConfig {
    fn default() -> Self {
        Self {
            scale_up_duration: 0.2,
            scale_down_duration: 0.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FallingPieceScaleAnimation {
    fsm: StateMachine<ScaleState>,
    config: FallingPieceScaleConfig,
    from: f32,
    to: f32,
}

impl FallingPieceScaleAnimation {
    pub fn new(config: FallingPieceScaleConfig) -> Self {
        let fsm = StateMachine::new("falling_piece_scale", ScaleState::Inactive)
            .with_timeout(ScaleState::ScalingUp, config.scale_up_duration, ScaleState::Inactive)
            .with_timeout(
                ScaleState::ScalingDown,
                config.scale_down_duration,
                ScaleState::Inactive,
            );
        Self {
            fsm,
            config,
            from: 1.0,
            to: 1.0,
        }
    }

    pub fn state(&self) -> ScaleState {
        self.fsm.state()
    }

    /// Grow from `from_scale` to full size
    pub fn start_scaling_up(&mut self, from_scale: f32) {
        self.from = from_scale;
        self.to = 1.0;
        self.fsm.go_to(ScaleState::ScalingUp);
    }

    /// Shrink from the current scale to `to_scale`
    pub fn start_scaling_down(&mut self, to_scale: f32) {
        if self.fsm.is(ScaleState::ScalingDown) {
            debug!("falling_piece_scale: already scaling down");
            return;
        }
        self.from = self.scale();
        self.to = to_scale;
        self.fsm.go_to(ScaleState::ScalingDown);
    }

    pub fn update(&mut self, dt: f32) -> ScaleState {
        self.fsm.update(dt)
    }

    pub fn scale(&self) -> f32 {
        match self.fsm.state() {
            ScaleState::Inactive => self.to,
            ScaleState::ScalingUp => {
                let t = self.fsm.progress(self.config.scale_up_duration);
                lerp(self.from, self.to, ease_out_cubic(t))
            }
            ScaleState::ScalingDown => {
                let t = self.fsm.progress(self.config.scale_down_duration);
                lerp(self.from, self.to, ease_in_cubic(t))
            }
        }
    }

    pub fn reset(&mut self) {
        self.from = 1.0;
        self.to = 1.0;
        self.fsm.go_to(ScaleState::Inactive);
    }
}

impl Default for FallingPieceScaleAnimation {
    fn default() -> Self {
        Self::new(FallingPieceScaleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_to_full_size() {
        let mut anim = FallingPieceScaleAnimation::default();
        assert_eq!(anim.scale(), 1.0);
        anim.start_scaling_up(0.5);
        assert_eq!(anim.scale(), 0.5);
        anim.update(0.1);
        let mid = anim.scale();
        assert!(mid > 0.5 && mid < 1.0);
        assert_eq!(anim.update(0.2), ScaleState::Inactive);
        assert_eq!(anim.scale(), 1.0);
    }

    #[test]
    fn shrinks_from_current_scale() {
        let mut anim = FallingPieceScaleAnimation::default();
        anim.start_scaling_up(0.5);
        anim.update(0.1);
        let mid = anim.scale();
        anim.start_scaling_down(0.4);
        assert!((anim.scale() - mid).abs() < 1e-6);
        anim.update(0.5);
        assert_eq!(anim.state(), ScaleState::Inactive);
        assert!((anim.scale() - 0.4).abs() < 1e-6);
    }
}
