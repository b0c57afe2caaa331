//! Fade effect: a full-screen overlay that fades in behind dialogs and fades
//! out when they close.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::easing::lerp;
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeState {
    Inactive,
    FadingIn,
    Covered,
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub fade_in_duration: f32,
    pub fade_out_duration: f32,
    pub max_opacity: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in_duration: 0.3,
            fade_out_duration: 0.3,
            max_opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FadeEffect {
    fsm: StateMachine<FadeState>,
    config: FadeConfig,
    fade_out_from: f32,
}

impl FadeEffect {
    pub fn new(config: FadeConfig) -> Self {
        let fsm = StateMachine::new("fade", FadeState::Inactive)
            .with_timeout(FadeState::FadingIn, config.fade_in_duration, FadeState::Covered)
            .with_timeout(FadeState::FadingOut, config.fade_out_duration, FadeState::Inactive);
        Self {
            fsm,
            config,
            fade_out_from: config.max_opacity,
        }
    }

    pub fn state(&self) -> FadeState {
        self.fsm.state()
    }

    pub fn start_fade_in(&mut self) {
        if matches!(self.fsm.state(), FadeState::FadingIn | FadeState::Covered) {
            return;
        }
        self.fsm.go_to(FadeState::FadingIn);
    }

    pub fn start_fade_out(&mut self) {
        match self.fsm.state() {
            FadeState::FadingIn | FadeState::Covered => {
                self.fade_out_from = self.opacity();
                self.fsm.go_to(FadeState::FadingOut);
            }
            state => debug!("fade: fade out requested in {:?}", state),
        }
    }

    pub fn update(&mut self, dt: f32) -> FadeState {
        self.fsm.update(dt)
    }

    pub fn opacity(&self) -> f32 {
        let c = &self.config;
        match self.fsm.state() {
            FadeState::Inactive => 0.0,
            FadeState::FadingIn => c.max_opacity * self.fsm.progress(c.fade_in_duration),
            FadeState::Covered => c.max_opacity,
            FadeState::FadingOut => lerp(
                self.fade_out_from,
                0.0,
                self.fsm.progress(c.fade_out_duration),
            ),
        }
    }

    pub fn reset(&mut self) {
        self.fsm.go_to(FadeState::Inactive);
    }
}

impl Default for FadeEffect {
    fn default() -> Self {
        Self::new(FadeConfig::default())
    }
}
