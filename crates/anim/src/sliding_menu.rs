//! Sliding menu animation: a dialog window that slides in from below with a
//! background dim, stays until dismissed, then slides back out.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::easing::{ease_in_cubic, ease_out_cubic};
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuState {
    Inactive,
    SlidingIn,
    Shown,
    SlidingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingMenuConfig {
    /// Distance below the resting place when hidden (field cells)
    pub slide_distance: f32,
    pub slide_in_duration: f32,
    pub slide_out_duration: f32,
    pub background_opacity: f32,
}

impl Default for SlidingMenuConfig {
    fn default() -> Self {
        Self {
            slide_distance: 12.0,
            slide_in_duration: 0.35,
            slide_out_duration: 0.25,
            background_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlidingMenuAnimation {
    fsm: StateMachine<MenuState>,
    config: SlidingMenuConfig,
}

impl SlidingMenuAnimation {
    pub fn new(config: SlidingMenuConfig) -> Self {
        let fsm = StateMachine::new("sliding_menu", MenuState::Inactive)
            .with_timeout(MenuState::SlidingIn, config.slide_in_duration, MenuState::Shown)
            .with_timeout(MenuState::SlidingOut, config.slide_out_duration, MenuState::Inactive);
        Self { fsm, config }
    }

    pub fn state(&self) -> MenuState {
        self.fsm.state()
    }

    pub fn start_sliding_in(&mut self) {
        self.fsm.go_to(MenuState::SlidingIn);
    }

    pub fn start_sliding_out(&mut self) {
        match self.fsm.state() {
            MenuState::SlidingIn | MenuState::Shown => self.fsm.go_to(MenuState::SlidingOut),
            state => debug!("sliding_menu: slide out requested in {:?}", state),
        }
    }

    pub fn update(&mut self, dt: f32) -> MenuState {
        self.fsm.update(dt)
    }

    pub fn is_shown(&self) -> bool {
        self.fsm.is(MenuState::Shown)
    }

    /// Vertical offset below the resting place
    pub fn offset(&self) -> f32 {
        let c = &self.config;
        match self.fsm.state() {
            MenuState::Inactive => c.slide_distance,
            MenuState::SlidingIn => {
                c.slide_distance * (1.0 - ease_out_cubic(self.fsm.progress(c.slide_in_duration)))
            }
            MenuState::Shown => 0.0,
            MenuState::SlidingOut => {
                c.slide_distance * ease_in_cubic(self.fsm.progress(c.slide_out_duration))
            }
        }
    }

    pub fn background_opacity(&self) -> f32 {
        let c = &self.config;
        match self.fsm.state() {
            MenuState::Inactive => 0.0,
            MenuState::SlidingIn => c.background_opacity * self.fsm.progress(c.slide_in_duration),
            MenuState::Shown => c.background_opacity,
            MenuState::SlidingOut => {
                c.background_opacity * (1.0 - self.fsm.progress(c.slide_out_duration))
            }
        }
    }

    pub fn reset(&mut self) {
        self.fsm.go_to(MenuState::Inactive);
    }
}

impl Default for SlidingMenuAnimation {
    fn default() -> Self {
        Self::new(SlidingMenuConfig::default())
    }
}
