//! UFO animation: the tutorial guide flies in, hovers with a slow bob and
//! flies away when told to.

use std::f32::consts::TAU;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::easing::{ease_in_cubic, ease_out_cubic};
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UfoState {
    Inactive,
    FlyingIn,
    Hovering,
    FlyingAway,
}

/// Positions are in field cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UfoConfig {
    pub start: Vec2,
    pub hover: Vec2,
    pub exit: Vec2,
    pub fly_in_duration: f32,
    pub fly_away_duration: f32,
    pub hover_amplitude: f32,
    /// Bobs per second
    pub hover_frequency: f32,
}

impl Default for UfoConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(-4.0, 1.0),
            hover: Vec2::new(2.0, 2.0),
            exit: Vec2::new(14.0, -4.0),
            fly_in_duration: 1.0,
            fly_away_duration: 0.8,
            hover_amplitude: 0.3,
            hover_frequency: 0.75,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UfoAnimation {
    fsm: StateMachine<UfoState>,
    config: UfoConfig,
    away_from: Vec2,
}

impl UfoAnimation {
    pub fn new(config: UfoConfig) -> Self {
        let fsm = StateMachine::new("ufo", UfoState::Inactive)
            .with_timeout(UfoState::FlyingIn, config.fly_in_duration, UfoState::Hovering)
            .with_timeout(UfoState::FlyingAway, config.fly_away_duration, UfoState::Inactive);
        Self {
            fsm,
            config,
            away_from: config.hover,
        }
    }

    pub fn state(&self) -> UfoState {
        self.fsm.state()
    }

    pub fn start_flying_in(&mut self) {
        self.fsm.go_to(UfoState::FlyingIn);
    }

    pub fn start_flying_away(&mut self) {
        match self.fsm.state() {
            UfoState::FlyingIn | UfoState::Hovering => {
                self.away_from = self.position();
                self.fsm.go_to(UfoState::FlyingAway);
            }
            state => debug!("ufo: fly away requested in {:?}", state),
        }
    }

    pub fn update(&mut self, dt: f32) -> UfoState {
        self.fsm.update(dt)
    }

    pub fn position(&self) -> Vec2 {
        let c = &self.config;
        match self.fsm.state() {
            UfoState::Inactive => c.start,
            UfoState::FlyingIn => {
                let t = ease_out_cubic(self.fsm.progress(c.fly_in_duration));
                c.start.lerp(c.hover, t)
            }
            UfoState::Hovering => {
                let phase = TAU * c.hover_frequency * self.fsm.elapsed();
                c.hover + Vec2::Y * (c.hover_amplitude * phase.sin())
            }
            UfoState::FlyingAway => {
                let t = ease_in_cubic(self.fsm.progress(c.fly_away_duration));
                self.away_from.lerp(c.exit, t)
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.fsm.is(UfoState::Inactive)
    }

    pub fn reset(&mut self) {
        self.fsm.go_to(UfoState::Inactive);
    }
}

impl Default for UfoAnimation {
    fn default() -> Self {
        Self::new(UfoConfig::default())
    }
}
