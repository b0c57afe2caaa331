//! Blueprint slot fill animation.
//!
//! When a landing covers blueprint slots each slot plays a short burst: it
//! grows and fades out. Slots are independent; the update is a flat pass
//! over the grid.

use serde::{Deserialize, Serialize};

use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintSlotsConfig {
    pub duration: f32,
    pub scale_up_speed: f32,
    pub fade_speed: f32,
    pub initial_scale: f32,
    pub initial_opacity: f32,
}

impl Default for BlueprintSlotsConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            scale_up_speed: 1.2,
            fade_speed: 2.0,
            initial_scale: 1.0,
            initial_opacity: 1.0,
        }
    }
}

/// Animation state of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAnimation {
    pub elapsed: f32,
    pub scale: f32,
    pub opacity: f32,
    pub active: bool,
}

impl Default for SlotAnimation {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            scale: 1.0,
            opacity: 0.0,
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotsState {
    Inactive,
    Animating,
}

#[derive(Debug, Clone)]
pub struct BlueprintSlotsFilledAnimation {
    fsm: StateMachine<SlotsState>,
    config: BlueprintSlotsConfig,
    num_columns: usize,
    num_rows: usize,
    slots: Vec<SlotAnimation>,
}

impl BlueprintSlotsFilledAnimation {
    pub fn new(num_columns: usize, num_rows: usize, config: BlueprintSlotsConfig) -> Self {
        Self {
            fsm: StateMachine::new("blueprint_slots", SlotsState::Inactive),
            config,
            num_columns,
            num_rows,
            slots: vec![SlotAnimation::default(); num_columns * num_rows],
        }
    }

    pub fn state(&self) -> SlotsState {
        self.fsm.state()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.num_columns && y < self.num_rows,
            "slot ({x}, {y}) outside {}x{}",
            self.num_columns,
            self.num_rows
        );
        y * self.num_columns + x
    }

    pub fn slot(&self, x: usize, y: usize) -> &SlotAnimation {
        &self.slots[self.index(x, y)]
    }

    /// Start (or restart) the burst of one slot
    pub fn start_slot(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.slots[i] = SlotAnimation {
            elapsed: 0.0,
            scale: self.config.initial_scale,
            opacity: self.config.initial_opacity,
            active: true,
        };
        if !self.fsm.is(SlotsState::Animating) {
            self.fsm.go_to(SlotsState::Animating);
        }
    }

    pub fn update(&mut self, dt: f32) -> SlotsState {
        if self.fsm.is(SlotsState::Inactive) {
            return SlotsState::Inactive;
        }

        let config = self.config;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            slot.elapsed += dt;
            slot.scale += config.scale_up_speed * dt;
            slot.opacity -= config.fade_speed * dt;
            if slot.elapsed > config.duration || slot.opacity < 0.0 {
                *slot = SlotAnimation::default();
            }
        }

        if !self.is_any_active() {
            self.fsm.go_to(SlotsState::Inactive);
        }
        self.fsm.update(dt)
    }

    pub fn is_any_active(&self) -> bool {
        self.slots.iter().any(|s| s.active)
    }

    /// Stop every slot
    pub fn reset(&mut self) {
        self.slots.fill(SlotAnimation::default());
        self.fsm.go_to(SlotsState::Inactive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_grows_and_fades() {
        let mut anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
        anim.start_slot(1, 2);
        assert_eq!(anim.state(), SlotsState::Animating);

        anim.update(0.1);
        let slot = *anim.slot(1, 2);
        assert!(slot.active);
        assert!((slot.scale - 1.12).abs() < 1e-5);
        assert!((slot.opacity - 0.8).abs() < 1e-5);
        assert!(!anim.slot(0, 0).active);
    }

    #[test]
    fn slot_returns_to_default_after_duration() {
        let mut anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
        anim.start_slot(3, 3);
        assert_eq!(anim.update(0.6), SlotsState::Inactive);
        assert_eq!(*anim.slot(3, 3), SlotAnimation::default());
    }

    #[test]
    fn slots_are_independent() {
        let mut anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
        anim.start_slot(0, 0);
        anim.update(0.3);
        anim.start_slot(1, 0);
        anim.update(0.3);
        assert!(!anim.slot(0, 0).active);
        assert!(anim.slot(1, 0).active);
        assert_eq!(anim.state(), SlotsState::Animating);
    }

    #[test]
    #[should_panic]
    fn out_of_range_slot_panics() {
        let mut anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
        anim.start_slot(4, 0);
    }
}
