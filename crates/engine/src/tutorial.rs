//! Tutorial sequence: the UFO flies in, a dialog window slides in next to it
//! and waits to be dismissed, then the window closes and the UFO leaves.
//!
//! ```text
//! Idle -> UfoArriving -> WindowSliding -> WaitingForDismiss
//!      -> WindowClosing -> UfoLeaving -> Done
//! ```
//!
//! Each step waits for the child animation to report its end state; only
//! `start` and `dismiss` are external triggers.

use log::{debug, info};

use crate::anim::{
    FadeConfig, FadeEffect, MenuState, SlidingMenuAnimation, SlidingMenuConfig, StateMachine,
    UfoAnimation, UfoConfig, UfoState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorialState {
    Idle,
    UfoArriving,
    WindowSliding,
    WaitingForDismiss,
    WindowClosing,
    UfoLeaving,
    Done,
}

#[derive(Debug, Clone)]
pub struct TutorialController {
    fsm: StateMachine<TutorialState>,
    ufo: UfoAnimation,
    window: SlidingMenuAnimation,
    fade: FadeEffect,
}

impl TutorialController {
    pub fn new(ufo: UfoConfig, window: SlidingMenuConfig, fade: FadeConfig) -> Self {
        Self {
            fsm: StateMachine::new("tutorial", TutorialState::Idle),
            ufo: UfoAnimation::new(ufo),
            window: SlidingMenuAnimation::new(window),
            fade: FadeEffect::new(fade),
        }
    }

    pub fn state(&self) -> TutorialState {
        self.fsm.state()
    }

    pub fn start(&mut self) {
        if !self.fsm.is(TutorialState::Idle) {
            debug!("tutorial: start requested in {:?}", self.fsm.state());
            return;
        }
        info!("tutorial started");
        self.ufo.start_flying_in();
        self.fade.start_fade_in();
        self.fsm.go_to(TutorialState::UfoArriving);
    }

    /// Close the window; accepted once the window has started sliding in
    pub fn dismiss(&mut self) -> bool {
        match self.fsm.state() {
            TutorialState::WindowSliding | TutorialState::WaitingForDismiss => {
                self.window.start_sliding_out();
                self.fsm.go_to(TutorialState::WindowClosing);
                true
            }
            state => {
                debug!("tutorial: dismiss ignored in {:?}", state);
                false
            }
        }
    }

    pub fn update(&mut self, dt: f32) -> TutorialState {
        self.ufo.update(dt);
        self.window.update(dt);
        self.fade.update(dt);

        match self.fsm.state() {
            TutorialState::UfoArriving if self.ufo.state() == UfoState::Hovering => {
                self.window.start_sliding_in();
                self.fsm.go_to(TutorialState::WindowSliding);
            }
            TutorialState::WindowSliding if self.window.is_shown() => {
                self.fsm.go_to(TutorialState::WaitingForDismiss);
            }
            TutorialState::WindowClosing if self.window.state() == MenuState::Inactive => {
                self.ufo.start_flying_away();
                self.fade.start_fade_out();
                self.fsm.go_to(TutorialState::UfoLeaving);
            }
            TutorialState::UfoLeaving if self.ufo.state() == UfoState::Inactive => {
                info!("tutorial finished");
                self.fsm.go_to(TutorialState::Done);
            }
            _ => {}
        }
        self.fsm.update(dt)
    }

    /// Gameplay is held while the tutorial runs
    pub fn is_blocking(&self) -> bool {
        !matches!(self.fsm.state(), TutorialState::Idle | TutorialState::Done)
    }

    pub fn is_done(&self) -> bool {
        self.fsm.is(TutorialState::Done)
    }

    pub fn ufo(&self) -> &UfoAnimation {
        &self.ufo
    }

    pub fn window(&self) -> &SlidingMenuAnimation {
        &self.window
    }

    pub fn fade(&self) -> &FadeEffect {
        &self.fade
    }
}

impl Default for TutorialController {
    fn default() -> Self {
        Self::new(
            UfoConfig::default(),
            SlidingMenuConfig::default(),
            FadeConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(tutorial: &mut TutorialController, state: TutorialState) {
        for _ in 0..200 {
            if tutorial.update(0.05) == state {
                return;
            }
        }
        panic!("tutorial never reached {:?}, stuck in {:?}", state, tutorial.state());
    }

    #[test]
    fn full_sequence() {
        let mut tutorial = TutorialController::default();
        assert!(!tutorial.is_blocking());
        tutorial.start();
        assert_eq!(tutorial.state(), TutorialState::UfoArriving);
        assert!(tutorial.is_blocking());

        run_until(&mut tutorial, TutorialState::WindowSliding);
        assert_eq!(tutorial.ufo().state(), UfoState::Hovering);
        run_until(&mut tutorial, TutorialState::WaitingForDismiss);
        assert!(tutorial.window().is_shown());

        // Waits indefinitely for the dismiss
        for _ in 0..100 {
            tutorial.update(0.1);
        }
        assert_eq!(tutorial.state(), TutorialState::WaitingForDismiss);

        assert!(tutorial.dismiss());
        run_until(&mut tutorial, TutorialState::UfoLeaving);
        run_until(&mut tutorial, TutorialState::Done);
        assert!(!tutorial.is_blocking());
        assert!(!tutorial.ufo().is_visible());
    }

    #[test]
    fn dismiss_before_window_is_ignored() {
        let mut tutorial = TutorialController::default();
        assert!(!tutorial.dismiss());
        tutorial.start();
        assert!(!tutorial.dismiss());
        assert_eq!(tutorial.state(), TutorialState::UfoArriving);
    }

    #[test]
    fn start_twice_does_not_restart() {
        let mut tutorial = TutorialController::default();
        tutorial.start();
        tutorial.update(0.5);
        tutorial.start();
        assert!(tutorial.ufo().position() != UfoConfig::default().start);
    }
}
