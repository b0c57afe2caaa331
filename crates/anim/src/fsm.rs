//! Shared finite state machine for the animation layer.
//!
//! Every animation is a small enum of states plus a timer. Some transitions
//! are time driven (leave `from` once `after` seconds have elapsed in it),
//! others are triggered from outside with [`StateMachine::go_to`]. The
//! machine owns both: a table of timeouts and the elapsed time in the
//! current state.

use std::fmt::Debug;

use arrayvec::ArrayVec;
use log::debug;

/// Most timeouts any animation registers
const MAX_TIMEOUTS: usize = 8;

/// Leave `from` for `to` after `after` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeout<S> {
    pub from: S,
    pub after: f32,
    pub to: S,
}

#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    name: &'static str,
    state: S,
    elapsed: f32,
    timeouts: ArrayVec<Timeout<S>, MAX_TIMEOUTS>,
}

impl<S: Copy + PartialEq + Debug> StateMachine<S> {
    pub fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            state: initial,
            elapsed: 0.0,
            timeouts: ArrayVec::new(),
        }
    }

    /// Register a time driven transition; a later registration for the same
    /// `from` state replaces the earlier one.
    pub fn with_timeout(mut self, from: S, after: f32, to: S) -> Self {
        self.set_timeout(from, after, to);
        self
    }

    pub fn set_timeout(&mut self, from: S, after: f32, to: S) {
        let timeout = Timeout {
            from,
            after: after.max(0.0),
            to,
        };
        match self.timeouts.iter_mut().find(|t| t.from == from) {
            Some(existing) => *existing = timeout,
            None => self.timeouts.push(timeout),
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn is(&self, state: S) -> bool {
        self.state == state
    }

    /// Seconds spent in the current state
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of `duration` spent in the current state, clamped to [0, 1]
    pub fn progress(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / duration).clamp(0.0, 1.0)
    }

    /// The timeout leaving the current state, if any
    pub fn pending_timeout(&self) -> Option<&Timeout<S>> {
        self.timeouts.iter().find(|t| t.from == self.state)
    }

    /// External trigger: enter `state` with a fresh timer.
    pub fn go_to(&mut self, state: S) {
        if self.state != state {
            debug!("{}: {:?} -> {:?}", self.name, self.state, state);
        }
        self.state = state;
        self.elapsed = 0.0;
    }

    /// Advance the timer and apply elapsed timeouts.
    ///
    /// A large `dt` may pass through several timed states in one call; the
    /// time left over after each transition carries into the next state.
    pub fn update(&mut self, dt: f32) -> S {
        self.elapsed += dt.max(0.0);

        // Each timeout fires at most once per update, so a cycle of
        // zero-length states cannot spin forever.
        for _ in 0..=self.timeouts.len() {
            let Some(timeout) = self.pending_timeout().copied() else {
                break;
            };
            if self.elapsed < timeout.after {
                break;
            }
            let leftover = self.elapsed - timeout.after;
            self.go_to(timeout.to);
            self.elapsed = leftover;
        }

        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        Warming,
        On,
        Cooling,
    }

    fn machine() -> StateMachine<Light> {
        StateMachine::new("light", Light::Off)
            .with_timeout(Light::Warming, 0.5, Light::On)
            .with_timeout(Light::Cooling, 0.25, Light::Off)
    }

    #[test]
    fn untimed_state_stays_put() {
        let mut fsm = machine();
        assert_eq!(fsm.update(10.0), Light::Off);
        assert_eq!(fsm.elapsed(), 10.0);
    }

    #[test]
    fn timeout_fires_and_carries_leftover() {
        let mut fsm = machine();
        fsm.go_to(Light::Warming);
        assert_eq!(fsm.update(0.25), Light::Warming);
        assert_eq!(fsm.update(0.5), Light::On);
        assert!((fsm.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn chained_timeouts_in_one_update() {
        let mut fsm = StateMachine::new("chain", Light::Warming)
            .with_timeout(Light::Warming, 0.1, Light::Cooling)
            .with_timeout(Light::Cooling, 0.1, Light::Off);
        assert_eq!(fsm.update(0.35), Light::Off);
        assert!((fsm.elapsed() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn zero_length_cycle_terminates() {
        let mut fsm = StateMachine::new("cycle", Light::Warming)
            .with_timeout(Light::Warming, 0.0, Light::Cooling)
            .with_timeout(Light::Cooling, 0.0, Light::Warming);
        fsm.update(0.1);
        assert!(matches!(fsm.state(), Light::Warming | Light::Cooling));
    }

    #[test]
    fn go_to_resets_timer() {
        let mut fsm = machine();
        fsm.go_to(Light::Warming);
        fsm.update(0.4);
        fsm.go_to(Light::Warming);
        assert_eq!(fsm.elapsed(), 0.0);
        assert_eq!(fsm.update(0.4), Light::Warming);
        assert!((fsm.progress(0.5) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn later_registration_replaces_timeout() {
        let mut fsm = machine();
        fsm.set_timeout(Light::Warming, 1.0, Light::Cooling);
        fsm.go_to(Light::Warming);
        assert_eq!(fsm.update(1.0), Light::Cooling);
    }
}
