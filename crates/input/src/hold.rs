//! Soft drop hold for terminals without key release events.
//!
//! Every soft drop key press (including auto-repeat) re-arms the hold; when
//! no press arrives within the release timeout the key counts as released.

/// Default time without a repeat before the key counts as released (seconds)
pub const DEFAULT_RELEASE_TIMEOUT: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftDropHold {
    held: bool,
    since_press: f32,
    release_timeout: f32,
}

impl SoftDropHold {
    pub fn new() -> Self {
        Self::with_release_timeout(DEFAULT_RELEASE_TIMEOUT)
    }

    pub fn with_release_timeout(release_timeout: f32) -> Self {
        Self {
            held: false,
            since_press: 0.0,
            release_timeout,
        }
    }

    pub fn press(&mut self) {
        self.held = true;
        self.since_press = 0.0;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Advance by `dt` seconds; returns whether the key is still held
    pub fn update(&mut self, dt: f32) -> bool {
        if self.held {
            self.since_press += dt;
            if self.since_press > self.release_timeout {
                self.held = false;
            }
        }
        self.held
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl Default for SoftDropHold {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_release_after_timeout() {
        let mut hold = SoftDropHold::with_release_timeout(0.1);
        hold.press();
        assert!(hold.update(0.05));
        assert!(!hold.update(0.06));
    }

    #[test]
    fn repeat_press_extends_hold() {
        let mut hold = SoftDropHold::with_release_timeout(0.1);
        hold.press();
        hold.update(0.08);
        hold.press();
        assert!(hold.update(0.08));
        hold.release();
        assert!(!hold.is_held());
    }
}
