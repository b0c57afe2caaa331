//! Collapsing field animation.
//!
//! The field data has already collapsed when this animation starts; what it
//! plays is the visual catch-up. Every surviving row is drawn lifted by the
//! number of removed rows that were below it and then falls into place.
//!
//! ```text
//! Inactive --start--> Waiting --wait_time--> Active --go_to_blocks_bouncing_state-->
//!     BlocksBouncing --go_to_inactive_state--> Inactive
//! ```
//!
//! `Active` ends on its own once every row has landed
//! ([`CollapsingFieldAnimation::is_collapse_done`]) but stays in `Active`
//! until the owner triggers the bounce; the owner resumes the game logic at
//! the same moment.

use std::f32::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::RowSet;
use crate::fsm::StateMachine;
use crate::types::MAX_NUM_ROWS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollapseState {
    Inactive,
    Waiting,
    Active,
    BlocksBouncing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapsingFieldConfig {
    /// Pause before the rows start falling (seconds)
    pub wait_time: f32,
    /// Fall speed when the rows start moving (rows per second)
    pub initial_speed: f32,
    /// Fall acceleration (rows per second squared)
    pub gravity: f32,
    pub bounce_duration: f32,
    /// Peak height of the settle bounce (rows)
    pub bounce_height: f32,
}

impl Default for CollapsingFieldConfig {
    fn default() -> Self {
        Self {
            wait_time: 0.15,
            initial_speed: 4.0,
            gravity: 60.0,
            bounce_duration: 0.25,
            bounce_height: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollapsingFieldAnimation {
    fsm: StateMachine<CollapseState>,
    config: CollapsingFieldConfig,
    /// Drop distance per post-collapse row
    drops: [f32; MAX_NUM_ROWS],
    num_rows: usize,
    max_drop: f32,
    fallen: f32,
    speed: f32,
}

impl CollapsingFieldAnimation {
    pub fn new(config: CollapsingFieldConfig) -> Self {
        let fsm = StateMachine::new("collapsing_field", CollapseState::Inactive).with_timeout(
            CollapseState::Waiting,
            config.wait_time,
            CollapseState::Active,
        );
        Self {
            fsm,
            config,
            drops: [0.0; MAX_NUM_ROWS],
            num_rows: 0,
            max_drop: 0.0,
            fallen: 0.0,
            speed: 0.0,
        }
    }

    pub fn state(&self) -> CollapseState {
        self.fsm.state()
    }

    /// Start animating the removal of `rows` from a field of `num_rows` rows
    pub fn start(&mut self, rows: RowSet, num_rows: usize) {
        assert!(num_rows <= MAX_NUM_ROWS, "{num_rows} rows exceed MAX_NUM_ROWS");

        self.drops = [0.0; MAX_NUM_ROWS];
        self.num_rows = num_rows;
        self.max_drop = 0.0;
        for row in (0..num_rows).filter(|&r| !rows.contains(r)) {
            let below = rows.num_below(row);
            let drop = below as f32;
            self.drops[row + below] = drop;
            self.max_drop = self.max_drop.max(drop);
        }
        self.fallen = 0.0;
        self.speed = self.config.initial_speed;
        self.fsm.go_to(CollapseState::Waiting);
    }

    pub fn update(&mut self, dt: f32) -> CollapseState {
        let before = self.fsm.state();
        if before == CollapseState::Inactive {
            return before;
        }

        let state = self.fsm.update(dt);
        if state == CollapseState::Active {
            // Only the part of dt spent in Active moves the rows
            let active_dt = if before == CollapseState::Active {
                dt
            } else {
                self.fsm.elapsed()
            };
            self.fall(active_dt);
        }
        state
    }

    fn fall(&mut self, dt: f32) {
        if self.fallen >= self.max_drop {
            return;
        }
        self.speed += self.config.gravity * dt;
        self.fallen = (self.fallen + self.speed * dt).min(self.max_drop);
    }

    /// Every row has reached its collapsed position
    pub fn is_collapse_done(&self) -> bool {
        match self.fsm.state() {
            CollapseState::Active => self.fallen >= self.max_drop,
            CollapseState::BlocksBouncing => true,
            _ => false,
        }
    }

    /// The settle bounce has played out
    pub fn is_settled(&self) -> bool {
        self.fsm.is(CollapseState::BlocksBouncing)
            && self.fsm.elapsed() >= self.config.bounce_duration
    }

    pub fn go_to_blocks_bouncing_state(&mut self) {
        match self.fsm.state() {
            CollapseState::Waiting | CollapseState::Active => {
                self.fallen = self.max_drop;
                self.fsm.go_to(CollapseState::BlocksBouncing);
            }
            state => debug!("collapsing_field: bounce requested in {:?}", state),
        }
    }

    pub fn go_to_inactive_state(&mut self) {
        self.fsm.go_to(CollapseState::Inactive);
    }

    /// Visual lift of a (post-collapse) row, in rows; positive is up
    pub fn row_offset(&self, row: usize) -> f32 {
        if row >= self.num_rows {
            return 0.0;
        }
        let drop = self.drops[row];
        match self.fsm.state() {
            CollapseState::Inactive => 0.0,
            CollapseState::Waiting => drop,
            CollapseState::Active => (drop - self.fallen).max(0.0),
            CollapseState::BlocksBouncing if drop > 0.0 => {
                let t = self.fsm.progress(self.config.bounce_duration);
                self.config.bounce_height * (PI * t).sin() * (1.0 - t)
            }
            CollapseState::BlocksBouncing => 0.0,
        }
    }
}

impl Default for CollapsingFieldAnimation {
    fn default() -> Self {
        Self::new(CollapsingFieldConfig::default())
    }
}
