//! Game logic module - drives the falling piece against the field
//!
//! This module ties together the field, the piece table, the piece queue and
//! scoring. It owns the per-piece state machine
//! (`Spawned -> Falling -> Landing -> Landed`), the logic state of the level
//! and an outgoing event queue that the owner drains once per frame.
//!
//! Collapsing rows is split in two: the field data collapses immediately when
//! a piece lands, then the logic waits in [`LogicState::WaitingForCollapse`]
//! until the owner has played the collapse and calls
//! [`GameLogic::finish_collapse`]. Only then is the next piece spawned.

use arrayvec::ArrayVec;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::field::{Field, RowSet};
use crate::landing::{resolve_landing, LandedCells};
use crate::level::{LevelConfig, LevelError, LevelGoal};
use crate::moves::{drop_position, Move, MoveSearch};
use crate::piece::Piece;
use crate::rng::PieceQueue;
use crate::scoring::{calculate_score, stars_for_moves};
use crate::types::{
    GameAction, PieceKind, Position, Rotation, DEFAULT_FALL_INTERVAL, DEFAULT_LANDING_DELAY,
    DEFAULT_SPAWN_DELAY, PREVIEW_COUNT, SOFT_DROP_MULTIPLIER,
};

/// Rotation kicks tried in order when the piece does not fit in place
const ROTATION_KICKS: [(i32, i32); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-2, 0)];

/// Timing parameters of the falling piece (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicTiming {
    pub spawn_delay: f32,
    pub fall_interval: f32,
    pub soft_drop_multiplier: f32,
    pub landing_delay: f32,
}

impl Default for LogicTiming {
    fn default() -> Self {
        Self {
            spawn_delay: DEFAULT_SPAWN_DELAY,
            fall_interval: DEFAULT_FALL_INTERVAL,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
            landing_delay: DEFAULT_LANDING_DELAY,
        }
    }
}

/// State of the level as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicState {
    /// Created, `start` not called yet
    Idle,
    Playing,
    Paused,
    /// Rows were removed; waiting for the owner to finish the collapse
    WaitingForCollapse,
    /// Goal reached (terminal)
    LevelCompleted,
    /// Spawn blocked or move budget exhausted (terminal)
    NoMovesLeft,
}

impl LogicState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LogicState::LevelCompleted | LogicState::NoMovesLeft)
    }
}

/// State of the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceState {
    /// Just spawned; gravity has not started yet
    Spawned,
    Falling,
    /// Resting on something; lands once the landing delay runs out
    Landing,
    /// Merged into the field
    Landed,
}

/// The piece under player control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingPiece {
    pub kind: PieceKind,
    pub position: Position,
    pub rotation: Rotation,
    pub state: PieceState,
}

impl FallingPiece {
    pub fn piece(&self) -> &'static Piece {
        Piece::get(self.kind)
    }

    /// Absolute positions of the piece blocks
    pub fn cells(&self) -> LandedCells {
        self.piece()
            .cells(self.rotation)
            .iter()
            .map(|&(dx, dy)| self.position.offset(dx, dy))
            .collect()
    }
}

/// Events reported to the owner of the logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceSpawned { kind: PieceKind },
    PieceMoved,
    PieceRotated { rotation: Rotation },
    PieceLanded { kind: PieceKind, cells: LandedCells },
    BombExploded { center: Position, cells_cleared: usize },
    /// Blueprint slots newly covered by the landing
    SlotsFilled { slots: LandedCells },
    /// Rows removed from the field (pre-collapse indices)
    RowsCollapsed { rows: RowSet },
    LevelCompleted { num_stars: u8 },
    NoMovesLeft,
}

/// Complete logic state of one level
#[derive(Debug, Clone)]
pub struct GameLogic {
    level: LevelConfig,
    timing: LogicTiming,
    initial_field: Field,
    field: Field,
    queue: PieceQueue,
    preview: ArrayVec<PieceKind, PREVIEW_COUNT>,
    falling: Option<FallingPiece>,
    state: LogicState,
    /// State to return to when unpausing
    resume_state: LogicState,
    /// Time spent in the current piece state
    piece_timer: f32,
    /// Gravity accumulator
    fall_timer: f32,
    soft_dropping: bool,
    score: u32,
    moves: u32,
    rows_cleared: u32,
    events: Vec<GameEvent>,
    search: MoveSearch,
}

impl GameLogic {
    /// Create the logic for a level; the first piece spawns on [`GameLogic::start`]
    pub fn new(level: &LevelConfig, timing: LogicTiming) -> Result<Self, LevelError> {
        let field = level.build_field()?;
        let queue = PieceQueue::new(&level.pieces, level.seed);
        let mut logic = Self {
            level: level.clone(),
            timing,
            initial_field: field.clone(),
            field,
            queue,
            preview: ArrayVec::new(),
            falling: None,
            state: LogicState::Idle,
            resume_state: LogicState::Playing,
            piece_timer: 0.0,
            fall_timer: 0.0,
            soft_dropping: false,
            score: 0,
            moves: 0,
            rows_cleared: 0,
            events: Vec::with_capacity(16),
            search: MoveSearch::default(),
        };
        logic.fill_preview();
        Ok(logic)
    }

    pub fn with_move_search(mut self, search: MoveSearch) -> Self {
        self.search = search;
        self
    }

    fn fill_preview(&mut self) {
        while !self.preview.is_full() {
            self.preview.push(self.queue.draw());
        }
    }

    /// Spawn the first piece
    pub fn start(&mut self) {
        if self.state != LogicState::Idle {
            return;
        }
        info!(
            "level {} ({}) started: {}x{}",
            self.level.index, self.level.name, self.level.num_columns, self.level.num_rows
        );
        self.state = LogicState::Playing;
        self.spawn_next_piece();
    }

    pub fn state(&self) -> LogicState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn falling(&self) -> Option<&FallingPiece> {
        self.falling.as_ref()
    }

    pub fn preview(&self) -> &[PieceKind] {
        &self.preview
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn timing(&self) -> &LogicTiming {
        &self.timing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Pieces landed so far
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where the falling piece would land with a hard drop
    pub fn ghost_position(&self) -> Option<Position> {
        let f = self.falling?;
        Some(drop_position(&self.field, f.piece(), f.position, f.rotation))
    }

    /// Whether a field cell hits the falling piece's click grid
    pub fn is_falling_piece_hit(&self, x: i32, y: i32) -> bool {
        match self.falling {
            Some(f) => f
                .piece()
                .hit_test(f.rotation, x - f.position.x, y - f.position.y),
            None => false,
        }
    }

    /// Best ranked landing for the falling piece
    pub fn suggest_move(&self) -> Option<Move> {
        let f = self.falling?;
        self.search.best_move(&self.field, f.kind)
    }

    /// Current gravity interval, soft drop applied
    pub fn fall_interval(&self) -> f32 {
        if self.soft_dropping {
            self.timing.fall_interval / self.timing.soft_drop_multiplier.max(1.0)
        } else {
            self.timing.fall_interval
        }
    }

    pub fn set_soft_drop(&mut self, active: bool) {
        if self.soft_dropping != active {
            self.soft_dropping = active;
            self.fall_timer = 0.0;
        }
    }

    /// Apply a game action; illegal actions return `false` and change nothing
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
            _ if self.state != LogicState::Playing => false,
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => self.try_move(0, 1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
        }
    }

    fn toggle_pause(&mut self) -> bool {
        match self.state {
            LogicState::Playing | LogicState::WaitingForCollapse => {
                self.resume_state = self.state;
                self.state = LogicState::Paused;
                true
            }
            LogicState::Paused => {
                self.state = self.resume_state;
                true
            }
            _ => false,
        }
    }

    /// Reset the level to its starting field and spawn again
    pub fn restart(&mut self) {
        debug!("restarting level {}", self.level.index);
        self.field = self.initial_field.clone();
        self.queue = PieceQueue::new(&self.level.pieces, self.level.seed);
        self.preview.clear();
        self.fill_preview();
        self.falling = None;
        self.state = LogicState::Idle;
        self.resume_state = LogicState::Playing;
        self.piece_timer = 0.0;
        self.fall_timer = 0.0;
        self.soft_dropping = false;
        self.score = 0;
        self.moves = 0;
        self.rows_cleared = 0;
        self.events.clear();
        self.start();
    }

    fn fits(&self, piece: &FallingPiece) -> bool {
        self.field
            .can_place(piece.piece(), piece.position, piece.rotation)
    }

    fn can_move_down(&self) -> bool {
        match self.falling {
            Some(f) => self.fits(&FallingPiece {
                position: f.position.offset(0, 1),
                ..f
            }),
            None => false,
        }
    }

    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(f) = self.falling else {
            return false;
        };
        let moved = FallingPiece {
            position: f.position.offset(dx, dy),
            ..f
        };
        if !self.fits(&moved) {
            return false;
        }

        self.falling = Some(moved);
        // Moving off a ledge resumes falling; the update loop re-grounds it
        if f.state == PieceState::Landing && self.can_move_down() {
            self.enter_piece_state(PieceState::Falling);
        }
        if dy > 0 {
            self.fall_timer = 0.0;
        }
        self.events.push(GameEvent::PieceMoved);
        true
    }

    pub(crate) fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(f) = self.falling else {
            return false;
        };
        let piece = f.piece();
        if !piece.can_rotate_around_z() {
            return false;
        }

        let target = if clockwise {
            f.rotation.rotate_cw()
        } else {
            f.rotation.rotate_ccw()
        };
        let rotation = piece.effective_rotation(target);

        // Keep the rotated grid centered on the old one
        let old = piece.fill_grid(f.rotation);
        let new = piece.fill_grid(rotation);
        let center_dx = (old.width() as i32 - new.width() as i32) / 2;
        let center_dy = (old.height() as i32 - new.height() as i32) / 2;

        for (kx, ky) in ROTATION_KICKS {
            let candidate = FallingPiece {
                rotation,
                position: f.position.offset(center_dx + kx, center_dy + ky),
                ..f
            };
            if self.fits(&candidate) {
                self.falling = Some(candidate);
                self.events.push(GameEvent::PieceRotated { rotation });
                return true;
            }
        }
        false
    }

    fn hard_drop(&mut self) -> bool {
        let Some(target) = self.ghost_position() else {
            return false;
        };
        if let Some(f) = self.falling.as_mut() {
            f.position = target;
        }
        self.land_falling_piece();
        true
    }

    fn enter_piece_state(&mut self, state: PieceState) {
        if let Some(f) = self.falling.as_mut() {
            if f.state != state {
                debug!("piece {:?}: {:?} -> {:?}", f.kind, f.state, state);
            }
            f.state = state;
        }
        self.piece_timer = 0.0;
    }

    /// Advance timers and gravity by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.state != LogicState::Playing {
            return;
        }
        let Some(f) = self.falling else {
            return;
        };

        match f.state {
            PieceState::Spawned => {
                self.piece_timer += dt;
                if self.piece_timer >= self.timing.spawn_delay {
                    self.enter_piece_state(PieceState::Falling);
                    self.fall_timer = 0.0;
                }
            }
            PieceState::Falling => {
                if !self.can_move_down() {
                    self.enter_piece_state(PieceState::Landing);
                    return;
                }
                self.fall_timer += dt;
                let interval = self.fall_interval();
                while self.fall_timer >= interval {
                    self.fall_timer -= interval;
                    if let Some(f) = self.falling.as_mut() {
                        f.position = f.position.offset(0, 1);
                    }
                    if !self.can_move_down() {
                        self.enter_piece_state(PieceState::Landing);
                        break;
                    }
                }
            }
            PieceState::Landing => {
                if self.can_move_down() {
                    self.enter_piece_state(PieceState::Falling);
                    return;
                }
                self.piece_timer += dt;
                if self.piece_timer >= self.timing.landing_delay {
                    self.land_falling_piece();
                }
            }
            PieceState::Landed => {}
        }
    }

    /// Merge the falling piece into the field and apply every side effect
    fn land_falling_piece(&mut self) {
        let Some(mut f) = self.falling.take() else {
            return;
        };
        f.state = PieceState::Landed;

        let outcome = match resolve_landing(&mut self.field, f.piece(), f.position, f.rotation) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("could not land {:?} at {:?}: {}", f.kind, f.position, err);
                self.after_landing();
                return;
            }
        };

        self.moves += 1;
        let rows = outcome.cleared_rows.len();
        self.rows_cleared += rows as u32;
        self.score += calculate_score(rows, outcome.bomb_cells_cleared).total;

        self.events.push(GameEvent::PieceLanded {
            kind: f.kind,
            cells: outcome.cells.clone(),
        });
        if let Some(center) = outcome.bomb_center {
            self.events.push(GameEvent::BombExploded {
                center,
                cells_cleared: outcome.bomb_cells_cleared,
            });
        }
        if !outcome.filled_slots.is_empty() {
            self.events.push(GameEvent::SlotsFilled {
                slots: outcome.filled_slots.clone(),
            });
        }

        if rows > 0 {
            debug!("collapsing rows {:?}", outcome.cleared_rows.iter().collect::<Vec<_>>());
            self.events.push(GameEvent::RowsCollapsed {
                rows: outcome.cleared_rows,
            });
            self.state = LogicState::WaitingForCollapse;
            return;
        }

        self.after_landing();
    }

    /// Resume after the collapse has been played; returns `false` if no
    /// collapse was pending
    pub fn finish_collapse(&mut self) -> bool {
        if self.state != LogicState::WaitingForCollapse {
            debug!("finish_collapse ignored in {:?}", self.state);
            return false;
        }
        self.state = LogicState::Playing;
        self.after_landing();
        true
    }

    fn after_landing(&mut self) {
        if self.goal_reached() {
            let num_stars = stars_for_moves(self.moves, &self.level.stars);
            info!(
                "level {} completed in {} moves: {} stars",
                self.level.index, self.moves, num_stars
            );
            self.state = LogicState::LevelCompleted;
            self.events.push(GameEvent::LevelCompleted { num_stars });
            return;
        }

        if let Some(max) = self.level.max_moves {
            if self.moves >= max {
                info!("level {}: move budget of {} used up", self.level.index, max);
                self.enter_no_moves_left();
                return;
            }
        }

        self.spawn_next_piece();
    }

    fn goal_reached(&self) -> bool {
        match self.level.goal {
            LevelGoal::ClearRows { rows } => self.rows_cleared >= rows,
            LevelGoal::Blueprint => self.field.is_blueprint_complete(),
        }
    }

    fn spawn_next_piece(&mut self) {
        let kind = self.preview.remove(0);
        self.preview.push(self.queue.draw());

        let piece = Piece::get(kind);
        let rotation = Rotation::North;
        let position = piece.spawn_position(rotation, self.field.num_columns());
        if !self.field.can_place(piece, position, rotation) {
            info!("no room to spawn {:?} at {:?}", kind, position);
            self.enter_no_moves_left();
            return;
        }

        self.falling = Some(FallingPiece {
            kind,
            position,
            rotation,
            state: PieceState::Spawned,
        });
        self.piece_timer = 0.0;
        self.fall_timer = 0.0;
        self.events.push(GameEvent::PieceSpawned { kind });
    }

    fn enter_no_moves_left(&mut self) {
        if self.state == LogicState::NoMovesLeft {
            return;
        }
        self.falling = None;
        self.state = LogicState::NoMovesLeft;
        self.events.push(GameEvent::NoMovesLeft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Cell;
    use crate::level::{builtin_levels, StarThresholds};
    use crate::types::BlockColor;

    fn level(pieces: Vec<PieceKind>) -> LevelConfig {
        LevelConfig {
            index: 0,
            name: "test".to_owned(),
            num_columns: 6,
            num_rows: 8,
            goal: LevelGoal::ClearRows { rows: 10 },
            pieces,
            seed: 1,
            blueprint: None,
            prefill: Vec::new(),
            stars: StarThresholds::default(),
            max_moves: None,
        }
    }

    fn started(pieces: Vec<PieceKind>) -> GameLogic {
        let mut logic = GameLogic::new(&level(pieces), LogicTiming::default()).unwrap();
        logic.start();
        logic.drain_events();
        logic
    }

    #[test]
    fn test_new_logic_is_idle() {
        let logic = GameLogic::new(&level(vec![PieceKind::O]), LogicTiming::default()).unwrap();
        assert_eq!(logic.state(), LogicState::Idle);
        assert!(logic.falling().is_none());
        assert_eq!(logic.preview().len(), PREVIEW_COUNT);
    }

    #[test]
    fn test_start_spawns_centered_piece() {
        let mut logic = GameLogic::new(&level(vec![PieceKind::O]), LogicTiming::default()).unwrap();
        logic.start();
        let f = logic.falling().copied().unwrap();
        assert_eq!(f.kind, PieceKind::O);
        assert_eq!(f.position, Position::new(2, 0));
        assert_eq!(f.state, PieceState::Spawned);
        assert_eq!(
            logic.drain_events(),
            vec![GameEvent::PieceSpawned { kind: PieceKind::O }]
        );
    }

    #[test]
    fn test_spawn_delay_then_gravity() {
        let mut logic = started(vec![PieceKind::O]);
        logic.update(0.1);
        assert_eq!(logic.falling().unwrap().state, PieceState::Spawned);
        logic.update(0.1);
        assert_eq!(logic.falling().unwrap().state, PieceState::Falling);
        logic.update(0.8);
        assert_eq!(logic.falling().unwrap().position.y, 1);
    }

    #[test]
    fn test_soft_drop_speeds_up_gravity() {
        let mut logic = started(vec![PieceKind::O]);
        logic.update(0.2);
        logic.set_soft_drop(true);
        assert!((logic.fall_interval() - 0.08).abs() < 1e-6);
        logic.update(0.17);
        assert_eq!(logic.falling().unwrap().position.y, 2);
    }

    #[test]
    fn test_move_collision_with_wall() {
        let mut logic = started(vec![PieceKind::O]);
        assert!(logic.apply_action(GameAction::MoveLeft));
        assert!(logic.apply_action(GameAction::MoveLeft));
        assert!(!logic.apply_action(GameAction::MoveLeft));
        assert_eq!(logic.falling().unwrap().position.x, 0);
    }

    #[test]
    fn test_bomb_ignores_rotation_input() {
        let mut logic = started(vec![PieceKind::Bomb]);
        assert!(!logic.apply_action(GameAction::RotateCw));
        assert!(logic.drain_events().is_empty());
    }

    #[test]
    fn test_two_rotation_piece_wraps() {
        let mut logic = started(vec![PieceKind::S]);
        assert!(logic.apply_action(GameAction::RotateCw));
        assert_eq!(logic.falling().unwrap().rotation, Rotation::East);
        assert!(logic.apply_action(GameAction::RotateCw));
        assert_eq!(logic.falling().unwrap().rotation, Rotation::North);
    }

    #[test]
    fn test_landing_waits_for_delay() {
        let mut logic = started(vec![PieceKind::O]);
        logic.set_soft_drop(true);
        for _ in 0..40 {
            logic.update(0.05);
            if logic.falling().map(|f| f.state) == Some(PieceState::Landing) {
                break;
            }
        }
        assert_eq!(logic.falling().unwrap().state, PieceState::Landing);
        logic.update(0.2);
        assert_eq!(logic.moves(), 0);
        logic.update(0.3);
        assert_eq!(logic.moves(), 1);
        assert!(logic.field().is_full(2, 7));
    }

    #[test]
    fn test_hard_drop_lands_immediately() {
        let mut logic = started(vec![PieceKind::O]);
        assert!(logic.apply_action(GameAction::HardDrop));
        assert_eq!(logic.moves(), 1);
        let events = logic.drain_events();
        assert!(matches!(events[0], GameEvent::PieceLanded { kind: PieceKind::O, .. }));
        assert!(matches!(events[1], GameEvent::PieceSpawned { .. }));
    }

    #[test]
    fn test_row_clear_waits_for_collapse() {
        let mut logic = started(vec![PieceKind::O]);
        for x in 0..4 {
            logic.field.set(x, 7, Cell::full(BlockColor::Gray));
            logic.field.set(x, 6, Cell::full(BlockColor::Gray));
        }
        for _ in 0..2 {
            logic.apply_action(GameAction::MoveRight);
        }
        logic.apply_action(GameAction::HardDrop);

        assert_eq!(logic.state(), LogicState::WaitingForCollapse);
        assert!(logic.falling().is_none());
        assert_eq!(logic.rows_cleared(), 2);
        assert!(logic
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::RowsCollapsed { rows } if rows.len() == 2)));

        // Gravity and input are frozen until the collapse finishes
        assert!(!logic.apply_action(GameAction::MoveLeft));
        logic.update(5.0);
        assert!(logic.falling().is_none());

        assert!(logic.finish_collapse());
        assert_eq!(logic.state(), LogicState::Playing);
        assert!(logic.falling().is_some());
        assert!(!logic.finish_collapse());
    }

    #[test]
    fn test_no_moves_left_reported_once() {
        let mut logic = started(vec![PieceKind::O]);
        // Row 2 stays one short of full so the landing clears nothing
        for x in 0..5 {
            logic.field.set(x, 2, Cell::full(BlockColor::Gray));
        }
        logic.apply_action(GameAction::HardDrop);

        assert_eq!(logic.state(), LogicState::NoMovesLeft);
        let events = logic.drain_events();
        let count = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NoMovesLeft))
            .count();
        assert_eq!(count, 1);

        logic.update(1.0);
        assert!(!logic.apply_action(GameAction::HardDrop));
        assert!(logic.drain_events().is_empty());
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut logic = started(vec![PieceKind::O]);
        assert!(logic.apply_action(GameAction::Pause));
        assert_eq!(logic.state(), LogicState::Paused);
        logic.update(10.0);
        assert_eq!(logic.falling().unwrap().state, PieceState::Spawned);
        assert!(!logic.apply_action(GameAction::MoveLeft));
        assert!(logic.apply_action(GameAction::Pause));
        assert_eq!(logic.state(), LogicState::Playing);
    }

    #[test]
    fn test_restart_resets_field_and_counters() {
        let mut logic = started(vec![PieceKind::O, PieceKind::T]);
        let first = logic.falling().unwrap().kind;
        logic.apply_action(GameAction::HardDrop);
        assert_eq!(logic.moves(), 1);

        assert!(logic.apply_action(GameAction::Restart));
        assert_eq!(logic.moves(), 0);
        assert_eq!(logic.score(), 0);
        assert_eq!(logic.field().num_full_cells(), 0);
        assert_eq!(logic.falling().unwrap().kind, first);
    }

    #[test]
    fn test_level_completes_on_rows_goal() {
        let mut lvl = level(vec![PieceKind::Single]);
        lvl.goal = LevelGoal::ClearRows { rows: 1 };
        lvl.prefill = vec!["##.###".to_owned()];
        let mut logic = GameLogic::new(&lvl, LogicTiming::default()).unwrap();
        logic.start();
        logic.apply_action(GameAction::HardDrop);
        assert!(logic.finish_collapse());
        assert_eq!(logic.state(), LogicState::LevelCompleted);
        assert!(logic
            .drain_events()
            .contains(&GameEvent::LevelCompleted { num_stars: 3 }));
    }

    #[test]
    fn test_move_budget_ends_level() {
        let mut lvl = level(vec![PieceKind::Single]);
        lvl.max_moves = Some(2);
        let mut logic = GameLogic::new(&lvl, LogicTiming::default()).unwrap();
        logic.start();
        logic.apply_action(GameAction::HardDrop);
        assert_eq!(logic.state(), LogicState::Playing);
        logic.apply_action(GameAction::HardDrop);
        assert_eq!(logic.state(), LogicState::NoMovesLeft);
    }

    #[test]
    fn test_builtin_levels_start() {
        for lvl in builtin_levels() {
            let mut logic = GameLogic::new(&lvl, LogicTiming::default()).unwrap();
            logic.start();
            assert_eq!(logic.state(), LogicState::Playing);
        }
    }

    #[test]
    fn test_falling_piece_hit_uses_click_grid() {
        let logic = started(vec![PieceKind::U]);
        let f = *logic.falling().unwrap();
        // Gap in the U is clickable but not filled
        assert!(logic.is_falling_piece_hit(f.position.x + 1, f.position.y));
        assert!(!logic.is_falling_piece_hit(f.position.x + 5, f.position.y));
    }
}
