//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the puzzle: the field, the piece table,
//! landing side effects, the piece queue, scoring and the logic that drives a
//! falling piece. It has **no dependencies** on rendering, audio or I/O, which
//! keeps it:
//!
//! - **Deterministic**: the same level and seed produce the same game
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: the engine, the terminal front end and the benches share it
//!
//! # Module Structure
//!
//! - [`field`]: the grid of landed blocks, row detection and collapse, blueprint matching
//! - [`piece`]: the static shape table (fill/click grids, rotations, flags)
//! - [`landing`]: merge a piece and apply bomb / row bomb / row clear effects
//! - [`game_logic`]: spawn, move, rotate, land, collapse hand-off, level outcome
//! - [`analyzer`]: read-only field heuristics (holes, wells, transitions)
//! - [`moves`]: enumerate and rank reachable landings
//! - [`level`]: level records and the built-in levels
//! - [`rng`]: bag piece queue over a level's piece set
//! - [`scoring`]: landing points and star rating
//!
//! # Example
//!
//! ```
//! use blockfall_core::{builtin_levels, GameLogic, LogicState, LogicTiming};
//! use blockfall_types::GameAction;
//!
//! let level = &builtin_levels()[0];
//! let mut logic = GameLogic::new(level, LogicTiming::default()).unwrap();
//! logic.start();
//!
//! logic.apply_action(GameAction::MoveLeft);
//! logic.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(logic.moves(), 1);
//! assert_eq!(logic.state(), LogicState::Playing);
//! ```
//!
//! # Timing
//!
//! Call [`GameLogic::update`](game_logic::GameLogic::update) once per frame
//! with the elapsed seconds. Gravity steps one row per `fall_interval`; a
//! grounded piece lands after `landing_delay`.

pub mod analyzer;
pub mod field;
pub mod game_logic;
pub mod landing;
pub mod level;
pub mod moves;
pub mod piece;
pub mod rng;
pub mod scoring;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use analyzer::{AnalyzerWeights, FieldAnalyzer};
pub use field::{Blueprint, Cell, Field, FieldError, Fill, RowSet};
pub use game_logic::{FallingPiece, GameEvent, GameLogic, LogicState, LogicTiming, PieceState};
pub use landing::{resolve_landing, LandedCells, LandingOutcome};
pub use level::{builtin_levels, LevelConfig, LevelError, LevelGoal, StarThresholds};
pub use moves::{drop_position, Move, MoveSearch};
pub use piece::{Piece, PieceGrid};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_score, stars_for_moves, ScoreResult};
