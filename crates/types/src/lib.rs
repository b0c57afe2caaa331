//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond small conversions, making
//! them usable in any context (game logic, animations, presenters, config).
//!
//! # Field Dimensions
//!
//! Fields are level specific. Columns range over
//! `MIN_NUM_COLUMNS..=MAX_NUM_COLUMNS` and rows over
//! `MIN_NUM_ROWS..=MAX_NUM_ROWS`. Row 0 is the top row; pieces spawn there and
//! fall towards `num_rows - 1`.
//!
//! # Timing Constants
//!
//! All timing values are in seconds (the frame loop is driven by `f32` deltas):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_FRAME_DT` | 0.4 | Upper bound for a single frame delta |
//! | `DEFAULT_SPAWN_DELAY` | 0.15 | Time a freshly spawned piece hangs before gravity |
//! | `DEFAULT_FALL_INTERVAL` | 0.8 | Seconds per row of gravity |
//! | `SOFT_DROP_MULTIPLIER` | 10 | Soft drop is 10x faster |
//! | `DEFAULT_LANDING_DELAY` | 0.45 | Time a grounded piece waits before it lands |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_str("rowbomb"), Some(PieceKind::RowBomb));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::West.degrees(), 270);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! ```

use serde::{Deserialize, Serialize};

/// Smallest supported number of columns
pub const MIN_NUM_COLUMNS: usize = 4;

/// Largest supported number of columns
pub const MAX_NUM_COLUMNS: usize = 12;

/// Smallest supported number of rows
pub const MIN_NUM_ROWS: usize = 4;

/// Largest supported number of rows (row sets are 64-bit masks)
pub const MAX_NUM_ROWS: usize = 24;

/// Pieces fit in a 5x5 bounding box
pub const MAX_PIECE_DIM: usize = 5;

/// Number of upcoming pieces kept in the preview queue
pub const PREVIEW_COUNT: usize = 3;

/// Frame deltas are clamped to this after stalls (seconds)
pub const MAX_FRAME_DT: f32 = 0.4;

/// Time a freshly spawned piece waits before gravity starts (seconds)
pub const DEFAULT_SPAWN_DELAY: f32 = 0.15;

/// Gravity interval: seconds per row
pub const DEFAULT_FALL_INTERVAL: f32 = 0.8;

/// Soft drop speed multiplier (10x normal speed)
pub const SOFT_DROP_MULTIPLIER: f32 = 10.0;

/// Time a grounded piece waits before it lands (seconds)
pub const DEFAULT_LANDING_DELAY: f32 = 0.45;

/// Chebyshev radius of the area a bomb clears
pub const BOMB_RADIUS: usize = 1;

/// Row clear scoring table, indexed by rows removed in one landing (capped at 4)
pub const ROW_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per block destroyed by a bomb
pub const BOMB_CELL_SCORE: u32 = 5;

/// Points per landed piece
pub const LANDING_SCORE: u32 = 1;

/// The closed set of piece shapes
///
/// Regular shapes range from a single block up to the nine block pyramid.
/// `Bomb` and `RowBomb` are special single-block pieces whose landing clears
/// an area or a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    ShortI,
    Domino,
    Single,
    L,
    MirroredL,
    ShortL,
    BigL,
    T,
    BigT,
    Plus,
    O,
    S,
    Z,
    U,
    V,
    W,
    Pyramid,
    Bomb,
    RowBomb,
}

impl PieceKind {
    /// Every kind, in table order
    pub const ALL: [PieceKind; 20] = [
        PieceKind::I,
        PieceKind::ShortI,
        PieceKind::Domino,
        PieceKind::Single,
        PieceKind::L,
        PieceKind::MirroredL,
        PieceKind::ShortL,
        PieceKind::BigL,
        PieceKind::T,
        PieceKind::BigT,
        PieceKind::Plus,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::U,
        PieceKind::V,
        PieceKind::W,
        PieceKind::Pyramid,
        PieceKind::Bomb,
        PieceKind::RowBomb,
    ];

    /// Position of this kind in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse piece kind from string (case-insensitive, `_` and `-` ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Short_I"), Some(PieceKind::ShortI));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        PieceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().replace('_', "") == normalized)
    }

    /// Convert to snake_case string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::ShortI => "short_i",
            PieceKind::Domino => "domino",
            PieceKind::Single => "single",
            PieceKind::L => "l",
            PieceKind::MirroredL => "mirrored_l",
            PieceKind::ShortL => "short_l",
            PieceKind::BigL => "big_l",
            PieceKind::T => "t",
            PieceKind::BigT => "big_t",
            PieceKind::Plus => "plus",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::U => "u",
            PieceKind::V => "v",
            PieceKind::W => "w",
            PieceKind::Pyramid => "pyramid",
            PieceKind::Bomb => "bomb",
            PieceKind::RowBomb => "row_bomb",
        }
    }
}

/// Rotation around the Z axis
///
/// - **North**: spawn orientation (0°)
/// - **East**: 90° clockwise
/// - **South**: 180°
/// - **West**: 270° clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`], taken modulo 4
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Clockwise angle in degrees
    pub fn degrees(&self) -> u16 {
        self.index() as u16 * 90
    }

    /// Parse rotation from string
    ///
    /// Accepts full names, single letters or degrees:
    /// "north" | "n" | "0", "east" | "e" | "90", "south" | "s" | "180", "west" | "w" | "270"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" | "0" => Some(Rotation::North),
            "east" | "e" | "90" => Some(Rotation::East),
            "south" | "s" | "180" => Some(Rotation::South),
            "west" | "w" | "270" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Block colors used by piece shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockColor {
    #[default]
    Gray,
    Yellow,
    Green,
    Red,
    Blue,
    Purple,
    Orange,
    Cyan,
    Pink,
    Black,
}

/// Game actions that can be applied to modify game logic state
///
/// These actions are used by keyboard input, touch gestures and the move
/// placement helper alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down
    SoftDrop,
    /// Instantly drop piece to its landing position and land it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Restart the level
    Restart,
}

impl GameAction {
    /// Parse action from camelCase string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Grid position in cells; `y` grows downwards, may be negative above the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}
