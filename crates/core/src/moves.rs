//! Move search - enumerate and rank the landings reachable for a piece.
//!
//! A move is reached by rotating at the spawn row, shifting sideways along
//! that row and dropping straight down. Pieces whose position can be adjusted
//! additionally try a one-column tuck at the bottom of the drop, which reaches
//! cells under overhangs.

use std::collections::HashSet;

use crate::analyzer::{AnalyzerWeights, FieldAnalyzer};
use crate::field::Field;
use crate::landing::resolve_landing;
use crate::piece::Piece;
use crate::types::{PieceKind, Position, Rotation};

/// A reachable landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Column of the piece origin during the straight drop
    pub drop_x: i32,
    /// Final origin of the piece
    pub position: Position,
    pub tucked: bool,
    pub rows_cleared: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct MoveSearch {
    weights: AnalyzerWeights,
}

impl MoveSearch {
    pub fn new(weights: AnalyzerWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &AnalyzerWeights {
        &self.weights
    }

    /// Every distinct reachable landing for `kind`, in search order
    pub fn find_moves(&self, field: &Field, kind: PieceKind) -> Vec<Move> {
        let piece = Piece::get(kind);
        let columns = field.num_columns() as i32;
        let mut seen = HashSet::new();
        let mut moves = Vec::new();

        for r in 0..piece.num_rotations() {
            let rotation = Rotation::from_index(r);
            let spawn = piece.spawn_position(rotation, field.num_columns());
            if !field.can_place(piece, spawn, rotation) {
                continue;
            }

            // Straight drops first so a tuck never shadows a plain drop
            let min_x = -(piece.fill_grid(rotation).num_empty_left_columns() as i32);
            let mut drops = Vec::new();
            for x in min_x..columns {
                if !reachable_along_row(field, piece, rotation, spawn, x) {
                    continue;
                }
                let landing = drop_position(field, piece, Position::new(x, spawn.y), rotation);
                if seen.insert((landing, rotation)) {
                    moves.push(self.evaluate(field, piece, rotation, x, landing, false));
                }
                drops.push((x, landing));
            }

            if !piece.position_can_be_adjusted_in_moves_search() {
                continue;
            }
            for (x, landing) in drops {
                for dir in [-1, 1] {
                    let tuck = landing.offset(dir, 0);
                    if !field.can_place(piece, tuck, rotation) {
                        continue;
                    }
                    let tuck_landing = drop_position(field, piece, tuck, rotation);
                    if seen.insert((tuck_landing, rotation)) {
                        moves.push(self.evaluate(field, piece, rotation, x, tuck_landing, true));
                    }
                }
            }
        }

        moves
    }

    /// The highest scoring move; ties keep the first found
    pub fn best_move(&self, field: &Field, kind: PieceKind) -> Option<Move> {
        self.find_moves(field, kind)
            .into_iter()
            .fold(None, |best: Option<Move>, mv| match best {
                Some(b) if b.score >= mv.score => Some(b),
                _ => Some(mv),
            })
    }

    fn evaluate(
        &self,
        field: &Field,
        piece: &Piece,
        rotation: Rotation,
        drop_x: i32,
        position: Position,
        tucked: bool,
    ) -> Move {
        let mut after = field.clone();
        let (rows_cleared, score) = match resolve_landing(&mut after, piece, position, rotation) {
            Ok(outcome) => {
                let rows = outcome.cleared_rows.len();
                (rows, FieldAnalyzer::new(&after).evaluate(&self.weights, rows))
            }
            Err(_) => (0, f32::NEG_INFINITY),
        };
        Move {
            kind: piece.kind(),
            rotation,
            drop_x,
            position,
            tucked,
            rows_cleared,
            score,
        }
    }
}

fn reachable_along_row(
    field: &Field,
    piece: &Piece,
    rotation: Rotation,
    spawn: Position,
    target_x: i32,
) -> bool {
    let step = if target_x >= spawn.x { 1 } else { -1 };
    let mut x = spawn.x;
    loop {
        if !field.can_place(piece, Position::new(x, spawn.y), rotation) {
            return false;
        }
        if x == target_x {
            return true;
        }
        x += step;
    }
}

/// Lowest free position straight below `start`
pub fn drop_position(field: &Field, piece: &Piece, start: Position, rotation: Rotation) -> Position {
    let mut pos = start;
    while field.can_place(piece, pos.offset(0, 1), rotation) {
        pos = pos.offset(0, 1);
    }
    pos
}
