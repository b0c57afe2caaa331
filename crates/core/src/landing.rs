//! Landing resolution shared by the game logic and the move search.
//!
//! Order of effects: merge the piece, apply the bomb area clear, then remove
//! the full rows plus any rows a row bomb forces, and collapse once.

use arrayvec::ArrayVec;

use crate::field::{Field, FieldError, RowSet};
use crate::piece::Piece;
use crate::types::{Position, Rotation, BOMB_RADIUS, MAX_PIECE_DIM};

/// Absolute block positions of a landed piece
pub type LandedCells = ArrayVec<Position, { MAX_PIECE_DIM * MAX_PIECE_DIM }>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LandingOutcome {
    /// Where the piece blocks were written
    pub cells: LandedCells,
    /// Blueprint slots covered by this landing (pre-collapse coordinates)
    pub filled_slots: LandedCells,
    /// Center of the bomb blast, if the piece was a bomb
    pub bomb_center: Option<Position>,
    /// Blocks destroyed by the blast, not counting the bomb itself
    pub bomb_cells_cleared: usize,
    /// Rows removed by the collapse (pre-collapse indices)
    pub cleared_rows: RowSet,
}

/// Land `piece` and apply every side effect to `field`.
///
/// Fails without touching the field if the placement is illegal.
pub fn resolve_landing(
    field: &mut Field,
    piece: &Piece,
    position: Position,
    rotation: Rotation,
) -> Result<LandingOutcome, FieldError> {
    field.land_piece(piece, position, rotation)?;

    let mut outcome = LandingOutcome::default();
    outcome.cells = piece
        .cells(rotation)
        .iter()
        .map(|&(dx, dy)| position.offset(dx, dy))
        .collect();

    if piece.is_bomb() {
        let grid = piece.fill_grid(rotation);
        let center = position.offset(grid.width() as i32 / 2, grid.height() as i32 / 2);
        let cleared = field.clear_area(center, BOMB_RADIUS);
        outcome.bomb_center = Some(center);
        outcome.bomb_cells_cleared = cleared.saturating_sub(piece.num_blocks());
    } else {
        outcome.filled_slots = outcome
            .cells
            .iter()
            .copied()
            .filter(|p| field.is_blueprint_slot(p.x, p.y))
            .collect();
    }

    let mut rows = field.detect_full_rows();
    if piece.is_row_bomb() {
        for p in &outcome.cells {
            rows.insert(p.y as usize);
        }
    }

    if !rows.is_empty() {
        field.collapse_rows(rows);
    }
    outcome.cleared_rows = rows;

    Ok(outcome)
}
