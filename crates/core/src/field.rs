//! Field module - the grid of landed blocks
//!
//! The field is a `num_columns` x `num_rows` grid stored as a flat row-major
//! vector. Coordinates: (x, y) where x grows to the right and y grows down;
//! row 0 is the top row where pieces spawn.
//!
//! An optional blueprint is a parallel, immutable grid of slots that landed
//! blocks are compared against for level completion and star rating.

use std::fmt;

use thiserror::Error;

use crate::piece::Piece;
use crate::types::{
    BlockColor, Position, Rotation, MAX_NUM_COLUMNS, MAX_NUM_ROWS, MIN_NUM_COLUMNS, MIN_NUM_ROWS,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field of {columns}x{rows} cells is outside the supported bounds")]
    InvalidDimensions { columns: usize, rows: usize },
    #[error("blueprint is {blueprint_columns}x{blueprint_rows} but the field is {columns}x{rows}")]
    BlueprintMismatch {
        columns: usize,
        rows: usize,
        blueprint_columns: usize,
        blueprint_rows: usize,
    },
    #[error("unexpected character {ch:?} in grid row {row}")]
    InvalidGridRow { row: usize, ch: char },
    #[error("grid rows have different lengths")]
    RaggedGrid,
    #[error("cell ({x}, {y}) is occupied or outside the field")]
    InvalidPlacement { x: i32, y: i32 },
}

/// Fill state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    Empty,
    Full,
}

/// One field cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub fill: Fill,
    pub color: BlockColor,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        fill: Fill::Empty,
        color: BlockColor::Gray,
    };

    pub fn full(color: BlockColor) -> Self {
        Self {
            fill: Fill::Full,
            color,
        }
    }

    pub fn is_full(&self) -> bool {
        self.fill == Fill::Full
    }
}

/// Set of row indices, stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowSet(u64);

impl RowSet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, row: usize) {
        debug_assert!(row < 64);
        self.0 |= 1 << row;
    }

    pub fn contains(&self, row: usize) -> bool {
        row < 64 && self.0 & (1 << row) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: RowSet) -> RowSet {
        RowSet(self.0 | other.0)
    }

    /// Number of rows in the set strictly below `row` (larger index)
    pub fn num_below(&self, row: usize) -> usize {
        if row >= 63 {
            return 0;
        }
        (self.0 >> (row + 1)).count_ones() as usize
    }

    /// Rows in ascending order (top to bottom)
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..64).filter(move |&row| self.contains(row))
    }
}

impl FromIterator<usize> for RowSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = RowSet::new();
        for row in iter {
            set.insert(row);
        }
        set
    }
}

/// Required-slot pattern compared against the landed blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    num_columns: usize,
    num_rows: usize,
    slots: Vec<bool>,
}

impl Blueprint {
    /// Parse rows of `#` (slot) and `.` (no slot), top row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, FieldError> {
        let (num_columns, num_rows, slots) = parse_grid(rows)?;
        Ok(Self {
            num_columns,
            num_rows,
            slots,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_slot(&self, x: usize, y: usize) -> bool {
        x < self.num_columns && y < self.num_rows && self.slots[y * self.num_columns + x]
    }

    pub fn num_slots(&self) -> usize {
        self.slots.iter().filter(|&&s| s).count()
    }

    /// Topmost row whose every column is a slot. Filling such a row clears it.
    pub fn first_full_row(&self) -> Option<usize> {
        if self.num_columns == 0 {
            return None;
        }
        self.slots
            .chunks(self.num_columns)
            .position(|row| row.iter().all(|&s| s))
    }
}

fn parse_grid<S: AsRef<str>>(rows: &[S]) -> Result<(usize, usize, Vec<bool>), FieldError> {
    let num_rows = rows.len();
    let num_columns = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
    let mut cells = Vec::with_capacity(num_columns * num_rows);
    for (y, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.chars().count() != num_columns {
            return Err(FieldError::RaggedGrid);
        }
        for ch in row.chars() {
            match ch {
                '#' => cells.push(true),
                '.' => cells.push(false),
                _ => return Err(FieldError::InvalidGridRow { row: y, ch }),
            }
        }
    }
    Ok((num_columns, num_rows, cells))
}

/// The game field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    num_columns: usize,
    num_rows: usize,
    /// Flat array of cells, row-major order (y * num_columns + x)
    cells: Vec<Cell>,
    blueprint: Option<Blueprint>,
}

impl Field {
    /// Create a new empty field
    pub fn new(num_columns: usize, num_rows: usize) -> Result<Self, FieldError> {
        if !(MIN_NUM_COLUMNS..=MAX_NUM_COLUMNS).contains(&num_columns)
            || !(MIN_NUM_ROWS..=MAX_NUM_ROWS).contains(&num_rows)
        {
            return Err(FieldError::InvalidDimensions {
                columns: num_columns,
                rows: num_rows,
            });
        }
        Ok(Self {
            num_columns,
            num_rows,
            cells: vec![Cell::EMPTY; num_columns * num_rows],
            blueprint: None,
        })
    }

    /// Create an empty field with a blueprint of the same dimensions
    pub fn with_blueprint(
        num_columns: usize,
        num_rows: usize,
        blueprint: Blueprint,
    ) -> Result<Self, FieldError> {
        let mut field = Self::new(num_columns, num_rows)?;
        if blueprint.num_columns != num_columns || blueprint.num_rows != num_rows {
            return Err(FieldError::BlueprintMismatch {
                columns: num_columns,
                rows: num_rows,
                blueprint_columns: blueprint.num_columns,
                blueprint_rows: blueprint.num_rows,
            });
        }
        field.blueprint = Some(blueprint);
        Ok(field)
    }

    /// Build a field from rows of `#` (full, gray) and `.` (empty), top row first.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, FieldError> {
        let (num_columns, num_rows, cells) = parse_grid(rows)?;
        let mut field = Self::new(num_columns, num_rows)?;
        for (cell, full) in field.cells.iter_mut().zip(cells) {
            if full {
                *cell = Cell::full(BlockColor::Gray);
            }
        }
        Ok(field)
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.num_columns as i32 || y >= self.num_rows as i32 {
            return None;
        }
        Some(y as usize * self.num_columns + x as usize)
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Get cell at (x, y); None if out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set cell at (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and full
    pub fn is_full(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(c) if c.is_full())
    }

    /// Within bounds and empty
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(c) if !c.is_full())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.num_columns;
        &self.cells[start..start + self.num_columns]
    }

    pub fn row_is_full(&self, y: usize) -> bool {
        y < self.num_rows && self.row(y).iter().all(Cell::is_full)
    }

    pub fn row_is_empty(&self, y: usize) -> bool {
        y < self.num_rows && !self.row(y).iter().any(Cell::is_full)
    }

    /// Number of rows holding at least one block
    pub fn num_occupied_rows(&self) -> usize {
        (0..self.num_rows).filter(|&y| !self.row_is_empty(y)).count()
    }

    pub fn num_full_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_full()).count()
    }

    /// Whether every block of the piece would sit on a free cell
    pub fn can_place(&self, piece: &Piece, position: Position, rotation: Rotation) -> bool {
        self.first_blocked_cell(piece, position, rotation).is_none()
    }

    fn first_blocked_cell(
        &self,
        piece: &Piece,
        position: Position,
        rotation: Rotation,
    ) -> Option<Position> {
        piece
            .cells(rotation)
            .iter()
            .map(|&(dx, dy)| position.offset(dx, dy))
            .find(|p| !self.is_free(p.x, p.y))
    }

    /// Write the piece blocks into the grid.
    ///
    /// Nothing is written unless every target cell is free and in bounds.
    pub fn land_piece(
        &mut self,
        piece: &Piece,
        position: Position,
        rotation: Rotation,
    ) -> Result<(), FieldError> {
        if let Some(p) = self.first_blocked_cell(piece, position, rotation) {
            return Err(FieldError::InvalidPlacement { x: p.x, y: p.y });
        }
        for (dx, dy) in piece.cells(rotation) {
            let p = position.offset(dx, dy);
            self.set(p.x, p.y, Cell::full(piece.color()));
        }
        Ok(())
    }

    /// Rows where every column is full
    pub fn detect_full_rows(&self) -> RowSet {
        (0..self.num_rows).filter(|&y| self.row_is_full(y)).collect()
    }

    /// Remove the given rows and shift everything above them down.
    ///
    /// Each surviving row moves down by the number of removed rows below it;
    /// the vacated top rows become empty. Returns the number of rows removed.
    pub fn collapse_rows(&mut self, rows: RowSet) -> usize {
        let width = self.num_columns;
        let mut write_y = self.num_rows;
        let mut removed = 0;

        // Scan from bottom to top
        for read_y in (0..self.num_rows).rev() {
            if rows.contains(read_y) {
                removed += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(Cell::EMPTY);
        debug_assert_eq!(write_y, removed);
        removed
    }

    /// Empty every cell within the Chebyshev radius of `center`.
    ///
    /// Returns how many full cells were cleared.
    pub fn clear_area(&mut self, center: Position, radius: usize) -> usize {
        let r = radius as i32;
        let mut cleared = 0;
        for y in center.y - r..=center.y + r {
            for x in center.x - r..=center.x + r {
                if self.is_full(x, y) {
                    self.set(x, y, Cell::EMPTY);
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Empty the whole grid (the blueprint stays)
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.blueprint.as_ref()
    }

    pub fn is_blueprint_slot(&self, x: i32, y: i32) -> bool {
        match (&self.blueprint, x >= 0 && y >= 0) {
            (Some(bp), true) => bp.is_slot(x as usize, y as usize),
            _ => false,
        }
    }

    pub fn num_blueprint_slots(&self) -> usize {
        self.blueprint.as_ref().map_or(0, Blueprint::num_slots)
    }

    /// How many full cells sit on a blueprint slot
    pub fn count_cells_matching_blueprint(&self) -> usize {
        let Some(bp) = &self.blueprint else {
            return 0;
        };
        self.cells
            .iter()
            .zip(&bp.slots)
            .filter(|(cell, &slot)| slot && cell.is_full())
            .count()
    }

    /// Every slot of a non-empty blueprint is covered
    pub fn is_blueprint_complete(&self) -> bool {
        let slots = self.num_blueprint_slots();
        slots > 0 && self.count_cells_matching_blueprint() == slots
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.num_rows {
            for cell in self.row(y) {
                f.write_str(if cell.is_full() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_field_index_calculation() {
        let field = Field::new(6, 8).unwrap();
        assert_eq!(field.index(0, 0), Some(0));
        assert_eq!(field.index(5, 0), Some(5));
        assert_eq!(field.index(0, 1), Some(6));
        assert_eq!(field.index(5, 7), Some(47));
        assert_eq!(field.index(-1, 0), None);
        assert_eq!(field.index(6, 0), None);
        assert_eq!(field.index(0, 8), None);
    }

    #[test]
    fn test_rejects_unsupported_dimensions() {
        assert!(matches!(
            Field::new(2, 10),
            Err(FieldError::InvalidDimensions { columns: 2, rows: 10 })
        ));
        assert!(Field::new(6, MAX_NUM_ROWS + 1).is_err());
    }

    #[test]
    fn test_row_set_counts_rows_below() {
        let set: RowSet = [2, 5, 7].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.num_below(0), 3);
        assert_eq!(set.num_below(2), 2);
        assert_eq!(set.num_below(6), 1);
        assert_eq!(set.num_below(7), 0);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 5, 7]);
    }

    #[test]
    fn test_land_piece_is_all_or_nothing() {
        let mut field = Field::new(6, 6).unwrap();
        field.set(3, 5, Cell::full(BlockColor::Gray));
        let o = Piece::get(PieceKind::O);

        let err = field.land_piece(o, Position::new(2, 4), Rotation::North);
        assert_eq!(err, Err(FieldError::InvalidPlacement { x: 3, y: 5 }));
        assert_eq!(field.num_full_cells(), 1);

        field.land_piece(o, Position::new(0, 4), Rotation::North).unwrap();
        assert_eq!(field.num_full_cells(), 5);
        assert_eq!(field.cell(1, 5).unwrap().color, BlockColor::Yellow);
    }

    #[test]
    fn test_collapse_middle_row() {
        let mut field = Field::from_ascii(&[
            "......", //
            "#.....", //
            "######", //
            ".#....", //
        ])
        .unwrap();
        let rows = field.detect_full_rows();
        assert_eq!(rows.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(field.collapse_rows(rows), 1);
        assert_eq!(field.to_string(), "......\n......\n#.....\n.#....\n");
    }

    #[test]
    fn test_clear_area_stays_in_bounds() {
        let mut field = Field::from_ascii(&["####", "####", "####", "####"]).unwrap();
        assert_eq!(field.clear_area(Position::new(0, 0), 1), 4);
        assert_eq!(field.to_string(), "..##\n..##\n####\n####\n");
    }

    #[test]
    fn test_blueprint_matching() {
        let bp = Blueprint::from_rows(&["....", "....", ".##.", "####"]).unwrap();
        let mut field = Field::with_blueprint(4, 4, bp).unwrap();
        assert_eq!(field.num_blueprint_slots(), 6);
        field.set(0, 3, Cell::full(BlockColor::Red));
        field.set(0, 2, Cell::full(BlockColor::Red));
        assert_eq!(field.count_cells_matching_blueprint(), 1);
        assert!(!field.is_blueprint_complete());
    }

    #[test]
    fn test_blueprint_dimensions_must_match() {
        let bp = Blueprint::from_rows(&["....", "...."]).unwrap();
        assert!(matches!(
            Field::with_blueprint(4, 6, bp),
            Err(FieldError::BlueprintMismatch { .. })
        ));
    }

    #[test]
    fn test_grid_parse_errors() {
        assert_eq!(
            Blueprint::from_rows(&["..", "x."]),
            Err(FieldError::InvalidGridRow { row: 1, ch: 'x' })
        );
        assert_eq!(Blueprint::from_rows(&["..", "..."]), Err(FieldError::RaggedGrid));
    }
}
