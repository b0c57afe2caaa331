//! Pieces module - static shape table
//!
//! Every piece kind is a constant record: a fill grid, a click grid used for
//! pointer hit-testing, a colour, the number of distinct rotations, a preview
//! scale and a handful of behaviour flags. The records live in one static
//! table and are handed out as `&'static Piece`.
//!
//! Grids are stored in their North orientation and rotated clockwise inside
//! their bounding box on demand. A piece with `num_rotations() == 1` always
//! yields its North grid, whatever rotation is asked for.

use arrayvec::ArrayVec;

use crate::types::{BlockColor, PieceKind, Position, Rotation, MAX_PIECE_DIM};

/// Offset of a single block relative to the piece origin (top-left of its grid)
pub type BlockOffset = (i32, i32);

/// Filled offsets of a piece; a 5x5 grid holds at most 25 blocks
pub type BlockOffsets = ArrayVec<BlockOffset, { MAX_PIECE_DIM * MAX_PIECE_DIM }>;

/// Fixed-size Empty/Full grid of at most `MAX_PIECE_DIM` x `MAX_PIECE_DIM` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceGrid {
    width: u8,
    height: u8,
    cells: [[bool; MAX_PIECE_DIM]; MAX_PIECE_DIM],
}

impl PieceGrid {
    /// Build a grid from rows of `#` (full) and `.` (empty).
    ///
    /// Evaluated at compile time for the shape table; malformed rows abort
    /// compilation.
    pub const fn parse(rows: &[&str]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_PIECE_DIM);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_PIECE_DIM);

        let mut cells = [[false; MAX_PIECE_DIM]; MAX_PIECE_DIM];
        let mut y = 0;
        while y < rows.len() {
            let bytes = rows[y].as_bytes();
            assert!(bytes.len() == width);
            let mut x = 0;
            while x < width {
                cells[y][x] = match bytes[x] {
                    b'#' => true,
                    b'.' => false,
                    _ => panic!("piece rows use '#' and '.' only"),
                };
                x += 1;
            }
            y += 1;
        }

        Self {
            width: width as u8,
            height: rows.len() as u8,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Whether the cell at (x, y) is full; out of range is empty
    pub fn is_full(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.cells[y as usize][x as usize]
    }

    /// Rotate 90° clockwise inside the bounding box.
    pub fn rotated_cw(&self) -> Self {
        let w = self.width();
        let h = self.height();
        let mut cells = [[false; MAX_PIECE_DIM]; MAX_PIECE_DIM];
        for (y, row) in self.cells.iter().enumerate().take(h) {
            for (x, &full) in row.iter().enumerate().take(w) {
                // (x, y) moves to column h-1-y, row x
                cells[x][h - 1 - y] = full;
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Rotate by the given number of clockwise quarter turns.
    pub fn rotated(&self, quarter_turns: usize) -> Self {
        let mut grid = *self;
        for _ in 0..quarter_turns % 4 {
            grid = grid.rotated_cw();
        }
        grid
    }

    /// Offsets of all full cells, row-major
    pub fn offsets(&self) -> BlockOffsets {
        let mut out = BlockOffsets::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.cells[y][x] {
                    out.push((x as i32, y as i32));
                }
            }
        }
        out
    }

    pub fn num_full(&self) -> usize {
        self.offsets().len()
    }

    /// Number of leading rows without a full cell
    pub fn num_empty_top_rows(&self) -> usize {
        (0..self.height())
            .take_while(|&y| !self.cells[y][..self.width()].iter().any(|&c| c))
            .count()
    }

    /// Number of leading columns without a full cell
    pub fn num_empty_left_columns(&self) -> usize {
        (0..self.width())
            .take_while(|&x| (0..self.height()).all(|y| !self.cells[y][x]))
            .count()
    }
}

/// Behaviour flags of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceFlags {
    pub is_bomb: bool,
    pub is_row_bomb: bool,
    pub can_rotate_around_z: bool,
    pub num_empty_top_rows: u8,
    pub position_can_be_adjusted_in_moves_search: bool,
}

impl PieceFlags {
    const REGULAR: Self = Self {
        is_bomb: false,
        is_row_bomb: false,
        can_rotate_around_z: true,
        num_empty_top_rows: 0,
        position_can_be_adjusted_in_moves_search: true,
    };
}

/// Immutable shape descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    fill: PieceGrid,
    click: PieceGrid,
    color: BlockColor,
    num_rotations: u8,
    preview_scale: f32,
    flags: PieceFlags,
}

impl Piece {
    /// Look up the shared descriptor for a kind.
    pub fn get(kind: PieceKind) -> &'static Piece {
        let piece = &PIECES[kind.index()];
        debug_assert_eq!(piece.kind, kind);
        piece
    }

    /// The whole shape table, in [`PieceKind::ALL`] order
    pub fn all() -> &'static [Piece] {
        &PIECES
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> BlockColor {
        self.color
    }

    pub fn num_rotations(&self) -> usize {
        self.num_rotations as usize
    }

    pub fn preview_scale(&self) -> f32 {
        self.preview_scale
    }

    pub fn is_bomb(&self) -> bool {
        self.flags.is_bomb
    }

    pub fn is_row_bomb(&self) -> bool {
        self.flags.is_row_bomb
    }

    pub fn can_rotate_around_z(&self) -> bool {
        self.flags.can_rotate_around_z
    }

    pub fn num_empty_top_rows(&self) -> usize {
        self.flags.num_empty_top_rows as usize
    }

    pub fn position_can_be_adjusted_in_moves_search(&self) -> bool {
        self.flags.position_can_be_adjusted_in_moves_search
    }

    /// Collapse a requested rotation onto the piece's distinct rotations
    pub fn effective_rotation(&self, rotation: Rotation) -> Rotation {
        Rotation::from_index(rotation.index() % self.num_rotations())
    }

    /// The fill grid for a rotation
    pub fn fill_grid(&self, rotation: Rotation) -> PieceGrid {
        self.fill.rotated(self.effective_rotation(rotation).index())
    }

    /// The click grid for a rotation
    pub fn click_grid(&self, rotation: Rotation) -> PieceGrid {
        self.click.rotated(self.effective_rotation(rotation).index())
    }

    /// Filled block offsets for a rotation
    pub fn cells(&self, rotation: Rotation) -> BlockOffsets {
        self.fill_grid(rotation).offsets()
    }

    /// Number of blocks the piece adds to the field
    pub fn num_blocks(&self) -> usize {
        self.fill.num_full()
    }

    /// Whether a point relative to the piece origin hits the click grid
    pub fn hit_test(&self, rotation: Rotation, dx: i32, dy: i32) -> bool {
        self.click_grid(rotation).is_full(dx, dy)
    }

    /// Spawn origin: horizontally centered, first filled row on row 0
    pub fn spawn_position(&self, rotation: Rotation, num_columns: usize) -> Position {
        let grid = self.fill_grid(rotation);
        let x = (num_columns as i32 - grid.width() as i32) / 2;
        Position::new(x, -(grid.num_empty_top_rows() as i32))
    }
}

const fn piece(
    kind: PieceKind,
    fill: &[&str],
    click: &[&str],
    color: BlockColor,
    num_rotations: u8,
    preview_scale: f32,
    flags: PieceFlags,
) -> Piece {
    Piece {
        kind,
        fill: PieceGrid::parse(fill),
        click: PieceGrid::parse(click),
        color,
        num_rotations,
        preview_scale,
        flags,
    }
}

const fn with_empty_top_rows(rows: u8) -> PieceFlags {
    PieceFlags {
        num_empty_top_rows: rows,
        ..PieceFlags::REGULAR
    }
}

const NOT_ADJUSTABLE: PieceFlags = PieceFlags {
    position_can_be_adjusted_in_moves_search: false,
    ..PieceFlags::REGULAR
};

const BOMB: PieceFlags = PieceFlags {
    is_bomb: true,
    can_rotate_around_z: false,
    position_can_be_adjusted_in_moves_search: false,
    ..PieceFlags::REGULAR
};

const ROW_BOMB: PieceFlags = PieceFlags {
    is_row_bomb: true,
    can_rotate_around_z: false,
    position_can_be_adjusted_in_moves_search: false,
    ..PieceFlags::REGULAR
};

static PIECES: [Piece; 20] = [
    piece(
        PieceKind::I,
        &["....", "####", "....", "...."],
        &["....", "####", "....", "...."],
        BlockColor::Cyan,
        2,
        0.5,
        with_empty_top_rows(1),
    ),
    piece(PieceKind::ShortI, &["###"], &["###"], BlockColor::Blue, 2, 0.6, PieceFlags::REGULAR),
    piece(PieceKind::Domino, &["##"], &["##"], BlockColor::Green, 2, 0.7, PieceFlags::REGULAR),
    piece(PieceKind::Single, &["#"], &["#"], BlockColor::Yellow, 1, 0.8, PieceFlags::REGULAR),
    piece(
        PieceKind::L,
        &["#.", "#.", "##"],
        &["#.", "##", "##"],
        BlockColor::Orange,
        4,
        0.6,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::MirroredL,
        &[".#", ".#", "##"],
        &[".#", "##", "##"],
        BlockColor::Blue,
        4,
        0.6,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::ShortL,
        &["#.", "##"],
        &["##", "##"],
        BlockColor::Purple,
        4,
        0.7,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::BigL,
        &["#.", "#.", "#.", "##"],
        &["#.", "##", "##", "##"],
        BlockColor::Orange,
        4,
        0.5,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::T,
        &["...", "###", ".#."],
        &["...", "###", "###"],
        BlockColor::Purple,
        4,
        0.6,
        with_empty_top_rows(1),
    ),
    piece(
        PieceKind::BigT,
        &["###", ".#.", ".#."],
        &["###", "###", ".#."],
        BlockColor::Pink,
        4,
        0.5,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::Plus,
        &[".#.", "###", ".#."],
        &["###", "###", "###"],
        BlockColor::Red,
        1,
        0.5,
        PieceFlags::REGULAR,
    ),
    piece(PieceKind::O, &["##", "##"], &["##", "##"], BlockColor::Yellow, 1, 0.6, PieceFlags::REGULAR),
    piece(
        PieceKind::S,
        &[".##", "##."],
        &["###", "###"],
        BlockColor::Green,
        2,
        0.6,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::Z,
        &["##.", ".##"],
        &["###", "###"],
        BlockColor::Red,
        2,
        0.6,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::U,
        &["#.#", "###"],
        &["###", "###"],
        BlockColor::Pink,
        4,
        0.6,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::V,
        &["#..", "#..", "###"],
        &["#..", "##.", "###"],
        BlockColor::Cyan,
        4,
        0.5,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::W,
        &["#..", "##.", ".##"],
        &["##.", "###", ".##"],
        BlockColor::Green,
        4,
        0.5,
        PieceFlags::REGULAR,
    ),
    piece(
        PieceKind::Pyramid,
        &["..#..", ".###.", "#####"],
        &[".###.", "#####", "#####"],
        BlockColor::Yellow,
        4,
        0.4,
        NOT_ADJUSTABLE,
    ),
    piece(PieceKind::Bomb, &["#"], &["#"], BlockColor::Black, 1, 0.9, BOMB),
    piece(PieceKind::RowBomb, &["#"], &["#"], BlockColor::Red, 1, 0.9, ROW_BOMB),
];

#[cfg(test)]
mod tests {
    use super::*;

    const ROTATIONS: [Rotation; 4] = [Rotation::North, Rotation::East, Rotation::South, Rotation::West];

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in PieceKind::ALL {
            assert_eq!(Piece::get(kind).kind(), kind);
        }
        assert_eq!(Piece::all().len(), PieceKind::ALL.len());
    }

    #[test]
    fn empty_top_rows_flag_matches_grid() {
        for piece in Piece::all() {
            assert_eq!(
                piece.num_empty_top_rows(),
                piece.fill_grid(Rotation::North).num_empty_top_rows(),
                "{:?}",
                piece.kind()
            );
        }
    }

    #[test]
    fn click_grid_covers_fill_grid() {
        for piece in Piece::all() {
            for r in ROTATIONS {
                let fill = piece.fill_grid(r);
                let click = piece.click_grid(r);
                assert_eq!(fill.width(), click.width());
                assert_eq!(fill.height(), click.height());
                for (x, y) in fill.offsets() {
                    assert!(click.is_full(x, y), "{:?} {:?}", piece.kind(), r);
                }
            }
        }
    }

    #[test]
    fn rotation_preserves_block_count() {
        for piece in Piece::all() {
            for r in ROTATIONS {
                assert_eq!(piece.cells(r).len(), piece.num_blocks());
            }
        }
    }

    #[test]
    fn rotate_cw_of_l() {
        let piece = Piece::get(PieceKind::L);
        // #.     ###
        // #.  -> #..
        // ##
        let east = piece.fill_grid(Rotation::East);
        assert_eq!(east.width(), 3);
        assert_eq!(east.height(), 2);
        assert_eq!(east.offsets().as_slice(), &[(0, 0), (1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn four_quarter_turns_is_identity() {
        for piece in Piece::all() {
            let grid = piece.fill_grid(Rotation::North);
            assert_eq!(grid.rotated(4), grid);
        }
    }

    #[test]
    fn two_rotation_pieces_wrap() {
        let i = Piece::get(PieceKind::I);
        assert_eq!(i.fill_grid(Rotation::South), i.fill_grid(Rotation::North));
        assert_eq!(i.fill_grid(Rotation::West), i.fill_grid(Rotation::East));
        assert_ne!(i.fill_grid(Rotation::East), i.fill_grid(Rotation::North));
    }

    #[test]
    fn bombs_never_rotate() {
        for kind in [PieceKind::Bomb, PieceKind::RowBomb] {
            let piece = Piece::get(kind);
            assert!(!piece.can_rotate_around_z());
            assert_eq!(piece.num_rotations(), 1);
        }
        assert!(Piece::get(PieceKind::Bomb).is_bomb());
        assert!(Piece::get(PieceKind::RowBomb).is_row_bomb());
        assert!(!Piece::get(PieceKind::T).is_bomb());
    }

    #[test]
    fn spawn_is_centered_with_first_row_on_top() {
        let t = Piece::get(PieceKind::T);
        assert_eq!(t.spawn_position(Rotation::North, 6), Position::new(1, -1));
        let single = Piece::get(PieceKind::Single);
        assert_eq!(single.spawn_position(Rotation::North, 7), Position::new(3, 0));
    }

    #[test]
    fn u_piece_gap_is_clickable() {
        let u = Piece::get(PieceKind::U);
        assert!(!u.fill_grid(Rotation::North).is_full(1, 0));
        assert!(u.hit_test(Rotation::North, 1, 0));
        assert!(!u.hit_test(Rotation::North, 3, 0));
    }
}
