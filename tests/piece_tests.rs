//! Piece table tests - shapes, rotations and special pieces

use blockfall::core::Piece;
use blockfall::types::{PieceKind, Rotation, MAX_PIECE_DIM};
use proptest::prelude::*;

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

// ============== Table Tests ==============

#[test]
fn test_every_kind_has_a_descriptor() {
    for kind in PieceKind::ALL {
        let piece = Piece::get(kind);
        assert_eq!(piece.kind(), kind);
        assert!(piece.num_blocks() > 0, "{:?} has no blocks", kind);
        assert!((1..=4).contains(&piece.num_rotations()));
    }
}

#[test]
fn test_grids_fit_max_dimension() {
    for piece in Piece::all() {
        for rotation in ROTATIONS {
            let grid = piece.fill_grid(rotation);
            assert!(grid.width() <= MAX_PIECE_DIM);
            assert!(grid.height() <= MAX_PIECE_DIM);
        }
    }
}

#[test]
fn test_rotation_keeps_block_count() {
    for piece in Piece::all() {
        for rotation in ROTATIONS {
            assert_eq!(
                piece.cells(rotation).len(),
                piece.num_blocks(),
                "{:?} {:?}",
                piece.kind(),
                rotation
            );
        }
    }
}

#[test]
fn test_click_grid_covers_fill_grid() {
    for piece in Piece::all() {
        for rotation in ROTATIONS {
            for (dx, dy) in piece.cells(rotation) {
                assert!(piece.hit_test(rotation, dx, dy), "{:?}", piece.kind());
            }
        }
    }
}

// ============== Rotation Tests ==============

#[test]
fn test_i_piece_rotates_to_vertical() {
    let i = Piece::get(PieceKind::I);
    let east = i.fill_grid(Rotation::East);
    let offsets = east.offsets();
    let column = offsets[0].0;
    assert!(offsets.iter().all(|&(x, _)| x == column));
    assert_eq!(offsets.len(), 4);
}

#[test]
fn test_two_rotation_pieces_alternate() {
    let s = Piece::get(PieceKind::S);
    assert_eq!(s.num_rotations(), 2);
    assert_eq!(s.effective_rotation(Rotation::South), Rotation::North);
    assert_eq!(s.effective_rotation(Rotation::West), Rotation::East);
    assert_eq!(s.fill_grid(Rotation::South), s.fill_grid(Rotation::North));
}

#[test]
fn test_bombs_cannot_rotate() {
    for kind in [PieceKind::Bomb, PieceKind::RowBomb] {
        let piece = Piece::get(kind);
        assert!(!piece.can_rotate_around_z());
        assert_eq!(piece.num_blocks(), 1);
    }
    assert!(Piece::get(PieceKind::Bomb).is_bomb());
    assert!(Piece::get(PieceKind::RowBomb).is_row_bomb());
    assert!(!Piece::get(PieceKind::T).is_bomb());
}

#[test]
fn test_spawn_position_is_centered_on_row_zero() {
    for piece in Piece::all() {
        let pos = piece.spawn_position(Rotation::North, 8);
        let top = piece
            .cells(Rotation::North)
            .iter()
            .map(|&(_, dy)| pos.y + dy)
            .min();
        assert_eq!(top, Some(0), "{:?}", piece.kind());
        let width = piece.fill_grid(Rotation::North).width() as i32;
        assert_eq!(pos.x, (8 - width) / 2);
    }
}

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0..PieceKind::ALL.len()).prop_map(|i| PieceKind::ALL[i])
}

proptest! {
    #[test]
    fn single_rotation_pieces_ignore_rotation(kind in kind_strategy(), r in 0usize..4) {
        let piece = Piece::get(kind);
        prop_assume!(piece.num_rotations() == 1);
        prop_assert_eq!(
            piece.fill_grid(Rotation::from_index(r)),
            piece.fill_grid(Rotation::North)
        );
    }

    #[test]
    fn effective_rotation_cycles(kind in kind_strategy(), r in 0usize..4) {
        let piece = Piece::get(kind);
        let rotation = Rotation::from_index(r);
        let effective = piece.effective_rotation(rotation);
        prop_assert!(effective.index() < piece.num_rotations());
        prop_assert_eq!(piece.fill_grid(rotation), piece.fill_grid(effective));
    }
}
