//! Tests for tetromino shapes, rotation and guarded movement
//!
//! Test categories:
//! - Canonical shapes and colors
//! - Rotation
//! - Movement against walls and floor
//! - Seeded construction

use std::collections::HashSet;

use blockfall::grid::{Grid, GRID_HEIGHT, GRID_WIDTH};
use blockfall::piece::{
    BlockColor, Command, Piece, Position, TetrominoKind, SPAWN_X, SPAWN_Y,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn occupied(piece: &Piece) -> Vec<(usize, usize)> {
    piece.shape.occupied().collect()
}

// ============================================================================
// Shape Tests
// ============================================================================

mod shapes {
    use super::*;

    #[test]
    fn every_kind_has_four_cells() {
        for kind in TetrominoKind::ALL {
            assert_eq!(kind.shape().occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn shapes_are_square_with_expected_sizes() {
        assert_eq!(TetrominoKind::I.shape().size(), 4);
        assert_eq!(TetrominoKind::O.shape().size(), 2);
        for kind in [
            TetrominoKind::J,
            TetrominoKind::L,
            TetrominoKind::S,
            TetrominoKind::T,
            TetrominoKind::Z,
        ] {
            assert_eq!(kind.shape().size(), 3, "{kind:?}");
        }
    }

    #[test]
    fn colors_follow_canonical_index() {
        let expected = [
            BlockColor::Cyan,
            BlockColor::Blue,
            BlockColor::Orange,
            BlockColor::Yellow,
            BlockColor::Green,
            BlockColor::Purple,
            BlockColor::Red,
        ];
        for (index, kind) in TetrominoKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
            assert_eq!(kind.color(), expected[index]);
            assert_eq!(Piece::from_kind(*kind).color, expected[index]);
        }
    }

    #[test]
    fn cells_at_each_canonical_index() {
        let expected: [&[(usize, usize)]; 7] = [
            &[(1, 0), (1, 1), (1, 2), (1, 3)],
            &[(0, 2), (1, 0), (1, 1), (1, 2)],
            &[(0, 0), (1, 0), (1, 1), (1, 2)],
            &[(0, 0), (0, 1), (1, 0), (1, 1)],
            &[(0, 1), (0, 2), (1, 0), (1, 1)],
            &[(0, 1), (1, 0), (1, 1), (1, 2)],
            &[(0, 0), (0, 1), (1, 1), (1, 2)],
        ];
        for (index, kind) in TetrominoKind::ALL.iter().enumerate() {
            let cells: Vec<(usize, usize)> = kind.shape().occupied().collect();
            assert_eq!(cells, expected[index], "{kind:?}");
        }
    }

    #[test]
    fn blue_and_orange_shapes_mirror_each_other() {
        let blue = Piece::from_kind(TetrominoKind::J);
        let orange = Piece::from_kind(TetrominoKind::L);

        assert_eq!(blue.color, BlockColor::Blue);
        assert!(blue.shape.is_occupied(0, 2));
        assert_eq!(orange.color, BlockColor::Orange);
        assert!(orange.shape.is_occupied(0, 0));
    }

    #[test]
    fn colors_are_distinct() {
        let colors: HashSet<BlockColor> = TetrominoKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), 7);
    }

    #[test]
    fn every_kind_starts_flush_with_its_left_column() {
        for kind in TetrominoKind::ALL {
            let min_col = kind.shape().occupied().map(|(_, j)| j).min();
            assert_eq!(min_col, Some(0), "{kind:?}");
        }
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod rotation {
    use super::*;

    #[test]
    fn four_rotations_restore_every_shape() {
        for kind in TetrominoKind::ALL {
            let original = kind.shape();
            let mut shape = original;
            for _ in 0..4 {
                shape = shape.rotated();
            }
            assert_eq!(shape, original, "{kind:?}");
        }
    }

    #[test]
    fn o_rotation_is_noop() {
        let shape = TetrominoKind::O.shape();
        assert_eq!(shape.rotated(), shape);
    }

    #[test]
    fn i_turns_vertical_in_third_column() {
        let mut piece = Piece::from_kind(TetrominoKind::I);
        piece.rotate();

        assert_eq!(occupied(&piece), vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn t_rotates_clockwise() {
        let mut piece = Piece::from_kind(TetrominoKind::T);
        piece.rotate();

        // Stem now points right
        assert_eq!(occupied(&piece), vec![(0, 1), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn rotation_keeps_kind_and_color() {
        let mut piece = Piece::from_kind(TetrominoKind::S);
        piece.rotate();

        assert_eq!(piece.kind, TetrominoKind::S);
        assert_eq!(piece.color, BlockColor::Green);
    }

    #[test]
    fn blocked_rotation_is_reverted() {
        // Horizontal I on the floor has no room to stand up
        let grid = Grid::new();
        let mut piece = Piece::at(TetrominoKind::I, 0, GRID_HEIGHT as i16 - 2);
        let before = piece.clone();

        assert!(!piece.handle(Command::Rotate, &grid));
        assert_eq!(piece, before);
    }

    #[test]
    fn free_rotation_is_kept() {
        let grid = Grid::new();
        let mut piece = Piece::at(TetrominoKind::T, 4, 5);

        assert!(piece.handle(Command::Rotate, &grid));
        assert_eq!(piece.shape, TetrominoKind::T.shape().rotated());
    }
}

// ============================================================================
// Movement Tests
// ============================================================================

mod movement {
    use super::*;

    #[test]
    fn spawns_at_top_center() {
        let piece = Piece::from_kind(TetrominoKind::L);
        assert_eq!(piece.position, Position { x: SPAWN_X, y: SPAWN_Y });
        assert_eq!(piece.position, Position { x: GRID_WIDTH as i16 / 2, y: 0 });
    }

    #[test]
    fn move_by_is_unchecked() {
        let mut piece = Piece::at(TetrominoKind::O, 0, 0);
        piece.move_by(-3, -2);
        assert_eq!(piece.position, Position { x: -3, y: -2 });
    }

    #[test]
    fn cells_are_absolute() {
        let piece = Piece::at(TetrominoKind::O, 3, 7);
        let cells: Vec<Position> = piece.cells().collect();
        assert_eq!(
            cells,
            vec![
                Position { x: 3, y: 7 },
                Position { x: 4, y: 7 },
                Position { x: 3, y: 8 },
                Position { x: 4, y: 8 },
            ]
        );
    }

    #[test]
    fn left_moves_stop_at_wall() {
        let grid = Grid::new();
        for kind in TetrominoKind::ALL {
            let mut piece = Piece::from_kind(kind);
            for _ in 0..GRID_WIDTH {
                piece.handle(Command::MoveLeft, &grid);
            }
            assert_eq!(piece.position.x, 0, "{kind:?}");

            // Further presses are no-ops
            assert!(!piece.handle(Command::MoveLeft, &grid));
            assert_eq!(piece.position.x, 0, "{kind:?}");
        }
    }

    #[test]
    fn right_moves_stop_at_wall() {
        let grid = Grid::new();
        let mut piece = Piece::from_kind(TetrominoKind::O);
        for _ in 0..GRID_WIDTH {
            piece.handle(Command::MoveRight, &grid);
        }
        assert_eq!(piece.position.x, GRID_WIDTH as i16 - 2);
    }

    #[test]
    fn soft_drop_stops_at_floor() {
        let grid = Grid::new();
        let mut piece = Piece::at(TetrominoKind::O, 4, GRID_HEIGHT as i16 - 2);

        assert!(!piece.handle(Command::SoftDrop, &grid));
        assert_eq!(piece.position.y, GRID_HEIGHT as i16 - 2);
    }

    #[test]
    fn soft_drop_moves_one_row() {
        let grid = Grid::new();
        let mut piece = Piece::from_kind(TetrominoKind::T);

        assert!(piece.handle(Command::SoftDrop, &grid));
        assert_eq!(piece.position.y, 1);
    }
}

// ============================================================================
// Seeded Construction
// ============================================================================

mod seeded {
    use super::*;

    #[test]
    fn same_seed_same_pieces() {
        let mut a = StdRng::seed_from_u64(1234);
        let mut b = StdRng::seed_from_u64(1234);

        for _ in 0..50 {
            assert_eq!(Piece::new(&mut a), Piece::new(&mut b));
        }
    }

    #[test]
    fn all_kinds_eventually_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let kinds: HashSet<TetrominoKind> = (0..500).map(|_| Piece::new(&mut rng).kind).collect();
        assert_eq!(kinds.len(), 7);
    }

    #[test]
    fn new_pieces_spawn_at_spawn_point() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            let piece = Piece::new(&mut rng);
            assert_eq!(piece.position, Position { x: SPAWN_X, y: SPAWN_Y });
            assert_eq!(piece.color, piece.kind.color());
        }
    }
}
