use rand::Rng;

use crate::grid::{Grid, GRID_WIDTH};

// ============================================================================
// Configuration
// ============================================================================

pub const SPAWN_X: i16 = GRID_WIDTH as i16 / 2;
pub const SPAWN_Y: i16 = 0;

/// Largest shape matrix side (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

/// The seven canonical tetrominoes, in canonical index order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TetrominoKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlockColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

/// Discrete player commands. There is no held-key repeat.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::J,
        TetrominoKind::L,
        TetrominoKind::O,
        TetrominoKind::S,
        TetrominoKind::T,
        TetrominoKind::Z,
    ];

    const COLORS: [BlockColor; 7] = [
        BlockColor::Cyan,
        BlockColor::Blue,
        BlockColor::Orange,
        BlockColor::Yellow,
        BlockColor::Green,
        BlockColor::Purple,
        BlockColor::Red,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Color is keyed on the canonical index, never on matrix content.
    pub fn color(self) -> BlockColor {
        Self::COLORS[self.index()]
    }

    pub fn shape(self) -> Shape {
        match self {
            TetrominoKind::I => Shape::from_rows(
                4,
                [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::J => Shape::from_rows(
                3,
                [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::L => Shape::from_rows(
                3,
                [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::O => Shape::from_rows(
                2,
                [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::S => Shape::from_rows(
                3,
                [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::T => Shape::from_rows(
                3,
                [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
            TetrominoKind::Z => Shape::from_rows(
                3,
                [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Square occupancy matrix of side `size`, stored in the top-left corner of a
/// fixed 4x4 array. Cells outside `size` are always empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    pub fn from_rows(size: usize, rows: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, row) in rows.iter().enumerate().take(size) {
            for (j, &value) in row.iter().enumerate().take(size) {
                cells[i][j] = value != 0;
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Occupied cells as `(row, col)` offsets inside the matrix.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |i| {
            (0..self.size).filter_map(move |j| self.cells[i][j].then_some((i, j)))
        })
    }

    /// Clockwise quarter turn: transpose, then reverse every row.
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, row) in cells.iter_mut().enumerate().take(n) {
            for (j, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - j][i];
            }
        }
        Self { size: n, cells }
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub color: BlockColor,
    pub position: Position,
}

impl Piece {
    /// Picks one of the seven kinds uniformly from `rng` and places it at the
    /// spawn point.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_kind(TetrominoKind::random(rng))
    }

    pub fn from_kind(kind: TetrominoKind) -> Self {
        Self::at(kind, SPAWN_X, SPAWN_Y)
    }

    pub fn at(kind: TetrominoKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color: kind.color(),
            position: Position { x, y },
        }
    }

    /// Absolute grid positions of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape.occupied().map(move |(i, j)| Position {
            x: self.position.x + j as i16,
            y: self.position.y + i as i16,
        })
    }

    /// Unchecked translation.
    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Unchecked clockwise rotation in place.
    pub fn rotate(&mut self) {
        self.shape = self.shape.rotated();
    }

    /// Translates, keeping the move only if the grid accepts it.
    pub fn try_move(&mut self, dx: i16, dy: i16, grid: &Grid) -> bool {
        self.move_by(dx, dy);
        if grid.is_valid(self) {
            true
        } else {
            self.move_by(-dx, -dy);
            false
        }
    }

    /// Rotates, restoring the previous shape if the grid rejects it.
    pub fn try_rotate(&mut self, grid: &Grid) -> bool {
        let previous = self.shape;
        self.rotate();
        if grid.is_valid(self) {
            true
        } else {
            self.shape = previous;
            false
        }
    }

    /// Applies one player command. Returns whether the piece changed.
    pub fn handle(&mut self, command: Command, grid: &Grid) -> bool {
        match command {
            Command::MoveLeft => self.try_move(-1, 0, grid),
            Command::MoveRight => self.try_move(1, 0, grid),
            Command::SoftDrop => self.try_move(0, 1, grid),
            Command::Rotate => self.try_rotate(grid),
        }
    }
}
