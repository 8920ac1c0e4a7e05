use crate::piece::{BlockColor, Piece};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

/// Top-row cell whose occupancy means the stack has reached the spawn area.
pub const SENTINEL_COLUMN: usize = GRID_WIDTH / 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(BlockColor),
}

impl CellState {
    pub fn is_empty(self) -> bool {
        self == CellState::Empty
    }
}

pub type Row = [CellState; GRID_WIDTH];

const EMPTY_ROW: Row = [CellState::Empty; GRID_WIDTH];

/// The playfield. Row 0 is the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; GRID_HEIGHT],
        }
    }

    /// Builds a grid from explicit rows. Panics if the row count is not
    /// `GRID_HEIGHT`.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        assert_eq!(rows.len(), GRID_HEIGHT, "grid must have {GRID_HEIGHT} rows");
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cell(&self, x: usize, y: usize) -> CellState {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: CellState) {
        self.rows[y][x] = cell;
    }

    /// Every occupied cell of `piece` must be inside the field and on an
    /// empty cell.
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.cells().all(|cell| {
            let in_bounds = cell.x >= 0
                && (cell.x as usize) < GRID_WIDTH
                && cell.y >= 0
                && (cell.y as usize) < GRID_HEIGHT;
            in_bounds && self.rows[cell.y as usize][cell.x as usize].is_empty()
        })
    }

    /// Writes the piece's color into the field. The placement must already
    /// be valid; cells outside the field are skipped.
    pub fn lock(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            if cell.x < 0 || cell.y < 0 {
                continue;
            }
            if let Some(row) = self.rows.get_mut(cell.y as usize) {
                if let Some(slot) = row.get_mut(cell.x as usize) {
                    *slot = CellState::Filled(piece.color);
                }
            }
        }
    }

    /// Removes every full row, pulling the rows above down and inserting
    /// empty rows at the top. Returns how many rows went away.
    pub fn clear(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = GRID_HEIGHT;

        // Bottom to top. After a removal the row above has moved into y - 1,
        // so y stays put.
        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.rows.remove(y - 1);
                self.rows.insert(0, EMPTY_ROW);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn is_full(&self) -> bool {
        !self.rows[0][SENTINEL_COLUMN].is_empty()
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| !cell.is_empty())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
