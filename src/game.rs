use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::piece::{Command, Piece, TetrominoKind};
use crate::render::Snapshot;

// ============================================================================
// Configuration
// ============================================================================

pub const LINES_PER_LEVEL: u32 = 10;
pub const SCORE_PER_LINE: u32 = 10;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    /// Transient: the current piece could not fall and is being committed.
    PieceLocking,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    PieceSpawned(TetrominoKind),
    LinesCleared(u32),
    LevelUp(u32),
    SpeedUp(Duration),
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> Piece;
}

/// Uniform choice over the seven kinds. Seeded runs are reproducible.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> Piece {
        Piece::new(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// Cycles through `pieces` forever. Panics if `pieces` is empty.
    pub fn new(pieces: Vec<TetrominoKind>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> Piece {
        let kind = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        Piece::from_kind(kind)
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    pub grid: Grid,
    pub current_piece: Piece,
    pub next_piece: Piece,
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub fall_interval: Duration,
    pub state: GameState,
    fall_timer: Duration,
    speedup_timer: Duration,
    config: GameConfig,
    commands: VecDeque<Command>,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        Self::with_provider(config, Box::new(RandomPieceProvider::new(seed)))
    }

    pub fn with_provider(config: GameConfig, mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = provider.next_piece();
        let next_piece = provider.next_piece();
        Self::assemble(Grid::new(), current_piece, next_piece, config, provider)
    }

    /// Starts from a prepared field. Later pieces cycle through the kinds in
    /// canonical order, so the next piece is always an I.
    pub fn with_grid(grid: Grid, current_piece: Piece) -> Self {
        let mut provider = Box::new(SequencePieceProvider::new(TetrominoKind::ALL.to_vec()));
        let next_piece = provider.next_piece();
        Self::assemble(grid, current_piece, next_piece, GameConfig::default(), provider)
    }

    fn assemble(
        grid: Grid,
        current_piece: Piece,
        next_piece: Piece,
        config: GameConfig,
        piece_provider: Box<dyn PieceProvider>,
    ) -> Self {
        Self {
            grid,
            current_piece,
            next_piece,
            score: 0,
            lines_cleared: 0,
            level: 0,
            fall_interval: config.initial_fall_interval,
            state: GameState::Playing,
            fall_timer: Duration::ZERO,
            speedup_timer: Duration::ZERO,
            config,
            commands: VecDeque::new(),
            piece_provider,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Queues a command for the next `update`. Ignored once the game is over.
    pub fn push_command(&mut self, command: Command) {
        if self.state == GameState::GameOver {
            return;
        }
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Applies a command to the current piece right away. Rejected moves
    /// leave the piece untouched and return false.
    pub fn apply_command(&mut self, command: Command) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let changed = self.current_piece.handle(command, &self.grid);
        if changed {
            let event = match command {
                Command::Rotate => GameEvent::PieceRotated,
                _ => GameEvent::PieceMoved,
            };
            self.events.push(event);
        }
        changed
    }

    /// Advances the simulation by `dt`: one queued command, the speed-up
    /// ramp, then gravity.
    pub fn update(&mut self, dt: Duration) {
        if self.state == GameState::GameOver {
            return;
        }

        if let Some(command) = self.commands.pop_front() {
            self.apply_command(command);
        }

        self.speedup_timer += dt;
        if self.speedup_timer >= self.config.speedup_period {
            self.speedup_timer = Duration::ZERO;
            self.speed_up();
        }

        self.fall_timer += dt;
        if self.fall_timer > self.fall_interval {
            self.fall_timer = Duration::ZERO;
            self.tick();
        }
    }

    /// One gravity step, bypassing the fall timer. Locks the piece when it
    /// cannot fall any further.
    pub fn tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        if self.current_piece.try_move(0, 1, &self.grid) {
            self.events.push(GameEvent::PieceMoved);
        } else {
            self.state = GameState::PieceLocking;
            self.lock_and_spawn();
        }
    }

    fn speed_up(&mut self) {
        let floor = self.config.min_fall_interval;
        if self.fall_interval <= floor {
            return;
        }
        self.fall_interval = self
            .fall_interval
            .saturating_sub(self.config.speedup_step)
            .max(floor);
        self.events.push(GameEvent::SpeedUp(self.fall_interval));
    }

    fn lock_and_spawn(&mut self) {
        self.grid.lock(&self.current_piece);
        self.events.push(GameEvent::PieceLocked);

        let lines = self.grid.clear();
        if lines > 0 {
            self.events.push(GameEvent::LinesCleared(lines));
        }
        self.add_score(lines);
        self.spawn_next_piece();
    }

    /// Credits `lines` cleared rows. The level rises at most once per call,
    /// whenever the line total enters a new multiple of `LINES_PER_LEVEL`.
    pub fn add_score(&mut self, lines: u32) {
        let previous_tier = self.lines_cleared / LINES_PER_LEVEL;

        self.score += SCORE_PER_LINE * lines;
        self.lines_cleared += lines;

        if self.lines_cleared / LINES_PER_LEVEL > previous_tier {
            self.level += 1;
            self.fall_interval = self
                .fall_interval
                .mul_f64(self.config.level_up_factor)
                .max(self.config.min_fall_interval);
            self.events.push(GameEvent::LevelUp(self.level));
        }
    }

    /// Promotes the next piece and draws a fresh one. The game is lost when
    /// the stack reaches the sentinel cell or the new piece has no room.
    pub fn spawn_next_piece(&mut self) {
        let upcoming = self.piece_provider.next_piece();
        self.current_piece = std::mem::replace(&mut self.next_piece, upcoming);
        self.fall_timer = Duration::ZERO;

        if self.grid.is_full() || !self.grid.is_valid(&self.current_piece) {
            self.state = GameState::GameOver;
            self.commands.clear();
            self.events.push(GameEvent::GameOver);
        } else {
            self.state = GameState::Playing;
            self.events.push(GameEvent::PieceSpawned(self.current_piece.kind));
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            current_piece: &self.current_piece,
            next_piece: &self.next_piece,
            level: self.level,
            score: self.score,
            lines: self.lines_cleared,
            game_over: self.is_game_over(),
        }
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default(), None)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use crate::grid::{CellState, Grid, GRID_WIDTH};
    use crate::piece::BlockColor;

    pub const FILLER: CellState = CellState::Filled(BlockColor::Purple);

    pub fn empty_grid() -> Grid {
        Grid::new()
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..GRID_WIDTH {
            grid.set(x, y, FILLER);
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                grid.set(x, y, FILLER);
            }
        }
    }
}
