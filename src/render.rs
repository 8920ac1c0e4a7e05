use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::error::Result;
use crate::grid::{CellState, Grid, Row, GRID_HEIGHT, GRID_WIDTH};
use crate::piece::{BlockColor, Piece};

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of everything a frame shows.
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub current_piece: &'a Piece,
    pub next_piece: &'a Piece,
    pub level: u32,
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl Snapshot<'_> {
    /// Locked cells with the falling piece drawn on top.
    pub fn composed_rows(&self) -> Vec<Row> {
        let mut rows = self.grid.rows().to_vec();

        for cell in self.current_piece.cells() {
            if cell.x >= 0
                && (cell.x as usize) < GRID_WIDTH
                && cell.y >= 0
                && (cell.y as usize) < GRID_HEIGHT
            {
                rows[cell.y as usize][cell.x as usize] = CellState::Filled(self.current_piece.color);
            }
        }

        rows
    }

    pub fn hud_lines(&self) -> [String; 3] {
        [
            format_hud("Level", self.level),
            format_hud("Score", self.score),
            format_hud("Lines", self.lines),
        ]
    }
}

/// `Score: 0042` style HUD entry.
pub fn format_hud(label: &str, value: u32) -> String {
    format!("{label}: {value:04}")
}

// ============================================================================
// Renderer
// ============================================================================

pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<()>;
    fn render_menu(&mut self) -> Result<()>;
}

pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        self.terminal.draw(|frame| draw_game(frame, snapshot))?;
        Ok(())
    }

    fn render_menu(&mut self) -> Result<()> {
        self.terminal.draw(draw_menu)?;
        Ok(())
    }
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const PREVIEW_WIDTH: u16 = 12;
const INFO_WIDTH: u16 = 16;

fn block_color(color: BlockColor) -> Color {
    match color {
        BlockColor::Cyan => Color::Cyan,
        BlockColor::Blue => Color::Blue,
        BlockColor::Orange => Color::Rgb(255, 165, 0),
        BlockColor::Yellow => Color::Yellow,
        BlockColor::Green => Color::Green,
        BlockColor::Purple => Color::Magenta,
        BlockColor::Red => Color::Red,
    }
}

// ============================================================================
// Screens
// ============================================================================

fn draw_game(frame: &mut Frame, snapshot: &Snapshot<'_>) {
    let area = frame.size();

    let grid_display_width = (GRID_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = GRID_HEIGHT as u16 + 2;
    let total_width = grid_display_width + PREVIEW_WIDTH + INFO_WIDTH;

    let main_area = centered_rect(total_width, grid_display_height, area);

    // Layout: [Grid][Next + Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(PREVIEW_WIDTH + INFO_WIDTH),
    ])
    .split(main_area);

    let side = Layout::vertical([Constraint::Length(7), Constraint::Length(7), Constraint::Fill(1)])
        .split(horizontal[1]);

    draw_grid(frame, snapshot, horizontal[0]);
    draw_next(frame, snapshot.next_piece, side[0]);
    draw_hud(frame, snapshot, side[1]);

    if snapshot.game_over {
        draw_game_over(frame, snapshot, area);
    }
}

fn draw_grid(frame: &mut Frame, snapshot: &Snapshot<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .composed_rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    CellState::Empty => Span::raw(EMPTY_CHAR),
                    CellState::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(block_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_next(frame: &mut Frame, piece: &Piece, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = Style::default().fg(block_color(piece.color));
    let size = piece.shape.size();
    let mut lines: Vec<Line> = Vec::new();

    for i in 0..size {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for j in 0..size {
            if piece.shape.is_occupied(i, j) {
                spans.push(Span::styled(BLOCK_CHAR, style));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_hud(frame: &mut Frame, snapshot: &Snapshot<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [level, score, lines] = snapshot.hud_lines();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(level, Style::default().fg(Color::Green))),
        Line::from(Span::styled(score, Style::default().fg(Color::Yellow))),
        Line::from(Span::styled(lines, Style::default().fg(Color::Cyan))),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn draw_game_over(frame: &mut Frame, snapshot: &Snapshot<'_>, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("YOU LOST!", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format_hud("Score", snapshot.score)),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 9, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

fn draw_menu(frame: &mut Frame) {
    let area = frame.size();

    let text = vec![
        Line::from(Span::styled("TETRIS", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from("Press any key to play"),
        Line::from(""),
        Line::from(Span::styled(
            "←→: Move | ↓: Drop | ↑: Rotate | Q/ESC: Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_rect(area.width, 5, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
