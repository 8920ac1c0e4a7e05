use std::{
    fs::File,
    io::stdout,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use blockfall::config::{Args, GameConfig};
use blockfall::game::{Game, GameEvent};
use blockfall::input::{discard_pending, should_quit, translate, Input};
use blockfall::render::{Renderer, TerminalRenderer};

enum Outcome {
    Lost,
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    let config = args.game_config()?;
    let frame_duration = args.frame_duration()?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = TerminalRenderer::new(CrosstermBackend::new(stdout()))
        .map_err(anyhow::Error::from)
        .and_then(|mut renderer| run_menu(&mut renderer, &config, args.seed, frame_duration));

    // Always try to restore terminal state.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    result
}

/// Logging goes to a file or nowhere; stdout belongs to the UI.
fn init_tracing(path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

// ============================================================================
// Main Menu
// ============================================================================

fn run_menu<R: Renderer>(
    renderer: &mut R,
    config: &GameConfig,
    seed: Option<u64>,
    frame_duration: Duration,
) -> Result<()> {
    let mut games_played: u64 = 0;

    loop {
        renderer.render_menu()?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if should_quit(key) {
            info!("quit from menu");
            return Ok(());
        }

        let game_seed = seed.map(|seed| seed.wrapping_add(games_played));
        games_played += 1;
        info!(game = games_played, seed = ?game_seed, "starting game");

        let game = Game::new(config.clone(), game_seed);
        match play(renderer, game, frame_duration)? {
            Outcome::Lost => wait_for_key()?,
            Outcome::Quit => info!("game abandoned, back to menu"),
        }
    }
}

fn wait_for_key() -> Result<()> {
    // Keys pressed during the last frames of play must not dismiss the
    // game over screen.
    discard_pending(event::poll, event::read)?;

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// Game Loop
// ============================================================================

fn play<R: Renderer>(renderer: &mut R, mut game: Game, frame_duration: Duration) -> Result<Outcome> {
    let mut last_update = Instant::now();

    loop {
        renderer.render(&game.snapshot())?;

        // Wait out the rest of the frame, then drain whatever else arrived.
        let timeout = frame_duration
            .checked_sub(last_update.elapsed())
            .unwrap_or(Duration::ZERO);
        let mut wait = timeout;
        while event::poll(wait)? {
            wait = Duration::ZERO;
            if let Event::Key(key) = event::read()? {
                match translate(key) {
                    Some(Input::Quit) => return Ok(Outcome::Quit),
                    Some(Input::Command(command)) => game.push_command(command),
                    None => {}
                }
            }
        }

        let now = Instant::now();
        game.update(now - last_update);
        last_update = now;

        for event in game.take_events() {
            log_event(&event, &game);
        }

        if game.is_game_over() {
            renderer.render(&game.snapshot())?;
            return Ok(Outcome::Lost);
        }
    }
}

fn log_event(event: &GameEvent, game: &Game) {
    match event {
        GameEvent::LinesCleared(lines) => {
            info!(lines, total = game.lines_cleared, score = game.score, "lines cleared");
        }
        GameEvent::LevelUp(level) => {
            info!(level, fall_interval = ?game.fall_interval, "level up");
        }
        GameEvent::GameOver => {
            info!(
                score = game.score,
                lines = game.lines_cleared,
                level = game.level,
                "game over"
            );
        }
        GameEvent::PieceMoved | GameEvent::PieceRotated => {}
        other => debug!(event = ?other, "game event"),
    }
}
