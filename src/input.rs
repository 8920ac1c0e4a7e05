use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::piece::Command;

/// What a single key press means to the game screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Command(Command),
    Quit,
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => {
            Some(Command::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => {
            Some(Command::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => {
            Some(Command::SoftDrop)
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => {
            Some(Command::Rotate)
        }
        _ => None,
    }
}

pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Maps a raw key event. Releases and repeats are dropped; only presses count.
pub fn translate(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if should_quit(key) {
        return Some(Input::Quit);
    }
    command_for_key(key.code).map(Input::Command)
}

/// Reads and drops every event already buffered, without blocking. Returns
/// how many were discarded.
pub fn discard_pending<P, R>(mut poll: P, mut read: R) -> io::Result<usize>
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<Event>,
{
    let mut discarded = 0;
    while poll(Duration::ZERO)? {
        read()?;
        discarded += 1;
    }
    Ok(discarded)
}
