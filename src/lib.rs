pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod render;

pub use error::{Error, Result};
