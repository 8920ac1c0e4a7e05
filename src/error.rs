/// Error types for the blockfall crate
use thiserror::Error;

/// Result type alias for blockfall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the terminal shell around the game. Gameplay itself never
/// fails: rejected moves are reverted, and losing is a state.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or log file IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected command line or timing configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
