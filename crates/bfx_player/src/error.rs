//! Player error types

use bfx_scene::SceneError;
use thiserror::Error;

/// Player-related errors
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Scene failed validation; playback cannot start
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Seek target names a marker the scene does not have
    #[error("Unknown marker: {0}")]
    UnknownMarker(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
