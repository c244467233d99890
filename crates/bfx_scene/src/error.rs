//! Scene error types

use thiserror::Error;

/// Errors raised while loading a scene document
///
/// Every variant is fatal: a player cannot be built from a scene that fails
/// to load.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Element has an empty keyframe list
    #[error("Malformed scene: element '{element_id}' has no keyframes")]
    NoKeyframes { element_id: String },

    /// Element enters after it exits
    #[error("Malformed scene: element '{element_id}' enters at {enter} after it exits at {exit}")]
    InvertedWindow {
        element_id: String,
        enter: f64,
        exit: f64,
    },

    /// Enter or exit outside normalized time
    #[error("Malformed scene: element '{element_id}' has window [{enter}, {exit}] outside [0, 1]")]
    WindowOutOfRange {
        element_id: String,
        enter: f64,
        exit: f64,
    },

    /// Keyframe outside normalized time
    #[error("Malformed scene: element '{element_id}' has a keyframe at {time} outside [0, 1]")]
    KeyframeOutOfRange { element_id: String, time: f64 },

    /// Two elements share an id
    #[error("Malformed scene: duplicate element id '{element_id}'")]
    DuplicateElement { element_id: String },

    /// Marker outside normalized time
    #[error("Malformed scene: marker '{marker_id}' at {time} is outside [0, 1]")]
    MarkerOutOfRange { marker_id: String, time: f64 },

    /// Duration is zero, negative or not finite
    #[error("Malformed scene: duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    /// Document is not valid scene JSON
    #[error("Failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    /// Scene file could not be read
    #[error("Failed to read scene: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    /// Id of the element that failed validation, if any
    pub fn element_id(&self) -> Option<&str> {
        match self {
            SceneError::NoKeyframes { element_id }
            | SceneError::InvertedWindow { element_id, .. }
            | SceneError::WindowOutOfRange { element_id, .. }
            | SceneError::KeyframeOutOfRange { element_id, .. }
            | SceneError::DuplicateElement { element_id } => Some(element_id),
            _ => None,
        }
    }

    /// Whether the document parsed but failed structural validation
    pub fn is_malformed(&self) -> bool {
        !matches!(self, SceneError::Parse(_) | SceneError::Io(_))
    }
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
