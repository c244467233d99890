//! ButterflyFX Scene
//!
//! The declarative scene document played back by `bfx_player`: elements with
//! keyframes and enter/exit windows, plus named markers.
//!
//! Scenes are plain JSON. [`SceneLoader`] parses and structurally validates
//! them; a validated [`Scene`] is immutable and shared read-only by players.

pub mod error;
pub mod loader;
pub mod model;

pub use error::{Result, SceneError};
pub use loader::{SceneLoad, SceneLoader};
pub use model::{Element, ElementKind, Marker, Scene};
