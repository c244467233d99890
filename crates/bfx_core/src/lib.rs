//! ButterflyFX Core
//!
//! Primitive value types shared by the animation, scene and player crates.
//!
//! # Features
//!
//! - **Colors**: `#RRGGBB` parsing, formatting and per-channel blending
//! - **Property values**: numbers, hex colors and opaque JSON values as they
//!   appear in scene keyframes

pub mod color;
pub mod value;

pub use color::{Color, ColorParseError};
pub use value::{Properties, PropertyValue};
