//! ButterflyFX Animation
//!
//! Easing curves, keyframes and property interpolation.
//!
//! # Features
//!
//! - **Easing**: the six named curves used by scene keyframes
//! - **Interpolation**: numeric lerp, per-channel hex color blending and
//!   discrete stepping for everything else
//! - **Keyframes**: locating the segment around a point in normalized time
//!   and resolving its property set

pub mod easing;
pub mod interpolate;
pub mod keyframe;

pub use easing::{Easing, UnknownEasing};
pub use interpolate::{interpolate_color, interpolate_properties, interpolate_value};
pub use keyframe::{sample_keyframes, Keyframe, Segment};
