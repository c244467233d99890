//! Player configuration

use serde::{Deserialize, Serialize};

/// Configuration for a timeline player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Playback speed multiplier (1.0 = normal).
    pub speed: f64,
    /// Distance in normalized time within which a marker counts as "current"
    /// during previous/next navigation.
    pub marker_epsilon: f64,
    /// Frame rate used for frame stepping and headless playback.
    pub fps: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            marker_epsilon: 0.01,
            fps: 60.0,
        }
    }
}

/// Lowest usable frame rate.
pub const MIN_FPS: f64 = 1.0;
/// Highest usable frame rate.
pub const MAX_FPS: f64 = 1000.0;

/// Clamp a frame rate to `MIN_FPS..=MAX_FPS`; NaN counts as the default 60.
pub fn clamp_fps(fps: f64) -> f64 {
    if fps.is_nan() {
        return 60.0;
    }
    fps.clamp(MIN_FPS, MAX_FPS)
}

impl PlayerConfig {
    /// Set the playback speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the marker navigation epsilon.
    pub fn with_marker_epsilon(mut self, epsilon: f64) -> Self {
        self.marker_epsilon = epsilon;
        self
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Duration of one frame in milliseconds, with fps clamped by [`clamp_fps`].
    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / clamp_fps(self.fps)
    }
}
