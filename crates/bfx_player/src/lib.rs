//! ButterflyFX Timeline Player
//!
//! Plays a [`Scene`](bfx_scene::Scene) back over normalized time.
//!
//! # Features
//!
//! - **Transport**: play, pause, seek and frame stepping driven by an explicit
//!   `tick` from the host loop
//! - **Frames**: pure per-frame resolution of every active element, ordered
//!   by layer
//! - **Markers**: previous/next navigation over the scene's named markers
//! - **Scheduling**: several independent players ticked from one host callback
//!
//! # Example
//!
//! ```ignore
//! use bfx_player::{FrameCollector, ManualClock, TimelinePlayer, Transport};
//!
//! let clock = ManualClock::new();
//! let frames = FrameCollector::new();
//! let mut player = TimelinePlayer::new(scene)?
//!     .with_clock(clock.clone())
//!     .with_sink(frames.clone());
//!
//! player.play();
//! clock.advance_ms(16.0);
//! player.update();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod markers;
pub mod player;
pub mod render;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{clamp_fps, PlayerConfig, MAX_FPS, MIN_FPS};
pub use error::{PlayerError, Result};
pub use frame::{compute_frame, FrameState, ResolvedElement};
pub use markers::MarkerNavigator;
pub use player::{PlaybackState, PlayerState, TimelinePlayer, Transport};
pub use render::{FrameCollector, RenderSink};
pub use scheduler::{HeadlessDriver, PlayerId, PlayerScheduler};
