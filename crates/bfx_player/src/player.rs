//! Timeline player.
//!
//! Owns the playhead of one scene and moves it through normalized time.
//! The host loop calls [`TimelinePlayer::tick`] (or [`TimelinePlayer::update`])
//! once per visual refresh; user actions call the transport methods. Every
//! tick and every seek resolves a frame and hands it to the attached
//! [`RenderSink`].

use std::sync::Arc;

use bfx_scene::{Scene, SceneLoader};

use crate::clock::{Clock, SystemClock};
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::frame::{compute_frame, FrameState};
use crate::markers::MarkerNavigator;
use crate::render::RenderSink;

const MIN_SPEED: f64 = 0.1;
const MAX_SPEED: f64 = 10.0;

/// Transport state of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// Not started or stopped.
    #[default]
    Stopped,
    /// Currently playing.
    Playing,
    /// Paused, including after reaching the end.
    Paused,
}

/// Mutable playback state of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// Playhead in normalized time (0.0 to 1.0).
    pub current_time: f64,
    /// Transport state.
    pub status: PlayerState,
    /// Clock timestamp (ms) of the last processed tick while playing.
    pub last_frame_timestamp: Option<f64>,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlayerState::Playing
    }
}

/// Play/pause/seek surface shared by players.
pub trait Transport {
    /// Start or resume playback.
    fn play(&mut self);
    /// Pause playback, keeping the playhead.
    fn pause(&mut self);
    /// Move the playhead to normalized time `t` (clamped to 0..=1).
    fn seek(&mut self, t: f64);
    /// Resolve the frame at normalized time `t` without touching playback.
    fn compute_frame(&self, t: f64) -> FrameState;
    /// Playhead in normalized time.
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
    /// Scene duration in seconds.
    fn duration(&self) -> f64;
}

/// Plays a validated scene back over normalized time.
pub struct TimelinePlayer {
    scene: Arc<Scene>,
    config: PlayerConfig,
    speed: f64,
    playback: PlaybackState,
    clock: Arc<dyn Clock>,
    sink: Option<Box<dyn RenderSink + Send>>,
}

impl TimelinePlayer {
    /// Create a stopped player at time 0.
    ///
    /// Fails if the scene does not pass [`SceneLoader::validate`].
    pub fn new(scene: impl Into<Arc<Scene>>) -> Result<Self> {
        let scene = scene.into();
        SceneLoader::validate(&scene)?;

        Ok(Self {
            scene,
            config: PlayerConfig::default(),
            speed: 1.0,
            playback: PlaybackState::default(),
            clock: Arc::new(SystemClock::new()),
            sink: None,
        })
    }

    /// Apply a configuration.
    pub fn with_config(mut self, config: PlayerConfig) -> Self {
        self.set_speed(config.speed);
        self.config = config;
        self
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.set_clock(clock);
        self
    }

    /// Attach a render sink.
    pub fn with_sink(mut self, sink: impl RenderSink + Send + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the time source. A running playthrough re-anchors on it.
    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.set_shared_clock(Arc::new(clock));
    }

    /// Replace the time source with one shared with other players.
    pub fn set_shared_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
        if self.playback.is_playing() {
            self.playback.last_frame_timestamp = Some(self.clock.now_ms());
        }
    }

    pub fn set_sink(&mut self, sink: impl RenderSink + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Detach the render sink.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// Current time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.playback.status
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Playhead in seconds.
    pub fn current_seconds(&self) -> f64 {
        self.scene.seconds_at(self.playback.current_time)
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the playback speed, clamped to 0.1..=10.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            tracing::warn!("Ignoring non-finite playback speed {}", speed);
            return;
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Marker navigation over this scene, using the configured epsilon.
    pub fn markers(&self) -> MarkerNavigator<'_> {
        MarkerNavigator::new(&self.scene.markers).with_epsilon(self.config.marker_epsilon)
    }

    /// Frame at the current playhead.
    pub fn frame(&self) -> FrameState {
        compute_frame(&self.scene, self.playback.current_time)
    }

    /// Toggle play/pause.
    pub fn toggle(&mut self) {
        if self.playback.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop playback and return to the start.
    pub fn stop(&mut self) {
        self.playback.status = PlayerState::Stopped;
        self.playback.last_frame_timestamp = None;
        self.playback.current_time = 0.0;
        self.render();
    }

    /// Seek to the start and play.
    pub fn restart(&mut self) {
        self.seek(0.0);
        self.play();
    }

    /// Seek to a position in seconds.
    pub fn seek_seconds(&mut self, seconds: f64) {
        self.seek(self.scene.normalized_at(seconds));
    }

    /// Pause and move forward by one frame.
    pub fn step_forward(&mut self) {
        self.pause();
        self.seek(self.playback.current_time + self.frame_step());
    }

    /// Pause and move back by one frame.
    pub fn step_backward(&mut self) {
        self.pause();
        self.seek(self.playback.current_time - self.frame_step());
    }

    fn frame_step(&self) -> f64 {
        self.config.frame_duration_ms() / self.scene.duration_ms()
    }

    /// Seek to the previous marker, or the start if there is none.
    ///
    /// Returns the seek target.
    pub fn seek_previous_marker(&mut self) -> f64 {
        let target = self.markers().previous_target(self.playback.current_time);
        self.seek(target);
        target
    }

    /// Seek to the next marker. Does nothing if there is none.
    pub fn seek_next_marker(&mut self) -> Option<f64> {
        let target = self.markers().next_target(self.playback.current_time)?;
        self.seek(target);
        Some(target)
    }

    /// Seek to the marker with the given id.
    pub fn seek_to_marker(&mut self, id: &str) -> Result<()> {
        let target = self
            .markers()
            .find(id)
            .map(|m| m.time)
            .ok_or_else(|| PlayerError::UnknownMarker(id.to_string()))?;
        self.seek(target);
        Ok(())
    }

    /// Process a host refresh at clock timestamp `now_ms`.
    ///
    /// Only advances while playing. Reaching the end clamps the playhead to
    /// 1.0 and pauses; there is no looping.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.playback.is_playing() {
            return;
        }

        let last = self.playback.last_frame_timestamp.unwrap_or(now_ms);
        self.playback.last_frame_timestamp = Some(now_ms);
        self.step_by(now_ms - last);
    }

    /// Advance playback by `dt_ms` milliseconds of wall-clock time.
    pub fn advance(&mut self, dt_ms: f64) {
        if !self.playback.is_playing() {
            return;
        }
        if let Some(last) = self.playback.last_frame_timestamp.as_mut() {
            *last += dt_ms;
        }
        self.step_by(dt_ms);
    }

    /// Tick with the player's own clock.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        self.tick(now);
    }

    fn step_by(&mut self, dt_ms: f64) {
        // A clock that runs backwards does not rewind playback
        let dt_ms = dt_ms.max(0.0);
        self.playback.current_time += dt_ms * self.speed / self.scene.duration_ms();

        if self.playback.current_time >= 1.0 {
            self.playback.current_time = 1.0;
            self.playback.status = PlayerState::Paused;
            self.playback.last_frame_timestamp = None;
            tracing::debug!("Scene '{}' finished", self.scene.title);
        }

        self.render();
    }

    fn render(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let frame = compute_frame(&self.scene, self.playback.current_time);
            sink.present(&frame);
        }
    }
}

impl Transport for TimelinePlayer {
    /// Start or resume playback; a finished playthrough restarts from 0.
    fn play(&mut self) {
        if self.playback.is_playing() {
            return;
        }
        if self.playback.current_time >= 1.0 {
            self.playback.current_time = 0.0;
        }
        self.playback.status = PlayerState::Playing;
        self.playback.last_frame_timestamp = Some(self.clock.now_ms());
        tracing::debug!(
            "Playing '{}' from {:.3}",
            self.scene.title,
            self.playback.current_time
        );
    }

    fn pause(&mut self) {
        if self.playback.is_playing() {
            self.playback.status = PlayerState::Paused;
            self.playback.last_frame_timestamp = None;
        }
    }

    fn seek(&mut self, t: f64) {
        if !t.is_finite() {
            tracing::warn!("Ignoring seek to non-finite time {}", t);
            return;
        }
        self.playback.current_time = t.clamp(0.0, 1.0);
        if self.playback.is_playing() {
            self.playback.last_frame_timestamp = Some(self.clock.now_ms());
        }
        self.render();
    }

    fn compute_frame(&self, t: f64) -> FrameState {
        compute_frame(&self.scene, t)
    }

    fn current_time(&self) -> f64 {
        self.playback.current_time
    }

    fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    fn duration(&self) -> f64 {
        self.scene.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::render::FrameCollector;
    use bfx_animation::Keyframe;
    use bfx_scene::{Element, ElementKind, Marker};

    /// 10 second scene with one element fading in over the first quarter.
    fn test_scene() -> Scene {
        Scene::new("test", 10.0)
            .with_element(
                Element::new("title", ElementKind::Text)
                    .with_window(0.0, 0.5)
                    .with_keyframe(Keyframe::new(0.0).with("opacity", 0.0))
                    .with_keyframe(Keyframe::new(0.25).with("opacity", 1.0)),
            )
            .with_marker(Marker::new("intro", "Intro", 0.0))
            .with_marker(Marker::new("middle", "Middle", 0.5))
    }

    fn player_with_clock() -> (TimelinePlayer, ManualClock, FrameCollector) {
        let clock = ManualClock::starting_at(1_000.0);
        let frames = FrameCollector::new();
        let player = TimelinePlayer::new(test_scene())
            .unwrap()
            .with_clock(clock.clone())
            .with_sink(frames.clone());
        (player, clock, frames)
    }

    #[test]
    fn test_player_creation() {
        let (player, _, frames) = player_with_clock();
        assert_eq!(player.state(), PlayerState::Stopped);
        assert_eq!(player.current_time(), 0.0);
        assert!(!player.is_playing());
        assert_eq!(player.duration(), 10.0);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_rejects_malformed_scene() {
        let scene = Scene::new("bad", 10.0).with_element(Element::new("empty", ElementKind::Text));
        let err = TimelinePlayer::new(scene).err().unwrap();
        assert!(matches!(err, PlayerError::Scene(_)));
    }

    #[test]
    fn test_tick_advances_by_wall_clock() {
        let (mut player, clock, frames) = player_with_clock();

        player.play();
        clock.advance_ms(1_000.0);
        player.update();

        assert!((player.current_time() - 0.1).abs() < 1e-12);
        assert!((player.current_seconds() - 1.0).abs() < 1e-9);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_tick_ignored_when_paused() {
        let (mut player, clock, frames) = player_with_clock();

        clock.advance_ms(500.0);
        player.update();
        assert_eq!(player.current_time(), 0.0);

        player.play();
        clock.advance_ms(1_000.0);
        player.update();
        player.pause();
        let paused_at = player.current_time();

        clock.advance_ms(5_000.0);
        player.update();
        assert_eq!(player.current_time(), paused_at);
        assert_eq!(player.state(), PlayerState::Paused);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_resume_does_not_count_paused_time() {
        let (mut player, clock, _) = player_with_clock();

        player.play();
        clock.advance_ms(2_000.0);
        player.update();
        player.pause();

        clock.advance_ms(60_000.0);
        player.play();
        clock.advance_ms(1_000.0);
        player.update();

        assert!((player.current_time() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_reaching_end_pauses() {
        let (mut player, clock, frames) = player_with_clock();

        player.play();
        clock.advance_ms(12_000.0);
        player.update();

        assert_eq!(player.current_time(), 1.0);
        assert_eq!(player.state(), PlayerState::Paused);
        assert!(!player.is_playing());
        assert_eq!(frames.last().map(|f| f.time), Some(1.0));

        // Terminal for this playthrough
        clock.advance_ms(1_000.0);
        player.update();
        assert_eq!(player.current_time(), 1.0);
    }

    #[test]
    fn test_play_after_end_restarts() {
        let (mut player, clock, _) = player_with_clock();
        player.seek(1.0);
        player.play();
        assert_eq!(player.current_time(), 0.0);

        clock.advance_ms(1_000.0);
        player.update();
        assert!((player.current_time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_seek_clamps_and_renders_immediately() {
        let (mut player, _, frames) = player_with_clock();

        player.seek(0.125);
        assert_eq!(player.current_time(), 0.125);
        assert_eq!(frames.len(), 1);
        let frame = frames.last().unwrap();
        assert_eq!(frame.get("title").and_then(|e| e.number("opacity")), Some(0.5));

        player.seek(2.0);
        assert_eq!(player.current_time(), 1.0);
        player.seek(-1.0);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(frames.len(), 3);

        player.seek(f64::NAN);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_seek_keeps_state() {
        let (mut player, clock, _) = player_with_clock();

        player.play();
        player.seek(0.5);
        assert!(player.is_playing());

        // Time before the seek does not count toward the next tick
        clock.advance_ms(1_000.0);
        player.update();
        assert!((player.current_time() - 0.6).abs() < 1e-9);

        player.pause();
        player.seek(0.2);
        assert_eq!(player.state(), PlayerState::Paused);
    }

    #[test]
    fn test_compute_frame_has_no_side_effects() {
        let (mut player, _, frames) = player_with_clock();
        player.seek(0.5);
        let a = player.compute_frame(0.5);
        let b = player.compute_frame(0.5);
        assert_eq!(a, b);
        assert_eq!(player.current_time(), 0.5);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_speed() {
        let (mut player, clock, _) = player_with_clock();

        player.set_speed(2.0);
        player.play();
        clock.advance_ms(1_000.0);
        player.update();
        assert!((player.current_time() - 0.2).abs() < 1e-9);

        player.set_speed(100.0);
        assert_eq!(player.speed(), 10.0);
        player.set_speed(0.0);
        assert_eq!(player.speed(), 0.1);
    }

    #[test]
    fn test_advance_delta() {
        let (mut player, _, _) = player_with_clock();
        player.advance(1_000.0);
        assert_eq!(player.current_time(), 0.0);

        player.play();
        player.advance(2_500.0);
        assert!((player.current_time() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_toggle_and_stop() {
        let (mut player, _, _) = player_with_clock();

        player.toggle();
        assert!(player.is_playing());
        player.toggle();
        assert_eq!(player.state(), PlayerState::Paused);

        player.seek(0.4);
        player.stop();
        assert_eq!(player.state(), PlayerState::Stopped);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_step_forward_and_back() {
        let (mut player, _, _) = player_with_clock();
        let step = 1000.0 / 60.0 / 10_000.0;

        player.play();
        player.step_forward();
        assert_eq!(player.state(), PlayerState::Paused);
        assert!((player.current_time() - step).abs() < 1e-12);

        player.step_backward();
        player.step_backward();
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_marker_seeks() {
        let (mut player, _, _) = player_with_clock();

        assert_eq!(player.seek_next_marker(), Some(0.5));
        assert_eq!(player.current_time(), 0.5);

        // No marker after the last one: no-op
        assert_eq!(player.seek_next_marker(), None);
        assert_eq!(player.current_time(), 0.5);

        assert_eq!(player.seek_previous_marker(), 0.0);
        assert_eq!(player.current_time(), 0.0);

        player.seek_to_marker("middle").unwrap();
        assert_eq!(player.current_time(), 0.5);
        assert!(matches!(
            player.seek_to_marker("missing"),
            Err(PlayerError::UnknownMarker(_))
        ));
    }

    #[test]
    fn test_seek_seconds() {
        let (mut player, _, _) = player_with_clock();
        player.seek_seconds(2.5);
        assert_eq!(player.current_time(), 0.25);
    }
}
