//! Player scheduling
//!
//! Drives players from a host refresh callback. Each player keeps its own
//! playback state, so any number of scenes can run side by side.

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::clamp_fps;
use crate::player::{TimelinePlayer, Transport};

new_key_type! {
    pub struct PlayerId;
}

/// Ticks every registered player from one host callback
pub struct PlayerScheduler {
    players: SlotMap<PlayerId, TimelinePlayer>,
    clock: Arc<dyn Clock>,
}

impl PlayerScheduler {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            players: SlotMap::with_key(),
            clock: Arc::new(clock),
        }
    }

    /// Register a player. It is switched to the scheduler's clock so that
    /// every timestamp passed to [`TimelinePlayer::tick`] shares one origin.
    pub fn add(&mut self, mut player: TimelinePlayer) -> PlayerId {
        player.set_shared_clock(self.clock.clone());
        self.players.insert(player)
    }

    pub fn get(&self, id: PlayerId) -> Option<&TimelinePlayer> {
        self.players.get(id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut TimelinePlayer> {
        self.players.get_mut(id)
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<TimelinePlayer> {
        self.players.remove(id)
    }

    /// Tick all players with the scheduler's clock
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.tick_at(now);
    }

    /// Tick all players with an explicit timestamp in the scheduler clock's
    /// timebase
    pub fn tick_at(&mut self, now_ms: f64) {
        for (_, player) in self.players.iter_mut() {
            player.tick(now_ms);
        }
    }

    /// Check if any player is still playing
    pub fn has_active_players(&self) -> bool {
        self.players.iter().any(|(_, p)| p.is_playing())
    }

    /// Iterate over all players
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &TimelinePlayer)> {
        self.players.iter()
    }

    /// Iterate over all players (mutable)
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut TimelinePlayer)> {
        self.players.iter_mut()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

impl Default for PlayerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays a scene through at a fixed frame rate without a real display.
///
/// Time comes from a [`ManualClock`] advanced one frame per tick, so a run is
/// deterministic and takes no wall-clock time.
#[derive(Clone, Debug)]
pub struct HeadlessDriver {
    clock: ManualClock,
    frame_ms: f64,
}

impl HeadlessDriver {
    /// Create a driver ticking at `fps` frames per second, clamped by
    /// [`clamp_fps`].
    pub fn new(fps: f64) -> Self {
        Self {
            clock: ManualClock::new(),
            frame_ms: 1000.0 / clamp_fps(fps),
        }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Play `player` from its current position until it pauses at the end.
    ///
    /// The player runs on the driver's clock for the duration of the run and
    /// gets its previous clock back afterwards. A tick that does not move the
    /// playhead pauses the player and ends the run.
    ///
    /// Returns the number of ticks processed.
    pub fn run(&self, player: &mut TimelinePlayer) -> usize {
        let previous = player.clock().clone();
        player.set_clock(self.clock.clone());
        player.play();

        let mut ticks = 0;
        while player.is_playing() {
            let before = player.current_time();
            self.clock.advance_ms(self.frame_ms);
            player.update();
            ticks += 1;

            if player.is_playing() && player.current_time() <= before {
                tracing::warn!(
                    "Playhead stalled at {} after {} ticks, stopping headless run",
                    before,
                    ticks
                );
                player.pause();
            }
        }

        player.set_shared_clock(previous);
        tracing::debug!("Headless run finished after {} ticks", ticks);
        ticks
    }
}
