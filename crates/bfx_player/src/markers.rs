//! Marker navigation

use bfx_scene::Marker;

/// Previous/next lookup over a scene's markers.
///
/// A marker within `epsilon` of the playhead counts as the one being sat on
/// and is skipped, so repeated "previous" presses keep moving backwards.
#[derive(Clone, Copy, Debug)]
pub struct MarkerNavigator<'a> {
    markers: &'a [Marker],
    epsilon: f64,
}

impl<'a> MarkerNavigator<'a> {
    pub const DEFAULT_EPSILON: f64 = 0.01;

    pub fn new(markers: &'a [Marker]) -> Self {
        Self {
            markers,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Marker with the greatest time strictly before `current - epsilon`
    pub fn previous(&self, current: f64) -> Option<&'a Marker> {
        let limit = current - self.epsilon;
        self.markers
            .iter()
            .filter(|m| m.time < limit)
            .max_by(|a, b| a.time.total_cmp(&b.time))
    }

    /// Marker with the smallest time strictly after `current + epsilon`
    pub fn next(&self, current: f64) -> Option<&'a Marker> {
        let limit = current + self.epsilon;
        self.markers
            .iter()
            .filter(|m| m.time > limit)
            .min_by(|a, b| a.time.total_cmp(&b.time))
    }

    /// Seek target for "previous": the previous marker's time, or the start
    pub fn previous_target(&self, current: f64) -> f64 {
        self.previous(current).map_or(0.0, |m| m.time)
    }

    /// Seek target for "next", if there is one
    pub fn next_target(&self, current: f64) -> Option<f64> {
        self.next(current).map(|m| m.time)
    }

    pub fn find(&self, id: &str) -> Option<&'a Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Markers in time order
    pub fn sorted(&self) -> Vec<&'a Marker> {
        let mut sorted: Vec<&Marker> = self.markers.iter().collect();
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
        sorted
    }
}
