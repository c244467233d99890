//! Render sinks
//!
//! A sink receives every frame the player resolves, ordered by layer, and
//! turns it into draw calls or DOM updates. Sinks only read the frame.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::frame::FrameState;

/// Consumer of resolved frames
pub trait RenderSink {
    fn present(&mut self, frame: &FrameState);
}

impl<F> RenderSink for F
where
    F: FnMut(&FrameState),
{
    fn present(&mut self, frame: &FrameState) {
        self(frame)
    }
}

/// Sink that keeps every presented frame in memory.
///
/// Clones share storage: hand one clone to a player and read frames back
/// through another.
#[derive(Clone, Debug, Default)]
pub struct FrameCollector {
    frames: Arc<Mutex<Vec<FrameState>>>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// Most recently presented frame
    pub fn last(&self) -> Option<FrameState> {
        self.frames.lock().last().cloned()
    }

    /// Copy of all presented frames
    pub fn frames(&self) -> Vec<FrameState> {
        self.frames.lock().clone()
    }

    /// Remove and return all presented frames
    pub fn drain(&self) -> Vec<FrameState> {
        std::mem::take(&mut *self.frames.lock())
    }
}

impl RenderSink for FrameCollector {
    fn present(&mut self, frame: &FrameState) {
        self.frames.lock().push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_shares_storage() {
        let collector = FrameCollector::new();
        let mut sink = collector.clone();

        sink.present(&FrameState::empty(0.25));
        sink.present(&FrameState::empty(0.5));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.last().map(|f| f.time), Some(0.5));

        let drained = collector.drain();
        assert_eq!(drained.len(), 2);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut times = Vec::new();
        {
            let mut sink = |frame: &FrameState| times.push(frame.time);
            sink.present(&FrameState::empty(0.1));
        }
        assert_eq!(times, vec![0.1]);
    }
}
