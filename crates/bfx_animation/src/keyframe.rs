//! Keyframes and segment lookup
//!
//! A keyframe is a timestamped property snapshot plus the easing used to
//! approach it. Sampling a keyframe list at normalized time `t` finds the
//! segment around `t` and blends its two ends with the *incoming* keyframe's
//! easing.

use bfx_core::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::interpolate::interpolate_properties;

/// A single keyframe of a scene element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time position (0.0 to 1.0)
    pub time: f64,
    /// Property values at this keyframe
    #[serde(default)]
    pub properties: Properties,
    /// Easing function to use when transitioning TO this keyframe
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    /// Create an empty keyframe at the given time
    pub fn new(time: f64) -> Self {
        Self {
            time,
            properties: Properties::new(),
            easing: Easing::Linear,
        }
    }

    /// Builder: set a property value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder: set the incoming easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Where a point in time falls relative to a keyframe list
#[derive(Clone, Copy, Debug)]
pub enum Segment<'a> {
    /// Exactly on a keyframe, before the first or after the last:
    /// the keyframe's properties apply verbatim
    Hold(&'a Keyframe),
    /// Strictly between two keyframes
    Between {
        before: &'a Keyframe,
        after: &'a Keyframe,
    },
}

impl<'a> Segment<'a> {
    /// Locate `t` within `keyframes`.
    ///
    /// `before` is the keyframe with the greatest time `<= t` (the last one
    /// on ties) and `after` the one with the smallest time `>= t` (the first
    /// one on ties). Returns `None` for an empty list.
    pub fn locate(keyframes: &'a [Keyframe], t: f64) -> Option<Self> {
        let first = keyframes.first()?;

        let mut before: Option<&Keyframe> = None;
        let mut after: Option<&Keyframe> = None;

        for kf in keyframes {
            if kf.time <= t && before.map_or(true, |b| kf.time >= b.time) {
                before = Some(kf);
            }
            if kf.time >= t && after.map_or(true, |a| kf.time < a.time) {
                after = Some(kf);
            }
        }

        let Some(before) = before else {
            // t precedes every keyframe: no extrapolation
            return Some(Segment::Hold(first));
        };

        match after {
            Some(after) if after.time != before.time => Some(Segment::Between { before, after }),
            _ => Some(Segment::Hold(before)),
        }
    }

    /// Local progress (0.0 to 1.0) of `t` inside this segment, before easing
    pub fn progress(&self, t: f64) -> f64 {
        match self {
            Segment::Hold(_) => 0.0,
            Segment::Between { before, after } => (t - before.time) / (after.time - before.time),
        }
    }

    /// Resolve the property set at `t`
    pub fn resolve(&self, t: f64) -> Properties {
        match self {
            Segment::Hold(kf) => kf.properties.clone(),
            Segment::Between { before, after } => {
                let eased = after.easing.apply(self.progress(t));
                interpolate_properties(&before.properties, &after.properties, eased)
            }
        }
    }
}

/// Sample a keyframe list at normalized time `t`.
///
/// Returns `None` only when `keyframes` is empty.
pub fn sample_keyframes(keyframes: &[Keyframe], t: f64) -> Option<Properties> {
    Segment::locate(keyframes, t).map(|segment| segment.resolve(t))
}
