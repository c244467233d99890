//! Easing functions for keyframe segments

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned by [`Easing::from_str`] for an unrecognized curve name
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("Unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

/// Easing function type
///
/// Scene documents refer to curves by name (`"ease-in-out"`); unknown names
/// deserialize as [`Easing::Linear`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Bounce,
    Elastic,
}

impl Easing {
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Bounce,
        Easing::Elastic,
    ];

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => 3.0 * t * t - 2.0 * t * t * t,
            // Quartic halves; not smooth at the midpoint.
            Easing::Bounce => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (1.0 - t).powi(4)
                }
            }
            Easing::Elastic => {
                // The raw formula does not hit 0 and 1 exactly
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    (13.0 * PI / 2.0 * t).sin() * 2f64.powf(10.0 * (t - 1.0))
                }
            }
        }
    }

    /// Name used in scene documents
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::Bounce => "bounce",
            Easing::Elastic => "elastic",
        }
    }

    /// Look up a curve by its scene-document name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Look up a curve by name, degrading to [`Easing::Linear`] with a warning
    pub fn from_name_or_linear(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown easing '{}', falling back to linear", name);
            Easing::Linear
        })
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_or_linear(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < TOLERANCE, "{} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < TOLERANCE, "{} at 1", easing);
        }
    }

    #[test]
    fn test_curve_values() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert!((Easing::EaseIn.apply(0.5) - 0.25).abs() < TOLERANCE);
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < TOLERANCE);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < TOLERANCE);
        assert!((Easing::EaseInOut.apply(0.25) - 0.15625).abs() < TOLERANCE);
        assert!((Easing::Bounce.apply(0.25) - 0.03125).abs() < TOLERANCE);
        assert!((Easing::Bounce.apply(0.75) - 0.96875).abs() < TOLERANCE);
    }

    #[test]
    fn test_bounce_halves_meet_at_midpoint() {
        assert!((Easing::Bounce.apply(0.5) - 0.5).abs() < TOLERANCE);
        let left = Easing::Bounce.apply(0.5 - 1e-6);
        assert!(left < 0.5);
    }

    #[test]
    fn test_elastic_interior() {
        let t = 0.9;
        let expected = (13.0 * PI / 2.0 * t).sin() * 2f64.powf(10.0 * (t - 1.0));
        assert!((Easing::Elastic.apply(t) - expected).abs() < TOLERANCE);
        assert_eq!(Easing::Elastic.apply(0.0), 0.0);
        assert_eq!(Easing::Elastic.apply(1.0), 1.0);
    }

    #[test]
    fn test_names_round_trip() {
        for easing in Easing::ALL {
            assert_eq!(easing.name().parse::<Easing>(), Ok(easing));
        }
        assert!("wobble".parse::<Easing>().is_err());
    }

    #[test]
    fn test_unknown_name_deserializes_as_linear() {
        let easing: Easing = serde_json::from_str("\"wobble\"").unwrap();
        assert_eq!(easing, Easing::Linear);

        let easing: Easing = serde_json::from_str("\"ease-out\"").unwrap();
        assert_eq!(easing, Easing::EaseOut);
    }

    #[test]
    fn test_serializes_by_name() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"ease-in-out\"");
    }
}
