//! Scene loading and structural validation

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, SceneError};
use crate::model::Scene;

/// Outcome of a load that must not abort the host
#[derive(Clone, Debug)]
pub enum SceneLoad {
    /// Scene parsed and validated
    Ready(Arc<Scene>),
    /// Scene could not be loaded; hosts show fallback text instead of playing
    Unavailable { reason: String },
}

impl SceneLoad {
    pub fn is_ready(&self) -> bool {
        matches!(self, SceneLoad::Ready(_))
    }

    pub fn scene(&self) -> Option<&Arc<Scene>> {
        match self {
            SceneLoad::Ready(scene) => Some(scene),
            SceneLoad::Unavailable { .. } => None,
        }
    }
}

/// Parses and validates scene documents
pub struct SceneLoader;

impl SceneLoader {
    /// Parse and validate a scene from a JSON string
    pub fn from_json_str(json: &str) -> Result<Scene> {
        let scene: Scene = serde_json::from_str(json)?;
        Self::validate(&scene)?;
        Ok(scene)
    }

    /// Parse and validate a scene from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Scene> {
        let scene: Scene = serde_json::from_reader(reader)?;
        Self::validate(&scene)?;
        Ok(scene)
    }

    /// Read, parse and validate a scene file
    pub fn from_path(path: &Path) -> Result<Scene> {
        let content = fs::read_to_string(path)?;
        let scene = Self::from_json_str(&content)?;
        tracing::debug!(
            "Loaded scene '{}' from {} ({} elements, {} markers)",
            scene.title,
            path.display(),
            scene.elements.len(),
            scene.markers.len()
        );
        Ok(scene)
    }

    /// Load a scene file, reporting any failure as [`SceneLoad::Unavailable`]
    pub fn load_or_unavailable(path: &Path) -> SceneLoad {
        match Self::from_path(path) {
            Ok(scene) => SceneLoad::Ready(Arc::new(scene)),
            Err(e) => {
                tracing::warn!("Scene {} unavailable: {}", path.display(), e);
                SceneLoad::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Check the structural invariants of a scene.
    ///
    /// Reports the first offending element or marker; the scene itself is
    /// never modified.
    pub fn validate(scene: &Scene) -> Result<()> {
        if !(scene.duration.is_finite() && scene.duration > 0.0) {
            return Err(SceneError::InvalidDuration(scene.duration));
        }

        let mut seen = HashSet::with_capacity(scene.elements.len());

        for element in &scene.elements {
            if !seen.insert(element.id.as_str()) {
                return Err(SceneError::DuplicateElement {
                    element_id: element.id.clone(),
                });
            }

            if element.keyframes.is_empty() {
                return Err(SceneError::NoKeyframes {
                    element_id: element.id.clone(),
                });
            }

            if element.enter > element.exit {
                return Err(SceneError::InvertedWindow {
                    element_id: element.id.clone(),
                    enter: element.enter,
                    exit: element.exit,
                });
            }

            if !in_unit_range(element.enter) || !in_unit_range(element.exit) {
                return Err(SceneError::WindowOutOfRange {
                    element_id: element.id.clone(),
                    enter: element.enter,
                    exit: element.exit,
                });
            }

            if let Some(kf) = element.keyframes.iter().find(|kf| !in_unit_range(kf.time)) {
                return Err(SceneError::KeyframeOutOfRange {
                    element_id: element.id.clone(),
                    time: kf.time,
                });
            }
        }

        if let Some(marker) = scene.markers.iter().find(|m| !in_unit_range(m.time)) {
            return Err(SceneError::MarkerOutOfRange {
                marker_id: marker.id.clone(),
                time: marker.time,
            });
        }

        Ok(())
    }
}

#[inline]
fn in_unit_range(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}
