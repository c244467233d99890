//! Per-frame resolution of a scene

use bfx_animation::sample_keyframes;
use bfx_core::{Properties, PropertyValue};
use bfx_scene::{ElementKind, Scene};
use serde::{Deserialize, Serialize};

/// An active element with its properties resolved for one point in time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub content: serde_json::Value,
    pub layer: i32,
    pub properties: Properties,
}

impl ResolvedElement {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Numeric property, if present and a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(PropertyValue::as_number)
    }
}

/// Render state of a whole scene at one point in normalized time
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    /// Normalized time the frame was computed for
    pub time: f64,
    /// Active elements, ascending by layer
    pub elements: Vec<ResolvedElement>,
}

impl FrameState {
    /// A frame with no active elements
    pub fn empty(time: f64) -> Self {
        Self {
            time,
            elements: Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element ids in paint order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.id.as_str())
    }
}

/// Resolve every active element of `scene` at normalized time `t`.
///
/// Pure: the same scene and `t` always give the same frame. Elements outside
/// their enter/exit window are cut, not faded. Equal layers keep declaration
/// order.
pub fn compute_frame(scene: &Scene, t: f64) -> FrameState {
    let mut elements: Vec<ResolvedElement> = scene
        .elements
        .iter()
        .filter(|element| element.is_active(t))
        .filter_map(|element| {
            let properties = sample_keyframes(&element.keyframes, t)?;
            Some(ResolvedElement {
                id: element.id.clone(),
                kind: element.kind,
                content: element.content.clone(),
                layer: element.layer,
                properties,
            })
        })
        .collect();

    elements.sort_by_key(|e| e.layer);

    FrameState { time: t, elements }
}
