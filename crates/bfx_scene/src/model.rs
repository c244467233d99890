//! Scene document model

use bfx_animation::Keyframe;
use bfx_core::Color;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of content an element carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Code,
    Html,
}

/// A visual element with its keyframes and visibility window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Kind-specific payload, passed through to renderers untouched
    #[serde(default)]
    pub content: serde_json::Value,
    /// Keyframes ordered by time (ties allowed)
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    /// Normalized time the element becomes eligible to render
    #[serde(default)]
    pub enter: f64,
    /// Normalized time the element stops being eligible to render
    #[serde(default = "default_exit")]
    pub exit: f64,
    /// Paint order, lowest first
    #[serde(default)]
    pub layer: i32,
}

fn default_exit() -> f64 {
    1.0
}

impl Element {
    /// Create an element visible for the whole scene
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            content: serde_json::Value::Null,
            keyframes: Vec::new(),
            enter: 0.0,
            exit: 1.0,
            layer: 0,
        }
    }

    /// Builder: set the content payload
    pub fn with_content(mut self, content: impl Into<serde_json::Value>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder: append a keyframe
    pub fn with_keyframe(mut self, keyframe: Keyframe) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    /// Builder: set the enter/exit window
    pub fn with_window(mut self, enter: f64, exit: f64) -> Self {
        self.enter = enter;
        self.exit = exit;
        self
    }

    /// Builder: set the layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Whether `t` falls inside the enter/exit window (both ends inclusive)
    pub fn is_active(&self, t: f64) -> bool {
        t >= self.enter && t <= self.exit
    }
}

/// A named seek target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Normalized time (0.0 to 1.0)
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Marker {
    pub fn new(id: impl Into<String>, name: impl Into<String>, time: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            time,
            color: None,
        }
    }

    /// Builder: set the display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Root scene document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Length of a playthrough in seconds
    pub duration: f64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_background() -> String {
    "#000000".to_string()
}

impl Scene {
    /// Create an empty scene with the given title and duration in seconds
    pub fn new(title: impl Into<String>, duration: f64) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            duration,
            width: default_width(),
            height: default_height(),
            background: default_background(),
            elements: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Builder: add an element
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Builder: add a marker
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration * 1000.0
    }

    /// Convert normalized time to seconds
    pub fn seconds_at(&self, t: f64) -> f64 {
        t * self.duration
    }

    /// Convert seconds to normalized time (unclamped)
    pub fn normalized_at(&self, seconds: f64) -> f64 {
        seconds / self.duration
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Background as a color, if it is a `#RRGGBB` string
    pub fn background_color(&self) -> Option<Color> {
        Color::parse_hex(&self.background)
    }

    /// Serialize back to the scene JSON format
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "duration": 12,
                "elements": [
                    { "id": "title", "type": "text", "keyframes": [{ "time": 0 }] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.width, 1920);
        assert_eq!(scene.height, 1080);
        assert_eq!(scene.background_color(), Some(Color::BLACK));
        assert!(scene.markers.is_empty());

        let title = scene.element("title").unwrap();
        assert_eq!(title.kind, ElementKind::Text);
        assert_eq!(title.enter, 0.0);
        assert_eq!(title.exit, 1.0);
        assert_eq!(title.layer, 0);
        assert!(title.content.is_null());
    }

    #[test]
    fn test_element_kind_names() {
        for (name, kind) in [
            ("text", ElementKind::Text),
            ("image", ElementKind::Image),
            ("shape", ElementKind::Shape),
            ("code", ElementKind::Code),
            ("html", ElementKind::Html),
        ] {
            let parsed: ElementKind = serde_json::from_str(&format!("\"{}\"", name)).unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(serde_json::from_str::<ElementKind>("\"video\"").is_err());
    }

    #[test]
    fn test_window_is_inclusive() {
        let e = Element::new("a", ElementKind::Shape).with_window(0.2, 0.4);
        assert!(!e.is_active(0.19));
        assert!(e.is_active(0.2));
        assert!(e.is_active(0.4));
        assert!(!e.is_active(0.41));
    }

    #[test]
    fn test_time_conversions() {
        let scene = Scene::new("demo", 30.0);
        assert_eq!(scene.duration_ms(), 30_000.0);
        assert_eq!(scene.seconds_at(0.5), 15.0);
        assert_eq!(scene.normalized_at(15.0), 0.5);
    }

    #[test]
    fn test_serializes_type_key() {
        let scene = Scene::new("demo", 5.0).with_element(
            Element::new("logo", ElementKind::Image)
                .with_content("logo.png")
                .with_keyframe(Keyframe::new(0.0).with("opacity", 1.0)),
        );
        let json = scene.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"image\""));

        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
