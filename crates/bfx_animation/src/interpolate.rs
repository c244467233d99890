//! Property interpolation between two keyframes

use bfx_core::{Color, Properties, PropertyValue};

/// Linear interpolation between two numbers
#[inline]
pub fn interpolate_number(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Blend two `#RRGGBB` strings channel by channel.
///
/// Returns `None` if either side is not a six-digit hex color.
pub fn interpolate_color(start: &str, end: &str, t: f64) -> Option<String> {
    let a = Color::parse_hex(start)?;
    let b = Color::parse_hex(end)?;
    Some(a.lerp(&b, t).to_hex())
}

/// Interpolate a single property value at eased progress `t`.
///
/// Numbers lerp, hex colors blend per channel, anything else steps: the start
/// value holds while `t < 0.5`.
pub fn interpolate_value(start: &PropertyValue, end: &PropertyValue, t: f64) -> PropertyValue {
    match (start, end) {
        (PropertyValue::Number(a), PropertyValue::Number(b)) => {
            PropertyValue::Number(interpolate_number(*a, *b, t))
        }
        (PropertyValue::Text(a), PropertyValue::Text(b)) => match interpolate_color(a, b, t) {
            Some(hex) => PropertyValue::Text(hex),
            None => step(start, end, t),
        },
        _ => step(start, end, t),
    }
}

#[inline]
fn step(start: &PropertyValue, end: &PropertyValue, t: f64) -> PropertyValue {
    if t < 0.5 {
        start.clone()
    } else {
        end.clone()
    }
}

/// Interpolate two property sets over the union of their keys.
///
/// Keys missing on one side count as the number `0`. The result lists the
/// start keys first, then keys only present at the end.
pub fn interpolate_properties(start: &Properties, end: &Properties, t: f64) -> Properties {
    let mut out = Properties::with_capacity(start.len().max(end.len()));

    let keys = start
        .keys()
        .chain(end.keys().filter(|k| !start.contains_key(k.as_str())));

    for key in keys {
        let a = start.get(key).unwrap_or(&PropertyValue::ZERO);
        let b = end.get(key).unwrap_or(&PropertyValue::ZERO);

        if a.kind() != b.kind() {
            tracing::debug!(
                "Property '{}' changes type ({} -> {}), stepping instead of blending",
                key,
                a.kind(),
                b.kind()
            );
        }

        out.insert(key.clone(), interpolate_value(a, b, t));
    }

    out
}
