//! Coercion Utilities - Total Conversions
//!
//! Each function takes a loosely-typed document value (`None` when the key is
//! missing) and a default, and always returns a value of the target shape.
//! A value of the wrong shape yields the default; nothing here fails.

use toml::Value;

use crate::spec::{Color, Gap, Margin};

/// Finite numeric value, integer or float.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) if f.is_finite() => Some(*f),
        _ => None,
    }
}

/// Finite numeric value truncated toward zero.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

/// Array of exactly `N` elements, each accepted by `f`.
fn fixed<T: Copy + Default, const N: usize>(
    value: Option<&Value>,
    f: impl Fn(&Value) -> Option<T>,
) -> Option<[T; N]> {
    let items = value?.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [T::default(); N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = f(item)?;
    }
    Some(out)
}

pub fn as_number(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(number).unwrap_or(default)
}

/// Like [`as_number`], truncated toward zero.
pub fn as_int(value: Option<&Value>, default: i64) -> i64 {
    value.and_then(integer).unwrap_or(default)
}

pub fn as_string(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// A non-empty string, otherwise `None`.
pub fn as_optional_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn as_tuple2(value: Option<&Value>, default: [f64; 2]) -> [f64; 2] {
    fixed(value, number).unwrap_or(default)
}

pub fn as_int_tuple2(value: Option<&Value>, default: [i64; 2]) -> [i64; 2] {
    fixed(value, integer).unwrap_or(default)
}

/// Strings pass through untouched; 3- and 4-element numeric arrays become
/// RGB / RGBA with each component truncated.
pub fn normalize_color(value: Option<&Value>, default: &Color) -> Color {
    if let Some(name) = value.and_then(Value::as_str) {
        return Color::Named(name.to_string());
    }
    if let Some(rgb) = fixed(value, integer) {
        return Color::Rgb(rgb);
    }
    if let Some(rgba) = fixed(value, integer) {
        return Color::Rgba(rgba);
    }
    default.clone()
}

pub fn normalize_gap(value: Option<&Value>, default: Gap) -> Gap {
    if let Some(g) = value.and_then(number) {
        return Gap::Uniform(g);
    }
    fixed(value, number).map(Gap::Axes).unwrap_or(default)
}

pub fn normalize_margin(value: Option<&Value>, default: Margin) -> Margin {
    if let Some(m) = value.and_then(number) {
        return Margin::Uniform(m);
    }
    if let Some(pair) = fixed(value, number) {
        return Margin::Axes(pair);
    }
    fixed(value, number).map(Margin::Sides).unwrap_or(default)
}
