//! Parameter Kinds - Typed View of the `params` Passthrough
//!
//! The decoder keeps `params` as a raw document value. This module gives it a
//! meaning on demand, for whoever needs to enumerate stamp values.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::Value;

use crate::spec::Specification;

/// Variable bindings produced by one parameter value.
pub type Bindings = Vec<(String, String)>;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("{0} must be an array")]
    NotAnArray(&'static str),

    #[error("params[{index}] is not a recognised parameter: {source}")]
    Unrecognised {
        index: usize,
        #[source]
        source: toml::de::Error,
    },

    #[error("param '{name}' declares length {expected} but value {position} has {actual} entries")]
    LengthMismatch {
        name: String,
        expected: usize,
        position: usize,
        actual: usize,
    },

    #[error("table row {0} is not a table")]
    RowNotTable(usize),

    #[error("parameter combinations overflow")]
    TooManyItems,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntKind {
    #[serde(rename = "int")]
    Int,
    #[default]
    #[serde(rename = "integer")]
    Integer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringKind {
    #[default]
    #[serde(rename = "string")]
    String,
    #[serde(rename = "text")]
    Text,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringArrayKind {
    #[default]
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "text[]")]
    TextArray,
}

/// Integers enumerated explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IntParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: IntKind,
    pub values: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading_zeros: Option<usize>,
}

/// Every integer from `min` to `max`, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IntRangeParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: IntKind,
    pub min: i64,
    pub max: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading_zeros: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: StringKind,
    pub values: Vec<String>,
}

/// Fixed-length string tuples; binds `name[0]`, `name[1]`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringArrayParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: StringArrayKind,
    pub length: usize,
    pub values: Vec<Vec<String>>,
}

/// One entry of `params`. Ranges are tried before explicit integer lists so
/// that an entry carrying `min`/`max` is always a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    IntRange(IntRangeParam),
    Int(IntParam),
    StrArray(StringArrayParam),
    Str(StringParam),
}

impl Param {
    pub fn from_value(index: usize, value: &Value) -> Result<Self, ParamError> {
        let param = value
            .clone()
            .try_into::<Param>()
            .map_err(|source| ParamError::Unrecognised { index, source })?;

        if let Param::StrArray(p) = &param {
            let bad = p
                .values
                .iter()
                .enumerate()
                .find(|(_, v)| v.len() != p.length);
            if let Some((position, v)) = bad {
                return Err(ParamError::LengthMismatch {
                    name: p.name.clone(),
                    expected: p.length,
                    position,
                    actual: v.len(),
                });
            }
        }
        Ok(param)
    }

    /// Document form of this parameter, as it would appear under `params`.
    pub fn to_value(&self) -> Result<Value, toml::ser::Error> {
        Value::try_from(self)
    }

    pub fn name(&self) -> &str {
        match self {
            Param::IntRange(p) => &p.name,
            Param::Int(p) => &p.name,
            Param::StrArray(p) => &p.name,
            Param::Str(p) => &p.name,
        }
    }

    pub fn value_count(&self) -> usize {
        match self {
            Param::IntRange(p) => {
                if p.max < p.min {
                    0
                } else {
                    usize::try_from(p.max.abs_diff(p.min))
                        .map_or(usize::MAX, |d| d.saturating_add(1))
                }
            }
            Param::Int(p) => p.values.len(),
            Param::StrArray(p) => p.values.len(),
            Param::Str(p) => p.values.len(),
        }
    }

    /// Bindings contributed by the `index`th value, or `None` past the end.
    pub fn bindings_at(&self, index: usize) -> Option<Bindings> {
        if index >= self.value_count() {
            return None;
        }
        let bindings = match self {
            Param::IntRange(p) => {
                let value = p.min.checked_add_unsigned(index as u64)?;
                vec![(p.name.clone(), render_int(value, p.leading_zeros))]
            }
            Param::Int(p) => vec![(p.name.clone(), render_int(p.values[index], p.leading_zeros))],
            Param::Str(p) => vec![(p.name.clone(), p.values[index].clone())],
            Param::StrArray(p) => p.values[index]
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("{}[{}]", p.name, i), s.clone()))
                .collect(),
        };
        Some(bindings)
    }
}

/// Zero-pad to `leading_zeros` digits when set and non-zero.
pub fn render_int(value: i64, leading_zeros: Option<usize>) -> String {
    match leading_zeros {
        Some(width) if width > 0 => format!("{:0width$}", value, width = width),
        _ => value.to_string(),
    }
}

/// Render a table cell the way it is substituted into a template.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Specification {
    /// Interpret the `params` passthrough. `Ok(None)` when there are no params.
    pub fn typed_params(&self) -> Result<Option<Vec<Param>>, ParamError> {
        let Some(raw) = &self.params else {
            return Ok(None);
        };
        let entries = raw.as_array().ok_or(ParamError::NotAnArray("params"))?;
        entries
            .iter()
            .enumerate()
            .map(|(i, v)| Param::from_value(i, v))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Interpret the `table` passthrough as rows of bindings.
    pub fn table_rows(&self) -> Result<Option<Vec<Bindings>>, ParamError> {
        let Some(raw) = &self.table else {
            return Ok(None);
        };
        let rows = raw.as_array().ok_or(ParamError::NotAnArray("table"))?;
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let row = row.as_table().ok_or(ParamError::RowNotTable(i))?;
                Ok(row.iter().map(|(k, v)| (k.clone(), render_cell(v))).collect())
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn params_of(src: &str) -> Vec<Param> {
        decode(src).typed_params().unwrap().unwrap()
    }

    #[test]
    fn test_range_with_leading_zeros() {
        let params = params_of(
            r#"
            [[params]]
            name = "serial"
            type = "int"
            min = 8
            max = 11
            leading-zeros = 3
            "#,
        );
        let p = &params[0];
        assert!(matches!(p, Param::IntRange(r) if r.kind == IntKind::Int));
        assert_eq!(p.value_count(), 4);
        assert_eq!(p.bindings_at(0), Some(vec![("serial".to_string(), "008".to_string())]));
        assert_eq!(p.bindings_at(3), Some(vec![("serial".to_string(), "011".to_string())]));
        assert_eq!(p.bindings_at(4), None);
    }

    #[test]
    fn test_kinds_resolved_without_type() {
        let params = params_of(
            r#"
            [[params]]
            name = "n"
            values = [3, 1]

            [[params]]
            name = "s"
            values = ["a", "b", "c"]

            [[params]]
            name = "pair"
            length = 2
            values = [["x", "y"]]
            "#,
        );
        assert!(matches!(&params[0], Param::Int(p) if p.kind == IntKind::Integer));
        assert!(matches!(&params[1], Param::Str(p) if p.kind == StringKind::String));
        assert!(matches!(&params[2], Param::StrArray(_)));
        assert_eq!(params[1].value_count(), 3);
        assert_eq!(
            params[2].bindings_at(0),
            Some(vec![
                ("pair[0]".to_string(), "x".to_string()),
                ("pair[1]".to_string(), "y".to_string()),
            ])
        );
    }

    #[test]
    fn test_text_aliases() {
        let params = params_of(
            r#"
            [[params]]
            name = "s"
            type = "text"
            values = ["a"]

            [[params]]
            name = "t"
            type = "text[]"
            length = 1
            values = [["a"]]
            "#,
        );
        assert!(matches!(&params[0], Param::Str(p) if p.kind == StringKind::Text));
        assert!(matches!(&params[1], Param::StrArray(p) if p.kind == StringArrayKind::TextArray));
    }

    #[test]
    fn test_empty_range() {
        let params = params_of("params = [{ name = \"n\", min = 5, max = 4 }]");
        assert_eq!(params[0].value_count(), 0);
    }

    #[test]
    fn test_full_i64_range_past_midpoint() {
        let p = Param::IntRange(IntRangeParam {
            name: "n".to_string(),
            kind: IntKind::Integer,
            min: i64::MIN,
            max: i64::MAX,
            leading_zeros: None,
        });
        assert_eq!(p.bindings_at(0), Some(vec![("n".to_string(), i64::MIN.to_string())]));
        assert_eq!(p.bindings_at(1 << 63), Some(vec![("n".to_string(), "0".to_string())]));
    }

    #[test]
    fn test_string_array_length_checked() {
        let spec = decode(
            r#"
            [[params]]
            name = "pair"
            type = "string[]"
            length = 2
            values = [["a", "b"], ["c"]]
            "#,
        );
        let err = spec.typed_params().unwrap_err();
        assert!(matches!(err, ParamError::LengthMismatch { position: 1, actual: 1, .. }));
    }

    #[test]
    fn test_unrecognised_param() {
        let spec = decode("params = [{ name = \"n\", type = \"string\", values = [1, 2] }]");
        let err = spec.typed_params().unwrap_err();
        assert!(err.to_string().contains("params[0]"));
    }

    #[test]
    fn test_params_must_be_array() {
        let spec = decode("params = 3");
        assert!(matches!(spec.typed_params(), Err(ParamError::NotAnArray("params"))));
    }

    #[test]
    fn test_table_rows_render_cells() {
        let spec = decode(
            r#"
            [[table]]
            who = "ada"
            seat = 12
            vip = true
            "#,
        );
        let rows = spec.table_rows().unwrap().unwrap();
        assert_eq!(
            rows[0],
            vec![
                ("who".to_string(), "ada".to_string()),
                ("seat".to_string(), "12".to_string()),
                ("vip".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_value_round_trips() {
        let p = Param::IntRange(IntRangeParam {
            name: "serial".to_string(),
            kind: IntKind::Integer,
            min: 1,
            max: 10,
            leading_zeros: Some(2),
        });
        let v = p.to_value().unwrap();
        assert_eq!(v.get("leading-zeros").and_then(Value::as_integer), Some(2));
        assert_eq!(Param::from_value(0, &v).unwrap(), p);
    }

    #[test]
    fn test_render_int() {
        assert_eq!(render_int(7, None), "7");
        assert_eq!(render_int(7, Some(0)), "7");
        assert_eq!(render_int(7, Some(3)), "007");
        assert_eq!(render_int(-5, Some(3)), "-05");
    }
}
