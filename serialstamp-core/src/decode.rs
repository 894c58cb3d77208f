//! Decoder - Document Text to Canonical Specification
//!
//! Decoding never fails outwardly. A document that does not parse yields the
//! reference default; a field of the wrong shape yields that field's default
//! while its siblings decode normally.

use toml::{Table, Value};

use crate::coerce::{
    as_int, as_int_tuple2, as_optional_string, as_string, as_tuple2, normalize_color,
    normalize_gap, normalize_margin,
};
use crate::defaults;
use crate::spec::{Layout, OutputSpec, Specification, TextSpec};

/// Parse document text into its raw key-value tree.
pub fn parse_document(text: &str) -> Result<Table, toml::de::Error> {
    text.parse::<Table>()
}

/// Decode document text into a fully-defaulted specification.
pub fn decode(text: &str) -> Specification {
    match parse_document(text) {
        Ok(root) => from_document(&root),
        Err(e) => {
            log::warn!("spec document is not valid TOML, using defaults: {}", e);
            defaults::reference().clone()
        }
    }
}

/// Map an already-parsed document tree onto the canonical model.
pub fn from_document(root: &Table) -> Specification {
    let d = defaults::reference();

    Specification {
        stack_size: as_int(root.get("stack-size"), d.stack_size),
        source_image: as_string(root.get("source-image"), &d.source_image),
        layout: decode_layout(table_at(root, "layout"), &d.layout),
        texts: decode_texts(root.get("texts")),
        params: root.get("params").cloned(),
        table: root.get("table").cloned(),
        output: OutputSpec {
            background_color: normalize_color(
                table_at(root, "output").and_then(|o| o.get("background-color")),
                &d.output.background_color,
            ),
        },
        background: normalize_color(root.get("background"), &d.background),
    }
}

fn table_at<'a>(root: &'a Table, key: &str) -> Option<&'a Table> {
    root.get(key).and_then(Value::as_table)
}

fn decode_layout(raw: Option<&Table>, d: &Layout) -> Layout {
    let field = |key: &str| raw.and_then(|t| t.get(key));
    Layout {
        grid_size: as_int_tuple2(field("grid-size"), d.grid_size),
        gap: normalize_gap(field("gap"), d.gap),
        margin: normalize_margin(field("margin"), d.margin),
    }
}

fn decode_texts(raw: Option<&Value>) -> Vec<TextSpec> {
    match raw.and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries.iter().map(decode_text).collect(),
        _ => {
            log::debug!("no texts in spec document, using default text list");
            defaults::reference().texts.clone()
        }
    }
}

fn decode_text(raw: &Value) -> TextSpec {
    let d = defaults::reference_text();
    let entry = raw.as_table();
    let field = |key: &str| entry.and_then(|t| t.get(key));

    TextSpec {
        template: as_string(field("template"), &d.template),
        position: as_tuple2(field("position"), d.position),
        ttf: as_optional_string(field("ttf")),
        size: as_int(field("size"), d.size),
        color: normalize_color(field("color"), &d.color),
    }
}
