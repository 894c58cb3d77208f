//! Encoder - Canonical Specification to Document Text
//!
//! Structural inverse of `decode`. Optional fields are left out of the
//! document when absent; required fields are always written.

use toml::{Table, Value};

use crate::spec::{Color, Gap, Layout, Margin, Specification, TextSpec};

/// Serialize a specification to document text.
pub fn encode(spec: &Specification) -> String {
    to_document(spec).to_string()
}

/// Build the raw document tree for a specification.
pub fn to_document(spec: &Specification) -> Table {
    let mut doc = Table::new();
    doc.insert("stack-size".into(), Value::Integer(spec.stack_size));
    doc.insert("source-image".into(), Value::String(spec.source_image.clone()));
    doc.insert("background".into(), color_value(&spec.background));
    doc.insert("layout".into(), Value::Table(layout_table(&spec.layout)));
    doc.insert(
        "texts".into(),
        Value::Array(spec.texts.iter().map(|t| Value::Table(text_table(t))).collect()),
    );
    if let Some(params) = &spec.params {
        doc.insert("params".into(), params.clone());
    }
    if let Some(table) = &spec.table {
        doc.insert("table".into(), table.clone());
    }

    let mut output = Table::new();
    output.insert(
        "background-color".into(),
        color_value(&spec.output.background_color),
    );
    doc.insert("output".into(), Value::Table(output));
    doc
}

fn layout_table(layout: &Layout) -> Table {
    let mut t = Table::new();
    t.insert(
        "grid-size".into(),
        Value::Array(layout.grid_size.iter().copied().map(Value::Integer).collect()),
    );
    let gap = match layout.gap {
        Gap::Uniform(g) => Value::Float(g),
        Gap::Axes(pair) => floats(&pair),
    };
    t.insert("gap".into(), gap);
    let margin = match layout.margin {
        Margin::Uniform(m) => Value::Float(m),
        Margin::Axes(pair) => floats(&pair),
        Margin::Sides(sides) => floats(&sides),
    };
    t.insert("margin".into(), margin);
    t
}

fn text_table(text: &TextSpec) -> Table {
    let mut t = Table::new();
    t.insert("template".into(), Value::String(text.template.clone()));
    t.insert("position".into(), floats(&text.position));
    if let Some(ttf) = &text.ttf {
        t.insert("ttf".into(), Value::String(ttf.clone()));
    }
    t.insert("size".into(), Value::Integer(text.size));
    t.insert("color".into(), color_value(&text.color));
    t
}

fn color_value(color: &Color) -> Value {
    match color {
        Color::Named(name) => Value::String(name.clone()),
        Color::Rgb(c) => ints(c),
        Color::Rgba(c) => ints(c),
    }
}

fn floats(xs: &[f64]) -> Value {
    Value::Array(xs.iter().copied().map(Value::Float).collect())
}

fn ints(xs: &[i64]) -> Value {
    Value::Array(xs.iter().copied().map(Value::Integer).collect())
}
