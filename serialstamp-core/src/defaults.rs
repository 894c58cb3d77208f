//! Default Provider
//!
//! One canonical instance serves both as the seed for a new project and as
//! the per-field fallback source while decoding.

use std::sync::OnceLock;

use crate::spec::{Color, Gap, Layout, Margin, OutputSpec, Specification, TextSpec};

/// Seed document written into a freshly created workspace.
pub const DEFAULT_SPEC_TOML: &str = r#"stack-size = 1
source-image = ""

[layout]
grid-size = [1, 1]
gap = 0
margin = 0

[[texts]]
template = "Sample Text"
position = [10, 10]
size = 24
color = "black"
"#;

static REFERENCE: OnceLock<Specification> = OnceLock::new();

/// The baseline specification every decode falls back to.
pub fn reference() -> &'static Specification {
    REFERENCE.get_or_init(build)
}

/// The first default text entry; fallback source for every decoded text field.
pub fn reference_text() -> &'static TextSpec {
    // `build` always produces exactly one text entry.
    &reference().texts[0]
}

fn build() -> Specification {
    Specification {
        stack_size: 1,
        source_image: String::new(),
        layout: Layout {
            grid_size: [1, 1],
            gap: Gap::Uniform(0.0),
            margin: Margin::Uniform(0.0),
        },
        texts: vec![TextSpec {
            template: "Sample Text".to_string(),
            position: [10.0, 10.0],
            ttf: None,
            size: 24,
            color: Color::named("black"),
        }],
        params: None,
        table: None,
        output: OutputSpec {
            background_color: Color::named("white"),
        },
        background: Color::Rgb([255, 255, 255]),
    }
}
