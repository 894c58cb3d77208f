//! SerialStamp Core - Stamp Specification Engine
//!
//! A stamp specification describes a source image, a grid layout and the
//! templated text overlays (serial numbers, codes) printed onto each copy.
//!
//! # Guarantees
//! 1. Decoding never fails; malformed fields fall back to defaults one by one
//! 2. Encoding never fails and omits absent optional fields
//! 3. `decode(encode(spec)) == spec` for every well-shaped spec
//! 4. `params` and `table` pass through untouched

pub mod coerce;
pub mod spec;
pub mod defaults;
pub mod decode;
pub mod encode;
pub mod params;
pub mod template;
pub mod stack;
pub mod workspace;

pub use spec::{Color, Gap, Layout, Margin, OutputSpec, Specification, TextSpec};
pub use decode::{decode, parse_document};
pub use encode::{encode, to_document};
pub use params::{Param, ParamError};
pub use template::replace_vars;
pub use stack::{StackItems, StackPlan};
pub use workspace::{ResourceCategory, Workspace, WorkspaceError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SPEC_FILENAME: &str = "spec.toml";
