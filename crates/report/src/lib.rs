//! `fieldserve-report` — RAT form model and document field mapper.
//!
//! Translates a structured service-visit record into positioned text and
//! marks on the fixed-layout RAT template. The mapping pass is a pure
//! function producing [`render::RenderOp`]s; the PDF pass applies them with
//! `lopdf` and flattens the result.

pub mod filename;
pub mod form;
pub mod mapping;
pub mod metrics;
pub mod pdf;
pub mod render;
pub mod text;

pub use filename::{build_filename, sanitize_part};
pub use form::RatFormData;
pub use mapping::{MappingTable, MappingTableId};
pub use pdf::render;
pub use render::{RenderOp, build_render_ops, invert_y};
