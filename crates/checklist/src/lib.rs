//! `fieldserve-checklist` — guided troubleshooting checklist and offline
//! knowledge base.
//!
//! The checklist is a static directed graph of question nodes and terminal
//! resolutions. A [`ChecklistSession`] walks it one answer at a time; the
//! graph is validated once at load and never mutated afterwards (editable
//! copies live in the mutable store, not here).

pub mod data;
pub mod graph;
pub mod procedure;
pub mod session;

pub use data::{default_graph, default_procedures};
pub use graph::{ChecklistGraph, ChecklistNode, ChecklistOption};
pub use procedure::{Procedure, ProcedureLibrary};
pub use session::ChecklistSession;
