//! `fieldserve-app` — application context and orchestration.
//!
//! One [`AppContext`] is built at startup from a blob store handle; every
//! registry mutation is followed by a whole-snapshot save. The context
//! returns results/errors and leaves presentation (toasts, navigation) to
//! the caller.

pub mod context;
pub mod template;

pub use context::{AppContext, RenderedReport};
pub use template::{FileTemplateSource, StaticTemplateSource, TemplateSource};

/// Process-wide tracing/logging setup; call once at startup.
pub use fieldserve_observability::init as init_observability;
