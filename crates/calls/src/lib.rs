//! `fieldserve-calls` — field-service call tracking.
//!
//! A [`CallRegistry`] is an explicit store object: constructed once at
//! application start (or fresh per test), mutated synchronously by discrete
//! user actions, persisted as a whole snapshot by the caller after every
//! mutation.

pub mod billing;
pub mod call;
pub mod evidence;
pub mod registry;

pub use billing::{BillingEstimate, calculate_billing, time_overrun_fee_cents};
pub use call::{CallStatus, MediaEntry, MediaKind, MediaStatus, ServiceCall};
pub use evidence::{EvidenceSummary, evidence_summary};
pub use registry::{CallRegistry, DayBucket, NewCall, StoreBucket};
