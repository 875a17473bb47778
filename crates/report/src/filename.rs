//! Download filename derivation for rendered reports.

use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::form::RatFormData;

/// Sanitize one filename part to a safe charset.
///
/// Diacritics are stripped (NFD, combining marks dropped), anything outside
/// `[a-z0-9-]` collapses to a single `-`, edges are trimmed. Idempotent:
/// sanitizing a sanitized part yields the same string.
pub fn sanitize_part(value: &str) -> String {
    let stripped: String = value.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut out = String::with_capacity(stripped.len());
    let mut pending_sep = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Deterministic, collision-resistant filename for a rendered report:
/// `rat-<loja>-<pdv>-<fsa>-<YYYYMMDDTHHMMSS>.pdf`, empty parts dropped.
pub fn build_filename(form: &RatFormData, now: DateTime<Utc>) -> String {
    let mut parts = vec!["rat".to_string()];
    for raw in [&form.codigo_loja, &form.pdv, &form.fsa] {
        let part = sanitize_part(raw);
        if !part.is_empty() {
            parts.push(part);
        }
    }

    let timestamp = now.format("%Y%m%dT%H%M%S");
    format!("{}-{timestamp}.pdf", parts.join("-"))
}
