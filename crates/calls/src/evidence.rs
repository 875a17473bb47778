//! Plain-text evidence bundle summary for a call.

use crate::call::{MediaStatus, ServiceCall};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceSummary {
    pub filename: String,
    pub content: String,
}

/// Build the per-call evidence summary: one fact per line, then the media
/// checklist.
pub fn evidence_summary(call: &ServiceCall) -> EvidenceSummary {
    let mut lines = vec![
        format!("Chamado: {}", call.fsa()),
        format!("Loja: {}", call.store_code()),
    ];
    if let Some(pdv) = call.pdv() {
        lines.push(format!("PDV: {pdv}"));
    }
    lines.push(format!("Status: {}", call.status()));
    lines.push(format!(
        "Tempo total registrado: {} minutos",
        call.accumulated_minutes()
    ));
    lines.push("Checklist de mídias:".to_string());
    for (kind, entry) in call.media() {
        let state = match entry.status {
            MediaStatus::Uploaded => "ok",
            MediaStatus::Missing => "pendente",
        };
        lines.push(format!("- {}: {state}", kind.key()));
    }

    EvidenceSummary {
        filename: format!("FSA-{}_EVIDENCIAS.zip", call.fsa()),
        content: lines.join("\n"),
    }
}
