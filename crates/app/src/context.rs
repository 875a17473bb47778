//! The application context: explicit state, constructed once, passed around.

use chrono::Utc;

use fieldserve_calls::{
    BillingEstimate, CallRegistry, DayBucket, EvidenceSummary, MediaKind, MediaStatus, NewCall,
    calculate_billing, evidence_summary,
};
use fieldserve_checklist::{
    ChecklistGraph, ChecklistNode, ChecklistSession, Procedure, ProcedureLibrary, default_graph,
    default_procedures,
};
use fieldserve_core::{CallId, DomainResult};
use fieldserve_directory::{Directory, SearchHistory, StoreRecord, parse_directory};
use fieldserve_report::{MappingTable, RatFormData, build_filename, render};
use fieldserve_storage::{BlobStore, CallsSnapshot, keys, load_json_or, save_json};

use crate::template::TemplateSource;

/// A rendered report ready to hand to a download/share surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Application state for one local session.
///
/// Single writer: all mutations run synchronously on this object and persist
/// the affected snapshot before returning.
pub struct AppContext<S: BlobStore> {
    store: S,
    registry: CallRegistry,
    graph: ChecklistGraph,
    procedures: ProcedureLibrary,
    directory: Directory,
    history: SearchHistory,
}

impl<S: BlobStore> AppContext<S> {
    /// Build the context from persisted state.
    ///
    /// Edited data sets that fail to parse or validate fall back to the
    /// compiled-in defaults; only a broken compiled-in default is fatal.
    pub fn new(store: S) -> DomainResult<Self> {
        let registry = CallsSnapshot::load(&store, Utc::now());

        let default = default_graph()?;
        let graph = match store.get(keys::CHECKLIST) {
            Some(raw) => match parse_edited_flow(&raw) {
                Ok(graph) => graph,
                Err(e) => {
                    tracing::warn!("edited checklist unusable, using defaults: {e}");
                    default
                }
            },
            None => default,
        };

        let default_procs = default_procedures()?;
        let procedures = ProcedureLibrary::new(load_json_or(&store, keys::PROCEDURES, || {
            default_procs.clone()
        }));

        let history = load_json_or(&store, keys::SEARCH_HISTORY, SearchHistory::new);

        Ok(Self {
            store,
            registry,
            graph,
            procedures,
            directory: Directory::default(),
            history,
        })
    }

    fn persist_calls(&self) {
        CallsSnapshot::save(&self.store, &self.registry);
    }

    // --- Call registry -----------------------------------------------------

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    pub fn add_call(&mut self, new: NewCall) -> DomainResult<CallId> {
        let id = self.registry.add_call(new, Utc::now())?;
        self.persist_calls();
        Ok(id)
    }

    pub fn remove_call(&mut self, id: CallId) -> DomainResult<()> {
        self.registry.remove_call(id)?;
        self.persist_calls();
        Ok(())
    }

    pub fn update_media(
        &mut self,
        id: CallId,
        kind: MediaKind,
        status: MediaStatus,
        payload: Option<String>,
    ) -> DomainResult<()> {
        self.registry.update_media(id, kind, status, payload)?;
        self.persist_calls();
        Ok(())
    }

    pub fn start_timer(&mut self, id: CallId) -> DomainResult<()> {
        self.registry.start_timer(id, Utc::now())?;
        self.persist_calls();
        Ok(())
    }

    pub fn stop_timer(&mut self, id: CallId) -> DomainResult<u64> {
        let minutes = self.registry.stop_timer(id, Utc::now())?;
        self.persist_calls();
        Ok(minutes)
    }

    pub fn reset_timer(&mut self, id: CallId) -> DomainResult<()> {
        self.registry.reset_timer(id)?;
        self.persist_calls();
        Ok(())
    }

    pub fn complete_call(&mut self, id: CallId) -> DomainResult<()> {
        self.registry.complete_call(id, Utc::now())?;
        self.persist_calls();
        Ok(())
    }

    pub fn archive_completed(&mut self) -> usize {
        let archived = self.registry.archive_completed();
        if archived > 0 {
            self.persist_calls();
        }
        archived
    }

    pub fn grouped_calls(&self) -> Vec<DayBucket> {
        self.registry.grouped()
    }

    /// Billing estimate over everything not yet archived.
    pub fn billing_estimate(&self) -> BillingEstimate {
        calculate_billing(self.registry.active_calls().len())
    }

    pub fn evidence_for(&self, id: CallId) -> DomainResult<EvidenceSummary> {
        let call = self
            .registry
            .call(id)
            .ok_or(fieldserve_core::DomainError::NotFound)?;
        Ok(evidence_summary(call))
    }

    // --- Checklist ---------------------------------------------------------

    pub fn checklist(&self) -> &ChecklistGraph {
        &self.graph
    }

    /// Start a guided walk over the active flow.
    pub fn checklist_session(&self) -> ChecklistSession<'_> {
        ChecklistSession::start(&self.graph)
    }

    /// Replace the active flow with an edited copy (validated first).
    pub fn save_flow(&mut self, nodes: Vec<ChecklistNode>) -> DomainResult<()> {
        let graph = ChecklistGraph::from_nodes(ChecklistGraph::ENTRY, nodes.clone())?;
        save_json(&self.store, keys::CHECKLIST, &nodes);
        self.graph = graph;
        Ok(())
    }

    /// Drop the edited flow and return to the compiled-in default.
    pub fn reset_flow(&mut self) -> DomainResult<()> {
        self.store.remove(keys::CHECKLIST);
        self.graph = default_graph()?;
        Ok(())
    }

    // --- Knowledge base ----------------------------------------------------

    pub fn procedures(&self) -> &ProcedureLibrary {
        &self.procedures
    }

    pub fn search_procedures(&self, term: &str) -> Vec<&Procedure> {
        self.procedures.search(term)
    }

    pub fn upsert_procedure(&mut self, procedure: Procedure) -> DomainResult<()> {
        self.procedures.upsert(procedure)?;
        save_json(&self.store, keys::PROCEDURES, &self.procedures.all());
        Ok(())
    }

    pub fn remove_procedure(&mut self, id: &str) -> DomainResult<()> {
        self.procedures.remove(id)?;
        save_json(&self.store, keys::PROCEDURES, &self.procedures.all());
        Ok(())
    }

    pub fn reset_procedures(&mut self) -> DomainResult<()> {
        self.store.remove(keys::PROCEDURES);
        self.procedures = ProcedureLibrary::new(default_procedures()?);
        Ok(())
    }

    // --- IP directory ------------------------------------------------------

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Load (replace) the directory from a spreadsheet export.
    pub fn load_directory(&mut self, text: &str) -> DomainResult<usize> {
        let records = parse_directory(text)?;
        let count = records.len();
        self.directory = Directory::new(records);
        Ok(count)
    }

    /// Look a store up and record the hit in the bounded history.
    pub fn lookup_store(&mut self, query: &str) -> DomainResult<StoreRecord> {
        let record = self.directory.lookup(query)?.clone();
        self.history.push(record.clone(), Utc::now());
        save_json(&self.store, keys::SEARCH_HISTORY, &self.history);
        Ok(record)
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn clear_search_history(&mut self) {
        self.history.clear();
        self.store.remove(keys::SEARCH_HISTORY);
    }

    // --- Report ------------------------------------------------------------

    /// Render the RAT for a filled form.
    ///
    /// Template fetch and rendering are the only async operations in the
    /// core; a second submission while one is in flight is the caller's
    /// concern (disable the submit control).
    pub async fn generate_report(
        &self,
        form: &RatFormData,
        source: &dyn TemplateSource,
    ) -> DomainResult<RenderedReport> {
        let template = source.fetch().await?;
        let bytes = render(&template, form, MappingTable::current())?;
        let filename = build_filename(form, Utc::now());
        tracing::info!(%filename, "report rendered");
        Ok(RenderedReport { filename, bytes })
    }
}

fn parse_edited_flow(raw: &str) -> DomainResult<ChecklistGraph> {
    let nodes: Vec<ChecklistNode> = serde_json::from_str(raw)
        .map_err(|e| fieldserve_core::DomainError::resource(format!("edited flow unreadable: {e}")))?;
    ChecklistGraph::from_nodes(ChecklistGraph::ENTRY, nodes)
}
