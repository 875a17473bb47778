//! Versioned mapping table: form fields -> template target slots.
//!
//! The template evolved through several layout revisions, each with its own
//! coordinates and field names. A mapping table is pinned to the revision it
//! was measured against; a divergent template gets a new table id instead of
//! silent edits to this one.

/// Identifier of a mapping-table revision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MappingTableId {
    /// Fifth revision; matches the template currently shipped.
    V5Current,
}

/// A drawn-mark target, in distance-from-top coordinates.
///
/// `y_from_top` is measured from the top edge of the page; it must be
/// converted with `y_doc = page_height - y_from_top` before any drawing, as
/// the document coordinate space is bottom-left-origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkPoint {
    pub x: f32,
    pub y_from_top: f32,
}

/// Named target slots for one template revision.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
    pub id: MappingTableId,

    // Identification
    pub store_code: &'static str,
    pub pdv: &'static str,
    pub fsa: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub requester_name: &'static str,

    // Equipment
    pub serial: &'static str,
    pub asset_tag: &'static str,
    pub brand: &'static str,
    pub model: &'static str,

    // Swap block
    pub swap_origin: &'static str,
    pub swap_serial: &'static str,
    pub swap_brand: &'static str,
    pub swap_model: &'static str,

    // Misuse verdict (checkbox area has no native fields on this revision)
    pub misuse_yes: MarkPoint,
    pub misuse_no: MarkPoint,
    pub mark_size: f32,

    // Narratives (numbered line fields, top to bottom)
    pub observation_rows: &'static [&'static str],
    pub defect_rows: &'static [&'static str],
    pub diagnostics_rows: &'static [&'static str],
    pub solution_rows: &'static [&'static str],
    pub narrative_size: f32,
    pub narrative_width: f32,

    // Outcome
    pub resolved_yes: &'static str,
    pub resolved_no: &'static str,
    pub unresolved_reason: &'static str,
    pub return_yes: &'static str,
    pub return_no: &'static str,

    // Times
    pub start_hour: &'static str,
    pub end_hour: &'static str,
    pub date: &'static str,

    // Sign-off
    pub client_name: &'static str,
    pub client_document: &'static str,
    pub client_phone: &'static str,
    pub provider_name: &'static str,
    pub provider_document: &'static str,
    pub provider_phone: &'static str,
}

/// The authoritative table for the current template revision.
pub const V5_CURRENT: MappingTable = MappingTable {
    id: MappingTableId::V5Current,

    store_code: "CódigodaLoja",
    pdv: "PDV",
    fsa: "FSA",
    address: "Endereço",
    city: "Cidade",
    state: "UF",
    requester_name: "Nomedosolicitante",

    serial: "Serial",
    asset_tag: "Patrimonio",
    brand: "Marca",
    model: "Modelo",

    swap_origin: "Origem",
    swap_serial: "SerialNovo",
    swap_brand: "MarcaNovo",
    swap_model: "ModeloNovo",

    misuse_yes: MarkPoint { x: 407.0, y_from_top: 322.0 },
    misuse_no: MarkPoint { x: 480.0, y_from_top: 322.0 },
    mark_size: 12.0,

    observation_rows: &["Row1", "Row2", "Row3"],
    defect_rows: &["DefeitoProblemaRow1", "DefeitoProblemaRow2"],
    diagnostics_rows: &[
        "DiagnósticoTestesrealizadosRow1",
        "DiagnósticoTestesrealizadosRow2",
        "DiagnósticoTestesrealizadosRow3",
        "DiagnósticoTestesrealizadosRow4",
    ],
    solution_rows: &["SoluçãoRow1"],
    narrative_size: 9.0,
    narrative_width: 420.0,

    resolved_yes: "SimProblemaresolvido",
    resolved_no: "NãoProblemaresolvido",
    unresolved_reason: "Motivo",
    return_yes: "SimHaveráretorno",
    return_no: "NãoHaveráretorno",

    start_hour: "Horainício",
    end_hour: "Horatérmino",
    date: "DATA",

    client_name: "NOMELEGÍVEL",
    client_document: "RGOUMATRÍCULA",
    client_phone: "TELEFONE",
    provider_name: "NOMELEGÍVEL_2",
    provider_document: "MATRÍCULA",
    provider_phone: "TELEFONE_2",
};

impl MappingTable {
    /// Table matching the template currently shipped.
    pub fn current() -> &'static MappingTable {
        &V5_CURRENT
    }
}
