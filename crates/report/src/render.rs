//! Mapping pass: form data + mapping table -> ordered render operations.
//!
//! Pure and deterministic; the PDF pass applies these without further
//! decisions.

use crate::form::RatFormData;
use crate::mapping::{MappingTable, MarkPoint};
use crate::text::{format_date_br, normalize_hour, shape_narrative};

/// One thing to do to the template.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Set a named interactive text field (selection-list fallback applies).
    SetField { name: String, value: String },
    /// Draw a glyph at page coordinates (bottom-left origin, already
    /// inverted).
    DrawMark {
        x: f32,
        y: f32,
        glyph: String,
        size: f32,
    },
}

/// Convert a distance-from-top coordinate into the page's bottom-left-origin
/// space.
pub fn invert_y(page_height: f32, y_from_top: f32) -> f32 {
    page_height - y_from_top
}

/// The code before the first `-` of an equipment-origin option value.
fn origin_code(value: &str) -> &str {
    value.split('-').next().unwrap_or_default().trim()
}

/// Build the full operation list for one form against one mapping table.
///
/// Only non-empty values are emitted; absent optional blocks produce no ops.
pub fn build_render_ops(
    form: &RatFormData,
    table: &MappingTable,
    page_height: f32,
) -> Vec<RenderOp> {
    let mut ops = Vec::new();

    let set = |ops: &mut Vec<RenderOp>, name: &str, value: &str| {
        let value = value.trim();
        if !value.is_empty() {
            ops.push(RenderOp::SetField {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    };
    let mark = |ops: &mut Vec<RenderOp>, at: MarkPoint, size: f32| {
        ops.push(RenderOp::DrawMark {
            x: at.x,
            y: invert_y(page_height, at.y_from_top),
            glyph: "X".to_string(),
            size,
        });
    };

    // Identification
    set(&mut ops, table.store_code, &form.codigo_loja);
    set(&mut ops, table.pdv, &form.pdv);
    set(&mut ops, table.fsa, &form.fsa);
    set(&mut ops, table.address, &form.endereco);
    set(&mut ops, table.city, &form.cidade);
    set(&mut ops, table.state, &form.uf);
    set(&mut ops, table.requester_name, &form.nome_solicitante);

    // Equipment
    set(&mut ops, table.serial, &form.serial);
    set(&mut ops, table.asset_tag, &form.patrimonio);
    set(&mut ops, table.brand, &form.marca);
    set(&mut ops, table.model, &form.modelo);

    // Swap block: mapped when the technician confirmed a swap, or left the
    // flag unset but picked an origin.
    let swapped = form.houve_troca == "sim"
        || (form.houve_troca.is_empty() && !form.origem_equipamento.is_empty());
    if swapped {
        if !form.origem_equipamento.is_empty() {
            set(&mut ops, table.swap_origin, origin_code(&form.origem_equipamento));
        } else {
            set(&mut ops, table.swap_origin, &form.equip_novo_recond);
        }
        set(&mut ops, table.swap_serial, &form.numero_serie_troca);
        set(&mut ops, table.swap_brand, &form.marca_troca);
        set(&mut ops, table.swap_model, &form.modelo_troca);
    }

    // Misuse verdict: drawn marks, the template has no fields there.
    match form.mau_uso.as_str() {
        "sim" => mark(&mut ops, table.misuse_yes, table.mark_size),
        "nao" => mark(&mut ops, table.misuse_no, table.mark_size),
        _ => {}
    }

    // Narratives spill across numbered rows; overflow is dropped.
    let narrative = |ops: &mut Vec<RenderOp>, rows: &[&str], text: &str| {
        let lines = shape_narrative(text, table.narrative_size, table.narrative_width, rows.len());
        for (row, line) in rows.iter().zip(lines) {
            ops.push(RenderOp::SetField {
                name: (*row).to_string(),
                value: line,
            });
        }
    };
    narrative(&mut ops, table.observation_rows, &form.observacoes_pecas);
    narrative(&mut ops, table.defect_rows, &form.defeito_problema);
    narrative(&mut ops, table.diagnostics_rows, &form.diagnostico_testes);
    narrative(&mut ops, table.solution_rows, &form.solucao);

    // Outcome
    match form.problema_resolvido.as_str() {
        "sim" => set(&mut ops, table.resolved_yes, "X"),
        "nao" => {
            set(&mut ops, table.resolved_no, "X");
            set(&mut ops, table.unresolved_reason, &form.motivo_nao_resolvido);
        }
        _ => {}
    }
    match form.havera_retorno.as_str() {
        "sim" => set(&mut ops, table.return_yes, "X"),
        "nao" => set(&mut ops, table.return_no, "X"),
        _ => {}
    }

    // Times
    set(&mut ops, table.start_hour, &normalize_hour(&form.hora_inicio));
    set(&mut ops, table.end_hour, &normalize_hour(&form.hora_termino));
    set(&mut ops, table.date, &format_date_br(&form.data));

    // Sign-off
    set(&mut ops, table.client_name, &form.cliente_nome);
    set(&mut ops, table.client_document, &form.cliente_rg_matricula);
    set(&mut ops, table.client_phone, &form.cliente_telefone);
    set(&mut ops, table.provider_name, &form.prestador_nome);
    set(&mut ops, table.provider_document, &form.prestador_rg_matricula);
    set(&mut ops, table.provider_phone, &form.prestador_telefone);

    ops
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::mapping::MappingTable;

    const PAGE_HEIGHT: f32 = 842.0;

    fn field<'a>(ops: &'a [RenderOp], name: &str) -> Option<&'a str> {
        ops.iter().find_map(|op| match op {
            RenderOp::SetField { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn empty_form_emits_nothing() {
        let ops = build_render_ops(&RatFormData::default(), MappingTable::current(), PAGE_HEIGHT);
        assert!(ops.is_empty());
    }

    #[test]
    fn identification_fields_are_mapped() {
        let mut form = RatFormData::default();
        form.codigo_loja = "1250".into();
        form.fsa = "FSA-42".into();
        form.uf = "SP".into();

        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "CódigodaLoja"), Some("1250"));
        assert_eq!(field(&ops, "FSA"), Some("FSA-42"));
        assert_eq!(field(&ops, "UF"), Some("SP"));
        assert_eq!(field(&ops, "PDV"), None);
    }

    #[test]
    fn misuse_marks_are_inverted() {
        let mut form = RatFormData::default();
        form.mau_uso = "sim".into();
        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert!(ops.iter().any(|op| matches!(
            op,
            RenderOp::DrawMark { x, y, glyph, .. }
                if *x == 407.0 && *y == PAGE_HEIGHT - 322.0 && glyph == "X"
        )));

        form.mau_uso = "nao".into();
        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert!(ops.iter().any(|op| matches!(
            op,
            RenderOp::DrawMark { x, .. } if *x == 480.0
        )));
    }

    #[test]
    fn swap_block_is_gated() {
        let mut form = RatFormData::default();
        form.numero_serie_troca = "SN-NEW".into();
        form.houve_troca = "nao".into();
        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "SerialNovo"), None);

        form.houve_troca = "sim".into();
        form.origem_equipamento = "04 - Estoque Matriz".into();
        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "SerialNovo"), Some("SN-NEW"));
        assert_eq!(field(&ops, "Origem"), Some("04"));

        // Unset flag plus a chosen origin still counts as a swap.
        form.houve_troca.clear();
        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "Origem"), Some("04"));
    }

    #[test]
    fn unresolved_outcome_carries_reason() {
        let mut form = RatFormData::default();
        form.problema_resolvido = "nao".into();
        form.motivo_nao_resolvido = "Aguardando peça".into();
        form.havera_retorno = "sim".into();

        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "NãoProblemaresolvido"), Some("X"));
        assert_eq!(field(&ops, "SimProblemaresolvido"), None);
        assert_eq!(field(&ops, "Motivo"), Some("Aguardando peça"));
        assert_eq!(field(&ops, "SimHaveráretorno"), Some("X"));
    }

    #[test]
    fn defect_narrative_fills_at_most_two_rows() {
        let mut form = RatFormData::default();
        form.defeito_problema = "linha muito longa ".repeat(12).chars().take(200).collect();

        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        let rows: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, RenderOp::SetField { name, .. } if name.starts_with("DefeitoProblemaRow")))
            .collect();
        assert_eq!(rows.len(), 2);
        // Nothing spilled into a neighbouring narrative block.
        assert_eq!(field(&ops, "Row1"), None);
        assert_eq!(field(&ops, "DiagnósticoTestesrealizadosRow1"), None);
    }

    #[test]
    fn times_are_normalized() {
        let mut form = RatFormData::default();
        form.hora_inicio = "10: 30".into();
        form.data = "2024-03-09T08:00".into();

        let ops = build_render_ops(&form, MappingTable::current(), PAGE_HEIGHT);
        assert_eq!(field(&ops, "Horainício"), Some("10:30"));
        assert_eq!(field(&ops, "DATA"), Some("09/03/2024"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Inverting a distance-from-top twice round-trips exactly for the
        /// whole-point coordinates mapping tables carry.
        #[test]
        fn coordinate_inversion_round_trips(
            page_height in 1u32..=20_000,
            y_from_top in 0u32..=20_000,
        ) {
            let page_height = page_height as f32;
            let y_from_top = y_from_top as f32;
            prop_assert_eq!(invert_y(page_height, invert_y(page_height, y_from_top)), y_from_top);
        }
    }
}
