//! RAT form data model.

use serde::{Deserialize, Serialize};

/// A technical-service-report (RAT) form, field by field.
///
/// Flat record of string-valued fields mirroring the paper template. Every
/// field defaults to empty; nothing is structurally required. The mapper only
/// emits non-empty values. Yes/no choices carry `"sim"` / `"nao"` / `""`.
///
/// Serialized camelCase, matching the persisted history shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatFormData {
    // Identification
    pub codigo_loja: String,
    pub pdv: String,
    pub fsa: String,
    pub endereco: String,
    pub cidade: String,
    pub uf: String,
    pub nome_solicitante: String,

    // Equipment on site
    pub serial: String,
    pub patrimonio: String,
    pub marca: String,
    pub modelo: String,

    // Swap block (only mapped when a swap happened)
    pub houve_troca: String,
    pub origem_equipamento: String,
    pub equip_novo_recond: String,
    pub numero_serie_troca: String,
    pub marca_troca: String,
    pub modelo_troca: String,

    // Misuse verdict
    pub mau_uso: String,

    // Narratives
    pub observacoes_pecas: String,
    pub defeito_problema: String,
    pub diagnostico_testes: String,
    pub solucao: String,

    // Outcome
    pub problema_resolvido: String,
    pub motivo_nao_resolvido: String,
    pub havera_retorno: String,

    // Times
    pub hora_inicio: String,
    pub hora_termino: String,
    pub data: String,

    // Client sign-off
    pub cliente_nome: String,
    pub cliente_rg_matricula: String,
    pub cliente_telefone: String,

    // Provider sign-off
    pub prestador_nome: String,
    pub prestador_rg_matricula: String,
    pub prestador_telefone: String,
}

impl RatFormData {
    /// Deep copy for history storage.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}
