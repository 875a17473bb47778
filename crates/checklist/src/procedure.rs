//! Offline knowledge base: searchable, editable procedure records.

use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult};

/// A knowledge-base article (markdown-ish content plus tags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
}

/// The in-memory procedure set.
///
/// Edits happen here and are persisted by the caller; the compiled-in default
/// set is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureLibrary {
    procedures: Vec<Procedure>,
}

impl ProcedureLibrary {
    pub fn new(procedures: Vec<Procedure>) -> Self {
        Self { procedures }
    }

    pub fn all(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn get(&self, id: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.id == id)
    }

    /// Case-insensitive search across title, content and tags.
    ///
    /// An empty or whitespace-only term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Procedure> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.procedures.iter().collect();
        }

        self.procedures
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Replace an existing procedure by id, or insert a new one at the front.
    pub fn upsert(&mut self, procedure: Procedure) -> DomainResult<()> {
        if procedure.id.trim().is_empty() {
            return Err(DomainError::validation("procedure id cannot be empty"));
        }

        match self.procedures.iter_mut().find(|p| p.id == procedure.id) {
            Some(existing) => *existing = procedure,
            None => self.procedures.insert(0, procedure),
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> DomainResult<Procedure> {
        let index = self
            .procedures
            .iter()
            .position(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.procedures.remove(index))
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ProcedureLibrary {
        ProcedureLibrary::new(vec![
            Procedure {
                id: "gaveta-pdv".into(),
                title: "Gaveta de Dinheiro".into(),
                tags: vec!["gaveta".into(), "pdv".into()],
                content: "Testar a gaveta em outro PDV.".into(),
            },
            Procedure {
                id: "impressora-zebra-ip".into(),
                title: "Impressoras Zebra - Padrão IP".into(),
                tags: vec!["impressora".into(), "rede".into()],
                content: "O IP da impressora segue os octetos da loja.".into(),
            },
        ])
    }

    #[test]
    fn search_matches_title_content_and_tags() {
        let lib = library();
        assert_eq!(lib.search("zebra").len(), 1);
        assert_eq!(lib.search("GAVETA").len(), 1);
        assert_eq!(lib.search("rede").len(), 1);
        assert_eq!(lib.search("octetos").len(), 1);
        assert_eq!(lib.search("  ").len(), 2);
        assert!(lib.search("nada-disso").is_empty());
    }

    #[test]
    fn upsert_replaces_or_prepends() {
        let mut lib = library();
        lib.upsert(Procedure {
            id: "gaveta-pdv".into(),
            title: "Gaveta (rev 2)".into(),
            tags: vec![],
            content: String::new(),
        })
        .unwrap();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.get("gaveta-pdv").unwrap().title, "Gaveta (rev 2)");

        lib.upsert(Procedure {
            id: "novo".into(),
            title: "Novo Procedimento".into(),
            tags: vec![],
            content: String::new(),
        })
        .unwrap();
        assert_eq!(lib.all()[0].id, "novo");
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut lib = library();
        assert!(matches!(lib.remove("ghost"), Err(DomainError::NotFound)));
        lib.remove("gaveta-pdv").unwrap();
        assert_eq!(lib.len(), 1);
    }
}
