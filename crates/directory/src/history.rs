//! Bounded most-recent-first search history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::StoreRecord;

const HISTORY_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub record: StoreRecord,
    pub at: DateTime<Utc>,
}

/// Last successful lookups, newest first, capped at ten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn push(&mut self, record: StoreRecord, at: DateTime<Utc>) {
        self.entries.insert(0, HistoryEntry { record, at });
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(number: &str) -> StoreRecord {
        StoreRecord {
            store_number: number.into(),
            store_name: format!("Loja {number}"),
            ip_desktop: String::new(),
            ip_pdv: "10.0.0.1".into(),
        }
    }

    #[test]
    fn newest_first_and_capped() {
        let mut history = SearchHistory::new();
        for i in 0..12 {
            let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, i, 0).unwrap();
            history.push(record(&format!("{i}")), at);
        }

        assert_eq!(history.entries().len(), 10);
        assert_eq!(history.entries()[0].record.store_number, "11");
        assert_eq!(history.entries()[9].record.store_number, "2");
    }

    #[test]
    fn serializes_as_a_bare_array() {
        let mut history = SearchHistory::new();
        history.push(record("1250"), Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.starts_with('['));
        let back: SearchHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
