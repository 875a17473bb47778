//! Spreadsheet ingestion for the IP directory.
//!
//! The export is column-positional: A = store number, B = store name,
//! H = desktop IP, P = PDV IP. Delimiter varies by exporter (`,` or `;`)
//! and is sniffed per file. A leading header row mentioning "loja" is
//! skipped.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult};

const COL_STORE_NUMBER: usize = 0;
const COL_STORE_NAME: usize = 1;
const COL_IP_DESKTOP: usize = 7;
const COL_IP_PDV: usize = 15;

/// One store row of the directory spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_number: String,
    pub store_name: String,
    pub ip_desktop: String,
    pub ip_pdv: String,
}

fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Parse a spreadsheet export into store records.
///
/// Rows without a store number or without any IP are skipped; malformed rows
/// are logged and skipped. An export yielding no usable rows is a
/// [`DomainError::Validation`].
pub fn parse_directory(text: &str) -> DomainResult<Vec<StoreRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(row = index, "skipping malformed directory row: {e}");
                continue;
            }
        };

        let cell = |i: usize| row.get(i).unwrap_or("").trim().to_string();
        let store_number = cell(COL_STORE_NUMBER);

        // Header detection: first row naming the store column.
        if index == 0 && store_number.to_lowercase().contains("loja") {
            continue;
        }

        let record = StoreRecord {
            store_number,
            store_name: cell(COL_STORE_NAME),
            ip_desktop: cell(COL_IP_DESKTOP),
            ip_pdv: cell(COL_IP_PDV),
        };
        if record.store_number.is_empty()
            || (record.ip_desktop.is_empty() && record.ip_pdv.is_empty())
        {
            continue;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(DomainError::validation(
            "no usable rows found in directory file",
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store: &str, name: &str, desktop: &str, pdv: &str, sep: char) -> String {
        let mut cols = vec![String::new(); 16];
        cols[COL_STORE_NUMBER] = store.into();
        cols[COL_STORE_NAME] = name.into();
        cols[COL_IP_DESKTOP] = desktop.into();
        cols[COL_IP_PDV] = pdv.into();
        cols.join(&sep.to_string())
    }

    #[test]
    fn parses_comma_separated_export_with_header() {
        let text = format!(
            "{}\n{}\n{}\n",
            row("Loja", "Nome", "IP Desktop", "IP PDV", ','),
            row("1250", "Loja Centro", "10.29.84.10", "10.29.84.50", ','),
            row("1251", "Loja Norte", "", "10.29.85.50", ','),
        );
        let records = parse_directory(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].store_number, "1250");
        assert_eq!(records[0].ip_pdv, "10.29.84.50");
        assert_eq!(records[1].ip_desktop, "");
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let text = format!("{}\n", row("1250", "Loja Centro", "10.29.84.10", "", ';'));
        let records = parse_directory(&text).unwrap();
        assert_eq!(records[0].store_name, "Loja Centro");
        assert_eq!(records[0].ip_desktop, "10.29.84.10");
    }

    #[test]
    fn rows_without_number_or_ips_are_skipped() {
        let text = format!(
            "{}\n{}\n{}\n",
            row("", "Sem Numero", "10.0.0.1", "", ','),
            row("1250", "Sem IP", "", "", ','),
            row("1251", "Ok", "10.0.0.2", "", ','),
        );
        let records = parse_directory(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].store_number, "1251");
    }

    #[test]
    fn empty_export_is_a_validation_error() {
        let err = parse_directory("\n\n").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn short_rows_do_not_panic() {
        let text = "1250,Loja Curta\n1251,Loja Ok,a,b,c,d,e,10.0.0.9\n";
        let records = parse_directory(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ip_desktop, "10.0.0.9");
    }
}
