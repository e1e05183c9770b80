//! Menu CSV import
//!
//! Format: a header line, then `id;name;category;price` rows. Fields are
//! trimmed and a UTF-8 BOM is tolerated. Quotes carry no meaning: a `"`
//! stays in the field text. The price is the leading number of its field
//! (`5000 colones` reads as `5000`); a missing, unparseable or out-of-range
//! price reads as `0` (variable price). Rows without an id are dropped.
//! Header names are not checked; the first line is always skipped.

use super::ImportError;
use crate::db::DocumentStore;
use shared::models::MenuItem;
use shared::models::serde_helpers::{leading_number, sanitize_price};
use std::path::Path;

const DELIMITER: u8 = b';';

/// Parse menu rows from CSV text
///
/// Never fails: unreadable rows are logged and skipped.
pub fn parse_menu_csv(text: &str) -> Vec<MenuItem> {
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut items = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed menu row");
                dropped += 1;
                continue;
            }
        };

        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        let id = field(0);
        if id.is_empty() {
            dropped += 1;
            continue;
        }

        let price = record
            .get(3)
            .and_then(leading_number)
            .map(sanitize_price)
            .unwrap_or(0.0);

        items.push(MenuItem::new(id, field(1), field(2), price));
    }

    tracing::debug!(parsed = items.len(), dropped, "Menu CSV parsed");
    items
}

/// Replace the whole menu in one batch
///
/// An empty list is rejected and the current menu stays. Returns the number
/// of distinct items stored (duplicate ids collapse, last row wins).
pub fn replace_menu(store: &dyn DocumentStore, items: &[MenuItem]) -> Result<usize, ImportError> {
    if items.is_empty() {
        return Err(ImportError::Empty);
    }
    let stored = store.replace_menu(items)?;
    if stored < items.len() {
        tracing::warn!(
            rows = items.len(),
            stored,
            "Duplicate menu ids collapsed during import"
        );
    }
    Ok(stored)
}

/// Read a CSV file and replace the menu with its rows
pub fn import_menu_file(store: &dyn DocumentStore, path: &Path) -> Result<usize, ImportError> {
    let text = std::fs::read_to_string(path)?;
    let items = parse_menu_csv(&text);
    let stored = replace_menu(store, &items)?;
    tracing::info!(path = %path.display(), items = stored, "Menu imported");
    Ok(stored)
}
