//! Sales export
//!
//! One `;`-delimited row per sale, newest first, with the line items
//! JSON-encoded in a single field. Timestamps are written as RFC 3339 in
//! the business time zone.

use super::ExportError;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use shared::models::SaleRecord;
use std::path::{Path, PathBuf};

pub const EXPORT_HEADER: [&str; 7] = [
    "timestamp",
    "tableName",
    "items",
    "subtotal",
    "cardTax",
    "total",
    "paymentMethod",
];

const DELIMITER: u8 = b';';

/// Which sales to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    /// Sales on the same day of month and month as the reference instant
    ///
    /// The year is not compared.
    SameDay(DateTime<Utc>),
}

impl ExportScope {
    /// Download name for the scope
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::All => "ventas_historial.csv",
            Self::SameDay(_) => "ventas_hoy.csv",
        }
    }
}

fn local_time(millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|t| t.with_timezone(&tz))
}

/// Sales within `scope`, keeping input order
pub fn select_sales(sales: &[SaleRecord], scope: ExportScope, tz: Tz) -> Vec<&SaleRecord> {
    match scope {
        ExportScope::All => sales.iter().collect(),
        ExportScope::SameDay(reference) => {
            let reference = reference.with_timezone(&tz);
            sales
                .iter()
                .filter(|sale| {
                    local_time(sale.timestamp, tz).is_some_and(|t| {
                        t.day() == reference.day() && t.month() == reference.month()
                    })
                })
                .collect()
        }
    }
}

/// Render the selected sales as CSV text
pub fn render_sales_csv(sales: &[&SaleRecord], tz: Tz) -> Result<String, ExportError> {
    if sales.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for sale in sales {
        let timestamp = local_time(sale.timestamp, tz)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| sale.timestamp.to_string());
        let items = serde_json::to_string(&sale.items)?;

        writer.write_record([
            timestamp,
            sale.table_name.clone(),
            items,
            sale.subtotal.to_string(),
            sale.card_tax.to_string(),
            sale.total.to_string(),
            sale.payment_method.as_str().to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Write the sales in `scope` to `dir` and return the file path
pub fn export_sales(
    sales: &[SaleRecord],
    scope: ExportScope,
    tz: Tz,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let selected = select_sales(sales, scope, tz);
    let text = render_sales_csv(&selected, tz)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(scope.file_name());
    std::fs::write(&path, text)?;

    tracing::info!(path = %path.display(), rows = selected.len(), "Sales exported");
    Ok(path)
}
