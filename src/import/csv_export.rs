use std::path::Path;
use tracing::info;

use crate::db::Database;
use crate::error::LedgerResult;
use crate::models::{from_minor_units, Month, DATE_FORMAT};

pub(crate) const EXPORT_HEADER: [&str; 4] = ["date", "amount", "category", "note"];

/// Write every transaction in `month` to `destination`, oldest first.
/// Missing parent directories are created and an existing file is replaced.
pub(crate) fn export_month(db: &Database, month: &Month, destination: &Path) -> LedgerResult<usize> {
    let txns = db.transactions_for_month(month)?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(destination)?;
    wtr.write_record(EXPORT_HEADER)?;
    for txn in &txns {
        let date = txn.date.format(DATE_FORMAT).to_string();
        let amount = from_minor_units(txn.amount_cents);
        wtr.write_record([
            date.as_str(),
            amount.as_str(),
            txn.category.as_str(),
            txn.note_or_empty(),
        ])?;
    }
    wtr.flush()?;

    info!(month = %month, rows = txns.len(), path = %destination.display(), "exported month");
    Ok(txns.len())
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
