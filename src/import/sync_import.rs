use std::error::Error;
use std::path::Path;

use super::ImportSummary;
use crate::{csv_utils::read_csv, NewTransaction, TransactionService};

/// Imports every row of the CSV file at `input_path` into `service`.
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * The CSV is malformed
pub fn import_csv<P>(
    input_path: P,
    service: &TransactionService,
) -> Result<ImportSummary, Box<dyn Error + Send + Sync>>
where
    P: AsRef<Path>,
{
    let mut summary = ImportSummary::default();
    for row in read_csv::<NewTransaction, _>(input_path)? {
        // CSV parsing errors are critical - propagate them
        summary.record(service, row?);
    }
    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "finished CSV import"
    );
    Ok(summary)
}
