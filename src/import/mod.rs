//! Bulk loading of transactions from CSV files into a
//! [`TransactionService`](crate::TransactionService).
//!
//! This module provides both a synchronous and an asynchronous importer.
//! Malformed CSV aborts the import. Rows that fail validation or collide
//! with an existing ID are skipped and counted.

mod async_import;
mod sync_import;

pub use async_import::import_csv as import_csv_async;
pub use sync_import::import_csv;

use crate::validation::validate_new;
use crate::{NewTransaction, TransactionService};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportSummary {
    /// Validates and creates one row, recording the outcome.
    fn record(&mut self, service: &TransactionService, row: NewTransaction) {
        let result = validate_new(&row)
            .map_err(|error| error.to_string())
            .and_then(|()| service.create(row).map_err(|error| error.to_string()));
        match result {
            Ok(_) => self.imported += 1,
            Err(reason) => {
                tracing::debug!(%reason, "skipped CSV row");
                self.skipped += 1;
            }
        }
    }
}
