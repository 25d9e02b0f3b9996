use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use csv_async::{AsyncReaderBuilder, Error as CsvError, Trim};
use tokio::fs::File;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use super::ImportSummary;
use crate::{NewTransaction, TransactionService};

const BUFFER_SIZE: usize = 1024;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Imports the CSV file at `input_path` into `service` without blocking the
/// runtime. Spawns two tasks:
/// * CSV reader - streams rows from the input file, deserializes them and sends them to the
///   importer via channel.
/// * Importer - receives rows from the channel and creates them until the channel is closed.
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * The CSV is malformed
pub async fn import_csv<P>(input_path: P, service: Arc<TransactionService>) -> Result<ImportSummary>
where
    P: AsRef<Path>,
{
    let (tx, rx) = mpsc::channel(BUFFER_SIZE);
    let input_path = input_path.as_ref().to_owned();

    let reader_handle = tokio::spawn(read_rows(input_path, tx));
    let importer_handle = tokio::spawn(create_rows(rx, service));

    // Wait for reader to finish and propagate any errors
    reader_handle.await??;

    let summary = importer_handle.await?;
    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "finished CSV import"
    );
    Ok(summary)
}

/// Reads and deserializes rows from a CSV file.
/// Returns them through the provided channel.
async fn read_rows(
    input_path: impl AsRef<Path> + Send,
    tx: mpsc::Sender<NewTransaction>,
) -> Result<(), CsvError> {
    let file = File::open(input_path).await?;
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(file);

    let mut records = csv_reader.deserialize::<NewTransaction>();
    while let Some(result) = records.next().await {
        // CSV parsing errors are critical - propagate them
        let row = result?;
        if tx.send(row).await.is_err() {
            // Receiver dropped, exit gracefully
            break;
        }
    }
    Ok(())
}

/// Creates rows received through the channel.
/// Returns the tally once the channel is closed by the reader.
async fn create_rows(
    mut rx: mpsc::Receiver<NewTransaction>,
    service: Arc<TransactionService>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    while let Some(row) = rx.recv().await {
        summary.record(&service, row);
    }
    summary
}
