//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reads over operation records from a CSV source.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - batch reading so the driver can fan a batch out across workers
//!
//! Malformed rows are logged and skipped; a batch only ever contains
//! records that converted cleanly.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::OperationRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader over operation records
///
/// Maintains streaming behavior with constant memory usage per batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async byte source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` operation records
    ///
    /// Invalid rows are logged and skipped. Returns an empty vector when
    /// the end of the input is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<OperationRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => warn!("Record conversion error: {}", e),
                },
                Some(Err(e)) => warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_read_batch_returns_converted_records() {
        let csv_content = "op,owner,recipient,amount,key\n\
                           load,1,,100.0,txn-1\n\
                           transfer,1,2,25.0,txn-2\n\
                           load,2,,40.0,txn-3\n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = reader.read_batch(10).await;

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].op, OperationType::Load);
        assert_eq!(batch[0].amount, Decimal::new(1000, 1));
        assert_eq!(batch[1].recipient, Some(2));
        assert_eq!(batch[2].owner, 2);
    }

    #[tokio::test]
    async fn test_read_batch_respects_batch_size() {
        let csv_content = "op,owner,recipient,amount,key\n\
                           load,1,,10,txn-1\n\
                           load,1,,10,txn-2\n\
                           load,1,,10,txn-3\n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let first = reader.read_batch(2).await;
        let second = reader.read_batch(2).await;
        let third = reader.read_batch(2).await;

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_read_batch_skips_malformed_rows() {
        let csv_content = "op,owner,recipient,amount,key\n\
                           load,1,,100.0,txn-1\n\
                           load,2,,broken,txn-2\n\
                           load,3,,50.0,txn-3\n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = reader.read_batch(10).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].owner, 1);
        assert_eq!(batch[1].owner, 3);
    }
}
