//! Row decoding: flatten the cursor's current row into a [`GenericRecord`].

use crate::error::{BoxDynError, EntityError};
use crate::record::{FieldValue, GenericRecord};
use thiserror::Error;

/// Name and position of one result column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub ordinal: usize,
}

/// A cell that the driver could not decode.
#[derive(Error, Debug)]
#[error("column #{ordinal}: {source}")]
pub struct ScanError {
    pub ordinal: usize,
    #[source]
    pub source: BoxDynError,
}

/// The active row of a result cursor.
pub trait RowCursor {
    fn column_descriptors(&self) -> Vec<ColumnDescriptor>;

    /// Decode every column of the row, in ordinal order.
    fn scan_values(&self) -> Result<Vec<FieldValue>, ScanError>;
}

/// Decode the current row. Does not advance or release the cursor.
pub fn decode<R: RowCursor + ?Sized>(row: &R) -> Result<GenericRecord, EntityError> {
    let columns = row.column_descriptors();
    let values = row.scan_values().map_err(|e| EntityError::Decode {
        column: columns
            .iter()
            .find(|c| c.ordinal == e.ordinal)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{}", e.ordinal)),
        source: e.source,
    })?;
    if values.len() != columns.len() {
        return Err(EntityError::Decode {
            column: "*".into(),
            source: format!("{} columns described but {} values scanned", columns.len(), values.len()).into(),
        });
    }
    let mut record = GenericRecord::with_capacity(columns.len());
    for (col, value) in columns.into_iter().zip(values) {
        record.push(col.name, value);
    }
    Ok(record)
}
