//! CSV decoder for the fetched incident export.

use anyhow::Result;

use crate::model::RawRow;

/// Decodes an incident export into raw rows.
///
/// Individual cells are kept as optional strings so malformed values degrade
/// downstream instead of failing here. A structurally unreadable export is a
/// batch-level defect and aborts the whole decode.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawRow = result?;
        rows.push(row);
    }

    Ok(rows)
}
