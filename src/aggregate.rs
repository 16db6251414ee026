//! Single-pass batch classification and per-category incident totals.

use serde::Serialize;

use crate::classify::{classify_message, classify_path};
use crate::model::{ClassifiedRecord, RawRow};

/// Chart-ready totals. `labels[i]` and `values[i]` correspond positionally,
/// in first-seen order of each category during the batch scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// The published output of one ingestion cycle: the classified detail list
/// and the per-category totals, built from the same batch in one pass.
/// Replaced wholesale on the next cycle, never merged with a prior batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSnapshot {
    pub records: Vec<ClassifiedRecord>,
    pub totals: ChartData,
}

/// Classifies a batch of raw rows and accumulates incident totals per
/// failure category.
///
/// Iterates the rows once in input order; every row yields exactly one
/// [`ClassifiedRecord`]. Malformed cells degrade to defaults (empty string,
/// zero) rather than failing the batch.
pub fn process_batch(rows: &[RawRow]) -> BatchSnapshot {
    let mut records = Vec::with_capacity(rows.len());
    let mut totals = ChartData::default();

    for row in rows {
        let source = row.source.as_deref().unwrap_or("").trim().to_string();
        let raw_message = row.message.as_deref().unwrap_or("").trim();
        let incidents = coerce_count(row.incidents.as_deref());
        let downtime = coerce_hours(row.downtime_hours.as_deref());

        let path = classify_path(&source);
        let message = classify_message(raw_message);

        let key = message.chart_key();
        match totals.labels.iter().position(|label| *label == key) {
            Some(i) => totals.values[i] += incidents,
            None => {
                totals.labels.push(key);
                totals.values.push(incidents);
            }
        }

        records.push(ClassifiedRecord {
            source,
            message,
            incidents,
            downtime,
            path,
        });
    }

    BatchSnapshot { records, totals }
}

/// Coerces an `Incidents` cell to a non-negative count. Missing or
/// unparsable cells degrade to 0.
fn coerce_count(cell: Option<&str>) -> u64 {
    let Some(cell) = cell else { return 0 };
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u64>() {
        return n;
    }
    // Spreadsheet exports sometimes render counts as "3.0".
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v as u64,
        _ => 0,
    }
}

/// Coerces a `Downtime_Hours` cell to a non-negative float, defaulting to 0.0.
fn coerce_hours(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategorizedMessage, FailureCategory, PathLabel};

    fn row(source: &str, message: &str, incidents: &str, downtime: &str) -> RawRow {
        RawRow {
            source: Some(source.to_string()),
            message: Some(message.to_string()),
            incidents: Some(incidents.to_string()),
            downtime_hours: Some(downtime.to_string()),
        }
    }

    #[test]
    fn test_every_row_yields_one_record_in_order() {
        let rows = vec![
            row("U163099", "Jam DETECTED", "3", "1.5"),
            row("U999999", "Low voltage fault", "2", "0.5"),
            row("", "", "1", "0.0"),
        ];

        let snapshot = process_batch(&rows);

        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.records[0].source, "U163099");
        assert_eq!(snapshot.records[1].source, "U999999");
        assert_eq!(snapshot.records[2].source, "");
    }

    #[test]
    fn test_totals_sum_matches_incident_sum() {
        let rows = vec![
            row("U163099", "Jam DETECTED", "3", "1.5"),
            row("U151101", "restart", "5", "0.1"),
            row("U999999", "Unusual jam type Z", "4", "0.0"),
            row("", "", "2", "0.0"),
        ];

        let snapshot = process_batch(&rows);

        let total: u64 = snapshot.totals.values.iter().sum();
        let incidents: u64 = snapshot.records.iter().map(|r| r.incidents).sum();
        assert_eq!(total, incidents);
        assert_eq!(total, 14);
    }

    #[test]
    fn test_labels_keep_first_seen_order() {
        let rows = vec![
            row("", "Jam DETECTED", "1", "0"),
            row("", "Low voltage", "1", "0"),
            row("", "restart", "1", "0"),
            row("", "E-stop hit", "1", "0"),
        ];

        let snapshot = process_batch(&rows);

        assert_eq!(
            snapshot.totals.labels,
            vec!["jammed", "mechanical error", "e-stop"]
        );
        assert_eq!(snapshot.totals.values, vec![2, 1, 1]);
    }

    #[test]
    fn test_freeform_messages_get_their_own_bucket() {
        let rows = vec![
            row("", "Unusual jam type Z", "2", "0"),
            row("", "Unusual Jam Type Z", "3", "0"),
        ];

        let snapshot = process_batch(&rows);

        // Bucketing is by lowercased text, so both rows share one label.
        assert_eq!(snapshot.totals.labels, vec!["unusual jam type z"]);
        assert_eq!(snapshot.totals.values, vec![5]);
    }

    #[test]
    fn test_missing_cells_degrade_to_defaults() {
        let rows = vec![RawRow::default()];

        let snapshot = process_batch(&rows);

        let record = &snapshot.records[0];
        assert_eq!(record.source, "");
        assert_eq!(
            record.message,
            CategorizedMessage::Known(FailureCategory::Other)
        );
        assert_eq!(record.incidents, 0);
        assert_eq!(record.downtime, 0.0);
        assert_eq!(record.path, PathLabel::Other);
    }

    #[test]
    fn test_malformed_numeric_cells_degrade_to_zero() {
        let rows = vec![row("U163099", "Jam DETECTED", "lots", "n/a")];

        let snapshot = process_batch(&rows);

        assert_eq!(snapshot.records[0].incidents, 0);
        assert_eq!(snapshot.records[0].downtime, 0.0);
        assert_eq!(snapshot.totals.values, vec![0]);
    }

    #[test]
    fn test_float_rendered_counts_are_accepted() {
        let rows = vec![row("", "Jam DETECTED", "3.0", "1.25")];

        let snapshot = process_batch(&rows);

        assert_eq!(snapshot.records[0].incidents, 3);
        assert_eq!(snapshot.records[0].downtime, 1.25);
    }

    #[test]
    fn test_source_and_message_are_trimmed() {
        let rows = vec![row("  U163099 ", "  Jam DETECTED  ", "1", "0")];

        let snapshot = process_batch(&rows);

        assert_eq!(snapshot.records[0].source, "U163099");
        assert_eq!(
            snapshot.records[0].message,
            CategorizedMessage::Known(FailureCategory::Jammed)
        );
    }

    #[test]
    fn test_empty_batch_produces_empty_snapshot() {
        let snapshot = process_batch(&[]);
        assert!(snapshot.records.is_empty());
        assert!(snapshot.totals.labels.is_empty());
        assert!(snapshot.totals.values.is_empty());
    }
}
