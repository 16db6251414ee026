use conveyor_watch::aggregate::process_batch;
use conveyor_watch::model::{CategorizedMessage, FailureCategory, PathLabel, PidSegment};
use conveyor_watch::parser::parse_rows;

#[test]
fn test_full_pipeline() {
    let bytes = include_bytes!("fixtures/sample_batch.csv");
    let rows = parse_rows(bytes).expect("Failed to parse export");
    let snapshot = process_batch(&rows);

    // One record per input row, in input order.
    assert_eq!(snapshot.records.len(), 7);
    assert_eq!(snapshot.records[0].source, "U163099");
    assert_eq!(snapshot.records[6].source, "U151101");

    // Paths: literal prefixes, digit rules, and the Other fallthrough.
    assert_eq!(
        snapshot.records[0].path,
        PathLabel::Pid {
            line: 6,
            segment: PidSegment::Main
        }
    );
    assert_eq!(snapshot.records[1].path, PathLabel::ManCheckWest);
    assert_eq!(snapshot.records[2].path, PathLabel::ManCheckEast);
    assert_eq!(snapshot.records[3].path, PathLabel::Other);
    assert_eq!(snapshot.records[4].path, PathLabel::NpcStations);
    assert_eq!(snapshot.records[5].path, PathLabel::Other);
    assert_eq!(
        snapshot.records[6].path,
        PathLabel::Pid {
            line: 1,
            segment: PidSegment::Sort
        }
    );

    // Messages: keyword priority, empty fallthrough, verbatim passthrough.
    assert_eq!(
        snapshot.records[0].message,
        CategorizedMessage::Known(FailureCategory::Jammed)
    );
    assert_eq!(
        snapshot.records[1].message,
        CategorizedMessage::Known(FailureCategory::MechanicalError)
    );
    assert_eq!(
        snapshot.records[2].message,
        CategorizedMessage::Known(FailureCategory::Other)
    );
    assert_eq!(
        snapshot.records[3].message,
        CategorizedMessage::Freeform("Unusual jam type Z".to_string())
    );
    assert_eq!(
        snapshot.records[4].message,
        CategorizedMessage::Known(FailureCategory::Full)
    );
    assert_eq!(
        snapshot.records[5].message,
        CategorizedMessage::Known(FailureCategory::EStop)
    );
    // "Manual restart required": RESTART outranks MANUAL.
    assert_eq!(
        snapshot.records[6].message,
        CategorizedMessage::Known(FailureCategory::Jammed)
    );

    // Chart totals: first-seen order, positional correspondence, and the
    // values summing to the batch's incident count.
    assert_eq!(
        snapshot.totals.labels,
        vec![
            "jammed",
            "mechanical error",
            "other",
            "unusual jam type z",
            "full",
            "e-stop"
        ]
    );
    assert_eq!(snapshot.totals.values, vec![8, 2, 1, 4, 2, 1]);

    let total: u64 = snapshot.totals.values.iter().sum();
    let incidents: u64 = snapshot.records.iter().map(|r| r.incidents).sum();
    assert_eq!(total, incidents);
    assert_eq!(total, 18);
}

#[tokio::test]
async fn test_new_batch_fully_replaces_published_data() {
    use conveyor_watch::server::AppState;

    let bytes = include_bytes!("fixtures/sample_batch.csv");
    let rows = parse_rows(bytes).unwrap();

    let state = AppState::new();
    state.publish(process_batch(&rows)).await;
    assert_eq!(state.current().await.records.len(), 7);

    // Re-ingesting a smaller batch must leave no residue from the first.
    let second = parse_rows(
        b"Source,message,Incidents,Downtime_Hours\nU405012,Drive fault,9,0.5\n",
    )
    .unwrap();
    state.publish(process_batch(&second)).await;

    let snapshot = state.current().await;
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].path, PathLabel::NpcLine);
    assert_eq!(snapshot.totals.labels, vec!["full"]);
    assert_eq!(snapshot.totals.values, vec![9]);
}
