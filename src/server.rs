//! HTTP server publishing the processed incident data.

use crate::aggregate::BatchSnapshot;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared between the ingest loop and the HTTP handlers.
///
/// The snapshot is held behind an `Arc` that is swapped as a whole on
/// publish, so a reader always sees one complete batch: either the previous
/// one or the new one, never a mix.
pub struct AppState {
    snapshot: RwLock<Arc<BatchSnapshot>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(BatchSnapshot::default())),
            start_time: Instant::now(),
        }
    }

    /// Replaces the published snapshot wholesale.
    pub async fn publish(&self, snapshot: BatchSnapshot) {
        *self.snapshot.write().await = Arc::new(snapshot);
    }

    /// Returns the currently published snapshot.
    pub async fn current(&self) -> Arc<BatchSnapshot> {
        self.snapshot.read().await.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the HTTP server until it is shut down.
pub async fn run(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = Router::new()
        .merge(routes::data_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::process_batch;
    use crate::model::RawRow;

    fn batch(message: &str, incidents: &str) -> BatchSnapshot {
        let rows = vec![RawRow {
            source: Some("U163099".to_string()),
            message: Some(message.to_string()),
            incidents: Some(incidents.to_string()),
            downtime_hours: None,
        }];
        process_batch(&rows)
    }

    #[tokio::test]
    async fn test_publish_replaces_snapshot_wholesale() {
        let state = AppState::new();

        state.publish(batch("Jam DETECTED", "3")).await;
        let first = state.current().await;
        assert_eq!(first.totals.labels, vec!["jammed"]);
        assert_eq!(first.totals.values, vec![3]);

        state.publish(batch("Low voltage", "2")).await;
        let second = state.current().await;
        assert_eq!(second.totals.labels, vec!["mechanical error"]);
        assert_eq!(second.totals.values, vec![2]);

        // The earlier reader still holds the old complete batch.
        assert_eq!(first.totals.labels, vec!["jammed"]);
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_empty() {
        let state = AppState::new();
        let snapshot = state.current().await;
        assert!(snapshot.records.is_empty());
        assert!(snapshot.totals.labels.is_empty());
    }
}
