// Command handlers
use crate::domain::selection::TimeRange;
use crate::presentation::app_state::AppState;
use futures::future::join_all;
use serde_json::{Map, Value};

/// Print stored session IDs, one per line
pub async fn list_sessions(state: &AppState) -> anyhow::Result<()> {
    match state.session_service.list_sessions().await {
        Ok(ids) => {
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error listing sessions: {:#}", e);
            Err(e)
        }
    }
}

/// Analyze every requested session concurrently. Unknown or failed sessions map to `null`.
///
/// Returns the payload and the number of sessions that failed.
pub async fn collect_analyses(state: &AppState, ids: &[String], range: TimeRange) -> (Value, usize) {
    let results = join_all(
        ids.iter()
            .map(|id| state.session_service.filter_session(id, range)),
    )
    .await;

    let mut payload = Map::new();
    let mut failures = 0;
    for (id, result) in ids.iter().zip(results) {
        let value = match result {
            Ok(Some(analysis)) => match serde_json::to_value(&analysis) {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!("Error serializing session {}: {}", id, e);
                    failures += 1;
                    Value::Null
                }
            },
            Ok(None) => {
                tracing::warn!("Session {} not found", id);
                Value::Null
            }
            Err(e) => {
                tracing::error!("Error filtering session {}: {:#}", id, e);
                failures += 1;
                Value::Null
            }
        };
        payload.insert(id.clone(), value);
    }

    (Value::Object(payload), failures)
}

/// Print the analyses of `ids` as one JSON object keyed by session ID
pub async fn filter_sessions(
    state: &AppState,
    ids: &[String],
    range: TimeRange,
    pretty: bool,
) -> anyhow::Result<()> {
    let (payload, failures) = collect_analyses(state, ids, range).await;

    let output = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{}", output);

    if failures > 0 {
        anyhow::bail!("{} of {} sessions could not be analyzed", failures, ids.len());
    }
    Ok(())
}
