//! Serial async pipelines
//!
//! Runs a list of asynchronous work items strictly one at a time, in order,
//! stopping at the first failure. Between items the task yields back to the
//! tokio scheduler, so long lists neither grow the stack nor starve other
//! tasks on the same runtime.

use std::future::Future;

use serde_json::Value;

use crate::error::SerialError;

/// Run `worker` over `items` one at a time
///
/// Each item is handed to the worker only after the previous item's future
/// resolved. `Ok(Some(r))` results are collected in processing order,
/// `Ok(None)` means "no output" and is dropped. The first `Err` ends the run
/// immediately: later items never reach the worker and results gathered so
/// far are discarded.
pub async fn run_serially<I, T, R, E, F, Fut>(items: I, mut worker: F) -> Result<Vec<R>, E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<Option<R>, E>>,
{
    let mut results = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            tokio::task::yield_now().await;
        }

        tracing::debug!(index, "serial run: processing item");
        match worker(item).await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(index, "serial run: item failed, stopping");
                return Err(e);
            }
        }
    }

    tracing::debug!(collected = results.len(), "serial run: done");
    Ok(results)
}

/// Run `worker` over the elements of a sequence taken from a value tree
///
/// Unlike [`run_serially`] the input is dynamic: an absent value or anything
/// other than a sequence is rejected up front with
/// [`SerialError::NotASequence`] and the worker is never called.
pub async fn run_serially_value<R, E, F, Fut>(
    items: Option<&Value>,
    worker: F,
) -> Result<Vec<R>, SerialError<E>>
where
    F: FnMut(Value) -> Fut,
    Fut: Future<Output = Result<Option<R>, E>>,
{
    let list = match items {
        Some(Value::Array(list)) => list.clone(),
        other => {
            return Err(SerialError::NotASequence {
                found: value_kind(other),
            })
        }
    };

    run_serially(list, worker).await.map_err(SerialError::Worker)
}

fn value_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "nothing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "a sequence",
        Some(Value::Object(_)) => "a mapping",
    }
}
