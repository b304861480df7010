use crate::error::ServiceError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// aggregate
///
/// Fan-out/gather projection of one page of records. Each record is
/// projected on its own tokio task; results land in a single mutex-guarded
/// map keyed by record id, and the output is assembled in the *input* id
/// order once every task has finished. Page sizes are capped by the
/// pagination limit, so the fan-out width is left unbounded.
///
/// Guarantees:
/// - The call is a barrier: it returns only after all tasks have completed.
/// - Output order equals input order, regardless of completion order.
/// - Fail-together errors: the first projection failure (or task panic) is
///   recorded, the remaining tasks are still awaited, and the error is
///   returned with no partial result.
///
/// Duplicate ids are not expected (primary-key uniqueness); if they occur,
/// the last writer wins per id.
pub async fn aggregate<R, P, F>(
    records: Vec<R>,
    id_of: fn(&R) -> i64,
    project: F,
) -> Result<Vec<P>, ServiceError>
where
    R: Send + 'static,
    P: Clone + Send + 'static,
    F: Fn(R) -> Result<P, ServiceError> + Send + Sync + 'static,
{
    if records.is_empty() {
        return Ok(Vec::new());
    }

    // Authoritative order, captured before the records move into the tasks.
    let ids: Vec<i64> = records.iter().map(|r| id_of(r)).collect();

    let map: Arc<Mutex<HashMap<i64, P>>> =
        Arc::new(Mutex::new(HashMap::with_capacity(records.len())));
    let project = Arc::new(project);

    let mut tasks = JoinSet::new();
    for record in records {
        let map = Arc::clone(&map);
        let project = Arc::clone(&project);
        tasks.spawn(async move {
            let id = id_of(&record);
            let projected = project(record)?;
            map.lock().await.insert(id, projected);
            Ok::<(), ServiceError>(())
        });
    }

    // Counting join barrier. Every task is drained even after a failure so
    // no in-flight projection is abandoned mid-write.
    let mut first_err: Option<ServiceError> = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
            Err(join_err) => {
                if first_err.is_none() {
                    first_err =
                        Some(ServiceError::Internal(format!("projection task failed: {join_err}")));
                }
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    // All writers are done; the lock is uncontended from here on.
    let map = map.lock().await;
    Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
}
