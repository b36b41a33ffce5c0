use std::time::Duration;

use geotrack_core::error::Result;

use crate::error::ApiError;

/// Run a CPU-bound computation off the async workers under a deadline.
///
/// On expiry the computation's result is dropped; the callers only hand in
/// side-effect-free work, so nothing needs undoing.
pub async fn run_bounded<T, F>(
    operation: &'static str,
    deadline: Duration,
    work: F,
) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(join_err)) => {
            tracing::error!(operation, error = %join_err, "Computation task failed");
            Err(ApiError::internal(format!("{} failed", operation))
                .with_details(join_err.to_string()))
        }
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = deadline.as_millis() as u64,
                "Computation timed out"
            );
            Err(ApiError::gateway_timeout(format!("{} timed out", operation)))
        }
    }
}
