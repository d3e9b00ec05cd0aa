use std::future::Future;
use std::time::Duration;

use crate::error::{Result, StoryboardError};

/// Awaits `operation` for at most `deadline`.
///
/// On expiry the future is dropped and a [`StoryboardError::Timeout`] is
/// returned. The remote side is not told; it may still finish the work.
pub async fn with_deadline<T, F>(model: &str, deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("{} did not answer within {}ms", model, deadline.as_millis());
            Err(StoryboardError::Timeout {
                model: model.to_string(),
                after: deadline,
            })
        }
    }
}
