use std::future::Future;
use std::time::Duration;

use crate::{
    error::{Result, StoryboardError},
    logger,
    models::ModelTierList,
    orchestrator::{classify, deadline::with_deadline},
};

#[derive(Debug)]
pub struct TierOutcome<T> {
    pub value: T,
    /// Model that produced `value`.
    pub model: String,
    pub attempts: usize,
}

/// Runs `attempt` against each tier in order until one succeeds.
///
/// Each attempt is bounded by `deadline`. Timeouts and access denials demote
/// to the next tier; any other failure is returned at once. When every tier
/// is exhausted the last failure is returned.
pub async fn run_tiered<T, F, Fut>(
    tiers: &ModelTierList,
    deadline: Duration,
    mut attempt: F,
) -> Result<TierOutcome<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    assert!(!tiers.is_empty(), "tiered call needs at least one model");

    let mut last_error = None;

    for (index, model) in tiers.iter().enumerate() {
        let result = {
            let _timer = logger::timer(model);
            with_deadline(model, deadline, attempt(model.to_string())).await
        };

        match result {
            Ok(value) => {
                log::info!("{} answered (attempt {}/{})", model, index + 1, tiers.len());
                return Ok(TierOutcome {
                    value,
                    model: model.to_string(),
                    attempts: index + 1,
                });
            }
            Err(err) => {
                let err = classify::normalize(model, err);
                if !classify::is_access_class(&err) {
                    log::error!("{} failed, not retrying: {}", model, err);
                    return Err(err);
                }
                log::warn!("{} unavailable, demoting: {}", model, err);
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| StoryboardError::Config("no model tiers configured".into())))
}
