pub mod direct;
pub mod rendered;

use std::future::Future;
use std::time::Duration;
use url::Url;

/// One unit of aggregated CSS with the base URL its relative references
/// resolve against.
#[derive(Debug, Clone)]
pub struct CssSource {
    /// Base URL for relative references inside `text`
    pub url: Url,
    /// Raw stylesheet text
    pub text: String,
}

/// Result of a bounded readiness wait.
///
/// Two of the three waits in the rendered pipeline deliberately continue on
/// timeout, so timeouts are values rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition was observed before the deadline
    Met,
    /// The deadline elapsed; the caller proceeds regardless
    TimedOutContinue,
    /// The deadline elapsed; the caller must abort
    TimedOutFail,
}

/// Polls `probe` until it reports true or `deadline` elapses, returning
/// `on_timeout` in the latter case. The probe always runs at least once.
pub async fn bounded_wait<F, Fut>(
    deadline: Duration,
    interval: Duration,
    on_timeout: WaitOutcome,
    mut probe: F,
) -> WaitOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = tokio::time::Instant::now();
    loop {
        if probe().await {
            return WaitOutcome::Met;
        }
        if started.elapsed() >= deadline {
            return on_timeout;
        }
        tokio::time::sleep(interval).await;
    }
}
