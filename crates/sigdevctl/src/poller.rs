//! Bounded retry poller
//!
//! Blocks until every readiness stage of one critical dependency passes
//! within the same attempt, or the attempt ceiling is reached. This is
//! the only component that suspends the calling flow on wall-clock
//! time; worst case `max_attempts x wait_interval`.

use crate::probe::Probe;
use sigdev_common::{PollerExhausted, RetryConfig, StageStatus};
use tracing::{debug, info};

/// Drives ordered readiness stages against a single dependency.
///
/// Stages represent successive levels of readiness, e.g. "server
/// accepts connections" before "dev user usable". Every stage runs on
/// every attempt so the exhaustion diagnostics always carry a complete
/// per-stage picture.
pub struct ReadinessPoller {
    target: String,
    config: RetryConfig,
    stages: Vec<Box<dyn Probe>>,
}

impl ReadinessPoller {
    pub fn new(target: impl Into<String>, config: RetryConfig, stages: Vec<Box<dyn Probe>>) -> Self {
        Self {
            target: target.into(),
            config,
            stages,
        }
    }

    /// Retry until ready or exhausted. Returns the attempt number on
    /// which every stage passed.
    pub async fn wait_until_ready(&self) -> Result<u32, PollerExhausted> {
        info!("waiting for {} to be ready...", self.target);

        let mut last_statuses: Vec<StageStatus> = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            last_statuses.clear();
            for stage in &self.stages {
                let result = stage.check().await;
                if let Err(e) = &result {
                    debug!("stage {:?} failed: {}", stage.name(), e);
                }
                last_statuses.push(StageStatus {
                    stage: stage.name().to_string(),
                    passed: result.is_ok(),
                });
            }

            if last_statuses.iter().all(|s| s.passed) {
                info!("{} is ready (attempt {})", self.target, attempt);
                return Ok(attempt);
            }

            if attempt < self.config.max_attempts {
                info!(
                    "{} ({}/{})",
                    progress_message(&self.target, &last_statuses),
                    attempt,
                    self.config.max_attempts
                );
                tokio::time::sleep(self.config.wait_interval).await;
            }
        }

        Err(PollerExhausted {
            target: self.target.clone(),
            attempts: self.config.max_attempts,
            stages: last_statuses,
        })
    }
}

/// Distinguish "nothing up yet" from "partway there" so the operator
/// can see which startup phase is stuck.
fn progress_message(target: &str, statuses: &[StageStatus]) -> String {
    let first_failed = statuses.iter().position(|s| !s.passed);
    match first_failed {
        Some(0) | None => format!("waiting for {}...", target),
        Some(i) => format!(
            "{} OK, waiting on {}...",
            statuses[i - 1].stage,
            statuses[i].stage
        ),
    }
}
