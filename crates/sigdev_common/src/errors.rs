//! Error taxonomy and exit codes
//!
//! Only poller exhaustion is fatal. Per-probe failures become
//! `Unhealthy` statuses and per-resource provisioning failures become
//! warnings; neither crosses a component boundary as an error.

use crate::retry::StageStatus;
use thiserror::Error;

/// Exit code for success / all services healthy
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when any service is unhealthy or readiness was not reached
pub const EXIT_UNHEALTHY: i32 = 1;

/// A readiness poller ran out of attempts before every stage passed.
///
/// Carries the last observed per-stage status so the operator can see
/// how far startup got (e.g. server up but app role not yet created).
#[derive(Debug, Error)]
#[error("{target} failed to become ready after {attempts} attempts ({})", format_stages(.stages))]
pub struct PollerExhausted {
    pub target: String,
    pub attempts: u32,
    pub stages: Vec<StageStatus>,
}

fn format_stages(stages: &[StageStatus]) -> String {
    stages
        .iter()
        .map(|s| format!("{}: {}", s.stage, s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
