//! Sigdev Control - readiness and bootstrap orchestrator for the
//! signature platform dev stack
//!
//! Three surfaces share one engine shape (probe, retry, report):
//! a one-shot health report over every declared service, a blocking
//! bounded-retry wait for PostgreSQL, and LocalStack provisioning.

pub mod bootstrap;
pub mod catalog;
pub mod engine;
pub mod logging;
pub mod poller;
pub mod probe;
pub mod report;

pub use bootstrap::{Bootstrapper, BootstrapSummary, ResourceRunner, ResourceSpec};
pub use engine::run_probes;
pub use poller::ReadinessPoller;
pub use probe::{CommandProbe, Expectation, HttpProbe, LocalStackProbe, Probe};
