//! Probe execution engine
//!
//! Fan-out/fan-in: every probe runs concurrently, no probe's failure or
//! latency blocks another, and the report keeps input order regardless
//! of completion order. The engine itself never fails; a probe error
//! becomes an `Unhealthy` status and a dead probe task becomes
//! `Unknown`.

use crate::probe::Probe;
use sigdev_common::{RunReport, ServiceStatus};
use tracing::debug;

/// Run every probe concurrently and collect one status per probe, in
/// input order.
pub async fn run_probes(probes: Vec<Box<dyn Probe>>) -> RunReport {
    let mut handles = Vec::with_capacity(probes.len());

    for probe in probes {
        let name = probe.name().to_string();
        let url = probe.url().map(str::to_string);
        let handle = tokio::spawn(async move { probe.check().await });
        handles.push((name, url, handle));
    }

    let mut services = Vec::with_capacity(handles.len());
    for (name, url, handle) in handles {
        let status = match handle.await {
            Ok(Ok(())) => {
                debug!("probe {} healthy", name);
                ServiceStatus::healthy(name, url)
            }
            Ok(Err(e)) => {
                debug!("probe {} unhealthy: {}", name, e);
                ServiceStatus::unhealthy(name, e.to_string(), url)
            }
            Err(e) => ServiceStatus::unknown(name, format!("probe task failed: {}", e), url),
        };
        services.push(status);
    }

    RunReport::new(services)
}
