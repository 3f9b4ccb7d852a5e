//! Service status model
//!
//! One `ServiceStatus` per probe per run. Statuses are never mutated
//! after creation; a new run produces a fresh set.

use serde::{Deserialize, Serialize};

/// Health classification for a single service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    /// Check could not be completed (e.g. probe task died)
    Unknown,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of one probe against one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub state: HealthState,
    /// Diagnostic message, present when the check did not pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint the service is expected to listen on, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ServiceStatus {
    pub fn healthy(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            state: HealthState::Healthy,
            message: None,
            url,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            state: HealthState::Unhealthy,
            message: Some(message.into()),
            url,
        }
    }

    pub fn unknown(name: impl Into<String>, message: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            state: HealthState::Unknown,
            message: Some(message.into()),
            url,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state == HealthState::Healthy
    }
}

/// Ordered per-service results for one orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub services: Vec<ServiceStatus>,
}

impl RunReport {
    pub fn new(services: Vec<ServiceStatus>) -> Self {
        Self { services }
    }

    pub fn healthy_count(&self) -> usize {
        self.services.iter().filter(|s| s.is_healthy()).count()
    }

    pub fn total_count(&self) -> usize {
        self.services.len()
    }

    /// True iff every service is healthy. Vacuously true for an empty run.
    pub fn all_healthy(&self) -> bool {
        self.services.iter().all(|s| s.is_healthy())
    }

    /// Names of services that did not come back healthy
    pub fn unhealthy_names(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|s| !s.is_healthy())
            .map(|s| s.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_healthy_requires_every_service() {
        let report = RunReport::new(vec![
            ServiceStatus::healthy("PostgreSQL", None),
            ServiceStatus::unhealthy("Redis", "ping failed", None),
        ]);

        assert!(!report.all_healthy());
        assert_eq!(report.healthy_count(), 1);
        assert_eq!(report.total_count(), 2);
        assert_eq!(report.unhealthy_names(), vec!["Redis"]);
    }

    #[test]
    fn empty_report_is_vacuously_healthy() {
        let report = RunReport::new(vec![]);
        assert!(report.all_healthy());
        assert_eq!(report.healthy_count(), 0);
    }

    #[test]
    fn unknown_is_not_healthy() {
        let report = RunReport::new(vec![ServiceStatus::unknown(
            "LocalStack",
            "probe task failed",
            None,
        )]);
        assert!(!report.all_healthy());
    }

    #[test]
    fn status_serializes_lowercase() {
        let status = ServiceStatus::healthy("Web frontend", Some("http://localhost:3000".into()));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "healthy");
        assert_eq!(json["url"], "http://localhost:3000");
        assert!(json.get("message").is_none());
    }
}
