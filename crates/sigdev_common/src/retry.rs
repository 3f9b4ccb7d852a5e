//! Retry configuration for the blocking readiness pollers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded retry parameters: a hard attempt ceiling and a fixed wait
/// between attempts. `max_attempts` is always at least 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    #[serde(with = "duration_millis")]
    pub wait_interval: Duration,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, wait_interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            wait_interval,
        }
    }

    /// PostgreSQL can take a while on first boot: 30 attempts x 2s
    pub fn postgres_default() -> Self {
        Self::new(30, Duration::from_secs(2))
    }

    /// LocalStack default: 20 attempts x 2s
    pub fn localstack_default() -> Self {
        Self::new(20, Duration::from_secs(2))
    }
}

/// Last observed outcome of a single readiness stage, carried by the
/// exhaustion error for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageStatus {
    pub stage: String,
    pub passed: bool,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        if self.passed {
            "OK"
        } else {
            "FAILED"
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(de)?;
        Ok(Duration::from_millis(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_attempts_is_clamped_to_one() {
        let config = RetryConfig::new(0, Duration::from_millis(100));
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn defaults_match_stack_expectations() {
        assert_eq!(RetryConfig::postgres_default().max_attempts, 30);
        assert_eq!(RetryConfig::localstack_default().max_attempts, 20);
        assert_eq!(
            RetryConfig::postgres_default().wait_interval,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn wait_interval_round_trips_as_millis() {
        let config = RetryConfig::new(3, Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        let back: RetryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.wait_interval, Duration::from_millis(250));
    }
}
