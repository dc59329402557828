use std::{num::NonZeroUsize, time::Duration};

use crate::{ActionError, RetryPolicy};

pub const DEFAULT_ACTION_ADDRESS: &str = "/action/request";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActionNodeConfig {
    /// Address of the arbiter's action request endpoint
    pub address: String,
    /// Budget of a single reachability probe, also the retry interval
    pub service_wait_ms: u64,
    /// Budget for the acknowledgment of a sent request
    pub response_timeout_ms: u64,
    /// Unbounded when `None`
    pub max_service_attempts: Option<NonZeroUsize>,
}

impl Default for ActionNodeConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ACTION_ADDRESS.to_owned(),
            service_wait_ms: 1000,
            response_timeout_ms: 1000,
            max_service_attempts: None,
        }
    }
}

impl ActionNodeConfig {
    pub fn validate(&self) -> Result<(), ActionError> {
        if self.address.is_empty() {
            return Err(ActionError::InvalidConfig("address is empty".into()));
        }
        if self.service_wait_ms == 0 {
            return Err(ActionError::InvalidConfig(
                "service_wait_ms must be greater than 0".into(),
            ));
        }
        if self.response_timeout_ms == 0 {
            return Err(ActionError::InvalidConfig(
                "response_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.service_wait_ms),
            max_attempts: self.max_service_attempts,
        }
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: ActionNodeConfig =
            serde_json::from_str(r#"{"response_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.address, DEFAULT_ACTION_ADDRESS);
        assert_eq!(config.service_wait_ms, 1000);
        assert_eq!(config.response_timeout(), Duration::from_millis(250));
        assert_eq!(config.max_service_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_retry_policy() {
        let config: ActionNodeConfig =
            serde_json::from_str(r#"{"service_wait_ms": 500, "max_service_attempts": 3}"#)
                .unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.interval, Duration::from_millis(500));
        assert_eq!(policy.max_attempts, NonZeroUsize::new(3));
    }

    #[test]
    fn test_config_validate() {
        let config = ActionNodeConfig {
            address: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ActionError::InvalidConfig(_))
        ));

        let config = ActionNodeConfig {
            service_wait_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ActionNodeConfig {
            response_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
