use std::time::Duration;

use thiserror::Error;

use crate::ChannelError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Interrupted by shutdown while waiting for service {address}")]
    ShutdownDuringWait { address: String },
    #[error("No response for action {name} within {budget:?}")]
    ResponseTimeout { name: String, budget: Duration },
    #[error("Request for action {name} was not delivered")]
    Channel {
        name: String,
        #[source]
        source: ChannelError,
    },
    #[error("Service {address} not available after {attempts} attempts")]
    AttemptsExhausted { address: String, attempts: usize },
    #[error("Action name must not be empty")]
    InvalidName,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
