use std::{num::NonZeroUsize, time::Duration};

use crate::{ActionError, ActionRequestClient, ShutdownOracle};

/// Fixed interval retry, no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Budget of one reachability probe
    pub interval: Duration,
    /// Retries until shutdown when `None`
    pub max_attempts: Option<NonZeroUsize>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// Holds a request back until the remote endpoint is reachable.
pub struct ServiceGate<O> {
    policy: RetryPolicy,
    oracle: O,
}

impl<O> ServiceGate<O>
where
    O: ShutdownOracle,
{
    pub fn new(policy: RetryPolicy, oracle: O) -> Self {
        Self { policy, oracle }
    }

    /// Probes `client` until it is reachable and returns the number of probes made
    ///
    /// Shutdown is only checked after a failed probe
    #[tracing::instrument(
        level = "debug",
        name = "ServiceGate::wait",
        skip_all,
        fields(address = client.address()),
        err
    )]
    pub async fn wait<C>(&self, client: &C) -> Result<usize, ActionError>
    where
        C: ActionRequestClient + ?Sized,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if client.wait_for_reachable(self.policy.interval).await {
                return Ok(attempts);
            }

            if !self.oracle.is_alive() {
                tracing::error!("Interrupted while waiting for the service. Exiting.");
                return Err(ActionError::ShutdownDuringWait {
                    address: client.address().to_owned(),
                });
            }

            if let Some(max_attempts) = self.policy.max_attempts
                && attempts >= max_attempts.get()
            {
                return Err(ActionError::AttemptsExhausted {
                    address: client.address().to_owned(),
                    attempts,
                });
            }

            tracing::info!(
                "service {} not available, waiting again...",
                client.address()
            );
        }
    }
}
