use std::time::Duration;

use crate::{ActionRequest, ActionResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("no endpoint is serving the address")]
    Unreachable,
    #[error("request dropped by the remote endpoint")]
    Disconnected,
}

/// Client side of the request channel, bound to one address for its lifetime.
#[async_trait::async_trait(?Send)]
pub trait ActionRequestClient {
    fn address(&self) -> &str;

    /// Waits at most `timeout` for the remote endpoint to become reachable
    ///
    /// Returns `true` as soon as it is reachable, `false` once `timeout` elapsed
    async fn wait_for_reachable(&self, timeout: Duration) -> bool;

    /// Sends `request` and waits for the acknowledgment
    ///
    /// NOTE: Unbounded. Callers apply their own response budget
    async fn call(&self, request: ActionRequest) -> Result<ActionResponse, ChannelError>;
}
