use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio_util::sync::CancellationToken;

use crate::ActionRequestClient;

/// Reports whether the enclosing process is still running.
pub trait ShutdownOracle {
    fn is_alive(&self) -> bool;
}

impl ShutdownOracle for CancellationToken {
    fn is_alive(&self) -> bool {
        !self.is_cancelled()
    }
}

impl ShutdownOracle for Arc<AtomicBool> {
    fn is_alive(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Environment an action node is bound to.
///
/// Shared read-only between all nodes of a tree, each node creates its own client from it.
pub trait ActionContext {
    type Client: ActionRequestClient;
    type Oracle: ShutdownOracle;

    fn create_client(&self, address: &str) -> Self::Client;

    fn shutdown_oracle(&self) -> Self::Oracle;

    /// Attached to every log line emitted by nodes bound to this context
    fn logger_name(&self) -> &str;
}
