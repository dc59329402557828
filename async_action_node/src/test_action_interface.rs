use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    ActionContext, ActionRequest, ActionRequestClient, ActionResponse, ChannelError,
};

pub const INTERVAL: Duration = Duration::from_millis(1000);

pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let _ignore = tracing_subscriber::Registry::default()
        .with(tracing_forest::ForestLayer::default())
        .try_init();
}

#[derive(Debug, Clone, Copy)]
pub enum FakeReply {
    After(Duration),
    Never,
    Drop,
}

#[derive(Debug, Default)]
pub struct FakeScript {
    /// Number of probes answered with "unreachable" before the service shows up
    pub unreachable_probes: usize,
    /// Cancels the shutdown token once this many probes were made
    pub shutdown_after_probes: Option<usize>,
    /// Consumed one per request, answers immediately once empty
    pub replies: VecDeque<FakeReply>,
}

#[derive(Debug, Default)]
struct FakeState {
    script: FakeScript,
    probes: Vec<Instant>,
    requests: Vec<ActionRequest>,
    clients: Vec<String>,
}

/// Scripted arbiter reachable through `FakeClient`.
#[derive(Debug, Clone, Default)]
pub struct FakeContext {
    state: Rc<RefCell<FakeState>>,
    token: CancellationToken,
}

impl FakeContext {
    pub fn new(script: FakeScript) -> Self {
        let context = Self::default();
        context.state.borrow_mut().script = script;
        context
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn probes(&self) -> Vec<Instant> {
        self.state.borrow().probes.clone()
    }

    pub fn requests(&self) -> Vec<ActionRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn clients(&self) -> Vec<String> {
        self.state.borrow().clients.clone()
    }

    /// Replaces the script, keeping everything recorded so far
    pub fn rescript(&self, script: FakeScript) {
        self.state.borrow_mut().script = script;
    }

    pub fn client(&self, address: &str) -> FakeClient {
        self.create_client(address)
    }
}

impl ActionContext for FakeContext {
    type Client = FakeClient;
    type Oracle = CancellationToken;

    fn create_client(&self, address: &str) -> Self::Client {
        self.state.borrow_mut().clients.push(address.to_owned());
        FakeClient {
            address: address.to_owned(),
            state: self.state.clone(),
            token: self.token.clone(),
        }
    }

    fn shutdown_oracle(&self) -> Self::Oracle {
        self.token.clone()
    }

    fn logger_name(&self) -> &str {
        "fake"
    }
}

pub struct FakeClient {
    address: String,
    state: Rc<RefCell<FakeState>>,
    token: CancellationToken,
}

#[async_trait::async_trait(?Send)]
impl ActionRequestClient for FakeClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn wait_for_reachable(&self, timeout: Duration) -> bool {
        let reachable = {
            let mut state = self.state.borrow_mut();
            state.probes.push(Instant::now());
            if let Some(after) = state.script.shutdown_after_probes
                && state.probes.len() >= after
            {
                self.token.cancel();
            }
            if state.script.unreachable_probes > 0 {
                state.script.unreachable_probes -= 1;
                false
            } else {
                true
            }
        };
        if !reachable {
            tokio::time::sleep(timeout).await;
        }
        reachable
    }

    async fn call(&self, request: ActionRequest) -> Result<ActionResponse, ChannelError> {
        let reply = {
            let mut state = self.state.borrow_mut();
            state.requests.push(request);
            state
                .script
                .replies
                .pop_front()
                .unwrap_or(FakeReply::After(Duration::ZERO))
        };
        match reply {
            FakeReply::After(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ActionResponse::default())
            }
            FakeReply::Never => std::future::pending().await,
            FakeReply::Drop => Err(ChannelError::Disconnected),
        }
    }
}
