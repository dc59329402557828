use std::time::Duration;

use async_trait::async_trait;
use behaviortree_common::{StatefulAction, Status};

use crate::{
    ActionContext, ActionError, ActionNodeConfig, ActionRequest, ActionRequestClient,
    ActionResponse, ServiceGate,
};

/// Lifecycle of one activation of an action node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActionPhase {
    /// Never started
    Idle,
    /// Start requested, waiting for the arbiter to become reachable
    AwaitingService,
    /// Activation request sent, waiting for the acknowledgment
    AwaitingResponse,
    /// Activation acknowledged by the arbiter
    Running,
    Succeeded,
    Failed,
    Halted,
}

impl ActionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionPhase::Succeeded | ActionPhase::Failed | ActionPhase::Halted
        )
    }
}

/// Claims a named action from the arbiter on start and releases it on halt.
///
/// Both requests go through the same client and are held back by a `ServiceGate`
/// until the arbiter is reachable.
pub struct ActionRequestNode<C>
where
    C: ActionContext,
{
    name: String,
    logger: String,
    client: C::Client,
    gate: ServiceGate<C::Oracle>,
    response_timeout: Duration,

    // State
    phase: ActionPhase,
}

impl<C> ActionRequestNode<C>
where
    C: ActionContext,
{
    pub fn new(
        name: impl Into<String>,
        context: &C,
        config: &ActionNodeConfig,
    ) -> Result<Self, ActionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ActionError::InvalidName);
        }
        config.validate()?;

        Ok(Self {
            name,
            logger: context.logger_name().to_owned(),
            client: context.create_client(&config.address),
            gate: ServiceGate::new(config.retry_policy(), context.shutdown_oracle()),
            response_timeout: config.response_timeout(),
            phase: ActionPhase::Idle,
        })
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn address(&self) -> &str {
        self.client.address()
    }

    /// Records a completion observed outside of this node
    ///
    /// Only a running action can complete. A completed action is not released on halt
    pub fn complete(&mut self) -> bool {
        if self.phase != ActionPhase::Running {
            return false;
        }
        tracing::info!(logger = %self.logger, "Action completed: {}", self.name);
        self.phase = ActionPhase::Succeeded;
        true
    }

    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(action = %self.name, logger = %self.logger),
        err
    )]
    async fn activate(&mut self) -> Result<ActionResponse, ActionError> {
        self.phase = ActionPhase::AwaitingService;
        self.gate.wait(&self.client).await?;

        self.phase = ActionPhase::AwaitingResponse;
        self.send(ActionRequest::require(&self.name)).await
    }

    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(action = %self.name, logger = %self.logger),
        err
    )]
    async fn deactivate(&self) -> Result<ActionResponse, ActionError> {
        self.gate.wait(&self.client).await?;
        self.send(ActionRequest::release(&self.name)).await
    }

    async fn send(&self, request: ActionRequest) -> Result<ActionResponse, ActionError> {
        let budget = self.response_timeout;
        match tokio::time::timeout(budget, self.client.call(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(source)) => Err(ActionError::Channel {
                name: self.name.clone(),
                source,
            }),
            Err(_elapsed) => Err(ActionError::ResponseTimeout {
                name: self.name.clone(),
                budget,
            }),
        }
    }
}

#[async_trait(?Send)]
impl<C> StatefulAction for ActionRequestNode<C>
where
    C: ActionContext,
{
    #[tracing::instrument(level = "trace", name = "ActionNode::on_start", skip_all, ret)]
    async fn on_start(&mut self) -> Status {
        if self.phase == ActionPhase::Running {
            tracing::warn!(logger = %self.logger, "Action already running: {}", self.name);
            return Status::Running;
        }

        tracing::info!(logger = %self.logger, "Action requested: {}", self.name);
        match self.activate().await {
            Ok(_response) => {
                tracing::info!(logger = %self.logger, "Action request completed: {}", self.name);
                // Accepted only, the action itself is still ongoing
                self.phase = ActionPhase::Running;
                Status::Running
            }
            Err(error) => {
                tracing::error!(logger = %self.logger, %error, "Failed to start action {}", self.name);
                self.phase = ActionPhase::Failed;
                Status::Failure
            }
        }
    }

    #[tracing::instrument(level = "trace", name = "ActionNode::on_running", skip_all, ret)]
    async fn on_running(&mut self) -> Status {
        match self.phase {
            ActionPhase::Running => Status::Running,
            ActionPhase::Succeeded => Status::Success,
            _ => Status::Failure,
        }
    }

    #[tracing::instrument(level = "trace", name = "ActionNode::on_halted", skip_all)]
    async fn on_halted(&mut self) {
        if self.phase == ActionPhase::Idle || self.phase.is_terminal() {
            return;
        }
        if self.phase == ActionPhase::AwaitingService {
            // Start never got past the gate, the arbiter has nothing to release
            tracing::info!(logger = %self.logger, "Action halted before request: {}", self.name);
            self.phase = ActionPhase::Halted;
            return;
        }

        tracing::info!(logger = %self.logger, "Action cancelation requested: {}", self.name);
        match self.deactivate().await {
            Ok(_response) => {
                tracing::info!(logger = %self.logger, "Action cancelation completed: {}", self.name);
            }
            Err(error) => {
                tracing::error!(logger = %self.logger, %error, "Failed to stop action {}", self.name);
            }
        }
        self.phase = ActionPhase::Halted;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
