use behaviortree_common::{StatefulAction, Status};

/// Drives a `StatefulAction` the way a host tree does.
pub struct AsyncChild {
    action: Box<dyn StatefulAction>,
    status: tokio::sync::watch::Sender<Option<Status>>,

    // Set while a tick is awaited, stays set if that tick is dropped
    in_flight: bool,
}

impl AsyncChild {
    pub fn new(action: Box<dyn StatefulAction>) -> Self {
        let (status, _rx) = tokio::sync::watch::channel(None);
        Self {
            action,
            status,
            in_flight: false,
        }
    }

    /// Follows the status published after every tick and halt
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Status>> {
        self.status.subscribe()
    }

    /// Starts the action when idle or completed, otherwise polls it
    #[tracing::instrument(
        level = "trace",
        name = "AsyncChild::tick",
        skip_all,
        fields(action = self.action.name()),
        ret
    )]
    pub async fn tick(&mut self) -> Status {
        let current = *self.status.borrow();
        self.in_flight = true;
        let status = match current {
            Some(status) if !status.is_completed() => self.action.on_running().await,
            _ => self.action.on_start().await,
        };
        self.in_flight = false;
        self.status.send_replace(Some(status));
        status
    }

    /// Halts the action if it is running or an unfinished tick was dropped, then clears the status
    #[tracing::instrument(
        level = "trace",
        name = "AsyncChild::halt",
        skip_all,
        fields(action = self.action.name())
    )]
    pub async fn halt(&mut self) {
        let current = *self.status.borrow();
        if self.in_flight || current == Some(Status::Running) {
            self.action.on_halted().await;
        }
        self.in_flight = false;
        self.status.send_replace(None);
    }

    pub fn status(&self) -> Option<Status> {
        *self.status.borrow()
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }
}
