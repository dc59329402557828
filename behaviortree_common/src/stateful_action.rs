use crate::{PortsList, Status};

/// Host tree contract for an action that keeps running across ticks.
///
/// The host calls `on_start` when the action is activated, then `on_running`
/// for as long as `Status::Running` is returned.
/// `on_halted` is only invoked for an action the host still considers running.
#[async_trait::async_trait(?Send)]
pub trait StatefulAction {
    /// Invoked once per activation
    async fn on_start(&mut self) -> Status;

    /// Invoked while the last returned status is `Status::Running`
    async fn on_running(&mut self) -> Status;

    /// Invoked when a running action is interrupted by the host
    ///
    /// Has no failure channel, errors must be handled internally
    async fn on_halted(&mut self);

    /// Identify your action
    fn name(&self) -> &str;

    fn provided_ports() -> PortsList
    where
        Self: Sized,
    {
        PortsList::default()
    }
}
