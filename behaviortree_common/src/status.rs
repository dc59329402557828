/// The result of a behavior or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    /// The behavior or action succeeded.
    Success,
    /// The behavior or action failed.
    Failure,
    /// The behavior or action is still running.
    Running,
}

impl Status {
    /// `Success` and `Failure` end an activation, `Running` does not
    pub fn is_completed(&self) -> bool {
        !matches!(self, Status::Running)
    }
}
