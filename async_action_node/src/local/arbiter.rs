use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{ActionRequest, ActionResponse, local::ServiceEndpoint};

#[derive(Debug, Default)]
struct ArbiterState {
    selectable: BTreeSet<String>,
    required: BTreeSet<String>,
}

/// Keeps track of which actions are currently required.
///
/// Only selectable actions can be required. Every request is acknowledged,
/// whether or not it changed anything.
#[derive(Debug, Clone, Default)]
pub struct ActionArbiter {
    state: Arc<Mutex<ArbiterState>>,
    response_delay: Duration,
}

impl ActionArbiter {
    pub fn new<I>(selectable: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let state = ArbiterState {
            selectable: selectable.into_iter().map(Into::into).collect(),
            required: BTreeSet::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            response_delay: Duration::ZERO,
        }
    }

    /// Delays every acknowledgment, simulating a slow arbiter
    pub fn with_response_delay(mut self, response_delay: Duration) -> Self {
        self.response_delay = response_delay;
        self
    }

    pub fn add_selectable(&self, name: impl Into<String>) {
        self.state().selectable.insert(name.into());
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.state().required.contains(name)
    }

    pub fn required_actions(&self) -> Vec<String> {
        self.state().required.iter().cloned().collect()
    }

    #[tracing::instrument(level = "debug", name = "ActionArbiter::handle", skip(self))]
    pub fn handle(&self, request: &ActionRequest) -> ActionResponse {
        let mut state = self.state();
        if !request.is_required {
            if state.required.remove(&request.name) {
                tracing::info!("Action released: {}", request.name);
            }
        } else if state.selectable.contains(&request.name) {
            state.required.insert(request.name.clone());
            tracing::info!("Action required: {}", request.name);
        } else {
            tracing::warn!("Action is not selectable: {}", request.name);
        }
        ActionResponse::default()
    }

    /// Answers requests until the endpoint closes
    pub async fn serve(self, mut endpoint: ServiceEndpoint) {
        tracing::info!("Arbiter serving {}", endpoint.address());
        while let Some(call) = endpoint.recv().await {
            let response = self.handle(call.request());
            if !self.response_delay.is_zero() {
                tokio::time::sleep(self.response_delay).await;
            }
            if !call.respond(response) {
                tracing::debug!("Requester stopped waiting");
            }
        }
        tracing::info!("Arbiter stopped serving {}", endpoint.address());
    }

    fn state(&self) -> MutexGuard<'_, ArbiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_and_release() {
        let arbiter = ActionArbiter::new(["pick_object", "place_object"]);

        arbiter.handle(&ActionRequest::require("pick_object"));
        arbiter.handle(&ActionRequest::require("place_object"));
        assert_eq!(
            arbiter.required_actions(),
            vec!["pick_object".to_owned(), "place_object".to_owned()]
        );

        arbiter.handle(&ActionRequest::release("pick_object"));
        assert!(!arbiter.is_required("pick_object"));
        assert!(arbiter.is_required("place_object"));

        // Releasing an action that is not required is acknowledged too
        let response = arbiter.handle(&ActionRequest::release("pick_object"));
        assert_eq!(response, ActionResponse::default());
    }

    #[test]
    fn test_unselectable_action() {
        let arbiter = ActionArbiter::new(["pick_object"]);

        arbiter.handle(&ActionRequest::require("dance"));
        assert!(!arbiter.is_required("dance"));

        arbiter.add_selectable("dance");
        arbiter.handle(&ActionRequest::require("dance"));
        assert!(arbiter.is_required("dance"));
    }
}
