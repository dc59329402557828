use std::sync::Arc;

use crate::{ActionContext, ActionError, ActionNodeConfig, ActionRequestNode};

/// Builds action nodes bound to one shared context.
pub struct ActionNodeFactory<C> {
    context: Arc<C>,
    config: ActionNodeConfig,
}

impl<C> ActionNodeFactory<C>
where
    C: ActionContext,
{
    pub fn new(context: Arc<C>, config: ActionNodeConfig) -> Result<Self, ActionError> {
        config.validate()?;
        Ok(Self { context, config })
    }

    pub fn create(&self, name: impl Into<String>) -> Result<ActionRequestNode<C>, ActionError> {
        ActionRequestNode::new(name, self.context.as_ref(), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionPhase, test_action_interface::FakeContext};

    #[test]
    fn test_factory_creates_one_client_per_node() {
        let context = Arc::new(FakeContext::default());
        let config = ActionNodeConfig {
            address: "/rosa_kb/action/request".into(),
            ..Default::default()
        };
        let factory = ActionNodeFactory::new(context.clone(), config).unwrap();

        let pick = factory.create("pick_object").unwrap();
        let place = factory.create("place_object").unwrap();
        assert_eq!(pick.address(), "/rosa_kb/action/request");
        assert_eq!(place.phase(), ActionPhase::Idle);
        assert_eq!(context.clients().len(), 2);

        assert!(matches!(factory.create(""), Err(ActionError::InvalidName)));
    }

    #[test]
    fn test_factory_rejects_invalid_config() {
        let config = ActionNodeConfig {
            service_wait_ms: 0,
            ..Default::default()
        };
        let result = ActionNodeFactory::new(Arc::new(FakeContext::default()), config);
        assert!(matches!(result, Err(ActionError::InvalidConfig(_))));
    }
}
