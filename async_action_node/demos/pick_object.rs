use std::{sync::Arc, time::Duration};

use async_action_node::{
    ActionNodeConfig, ActionNodeFactory, AsyncChild, Status,
    local::{ActionArbiter, LocalBus},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    tracing_subscriber::Registry::default()
        .with(tracing_forest::ForestLayer::default())
        .try_init()
        .map_err(|e| e.to_string())?;

    let config: ActionNodeConfig =
        serde_json::from_str(r#"{"address": "/rosa_kb/action/request", "service_wait_ms": 500}"#)
            .map_err(|e| e.to_string())?;

    let bus = LocalBus::new("task_planner");
    let arbiter = ActionArbiter::new(["pick_object", "place_object"])
        .with_response_delay(Duration::from_millis(100));

    // The arbiter comes up after the planner, the node waits for it
    let endpoint_bus = bus.clone();
    let endpoint_address = config.address.clone();
    let serving_arbiter = arbiter.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1200)).await;
        let endpoint = endpoint_bus.serve(endpoint_address, 8);
        serving_arbiter.serve(endpoint).await;
    });

    let factory = ActionNodeFactory::new(Arc::new(bus.clone()), config).map_err(|e| e.to_string())?;
    let node = factory.create("pick_object").map_err(|e| e.to_string())?;
    let mut child = AsyncChild::new(Box::new(node));

    let status = child.tick().await;
    tracing::info!("pick_object: {status:?}, required: {:?}", arbiter.required_actions());
    if status != Status::Running {
        return Err("pick_object was not accepted".into());
    }

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let status = child.tick().await;
        tracing::info!("pick_object: {status:?}");
    }

    child.halt().await;
    tracing::info!("After halt, required: {:?}", arbiter.required_actions());

    bus.shutdown_token().cancel();
    Ok(())
}
