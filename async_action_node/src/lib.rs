pub use behaviortree_common::*;

mod error;
pub use error::*;

mod action_message;
pub use action_message::*;

mod action_client;
pub use action_client::*;

mod action_context;
pub use action_context::*;

mod config;
pub use config::*;

mod service_gate;
pub use service_gate::*;

mod action_node;
pub use action_node::*;

mod action_factory;
pub use action_factory::*;

mod async_child;
pub use async_child::*;

pub mod local;

#[cfg(test)]
mod test_action_interface;
