mod status;
pub use status::*;

mod ports;
pub use ports::*;

mod stateful_action;
pub use stateful_action::*;
