//! In-process request channel and a reference arbiter serving it.

mod bus;
pub use bus::*;

mod arbiter;
pub use arbiter::*;
