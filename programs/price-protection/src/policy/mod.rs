//! Policy state machine

pub mod lifecycle;
pub mod state;

pub use lifecycle::{create_policy, expire_policy, trigger_policy, PolicyRequest};
pub use state::{ModuleState, Policy, PolicyStatus};
