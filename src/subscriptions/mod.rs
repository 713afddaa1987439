//! Event subscription management.
//!
//! Hooks are expensive for the host to dispatch, so the engine only
//! subscribes to the ones some live zone's flags actually need.

mod hooks;
mod optimizer;

pub use hooks::Hook;
pub use optimizer::SubscriptionOptimizer;
