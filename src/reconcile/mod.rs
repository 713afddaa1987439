//! Periodic containment checks.
//!
//! Enter and exit events from the host are the primary membership signal,
//! but they can be missed (teleports, admin moves, lag). The scheduler
//! walks every tracked member in a round-robin, checking actual position
//! against membership, without ever spending more than its per-pass
//! budget.

mod scheduler;

pub use scheduler::{Outcome, PassReport, ReconciliationScheduler};
