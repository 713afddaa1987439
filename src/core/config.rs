//! Engine configuration.
//!
//! Hosts configure the engine once at startup. All values have working
//! defaults; override them with the `with_*` builder methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning parameters for the zone engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run a reconciliation pass every N ticks (default: 10).
    /// A value of 0 is treated as 1.
    pub reconcile_interval_ticks: u64,

    /// Wall-clock budget for one reconciliation pass (default: 250µs).
    /// Members not reached within the budget wait for the next pass.
    pub reconcile_budget: Duration,

    /// Ticks a member waits after being reconciled before it is due again
    /// (default: 10). A value of 0 is treated as 1.
    pub requeue_delay_ticks: u64,

    /// Distance beyond a zone's bounding extent used as the ejection
    /// target (default: 10.0).
    pub eject_margin: f32,

    /// Distance inside a zone's inscribed extent used when pushing a
    /// subject back in (default: 2.0).
    pub push_back_margin: f32,

    /// Cell size of the spatial index on the XZ plane (default: 64.0).
    pub grid_cell_size: f32,

    /// Ticks over which a retired ambient effect shrinks to nothing
    /// (default: 5).
    pub ambient_teardown_ticks: u32,

    /// Permission prefix that exempts a subject from one flag's policy.
    /// The lower-cased flag name is appended (default:
    /// `"zonemanager.ignoreflag."`).
    pub bypass_permission_prefix: String,

    /// Seed for the built-in spawn-set provider (default: 42).
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_ticks: 10,
            reconcile_budget: Duration::from_micros(250),
            requeue_delay_ticks: 10,
            eject_margin: 10.0,
            push_back_margin: 2.0,
            grid_cell_size: 64.0,
            ambient_teardown_ticks: 5,
            bypass_permission_prefix: "zonemanager.ignoreflag.".to_string(),
            rng_seed: 42,
        }
    }
}

impl EngineConfig {
    /// Set how often reconciliation runs, in ticks.
    #[must_use]
    pub fn with_reconcile_interval(mut self, ticks: u64) -> Self {
        self.reconcile_interval_ticks = ticks;
        self
    }

    /// Set the per-pass reconciliation budget.
    #[must_use]
    pub fn with_reconcile_budget(mut self, budget: Duration) -> Self {
        self.reconcile_budget = budget;
        self
    }

    /// Set the delay before a reconciled member is due again.
    #[must_use]
    pub fn with_requeue_delay(mut self, ticks: u64) -> Self {
        self.requeue_delay_ticks = ticks;
        self
    }

    /// Set the ejection margin.
    #[must_use]
    pub fn with_eject_margin(mut self, margin: f32) -> Self {
        self.eject_margin = margin;
        self
    }

    /// Set the spatial index cell size.
    #[must_use]
    pub fn with_grid_cell_size(mut self, size: f32) -> Self {
        self.grid_cell_size = size;
        self
    }

    /// Set the ambient teardown duration.
    #[must_use]
    pub fn with_ambient_teardown(mut self, ticks: u32) -> Self {
        self.ambient_teardown_ticks = ticks;
        self
    }

    /// Set the RNG seed for spawn selection.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Effective reconciliation interval (never zero).
    #[must_use]
    pub fn reconcile_interval(&self) -> u64 {
        self.reconcile_interval_ticks.max(1)
    }

    /// Effective requeue delay (never zero).
    #[must_use]
    pub fn requeue_delay(&self) -> u64 {
        self.requeue_delay_ticks.max(1)
    }

    /// Permission name that bypasses the named flag.
    #[must_use]
    pub fn bypass_permission(&self, flag_name: &str) -> String {
        format!("{}{}", self.bypass_permission_prefix, flag_name.to_ascii_lowercase())
    }
}
