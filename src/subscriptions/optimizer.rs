//! Subscribe only the host events some zone needs.
//!
//! The optimizer tracks the global flag set (the union of every live
//! zone's definition flags). Whenever it changes, every managed hook is
//! unsubscribed and exactly the hooks the new set requires are subscribed
//! again. Rebuilding instead of diffing keeps the logic trivially correct;
//! the optimizer also remembers what it subscribed so the bus never sees
//! a duplicate subscription or an unsubscribe for something inactive.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::hooks::Hook;
use crate::flags::FlagSet;
use crate::host::EventBus;

/// Keeps host event subscriptions in line with the global flag set.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionOptimizer {
    global: FlagSet,
    subscribed: FxHashSet<Hook>,
    rebuilds: u64,
}

impl SubscriptionOptimizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of all live zones' flags, as of the last recompute.
    #[must_use]
    pub fn global_flags(&self) -> FlagSet {
        self.global
    }

    #[must_use]
    pub fn is_subscribed(&self, hook: Hook) -> bool {
        self.subscribed.contains(&hook)
    }

    /// Currently subscribed hooks, sorted.
    #[must_use]
    pub fn subscribed(&self) -> Vec<Hook> {
        let mut hooks: Vec<Hook> = self.subscribed.iter().copied().collect();
        hooks.sort_unstable();
        hooks
    }

    /// Number of rebuilds performed.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Recompute from a new global flag set.
    ///
    /// Does nothing when the set is unchanged, unless `force` is set.
    pub fn recompute(&mut self, global: FlagSet, bus: &mut dyn EventBus, force: bool) {
        if global == self.global && !force {
            return;
        }
        self.global = global;
        self.rebuild(bus);
    }

    fn rebuild(&mut self, bus: &mut dyn EventBus) {
        for &hook in Hook::ALL {
            if self.subscribed.remove(&hook) {
                bus.unsubscribe(hook);
            }
        }

        let required = Hook::required_by_set(self.global);
        for &hook in &required {
            if self.subscribed.insert(hook) {
                bus.subscribe(hook);
            }
        }

        self.rebuilds += 1;
        debug!(
            global = %self.global,
            subscribed = required.len(),
            "rebuilt event subscriptions"
        );
    }

    /// Unsubscribe everything, e.g. when the engine shuts down.
    pub fn clear(&mut self, bus: &mut dyn EventBus) {
        self.global = FlagSet::EMPTY;
        for hook in self.subscribed.drain() {
            bus.unsubscribe(hook);
        }
    }
}
