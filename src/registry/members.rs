//! Member tracking and the periodic reconciliation pass.

use std::rc::Rc;

use tracing::debug;

use super::events::ExitCause;
use super::ZoneRegistry;
use crate::core::{Member, ObjectId, SubjectId};
use crate::host::Host;
use crate::reconcile::{Outcome, PassReport};

impl ZoneRegistry {
    /// Start reconciling a subject. Returns false if it was already
    /// tracked.
    pub fn track_subject(&mut self, subject: SubjectId) -> bool {
        self.scheduler.enqueue(Member::Subject(subject), self.tick)
    }

    pub fn track_object(&mut self, object: ObjectId) -> bool {
        self.scheduler.enqueue(Member::Object(object), self.tick)
    }

    #[must_use]
    pub fn is_tracked(&self, member: Member) -> bool {
        self.scheduler.is_queued(member)
    }

    /// Number of members being reconciled.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Stop tracking a subject, removing it from every zone without
    /// messages or keep-in checks (e.g. on disconnect).
    pub fn forget_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId) {
        self.remove_subject(host, subject);
        self.scheduler.remove(Member::Subject(subject));
    }

    pub fn forget_object(&mut self, object: ObjectId) {
        self.remove_object(object);
        self.scheduler.remove(Member::Object(object));
    }

    /// Reconcile one subject right away, e.g. after the host moved it.
    ///
    /// Returns false if the subject no longer exists; it is then removed
    /// from every zone and no longer tracked.
    pub fn refresh_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId) -> bool {
        let member = Member::Subject(subject);
        self.scheduler.enqueue(member, self.tick);
        match self.reconcile_subject(host, subject) {
            Outcome::Keep => true,
            Outcome::Drop => {
                self.scheduler.remove(member);
                false
            }
        }
    }

    pub fn refresh_object<H: Host>(&mut self, host: &mut H, object: ObjectId) -> bool {
        let member = Member::Object(object);
        self.scheduler.enqueue(member, self.tick);
        match self.reconcile_object(host, object) {
            Outcome::Keep => true,
            Outcome::Drop => {
                self.scheduler.remove(member);
                false
            }
        }
    }

    /// Advance one host tick.
    ///
    /// Ambient teardown advances every tick. Every
    /// `reconcile_interval_ticks` ticks a reconciliation pass runs under
    /// the configured budget; its report is returned.
    pub fn tick<H: Host>(&mut self, host: &mut H) -> Option<PassReport> {
        self.tick += 1;
        self.ambient.advance();
        if self.tick % self.config.reconcile_interval() != 0 {
            return None;
        }
        Some(self.run_reconciliation(host))
    }

    /// Run one reconciliation pass now.
    ///
    /// The scheduler is detached for the duration of the pass, so nothing
    /// reachable from `reconcile_subject` may touch it.
    pub fn run_reconciliation<H: Host>(&mut self, host: &mut H) -> PassReport {
        let mut scheduler = std::mem::take(&mut self.scheduler);
        let clock = Rc::clone(&self.clock);
        let report = scheduler.run_pass(self.tick, self.config.reconcile_budget, clock.as_ref(), |member| {
            match member {
                Member::Subject(subject) => self.reconcile_subject(host, subject),
                Member::Object(object) => self.reconcile_object(host, object),
            }
        });
        self.scheduler = scheduler;
        report
    }

    /// Bring a subject's membership in line with its position.
    ///
    /// Exits run first. If a keep-in rule pushed the subject back, or an
    /// entry gate moved it out, nothing is entered this pass; the next
    /// pass starts from where the host put it. Entry consequences run
    /// once, against the combined flags of every zone entered.
    fn reconcile_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId) -> Outcome {
        let Some(position) = host.subject_position(subject) else {
            debug!(%subject, "subject vanished");
            self.remove_subject(host, subject);
            return Outcome::Drop;
        };

        let mut held = false;
        for key in self.subjects.zones(subject).to_vec() {
            let inside = self.zones.get(key).is_some_and(|zone| zone.contains(position));
            if !inside {
                let cause = if self.zones.is_live(key) {
                    ExitCause::Left
                } else {
                    ExitCause::Evicted
                };
                if !self.exit_subject(host, subject, key, cause) && self.subjects.is_in(subject, key) {
                    held = true;
                }
            }
        }
        if held {
            return Outcome::Keep;
        }

        let entering: Vec<_> = self
            .zones
            .containing(position)
            .filter(|&key| !self.subjects.is_in(subject, key))
            .collect();
        let (admitted, refused): (Vec<_>, Vec<_>) =
            entering.into_iter().partition(|&key| self.admits(&*host, subject, key));
        if let Some(&key) = refused.first() {
            self.eject(host, subject, key, position);
            if host.subject_position(subject) != Some(position) {
                return Outcome::Keep;
            }
        }

        let mut entered = false;
        for key in admitted {
            entered |= self.admit_subject(host, subject, key);
        }
        if entered {
            self.apply_entry_consequences(host, subject, position);
        }
        Outcome::Keep
    }

    fn reconcile_object<H: Host>(&mut self, host: &mut H, object: ObjectId) -> Outcome {
        let Some(position) = host.object_position(object) else {
            debug!(%object, "object vanished");
            self.remove_object(object);
            return Outcome::Drop;
        };

        for key in self.objects.zones(object).to_vec() {
            if !self.zones.get(key).is_some_and(|zone| zone.contains(position)) {
                self.exit_object(object, key);
            }
        }

        let containing: Vec<_> = self.zones.containing(position).collect();
        for key in containing {
            if !self.objects.is_in(object, key) {
                self.enter_object(object, key);
            }
        }
        Outcome::Keep
    }

    fn remove_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId) {
        for key in self.subjects.zones(subject).to_vec() {
            self.exit_subject(host, subject, key, ExitCause::Removed);
        }
        self.states.remove(&subject);
    }

    fn remove_object(&mut self, object: ObjectId) {
        for key in self.objects.zones(object).to_vec() {
            self.exit_object(object, key);
        }
    }
}
