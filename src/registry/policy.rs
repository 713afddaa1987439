//! Enter/exit policy for subjects, and passive transitions for objects.
//!
//! Enter gates, in order:
//! 1. required permission
//! 2. Eject / KeepPlayersOut, unless the subject is on the zone's keep-in
//!    list or whitelist, or holds the flag's bypass permission
//!
//! A rejected subject is ejected and never becomes a member. Once its
//! membership is recorded, admitted subjects face the consequences of
//! their combined flags: Kill, and for sleepers KillSleepers or
//! EjectSleepers. A child zone therefore shields its occupants from a
//! parent's consequences.
//!
//! Leaving a zone that keeps the subject in (keep-in list, or
//! KeepPlayersIn not suppressed by a child the subject still stands in)
//! pushes it back toward the interior instead. Forced exits skip that
//! check.

use glam::Vec3;
use tracing::debug;

use super::events::{ExitCause, ZoneNotification};
use super::ZoneRegistry;
use crate::core::{ObjectId, SubjectId, ZoneKey};
use crate::flags::ZoneFlag;
use crate::host::{Host, Permissions, SubjectState};

impl ZoneRegistry {
    /// Does `subject` hold the bypass permission for `flag`?
    #[must_use]
    pub fn subject_bypasses(&self, permissions: &impl Permissions, subject: SubjectId, flag: ZoneFlag) -> bool {
        permissions.has_permission(subject, &self.config.bypass_permission(flag.name()))
    }

    /// Current sleep state of a subject.
    #[must_use]
    pub fn subject_state(&self, subject: SubjectId) -> SubjectState {
        self.states.get(&subject).copied().unwrap_or_default()
    }

    /// Record a subject falling asleep or waking up.
    ///
    /// This is the only place sleep is evaluated. Falling asleep while the
    /// combined flags hold KillSleepers kills the subject; with
    /// EjectSleepers it is ejected and removed from the granting zone.
    pub fn set_subject_state<H: Host>(&mut self, host: &mut H, subject: SubjectId, state: SubjectState) {
        if self.subject_state(subject) == state {
            return;
        }
        match state {
            SubjectState::Awake => {
                self.states.remove(&subject);
            }
            SubjectState::Sleeping => {
                self.states.insert(subject, state);
                if let Some(position) = host.subject_position(subject) {
                    self.apply_sleeper_rules(host, subject, position);
                }
            }
        }
        debug!(%subject, ?state, "subject state changed");
    }

    /// Run the enter gates for one zone without touching membership.
    pub(super) fn admits(&self, host: &impl Host, subject: SubjectId, key: ZoneKey) -> bool {
        let Some(zone) = self.zones.get(key) else {
            return false;
        };
        let refusal = if zone
            .definition()
            .permission
            .as_deref()
            .is_some_and(|permission| !host.has_permission(subject, permission))
        {
            Some("missing permission")
        } else if zone.is_kept_in(subject) || zone.is_whitelisted(subject) {
            None
        } else {
            [ZoneFlag::Eject, ZoneFlag::KeepPlayersOut]
                .into_iter()
                .find(|&flag| zone.has_flag(flag) && !self.subject_bypasses(host, subject, flag))
                .map(ZoneFlag::name)
        };
        match refusal {
            Some(reason) => {
                debug!(%subject, zone = zone.id(), reason, "entry refused");
                false
            }
            None => true,
        }
    }

    /// Record membership, send the enter message and queue the
    /// notification. Consequences are left to the caller.
    pub(super) fn admit_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId, key: ZoneKey) -> bool {
        if !self.subjects.enter(subject, key, &mut self.aggregator, &self.zones) {
            return false;
        }
        let Some(zone) = self.zones.get(key) else {
            return false;
        };
        let zone_id = zone.id().to_string();
        debug!(%subject, zone = %zone_id, "subject entered");
        if let Some(message) = zone.definition().enter_message.as_deref() {
            host.send_message(subject, message);
        }
        self.notifications.push(ZoneNotification::SubjectEntered {
            zone: zone_id,
            subject,
        });
        true
    }

    /// Kill or sleeper handling for a subject whose membership just grew.
    pub(super) fn apply_entry_consequences<H: Host>(&mut self, host: &mut H, subject: SubjectId, position: Vec3) {
        if self.subjects.flags(subject).contains(ZoneFlag::Kill)
            && !self.subject_bypasses(&*host, subject, ZoneFlag::Kill)
        {
            debug!(%subject, "killed on entry");
            host.kill_subject(subject);
            return;
        }
        if self.subject_state(subject) == SubjectState::Sleeping {
            self.apply_sleeper_rules(host, subject, position);
        }
    }

    fn apply_sleeper_rules<H: Host>(&mut self, host: &mut H, subject: SubjectId, position: Vec3) {
        let flags = self.subjects.flags(subject);
        if flags.contains(ZoneFlag::KillSleepers) && !self.subject_bypasses(&*host, subject, ZoneFlag::KillSleepers) {
            debug!(%subject, "killed sleeper");
            host.kill_subject(subject);
        } else if flags.contains(ZoneFlag::EjectSleepers)
            && !self.subject_bypasses(&*host, subject, ZoneFlag::EjectSleepers)
        {
            if let Some(key) = self.granting_zone(subject, ZoneFlag::EjectSleepers) {
                self.eject(host, subject, key, position);
                self.exit_subject(host, subject, key, ExitCause::Evicted);
            }
        }
    }

    /// First member zone whose own flags give `flag` to the subject.
    fn granting_zone(&self, subject: SubjectId, flag: ZoneFlag) -> Option<ZoneKey> {
        self.subjects.zones(subject).iter().copied().find(|&key| {
            self.zones.get(key).is_some_and(|zone| zone.has_flag(flag)) && !self.is_suppressed(subject, key, None)
        })
    }

    /// Is `key` the parent of another zone the subject is a member of?
    ///
    /// With a position, only children that still contain it count.
    fn is_suppressed(&self, subject: SubjectId, key: ZoneKey, position: Option<Vec3>) -> bool {
        self.subjects.zones(subject).iter().any(|&other| {
            other != key
                && self.zones.get(other).is_some_and(|child| {
                    child.parent() == Some(key) && position.map_or(true, |point| child.contains(point))
                })
        })
    }

    /// Does the zone hold the subject in at `position`?
    fn holds_in(&self, host: &impl Host, subject: SubjectId, key: ZoneKey, position: Vec3) -> bool {
        let Some(zone) = self.zones.get(key) else {
            return false;
        };
        zone.is_kept_in(subject)
            || (zone.has_flag(ZoneFlag::KeepPlayersIn)
                && !self.is_suppressed(subject, key, Some(position))
                && !self.subject_bypasses(host, subject, ZoneFlag::KeepPlayersIn))
    }

    /// Remove a subject from a zone.
    ///
    /// Returns false if the subject was not a member, or was pushed back
    /// inside by a keep-in rule.
    pub(crate) fn exit_subject<H: Host>(&mut self, host: &mut H, subject: SubjectId, key: ZoneKey, cause: ExitCause) -> bool {
        if !self.subjects.is_in(subject, key) {
            return false;
        }

        if !cause.is_forced() {
            if let Some(position) = host.subject_position(subject) {
                if self.holds_in(&*host, subject, key, position) {
                    self.push_back(host, subject, key, position);
                    return false;
                }
            }
        }

        self.subjects.exit(subject, key, &mut self.aggregator, &self.zones);
        let Some(zone) = self.zones.get(key) else {
            return true;
        };
        let zone_id = zone.id().to_string();
        debug!(%subject, zone = %zone_id, ?cause, "subject exited");
        if cause != ExitCause::Removed {
            if let Some(message) = zone.definition().leave_message.as_deref() {
                host.send_message(subject, message);
            }
        }
        self.notifications.push(ZoneNotification::SubjectExited {
            zone: zone_id,
            subject,
        });
        true
    }

    pub(crate) fn enter_object(&mut self, object: ObjectId, key: ZoneKey) -> bool {
        if !self.objects.enter(object, key, &mut self.aggregator, &self.zones) {
            return false;
        }
        if let Some(zone) = self.zones.get(key) {
            self.notifications.push(ZoneNotification::ObjectEntered {
                zone: zone.id().to_string(),
                object,
            });
        }
        true
    }

    pub(crate) fn exit_object(&mut self, object: ObjectId, key: ZoneKey) -> bool {
        if !self.objects.exit(object, key, &mut self.aggregator, &self.zones) {
            return false;
        }
        if let Some(zone) = self.zones.get(key) {
            self.notifications.push(ZoneNotification::ObjectExited {
                zone: zone.id().to_string(),
                object,
            });
        }
        true
    }

    /// Move a subject out of a zone.
    ///
    /// Subjects in a vehicle have the vehicle's momentum reversed instead.
    /// Otherwise the target is a point from the zone's spawn set, or a
    /// point past the zone's bounding extent on the line from the center
    /// through the subject, dropped to ground height.
    pub(super) fn eject<H: Host>(&self, host: &mut H, subject: SubjectId, key: ZoneKey, position: Vec3) {
        let Some(zone) = self.zones.get(key) else {
            return;
        };
        if host.subject_in_vehicle(subject) {
            debug!(%subject, zone = zone.id(), "reversed vehicle at zone edge");
            host.reverse_vehicle_momentum(subject);
            return;
        }

        let spawn = zone
            .definition()
            .eject_spawns
            .as_deref()
            .and_then(|set| host.random_spawn(set));
        let target = spawn.unwrap_or_else(|| {
            let geometry = zone.geometry();
            let center = geometry.center();
            let distance = geometry.bounding_extent() + self.config.eject_margin;
            let outward = horizontal_direction(center, position);
            let target = center + outward * distance;
            Vec3::new(target.x, host.ground_height(target.x, target.z), target.z)
        });

        debug!(%subject, zone = zone.id(), %target, "ejected subject");
        host.teleport_subject(subject, target);
    }

    /// Move a subject back inside a zone it may not leave.
    fn push_back<H: Host>(&self, host: &mut H, subject: SubjectId, key: ZoneKey, position: Vec3) {
        let Some(zone) = self.zones.get(key) else {
            return;
        };
        if host.subject_in_vehicle(subject) {
            host.reverse_vehicle_momentum(subject);
            return;
        }
        let geometry = zone.geometry();
        let center = geometry.center();
        let depth = (geometry.inscribed_extent() - self.config.push_back_margin).max(0.0);
        let target = center + (position - center).normalize_or_zero() * depth;
        debug!(%subject, zone = zone.id(), %target, "pushed subject back inside");
        host.teleport_subject(subject, target);
    }
}

/// Unit direction from `center` toward `point` in the XZ plane. Falls back
/// to +X when the point sits on the vertical axis through the center.
fn horizontal_direction(center: Vec3, point: Vec3) -> Vec3 {
    let offset = Vec3::new(point.x - center.x, 0.0, point.z - center.z);
    let direction = offset.normalize_or_zero();
    if direction == Vec3::ZERO {
        Vec3::X
    } else {
        direction
    }
}
