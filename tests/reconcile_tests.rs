//! Reconciliation pass tests.

mod common;

use std::time::Duration;

use common::{o, registry, s, ManualClock, ScriptedHost};
use glam::Vec3;
use zone_engine::{EngineConfig, Member, ZoneRegistry};

// =============================================================================
// Budget
// =============================================================================

#[test]
fn test_pass_respects_budget_and_carries_over() {
    let clock = ManualClock::new();
    let config = EngineConfig::default().with_reconcile_budget(Duration::from_micros(100));
    let mut registry = ZoneRegistry::with_clock(config, clock.clone());
    let mut host = ScriptedHost::new();
    registry.create_or_update_zone(&mut host, "Big", &["radius", "1000"], None);

    for n in 0..50 {
        host.place(s(n), Vec3::new(n as f32, 0.0, 0.0));
        registry.track_subject(s(n));
    }

    // Every clock read costs 10us, so the budget covers a handful.
    clock.set_step(Duration::from_micros(10));
    let first = registry.run_reconciliation(&mut host);
    assert!(first.processed > 0);
    assert!(first.processed <= 10);
    assert_eq!(first.remaining, 50 - first.processed);
    assert!(first.budget_exhausted());
    assert_eq!(registry.players_in_zone("Big").len(), first.processed);

    // The rest are picked up later, none dropped.
    clock.set_step(Duration::ZERO);
    let second = registry.run_reconciliation(&mut host);
    assert_eq!(second.processed, first.remaining);
    assert_eq!(second.dropped, 0);
    assert_eq!(second.remaining, 0);
    assert_eq!(registry.players_in_zone("Big").len(), 50);
    assert_eq!(registry.tracked_count(), 50);
}

#[test]
fn test_tick_runs_passes_on_interval() {
    let clock = ManualClock::new();
    let config = EngineConfig::default().with_reconcile_interval(3);
    let mut registry = ZoneRegistry::with_clock(config, clock);
    let mut host = ScriptedHost::new();

    assert!(registry.tick(&mut host).is_none());
    assert!(registry.tick(&mut host).is_none());
    assert!(registry.tick(&mut host).is_some());
    assert_eq!(registry.current_tick(), 3);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_unchanged_position_produces_no_events() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    registry.create_or_update_zone(&mut host, "A", &["radius", "20"], None);
    registry.create_or_update_zone(&mut host, "B", &["radius", "5"], Some(Vec3::new(3.0, 0.0, 0.0)));

    host.place(s(1), Vec3::new(2.0, 0.0, 0.0));
    registry.track_subject(s(1));
    registry.tick(&mut host);
    assert_eq!(registry.drain_notifications().len(), 2);
    let flags = registry.subject_flags(s(1));

    for _ in 0..5 {
        registry.tick(&mut host);
        registry.refresh_subject(&mut host, s(1));
    }
    assert!(registry.drain_notifications().is_empty());
    assert_eq!(registry.subject_flags(s(1)), flags);
    assert!(host.teleports.is_empty());
}

// =============================================================================
// Stale Members
// =============================================================================

#[test]
fn test_vanished_subject_is_dropped() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    registry.create_or_update_zone(&mut host, "Z", &["radius", "20", "leave_message", "bye"], None);
    host.place(s(1), Vec3::ZERO);
    registry.track_subject(s(1));
    registry.tick(&mut host);
    assert!(registry.is_subject_in_zone("Z", s(1)));

    host.subjects.remove(&s(1));
    let report = registry.tick(&mut host).unwrap();
    assert_eq!(report.dropped, 1);
    assert_eq!(registry.subject_record_count(), 0);
    assert!(!registry.is_tracked(Member::Subject(s(1))));
    assert!(host.messages.is_empty());
}

#[test]
fn test_forget_subject() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    host.place(s(1), Vec3::ZERO);
    registry.create_or_update_zone(&mut host, "Z", &["radius", "20", "KeepPlayersIn", "true"], None);
    assert!(registry.is_tracked(Member::Subject(s(1))));

    registry.forget_subject(&mut host, s(1));
    assert!(!registry.is_tracked(Member::Subject(s(1))));
    assert!(!registry.is_subject_in_zone("Z", s(1)));
    assert!(host.teleports.is_empty());
    assert_eq!(registry.tracked_count(), 0);
}

#[test]
fn test_refresh_reports_missing_subject() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    assert!(!registry.refresh_subject(&mut host, s(9)));
    assert!(!registry.is_tracked(Member::Subject(s(9))));
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn test_objects_follow_geometry() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    registry.create_or_update_zone(&mut host, "Z", &["radius", "20", "NoDecay", "true", "Eject", "true"], None);

    host.place_object(o(1), Vec3::new(10.0, 0.0, 0.0));
    assert!(registry.track_object(o(1)));
    assert!(!registry.track_object(o(1)));
    registry.tick(&mut host);

    // No access policy for objects.
    assert_eq!(registry.entities_in_zone("Z"), vec![o(1)]);
    assert!(registry.object_has_flag(o(1), "NoDecay"));
    assert_eq!(registry.zones_for_object(o(1)), vec!["Z".to_string()]);

    host.place_object(o(1), Vec3::new(40.0, 0.0, 0.0));
    assert!(registry.refresh_object(&mut host, o(1)));
    assert!(!registry.is_object_in_zone("Z", o(1)));
    assert_eq!(registry.object_record_count(), 0);

    host.objects.remove(&o(1));
    registry.tick(&mut host);
    assert!(!registry.is_tracked(Member::Object(o(1))));
}

#[test]
fn test_forget_object() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    host.place_object(o(1), Vec3::ZERO);
    registry.create_or_update_zone(&mut host, "Z", &["radius", "20"], None);
    assert!(registry.is_object_in_zone("Z", o(1)));

    registry.forget_object(o(1));
    assert!(!registry.is_object_in_zone("Z", o(1)));
    assert!(!registry.is_tracked(Member::Object(o(1))));
}
