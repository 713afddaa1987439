//! Definition snapshots across registries.

mod common;

use std::time::Duration;

use common::{registry, s, ScriptedHost};
use glam::Vec3;
use zone_engine::{decode_definitions, encode_definitions, EngineConfig, ZoneDefinition, ZoneFlag};

fn populated() -> (zone_engine::ZoneRegistry, ScriptedHost) {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    let outer = ZoneDefinition::new("Outer")
        .with_radius(50.0)
        .with_flag(ZoneFlag::NoBuild)
        .with_messages("welcome", "bye");
    let inner = ZoneDefinition::new("Inner")
        .at(Vec3::new(5.0, 0.0, 0.0))
        .with_box(Vec3::new(10.0, 4.0, 6.0), Vec3::new(0.0, 30.0, 0.0))
        .with_flag(ZoneFlag::PvpGod)
        .with_parent("Outer")
        .with_permission("vip");
    registry.create_or_update_definition(&mut host, outer).unwrap();
    registry.create_or_update_definition(&mut host, inner).unwrap();
    (registry, host)
}

// =============================================================================
// Snapshot Round Trip
// =============================================================================

#[test]
fn test_snapshot_restores_registry() {
    let (original, _host) = populated();
    let bytes = encode_definitions(&original.definitions()).unwrap();

    let (mut restored, _clock) = registry();
    let mut host = ScriptedHost::new();
    host.place(s(1), Vec3::new(5.0, 0.0, 0.0));
    host.grant(s(1), "vip");
    let loaded = restored.load_definitions(&mut host, decode_definitions(&bytes).unwrap());

    assert_eq!(loaded, 2);
    assert_eq!(restored.definitions(), original.definitions());
    assert_eq!(restored.zone_ids(), vec!["Inner".to_string(), "Outer".to_string()]);

    // Parent links and membership are rebuilt from the definitions.
    let inner = restored.get_zone_by_id("Inner").unwrap();
    let outer_key = inner.parent().unwrap();
    assert_eq!(restored.zone(outer_key).unwrap().id(), "Outer");
    assert!(restored.is_subject_in_zone("Inner", s(1)));
    assert!(restored.is_subject_in_zone("Outer", s(1)));
    assert!(restored.subject_has_flag(s(1), "PvpGod"));
    assert!(!restored.subject_has_flag(s(1), "NoBuild"));
}

#[test]
fn test_snapshot_leaves_out_runtime_state() {
    let (mut original, _host) = populated();
    original.add_disabled_flag("Outer", "NoBuild");
    original.add_whitelist("Outer", s(3));

    let bytes = encode_definitions(&original.definitions()).unwrap();
    let (mut restored, _clock) = registry();
    let mut host = ScriptedHost::new();
    restored.load_definitions(&mut host, decode_definitions(&bytes).unwrap());

    let outer = restored.get_zone_by_id("Outer").unwrap();
    assert!(outer.disabled_flags().is_empty());
    assert!(!outer.is_whitelisted(s(3)));
    assert!(restored.has_flag("Outer", "NoBuild"));
}

#[test]
fn test_loading_over_existing_zones_updates_them() {
    let (mut registry, mut host) = populated();
    let mut definitions = registry.definitions();
    for definition in &mut definitions {
        definition.name = format!("{} v2", definition.id);
    }

    assert_eq!(registry.load_definitions(&mut host, definitions), 2);
    assert_eq!(registry.zone_count(), 2);
    assert_eq!(registry.get_zone_by_id("Outer").unwrap().name(), "Outer v2");
    assert!(registry.get_zone_by_id("Inner").unwrap().parent().is_some());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_cyclic_snapshot_loads_with_one_link_dropped() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    let definitions = vec![
        ZoneDefinition::new("A").with_parent("B"),
        ZoneDefinition::new("B").with_parent("A"),
    ];

    assert_eq!(registry.load_definitions(&mut host, definitions), 2);
    let a = registry.get_zone_by_id("A").unwrap().parent();
    let b = registry.get_zone_by_id("B").unwrap().parent();
    assert!(a.is_none() || b.is_none());
    assert!(a.is_some() || b.is_some());
}

#[test]
fn test_invalid_definition_is_skipped() {
    let (mut registry, _clock) = registry();
    let mut host = ScriptedHost::new();
    let definitions = vec![
        ZoneDefinition::new("Good"),
        ZoneDefinition::new("Flat").with_radius(0.0),
    ];

    assert_eq!(registry.load_definitions(&mut host, definitions), 1);
    assert_eq!(registry.zone_ids(), vec!["Good".to_string()]);
}

#[test]
fn test_truncated_snapshot_is_an_error() {
    let (registry, _host) = populated();
    let bytes = encode_definitions(&registry.definitions()).unwrap();
    assert!(decode_definitions(&bytes[..bytes.len() / 2]).is_err());
}

// =============================================================================
// Text Formats
// =============================================================================

#[test]
fn test_definition_json_round_trip() {
    let definition = ZoneDefinition::new("Json")
        .with_radius(12.5)
        .with_flag(ZoneFlag::NoDecay)
        .with_eject_spawns("beach")
        .with_ambient(1.0, 20.0, 0.0);

    let text = serde_json::to_string(&definition).unwrap();
    let back: ZoneDefinition = serde_json::from_str(&text).unwrap();
    assert_eq!(back, definition);
}

#[test]
fn test_config_json_round_trip() {
    let config = EngineConfig::default()
        .with_reconcile_interval(4)
        .with_reconcile_budget(Duration::from_millis(3))
        .with_eject_margin(15.0)
        .with_seed(99);

    let text = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
}
