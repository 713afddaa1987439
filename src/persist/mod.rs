//! Durable zone definitions.
//!
//! Only definitions are persisted. Membership, disabled flags, keep-in
//! lists and whitelists are runtime state and are rebuilt from geometry
//! when the definitions are loaded back into a registry.

use serde::{Deserialize, Serialize};

use crate::core::{Result, ZoneError};
use crate::zones::ZoneDefinition;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    zones: Vec<ZoneDefinition>,
}

/// Encode definitions as a versioned bincode snapshot.
pub fn encode_definitions(definitions: &[ZoneDefinition]) -> Result<Vec<u8>> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        zones: definitions.to_vec(),
    };
    Ok(bincode::serialize(&snapshot)?)
}

/// Decode a snapshot written by [`encode_definitions`].
pub fn decode_definitions(bytes: &[u8]) -> Result<Vec<ZoneDefinition>> {
    let snapshot: Snapshot = bincode::deserialize(bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(ZoneError::invalid_field("version", snapshot.version.to_string()));
    }
    Ok(snapshot.zones)
}
