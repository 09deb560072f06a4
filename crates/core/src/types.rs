//! Shared id and timestamp types.

use rand::Rng;

/// All entity primary keys are 24-character lowercase hex strings, minted
/// from 12 random bytes.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Length of an entity id string.
pub const ENTITY_ID_LENGTH: usize = 24;

/// Mint a new random entity id.
pub fn new_entity_id() -> EntityId {
    let bytes: [u8; ENTITY_ID_LENGTH / 2] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
