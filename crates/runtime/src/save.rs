//! Save format for in-memory battle blobs.
//!
//! Layout: `MAGIC | version (u16 LE) | bincode(Battle) | sha256(everything before)`.
//! Nothing here touches the filesystem; callers decide where the bytes go.

use arena_core::{Battle, CombatState, MoveOracle};
use sha2::{Digest, Sha256};

use crate::api::SaveError;

pub const SAVE_VERSION: u16 = 1;

const MAGIC: &[u8; 4] = b"ARNA";
const HEADER_LEN: usize = MAGIC.len() + 2;
const DIGEST_LEN: usize = 32;

/// Encodes the battle (state and rollback history) into a versioned blob.
pub fn encode(battle: &Battle) -> Result<Vec<u8>, SaveError> {
    let payload =
        bincode::serialize(battle).map_err(|e| SaveError::Serialization(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + DIGEST_LEN);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&SAVE_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);

    let digest = Sha256::digest(&bytes);
    bytes.extend_from_slice(&digest);
    Ok(bytes)
}

/// Decodes a blob produced by [`encode`], verifying magic, version and digest.
pub fn decode(bytes: &[u8]) -> Result<Battle, SaveError> {
    if bytes.len() < HEADER_LEN + DIGEST_LEN {
        return Err(SaveError::Truncated(bytes.len()));
    }

    let (body, expected) = bytes.split_at(bytes.len() - DIGEST_LEN);
    let computed = Sha256::digest(body);
    if computed.as_slice() != expected {
        return Err(SaveError::DigestMismatch {
            expected: hex::encode(expected),
            computed: hex::encode(computed),
        });
    }

    if &body[..MAGIC.len()] != MAGIC {
        return Err(SaveError::BadMagic);
    }
    let version = u16::from_le_bytes([body[MAGIC.len()], body[MAGIC.len() + 1]]);
    if version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found: version,
            expected: SAVE_VERSION,
        });
    }

    bincode::deserialize(&body[HEADER_LEN..]).map_err(|e| SaveError::Serialization(e.to_string()))
}

/// Hex digest of a blob, for logs.
pub fn digest_hex(bytes: &[u8]) -> String {
    match bytes.len().checked_sub(DIGEST_LEN) {
        Some(start) => hex::encode(&bytes[start..]),
        None => String::new(),
    }
}

/// Checks that every move a saved fighter refers to exists in `catalog`.
pub fn check_moves<M>(state: &CombatState, catalog: &M) -> Result<(), SaveError>
where
    M: MoveOracle + ?Sized,
{
    for fighter in state.roster.iter() {
        let mut owned = fighter.moves.iter().chain(fighter.config.moves.iter());
        if let Some(&move_id) = owned.find(|id| catalog.definition(**id).is_none()) {
            return Err(SaveError::UnknownMove {
                fighter: fighter.name.clone(),
                move_id,
            });
        }
    }
    Ok(())
}

/// Pretty JSON read model of the state.
pub fn export_json(state: &CombatState) -> Result<String, SaveError> {
    serde_json::to_string_pretty(state).map_err(|e| SaveError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{FighterConfig, Race, Roster, StaticMoveCatalog};

    fn battle() -> Battle {
        let roster = Roster::build(
            [
                FighterConfig::new("Fighter One", Race::Human, 1000),
                FighterConfig::new("Fighter Two", Race::Saiyan, 1000),
            ],
            &StaticMoveCatalog::default(),
        )
        .expect("roster");
        Battle::new(CombatState::new(42, roster), 20)
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = encode(&battle()).expect("encode");
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(matches!(decode(&bytes), Err(SaveError::DigestMismatch { .. })));
    }

    #[test]
    fn rejects_future_versions() {
        let mut bytes = encode(&battle()).expect("encode");
        bytes.truncate(bytes.len() - DIGEST_LEN);
        bytes[MAGIC.len()] = 9;
        let digest = Sha256::digest(&bytes);
        bytes.extend_from_slice(&digest);

        assert!(matches!(
            decode(&bytes),
            Err(SaveError::VersionMismatch { found: 9, expected: SAVE_VERSION })
        ));
    }

    #[test]
    fn truncated_blob_is_rejected() {
        assert!(matches!(decode(b"ARNA"), Err(SaveError::Truncated(4))));
        assert_eq!(digest_hex(b"short"), "");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let original = battle();
        let bytes = encode(&original).expect("encode");
        assert_eq!(digest_hex(&bytes).len(), 64);
        assert_eq!(decode(&bytes).expect("decode"), original);
    }
}
