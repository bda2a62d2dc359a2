use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of raw bytes in a [`RecordId`].
pub const RECORD_ID_LEN: usize = 12;

/// Storage-assigned identifier for a stored document.
///
/// Layout mirrors the classic document-store object id: a 4-byte big-endian
/// creation timestamp (seconds), 5 bytes of per-process randomness and a
/// 3-byte big-endian counter. Rendered as 24 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; RECORD_ID_LEN]);

fn process_nonce() -> &'static [u8; 5] {
    static NONCE: OnceLock<[u8; 5]> = OnceLock::new();
    NONCE.get_or_init(|| rand::thread_rng().gen())
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x00ff_ffff)))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

impl RecordId {
    /// Generate a fresh identifier stamped with the current time.
    pub fn generate() -> Self {
        let secs = Utc::now().timestamp() as u32;
        let counter = next_counter();

        let mut bytes = [0u8; RECORD_ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_nonce());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; RECORD_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; RECORD_ID_LEN] {
        &self.0
    }

    /// Hex-encoded string representation (24 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 24-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != RECORD_ID_LEN * 2 {
            return Err(TypeError::InvalidLength {
                expected: RECORD_ID_LEN * 2,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(format!("{s:?}: {e}")))?;
        let mut arr = [0u8; RECORD_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Creation time encoded in the first four bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.to_hex())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn hex_is_24_lowercase_chars() {
        let hex = RecordId::generate().to_hex();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hex_roundtrip() {
        let id = RecordId::generate();
        assert_eq!(RecordId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn parse_accepts_uppercase() {
        let id: RecordId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = RecordId::from_hex("abc").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 24, actual: 3 });
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = RecordId::from_hex("zzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn timestamp_is_recent() {
        let id = RecordId::generate();
        let age = Utc::now() - id.timestamp();
        assert!(age.num_seconds() < 5);
    }

    #[test]
    fn ids_share_process_nonce() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_eq!(a.as_bytes()[4..9], b.as_bytes()[4..9]);
    }

    #[test]
    fn serde_as_hex_string() {
        let id = RecordId::from_bytes([0xab; 12]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abababababababababababab\"");
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_rejects_malformed() {
        assert!(serde_json::from_str::<RecordId>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn any_bytes_survive_hex(bytes in proptest::array::uniform12(any::<u8>())) {
            let id = RecordId::from_bytes(bytes);
            prop_assert_eq!(RecordId::from_hex(&id.to_hex()).unwrap(), id);
        }

        #[test]
        fn short_or_long_strings_are_rejected(s in "[0-9a-f]{0,23}|[0-9a-f]{25,40}") {
            let rejected = matches!(RecordId::from_hex(&s), Err(TypeError::InvalidLength { .. }));
            prop_assert!(rejected);
        }
    }
}
