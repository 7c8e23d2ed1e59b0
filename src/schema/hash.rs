use std::fmt;

use serde::{Serialize, Serializer};
use sha3::{Digest, Keccak256};

/// 16-byte schema identifier: the trailing half of Keccak-256 over
/// `"<jsonLdContext>#<schemaType>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SchemaHash([u8; SchemaHash::LEN]);

impl SchemaHash {
    pub const LEN: usize = 16;

    pub fn from_identifier(identifier: &[u8]) -> Self {
        let digest = Keccak256::digest(identifier);
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(&digest[digest.len() - Self::LEN..]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for SchemaHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_takes_keccak_tail() {
        // keccak256("") = c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470
        let hash = SchemaHash::from_identifier(b"");
        assert_eq!(hash.to_hex(), "e500b653ca82273b7bfad8045d85a470");
    }

    #[test]
    fn test_deterministic_and_distinct() {
        let a = SchemaHash::from_identifier(b"https://example.com/ctx.jsonld#KYCAgeCredential");
        let b = SchemaHash::from_identifier(b"https://example.com/ctx.jsonld#KYCAgeCredential");
        let c = SchemaHash::from_identifier(b"https://example.com/ctx.jsonld#KYCCountryCredential");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_bytes().len(), SchemaHash::LEN);
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let hash = SchemaHash::from_identifier(b"");
        let json = serde_json::to_value(hash).unwrap();
        assert_eq!(json, serde_json::json!("e500b653ca82273b7bfad8045d85a470"));
        assert_eq!(hash.to_string().len(), 32);
    }
}
