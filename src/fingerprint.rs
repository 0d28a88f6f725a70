//! Deterministic fingerprints for transports and witnesses.
//!
//! Witness values (composition triples, inverse pairs) are checked once and
//! then identified by a SHA-256 hash over a canonical byte encoding; the
//! inverse-search catalogue is keyed by these identities. Hashes
//! are domain separated and length prefixed so that values of different
//! kinds can never collide through their encodings.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain of transport words.
pub const DOMAIN_TRANSPORT_V0: &[u8] = b"TRANSPORT_V0";
/// Domain of composition triples.
pub const DOMAIN_COMP_TRIPLE_V0: &[u8] = b"COMP_TRIPLE_V0";
/// Domain of inverse pairs.
pub const DOMAIN_INVERSE_PAIR_V0: &[u8] = b"INVERSE_PAIR_V0";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of the given data with domain separation.
    ///
    /// Hashes `b"SLM:<domain>:v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"SLM:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hashes an ordered list of hashes under `domain`.
    pub fn combine(domain: &[u8], parts: &[HashValue]) -> Self {
        let mut data = Vec::with_capacity(8 + 32 * parts.len());
        data.extend_from_slice(&(parts.len() as u64).to_le_bytes());
        for part in parts {
            data.extend_from_slice(part.as_bytes());
        }
        Self::hash_with_domain(domain, &data)
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Types with a canonical byte encoding for fingerprinting.
pub trait Canonicalizable {
    /// Serialize to canonical byte representation.
    fn to_canonical_bytes(&self) -> Vec<u8>;

    /// Domain-separated hash of the canonical bytes.
    fn fingerprint(&self, domain: &[u8]) -> HashValue {
        HashValue::hash_with_domain(domain, &self.to_canonical_bytes())
    }
}

/// Appends a length-prefixed UTF-8 string.
pub(crate) fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u64).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bytes(Vec<u8>);

    impl Canonicalizable for Bytes {
        fn to_canonical_bytes(&self) -> Vec<u8> {
            self.0.clone()
        }
    }

    #[test]
    fn domain_separation() {
        let data = b"sigma";
        assert_ne!(
            HashValue::hash_with_domain(DOMAIN_TRANSPORT_V0, data),
            HashValue::hash_with_domain(DOMAIN_INVERSE_PAIR_V0, data)
        );
        assert_eq!(
            HashValue::hash_with_domain(DOMAIN_TRANSPORT_V0, data),
            HashValue::hash_with_domain(DOMAIN_TRANSPORT_V0, data)
        );
    }

    #[test]
    fn length_prefix_prevents_concatenation_collisions() {
        let mut ab = Vec::new();
        put_str(&mut ab, "ab");
        put_str(&mut ab, "c");
        let mut a_bc = Vec::new();
        put_str(&mut a_bc, "a");
        put_str(&mut a_bc, "bc");
        assert_ne!(Bytes(ab).fingerprint(b"T"), Bytes(a_bc).fingerprint(b"T"));
    }

    #[test]
    fn combine_is_order_sensitive() {
        let x = HashValue::hash_with_domain(b"X", b"1");
        let y = HashValue::hash_with_domain(b"X", b"2");
        assert_ne!(HashValue::combine(b"C", &[x, y]), HashValue::combine(b"C", &[y, x]));
        assert_ne!(HashValue::combine(b"C", &[]), HashValue::zero());
    }

    #[test]
    fn display_shows_prefix() {
        let h = HashValue([0xab; 32]);
        assert_eq!(h.to_string(), "HashValue(abababab…)");
    }
}
