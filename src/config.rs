//! Search budgets and checking policy.
//!
//! A single [`SearchConfig`] is threaded through the registry, the
//! closed-complemented search and the enumerative inverse search. It is
//! persisted with CBOR so that test fixtures and benchmarks can pin a budget.

use serde::{Deserialize, Serialize};

/// Budgets for the bounded searches and the transport checking policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of candidate maps examined by a projection or inverse
    /// search before it gives up.
    pub max_candidates: usize,
    /// Maximum size of a carrier that may be listed exhaustively.
    pub max_enumeration: usize,
    /// Whether transport relations are also checked pointwise on probe
    /// scalars after the symbolic check.
    pub pointwise_transport_checks: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_candidates: 1 << 16,
            max_enumeration: 1 << 12,
            pointwise_transport_checks: true,
        }
    }
}

impl SearchConfig {
    /// Symbolic transport checks only.
    pub fn symbolic() -> Self {
        Self {
            pointwise_transport_checks: false,
            ..Self::default()
        }
    }

    /// Same configuration with a different candidate budget.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Same configuration with a different enumeration bound.
    pub fn with_max_enumeration(mut self, max_enumeration: usize) -> Self {
        self.max_enumeration = max_enumeration;
        self
    }

    /// Serializes to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    /// Deserializes from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_roundtrip() {
        let config = SearchConfig::default().with_max_candidates(42);
        let bytes = config.to_cbor().unwrap();
        let decoded = SearchConfig::from_cbor(&bytes).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(decoded.max_candidates, 42);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(SearchConfig::from_cbor(&[0xff, 0x00, 0x13]).is_err());
    }

    #[test]
    fn symbolic_policy_skips_pointwise_checks() {
        let symbolic = SearchConfig::symbolic();
        assert!(!symbolic.pointwise_transport_checks);
        assert_eq!(symbolic.max_enumeration, SearchConfig::default().max_enumeration);
        assert_ne!(symbolic.to_cbor().unwrap(), SearchConfig::default().to_cbor().unwrap());
    }
}
