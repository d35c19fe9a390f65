//! Deterministic structural fingerprints of forests.
//!
//! A forest fingerprint is a domain-separated SHA-256 over a canonical
//! pre-order serialization of the forest followed by the fingerprint of its
//! dominance policy. The serialization follows the [`codec`](crate::codec)
//! layout with 64-bit counts, so every forest has one. Two forests share a
//! fingerprint iff they have the same topology, sibling order, vertex sets,
//! weight bit patterns and policy configuration.

use crate::config::ForestConfig;
use crate::core::Forest;
use crate::doctrine::Doctrine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for whole-forest fingerprints (v0).
const DOMAIN_FOREST_V0: &[u8] = b"FOREST_V0";

/// Domain for policy fingerprints (v0).
const DOMAIN_POLICY_V0: &[u8] = b"POLICY_V0";

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

    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// Input layout: `b"HIF:" || domain || b":v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"HIF:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
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

/// Fingerprint of a named policy and its configuration.
///
/// The configuration is serialized to CBOR, which is deterministic for a
/// plain struct of numbers.
pub fn policy_fingerprint(name: &str, config: &ForestConfig) -> HashValue {
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&(name.len() as u64).to_le_bytes());
    data.extend_from_slice(name.as_bytes());
    let bytes = serde_cbor::to_vec(config).expect("ForestConfig should serialize to CBOR");
    data.extend_from_slice(&bytes);
    HashValue::hash_with_domain(DOMAIN_POLICY_V0, &data)
}

fn structure_bytes<D: Doctrine>(forest: &Forest<D>) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(forest.root_count() as u64).to_le_bytes());
    for node in forest.dfs() {
        data.extend_from_slice(&(node.vertices().len() as u64).to_le_bytes());
        for v in node.vertices() {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(&node.weight().to_le_bytes());
        data.extend_from_slice(&(node.children().len() as u64).to_le_bytes());
    }
    data
}

/// Fingerprint of a whole forest, including its policy.
pub fn forest_fingerprint<D: Doctrine>(forest: &Forest<D>) -> HashValue {
    let mut data = structure_bytes(forest);
    let policy = forest.doctrine().policy_fingerprint(forest.config());
    data.extend_from_slice(policy.as_bytes());
    HashValue::hash_with_domain(DOMAIN_FOREST_V0, &data)
}
