//! Hash functions for ring placement
//!
//! Every hasher maps bytes to a `u32` ring position. Digests are folded by
//! reading their first four bytes little-endian.
//!
//! - BLAKE3 (default): fast, well mixed
//! - SHA-256: slower, same quality, handy for cross-checking
//! - CRC32: cheapest, weakest avalanche; fine for benchmarks

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Deterministic mapping from bytes to a position in the hash space.
pub trait HashFunction: Send + Sync {
    fn hash(&self, data: &[u8]) -> u32;

    /// Short name used in logs and reports
    fn name(&self) -> &'static str;
}

/// Fold a digest to 32 bits (first four bytes, little-endian)
fn fold_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    fn hash(&self, data: &[u8]) -> u32 {
        fold_le(blake3::hash(data).as_bytes())
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(&self, data: &[u8]) -> u32 {
        fold_le(&Sha256::digest(data))
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Hash;

impl HashFunction for Crc32Hash {
    fn hash(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }

    fn name(&self) -> &'static str {
        "crc32"
    }
}

/// Selectable hash algorithm (config / CLI)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
    Crc32,
}

impl HashAlgorithm {
    /// Build a shareable hasher for this algorithm
    pub fn hasher(&self) -> Arc<dyn HashFunction> {
        match self {
            HashAlgorithm::Blake3 => Arc::new(Blake3Hash),
            HashAlgorithm::Sha256 => Arc::new(Sha256Hash),
            HashAlgorithm::Crc32 => Arc::new(Crc32Hash),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Blake3 => write!(f, "blake3"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Crc32 => write!(f, "crc32"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "crc32" => Ok(HashAlgorithm::Crc32),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Compute BLAKE3 hash of data, return hex string
pub fn blake3_hex(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        for algo in [HashAlgorithm::Blake3, HashAlgorithm::Sha256, HashAlgorithm::Crc32] {
            let hasher = algo.hasher();
            assert_eq!(hasher.hash(b"10.189.0.2#1"), hasher.hash(b"10.189.0.2#1"));
            assert_eq!(hasher.name(), algo.to_string());
        }
    }

    #[test]
    fn test_avalanche() {
        let hasher = Blake3Hash;
        let a = hasher.hash(b"server#1");
        let b = hasher.hash(b"server#2");
        assert_ne!(a, b);
        // Neighbouring labels should flip a good share of the 32 bits
        assert!((a ^ b).count_ones() >= 6);
    }

    #[test]
    fn test_fold_matches_digest_prefix() {
        let digest = blake3::hash(b"key");
        let bytes = digest.as_bytes();
        let expected = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(Blake3Hash.hash(b"key"), expected);
    }

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(Crc32Hash.hash(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("BLAKE3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert!("md4".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_blake3_hex() {
        assert_eq!(blake3_hex(b"hello world").len(), 64);
    }
}
