//! Hash algorithm module
//!
//! Provides the supported digest algorithms and the `CandidateHasher` seam the
//! workers hash through, so searches can run against fake algorithms in tests.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

use crate::error::{Result, SearchError};

/// Anything that can turn a candidate into a fixed-size digest
pub trait CandidateHasher: Send + Sync {
    /// Display name used in logs and results
    fn name(&self) -> &str;

    /// Digest size in bytes
    fn output_len(&self) -> usize;

    /// Hash `input` into `out`, which is exactly `output_len()` bytes long
    fn digest_into(&self, input: &[u8], out: &mut [u8]);

    /// Lowercase hex digest of `input`
    fn hex_digest(&self, input: &[u8]) -> String {
        let mut out = vec![0u8; self.output_len()];
        self.digest_into(input, &mut out);
        hex::encode(out)
    }
}

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512];

    /// Resolve a name ("sha256", "SHA-256") or menu number ("3")
    pub fn from_identifier(id: &str) -> Option<Self> {
        let normalized = id.trim().to_lowercase().replace(['-', '_'], "");

        match normalized.as_str() {
            "1" | "md5" => Some(Self::Md5),
            "2" | "sha1" => Some(Self::Sha1),
            "3" | "sha256" => Some(Self::Sha256),
            "4" | "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Resolve an identifier, substituting the default on unknown input.
    ///
    /// Returns the algorithm and whether a substitution happened.
    pub fn resolve_or_default(id: &str) -> (Self, bool) {
        match Self::from_identifier(id) {
            Some(algo) => (algo, false),
            None => (Self::default(), true),
        }
    }

    /// Resolve an identifier, failing on unknown input
    pub fn resolve_strict(id: &str) -> Result<Self> {
        Self::from_identifier(id).ok_or_else(|| SearchError::UnknownAlgorithm(id.to_string()))
    }

    /// Guess the algorithm from a hex digest's length
    pub fn from_hex_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.output_len() * 2 == len)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl CandidateHasher for HashAlgorithm {
    fn name(&self) -> &str {
        self.label()
    }

    fn output_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    #[inline]
    fn digest_into(&self, input: &[u8], out: &mut [u8]) {
        match self {
            Self::Md5 => out.copy_from_slice(&Md5::digest(input)),
            Self::Sha1 => out.copy_from_slice(&Sha1::digest(input)),
            Self::Sha256 => out.copy_from_slice(&Sha256::digest(input)),
            Self::Sha512 => out.copy_from_slice(&Sha512::digest(input)),
        }
    }
}

/// Decoded target digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHash {
    bytes: Vec<u8>,
}

impl TargetHash {
    /// Parse a case-insensitive hex digest and check it against the hasher's output size
    pub fn parse(hex_str: &str, hasher: &dyn CandidateHasher) -> Result<Self> {
        let trimmed = hex_str.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyTarget);
        }

        let bytes = hex::decode(trimmed)?;

        if bytes.len() != hasher.output_len() {
            return Err(SearchError::DigestLengthMismatch {
                algorithm: hasher.name().to_string(),
                expected: hasher.output_len(),
                actual: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex form
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            HashAlgorithm::Md5.hex_digest(b"hello"),
            "5d41402abc4b2a76b9719d911017c592"
        );
        assert_eq!(
            HashAlgorithm::Sha1.hex_digest(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            HashAlgorithm::Sha256.hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(HashAlgorithm::Sha512.hex_digest(b"abc").len(), 128);
    }

    #[test]
    fn test_identifier_resolution() {
        assert_eq!(HashAlgorithm::from_identifier("SHA-256"), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::from_identifier("sha_1"), Some(HashAlgorithm::Sha1));
        assert_eq!(HashAlgorithm::from_identifier("4"), Some(HashAlgorithm::Sha512));
        assert_eq!(HashAlgorithm::from_identifier("md4"), None);

        assert_eq!(HashAlgorithm::resolve_or_default("whirlpool"), (HashAlgorithm::Md5, true));
        assert_eq!(HashAlgorithm::resolve_or_default("2"), (HashAlgorithm::Sha1, false));
        assert!(HashAlgorithm::resolve_strict("whirlpool").is_err());
    }

    #[test]
    fn test_from_hex_len() {
        assert_eq!(HashAlgorithm::from_hex_len(32), Some(HashAlgorithm::Md5));
        assert_eq!(HashAlgorithm::from_hex_len(128), Some(HashAlgorithm::Sha512));
        assert_eq!(HashAlgorithm::from_hex_len(12), None);
    }

    #[test]
    fn test_target_parse_is_case_insensitive() {
        let upper = TargetHash::parse(" 5D41402ABC4B2A76B9719D911017C592 ", &HashAlgorithm::Md5).unwrap();
        let lower = TargetHash::parse("5d41402abc4b2a76b9719d911017c592", &HashAlgorithm::Md5).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_hex(), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_target_parse_errors() {
        assert!(matches!(
            TargetHash::parse("  ", &HashAlgorithm::Md5),
            Err(SearchError::EmptyTarget)
        ));
        assert!(matches!(
            TargetHash::parse("zz", &HashAlgorithm::Md5),
            Err(SearchError::InvalidTargetHex(_))
        ));
        assert!(matches!(
            TargetHash::parse("5d41402abc4b2a76b9719d911017c592", &HashAlgorithm::Sha256),
            Err(SearchError::DigestLengthMismatch { expected: 32, actual: 16, .. })
        ));
    }
}
