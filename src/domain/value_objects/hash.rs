//! Hash value objects
//!
//! Two different SHA-256 digests travel through the pipeline:
//!
//! - [`Checksum`] covers the raw bytes of every source fragment. Any edit,
//!   including comments and whitespace, changes it.
//! - [`Fingerprint`] covers the canonical serialization of the compiled
//!   semantic content. Reformatting does not change it.
//!
//! Both are stored as 64 lowercase hex characters without prefix.

use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex characters shown in log previews.
pub const PREVIEW_LEN: usize = 16;

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// First [`PREVIEW_LEN`] characters of a digest, for log lines.
pub fn preview(s: &str) -> &str {
    s.get(..PREVIEW_LEN).unwrap_or(s)
}

/// Raw-source checksum of a configuration set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Checksum(String);

impl Checksum {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(sha256_hex(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        preview(&self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical content fingerprint of a compiled pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(sha256_hex(bytes))
    }

    /// Accept only a well-formed lowercase hex digest.
    pub fn parse(s: &str) -> Option<Self> {
        is_sha256_hex(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        preview(&self.0)
    }

    /// Exact, case-sensitive comparison against a pinned value.
    pub fn matches_str(&self, pinned: &str) -> bool {
        self.0 == pinned
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
