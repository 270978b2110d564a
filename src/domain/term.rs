use std::fmt;

use sha2::{Digest, Sha256};

use crate::app::{EksiError, Result};

/// A normalized dictionary lookup.
///
/// The term is trimmed and lower-cased once, so the same word always maps to
/// the same upstream query and the same cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EksiError::InvalidTerm(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the normalized term as 64 lowercase hex characters.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
