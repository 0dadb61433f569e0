// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache keys derived from audio content and transcription parameters.

use std::fmt;

use sha2::{Digest, Sha256};

/// Bumped whenever the key derivation changes, orphaning old entries.
const KEY_NAMESPACE: &[u8] = b"chatscribe-transcript-v1";

/// Fingerprint used when no language is requested.
pub const AUTO_LANGUAGE: &str = "auto";

/// Hex-encoded SHA-256 fingerprint of `(audio, model, language)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key. Each field is length-prefixed so that no two
    /// distinct tuples hash the same byte stream.
    pub fn compute(audio: &[u8], model: &str, language: Option<&str>) -> Self {
        let language = language.unwrap_or(AUTO_LANGUAGE);
        let mut hasher = Sha256::new();
        for field in [KEY_NAMESPACE, audio, model.as_bytes(), language.as_bytes()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Parses a key given on the command line or read from a file name.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == 64 && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-character directory shard.
    pub fn shard(&self) -> &str {
        &self.0[..2]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deterministic_and_hex() {
        let a = CacheKey::compute(b"audio", "small", Some("it"));
        let b = CacheKey::compute(b"audio", "small", Some("it"));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(CacheKey::parse(a.as_str()), Some(a.clone()));
        assert_eq!(a.shard(), &a.as_str()[..2]);
    }

    #[test]
    fn parameters_change_the_key() {
        let base = CacheKey::compute(b"audio", "small", Some("it"));
        assert_ne!(base, CacheKey::compute(b"audio", "medium", Some("it")));
        assert_ne!(base, CacheKey::compute(b"audio", "small", Some("en")));
        assert_ne!(base, CacheKey::compute(b"audio!", "small", Some("it")));
    }

    #[test]
    fn no_language_means_auto() {
        assert_eq!(
            CacheKey::compute(b"x", "m", None),
            CacheKey::compute(b"x", "m", Some(AUTO_LANGUAGE))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CacheKey::parse("abc").is_none());
        assert!(CacheKey::parse(&"G".repeat(64)).is_none());
    }

    proptest! {
        #[test]
        fn field_boundaries_matter(model in "[a-z]{1,8}", split in 0usize..8) {
            let split = split.min(model.len());
            let (head, tail) = model.split_at(split);
            let shifted = CacheKey::compute(head.as_bytes(), tail, None);
            let whole = CacheKey::compute(b"", &model, None);
            if !head.is_empty() {
                prop_assert_ne!(shifted, whole);
            }
        }
    }
}
