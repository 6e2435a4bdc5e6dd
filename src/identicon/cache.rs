//! Memoized documents.
//!
//! Rendering is pure, so a document can be reused for as long as the
//! generator lives. Keys are lowercased since hex digits are read
//! case-insensitively.

use dashmap::DashMap;
use std::sync::Arc;

use super::{IdenticonGenerator, Result};

/// Rendered documents keyed by hash, flushed when full.
pub struct DocumentCache {
    documents: DashMap<String, Arc<str>>,
    capacity: usize,
}

impl DocumentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            documents: DashMap::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Return the cached document, rendering it on a miss.
    ///
    /// The flag is `true` for a cache hit.
    pub fn get_or_render(
        &self,
        generator: &IdenticonGenerator,
        hash: &str,
    ) -> Result<(Arc<str>, bool)> {
        let key = hash.to_ascii_lowercase();
        if let Some(document) = self.documents.get(&key) {
            return Ok((Arc::clone(document.value()), true));
        }

        let document: Arc<str> = generator.render(&key)?.into();

        if self.documents.len() >= self.capacity {
            crate::debug!("cache"; "flushing {} documents", self.documents.len());
            self.documents.clear();
        }
        self.documents.insert(key, Arc::clone(&document));

        Ok((document, false))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn test_hit_after_miss() {
        let cache = DocumentCache::new(8);
        let generator = IdenticonGenerator::default();

        let (first, hit) = cache.get_or_render(&generator, HASH).unwrap();
        assert!(!hit);
        let (second, hit) = cache.get_or_render(&generator, HASH).unwrap();
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, generator.render(HASH).unwrap());
    }

    #[test]
    fn test_case_folded_key() {
        let cache = DocumentCache::new(8);
        let generator = IdenticonGenerator::default();

        cache.get_or_render(&generator, HASH).unwrap();
        let (_, hit) = cache
            .get_or_render(&generator, &HASH.to_uppercase())
            .unwrap();
        assert!(hit);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_flush_when_full() {
        let cache = DocumentCache::new(2);
        let generator = IdenticonGenerator::default();

        for prefix in ["0", "1", "2"] {
            let hash = format!("{prefix}{}", &HASH[1..]);
            cache.get_or_render(&generator, &hash).unwrap();
        }
        // Third insert flushed the first two
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = DocumentCache::new(2);
        let generator = IdenticonGenerator::default();

        assert!(cache.get_or_render(&generator, "abc").is_err());
        assert!(cache.is_empty());
    }
}
