//! Shaded texture variants, so distance darkening costs one copy per
//! (texture, light level) instead of one per pixel per frame.

use std::collections::HashMap;

use crate::world::{Texture, TextureBank, TextureId};

/// Number of distinct darkening steps (like Doom's light-level colormaps).
pub const SHADE_LEVELS: u8 = 32;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Bounded map of darkened textures owned by the renderer.
///
/// On overflow an arbitrary entry is evicted; it is not an LRU.
pub struct TextureCache {
    entries: HashMap<(TextureId, u8), Texture>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl TextureCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Quantise a 0‥1 shade factor.
    #[inline]
    pub fn level(shade: f64) -> u8 {
        let max = (SHADE_LEVELS - 1) as f64;
        (shade.clamp(0.0, 1.0) * max).round() as u8
    }

    /// `id` darkened by `shade`; full brightness comes straight from the bank.
    pub fn shaded<'a>(&'a mut self, bank: &'a TextureBank, id: TextureId, shade: f64) -> &'a Texture {
        let level = Self::level(shade);
        if level == SHADE_LEVELS - 1 {
            return bank.texture_or_missing(id);
        }

        let key = (id, level);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.entries.len() >= self.capacity {
                let victim = self.entries.keys().next().copied();
                if let Some(victim) = victim {
                    self.entries.remove(&victim);
                }
            }
            let factor = level as f64 / (SHADE_LEVELS - 1) as f64;
            self.entries
                .insert(key, bank.texture_or_missing(id).darkened(factor));
        }
        &self.entries[&key]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(hits, misses)` since creation or the last [`TextureCache::clear`].
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_with_white() -> (TextureBank, TextureId) {
        let mut bank = TextureBank::default_with_checker();
        let id = bank.insert(Texture::solid("WHITE", 2, 2, 0xFF_FFFFFF)).unwrap();
        (bank, id)
    }

    #[test]
    fn full_bright_bypasses_cache() {
        let (bank, id) = bank_with_white();
        let mut cache = TextureCache::default();
        assert_eq!(cache.shaded(&bank, id, 1.0).pixels[0], 0xFF_FFFFFF);
        assert!(cache.is_empty());
    }

    #[test]
    fn darkened_variant_is_reused() {
        let (bank, id) = bank_with_white();
        let mut cache = TextureCache::default();
        let first = cache.shaded(&bank, id, 0.0).pixels[0];
        assert_eq!(first, 0xFF_000000);
        cache.shaded(&bank, id, 0.001);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn capacity_is_respected() {
        let (bank, id) = bank_with_white();
        let mut cache = TextureCache::with_capacity(3);
        for level in 0..10 {
            cache.shaded(&bank, id, level as f64 / 31.0);
        }
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), (0, 0));
    }

    #[test]
    fn level_quantisation() {
        assert_eq!(TextureCache::level(-1.0), 0);
        assert_eq!(TextureCache::level(0.5), 16);
        assert_eq!(TextureCache::level(2.0), SHADE_LEVELS - 1);
    }
}
