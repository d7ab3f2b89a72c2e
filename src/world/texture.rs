//! ARGB textures and the bank that hands out ids for them.

use std::collections::HashMap;

/// Index into a [`TextureBank`]; stable for the bank's lifetime.
pub type TextureId = u16;

/// Slot of the fallback texture.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// Convenience checkerboard 8×8 (magenta/black).
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, 0xFF_FF00FF, 0xFF_000000)
    }
}

impl Texture {
    pub fn solid(name: &str, w: usize, h: usize, argb: u32) -> Self {
        Texture {
            name: name.to_string(),
            w,
            h,
            pixels: vec![argb; w * h],
        }
    }

    /// `size`×`size` checkerboard with one-texel squares.
    pub fn checker(name: &str, size: usize, light: u32, dark: u32) -> Self {
        let mut pixels = vec![0u32; size * size];
        for y in 0..size {
            for x in 0..size {
                pixels[y * size + x] = if (x ^ y) & 1 == 0 { light } else { dark };
            }
        }
        Texture {
            name: name.to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    /// Nearest-neighbour lookup with wrap-around addressing.
    #[inline]
    pub fn sample(&self, u: f64, v: f64) -> u32 {
        let x = ((u * self.w as f64).floor() as i64).rem_euclid(self.w as i64) as usize;
        let y = ((v * self.h as f64).floor() as i64).rem_euclid(self.h as i64) as usize;
        self.pixels[y * self.w + x]
    }

    /// Copy with every RGB channel multiplied by `factor` (alpha untouched).
    pub fn darkened(&self, factor: f64) -> Texture {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u32| ((c & 0xFF) as f64 * f).round() as u32;
        let pixels = self
            .pixels
            .iter()
            .map(|&px| {
                (px & 0xFF00_0000) | scale(px >> 16) << 16 | scale(px >> 8) << 8 | scale(px)
            })
            .collect();
        Texture {
            name: self.name.clone(),
            w: self.w,
            h: self.h,
            pixels,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture `{0}` is already in the bank")]
    Duplicate(String),

    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture bank is full")]
    Full,
}

/// Id-addressed store of decoded ARGB textures, keyed by [`Texture::name`].
///
/// Slot [`NO_TEXTURE`] holds the fallback drawn for unknown ids.
pub struct TextureBank {
    slots: Vec<Texture>,
    names: HashMap<String, TextureId>,
}

impl TextureBank {
    pub fn new(fallback: Texture) -> Self {
        Self {
            slots: vec![fallback],
            names: HashMap::new(),
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Loaded textures, not counting the fallback.
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.names.get(name).copied()
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.slots.get(usize::from(id)).ok_or(TextureError::BadId(id))
    }

    /// Never fails: unknown ids log a warning and get the fallback.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.texture(id).unwrap_or_else(|err| {
            log::warn!("{err}; drawing fallback texture");
            &self.slots[usize::from(NO_TEXTURE)]
        })
    }

    /// Store `tex` under its own name.
    pub fn insert(&mut self, tex: Texture) -> Result<TextureId, TextureError> {
        if self.names.contains_key(&tex.name) {
            return Err(TextureError::Duplicate(tex.name));
        }
        let id = TextureId::try_from(self.slots.len()).map_err(|_| TextureError::Full)?;
        self.names.insert(tex.name.clone(), id);
        self.slots.push(tex);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert(Texture::solid("RED", 2, 2, 0xFF_FF0000)).unwrap();
        let blue = bank.insert(Texture::solid("BLUE", 2, 2, 0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.texture(red).unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        assert!(bank.is_empty());
        bank.insert(Texture::solid("WOOD", 1, 1, 1)).unwrap();
        let err = bank.insert(Texture::solid("WOOD", 1, 1, 2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.texture(1).unwrap().pixels[0], 1);
    }

    #[test]
    fn bad_id_falls_back_to_checker() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn sample_wraps() {
        let tex = Texture::checker("C", 2, 1, 2);
        assert_eq!(tex.sample(0.0, 0.0), 1);
        assert_eq!(tex.sample(0.5, 0.0), 2);
        assert_eq!(tex.sample(1.0, 0.0), 1);
        assert_eq!(tex.sample(-0.25, 0.0), 2);
    }

    #[test]
    fn darkened_scales_rgb_only() {
        let tex = Texture::solid("S", 1, 1, 0x80_C8_64_32).darkened(0.5);
        assert_eq!(tex.pixels[0], 0x80_64_32_19);
    }
}
