use glam::{DVec2, DVec3};

use crate::world::texture::TextureId;

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as 0xAARRGGBB.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn from_argb(px: u32) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: (px >> 16) as u8,
            g: (px >> 8) as u8,
            b: px as u8,
        }
    }

    /// Move every colour channel toward `target` by `t` (0 = self, 1 = target).
    /// Alpha is kept from `self`.
    pub fn lerp_rgb(self, target: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Color {
            r: mix(self.r, target.r),
            g: mix(self.g, target.g),
            b: mix(self.b, target.b),
            a: self.a,
        }
    }
}

/// Per-surface adjustment of the base 0‥1 UVs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureMapping {
    pub scale: f64,
    pub offset_u: f64,
    pub offset_v: f64,
    pub rotation: f64, // radians, around the UV centre
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_u: 0.0,
            offset_v: 0.0,
            rotation: 0.0,
        }
    }
}

impl TextureMapping {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// `rotate((uv − ½)·scale) + ½ + offset`
    pub fn apply(&self, uv: DVec2) -> DVec2 {
        if self.is_identity() {
            return uv;
        }
        let centred = (uv - DVec2::splat(0.5)) * self.scale;
        let rotated = DVec2::from_angle(self.rotation).rotate(centred);
        rotated + DVec2::splat(0.5) + DVec2::new(self.offset_u, self.offset_v)
    }
}

/*------------------------- map geometry -----------------------------*/

/// Vertical quad from `start` to `end`, extruded upward by `height`.
#[derive(Clone, Debug)]
pub struct Wall {
    pub start: DVec3,
    pub end: DVec3,
    pub height: f64,
    pub color: Color,
    pub texture: Option<TextureId>,
    pub mapping: TextureMapping,
}

impl Wall {
    pub fn new(start: DVec3, end: DVec3, height: f64, color: Color) -> Self {
        Self {
            start,
            end,
            height,
            color,
            texture: None,
            mapping: TextureMapping::default(),
        }
    }

    pub fn with_texture(mut self, tex: TextureId) -> Self {
        self.texture = Some(tex);
        self
    }

    /// 3-D centre used as the painter's sort point.
    pub fn center(&self) -> DVec3 {
        let mid = (self.start + self.end) * 0.5;
        DVec3::new(mid.x, (self.start.y + self.end.y) * 0.5 + self.height * 0.5, mid.z)
    }
}

/// Axis-aligned horizontal rectangle at height `y`.
#[derive(Clone, Debug)]
pub struct Floor {
    pub x1: f64,
    pub z1: f64,
    pub x2: f64,
    pub z2: f64,
    pub y: f64,
    pub color: Color,
    pub texture: Option<TextureId>,
    pub mapping: TextureMapping,
}

impl Floor {
    pub fn new(x1: f64, z1: f64, x2: f64, z2: f64, y: f64, color: Color) -> Self {
        Self {
            x1,
            z1,
            x2,
            z2,
            y,
            color,
            texture: None,
            mapping: TextureMapping::default(),
        }
    }

    pub fn with_texture(mut self, tex: TextureId) -> Self {
        self.texture = Some(tex);
        self
    }

    pub fn center(&self) -> DVec3 {
        DVec3::new((self.x1 + self.x2) * 0.5, self.y, (self.z1 + self.z2) * 0.5)
    }
}

/// Floor-like rectangle with animated surface.
///
/// `depth` and `damage_per_second` are consumed by gameplay code; the
/// renderer only looks at the rectangle and the wave parameters.
#[derive(Clone, Debug)]
pub struct WaterSurface {
    pub surface: Floor,
    pub wave_amplitude: f64,
    pub wave_speed: f64,
    pub depth: f64,
    pub damage_per_second: f64,
}

impl WaterSurface {
    pub fn new(surface: Floor) -> Self {
        Self {
            surface,
            wave_amplitude: 0.02,
            wave_speed: 1.5,
            depth: 1.0,
            damage_per_second: 0.0,
        }
    }

    /// Surface height at `time` seconds.
    pub fn level_at(&self, time: f64) -> f64 {
        self.surface.y + self.wave_amplitude * (time * self.wave_speed).sin()
    }
}

/// Sloped quad given by four explicit corners, in drawing order.
#[derive(Clone, Debug)]
pub struct Ramp {
    pub corners: [DVec3; 4],
    pub color: Color,
    pub texture: Option<TextureId>,
    pub mapping: TextureMapping,
}

impl Ramp {
    pub fn new(corners: [DVec3; 4], color: Color) -> Self {
        Self {
            corners,
            color,
            texture: None,
            mapping: TextureMapping::default(),
        }
    }

    pub fn with_texture(mut self, tex: TextureId) -> Self {
        self.texture = Some(tex);
        self
    }

    pub fn center(&self) -> DVec3 {
        self.corners.iter().copied().sum::<DVec3>() * 0.25
    }
}

/// Every world list the renderer consumes for one frame.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub walls: Vec<Wall>,
    pub floors: Vec<Floor>,
    pub waters: Vec<WaterSurface>,
    pub ramps: Vec<Ramp>,
    /// Seconds since level start; drives water waves.
    pub time: f64,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.walls.len() + self.floors.len() + self.waters.len() + self.ramps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every object, walls first, then floors, water and ramps.
    pub fn items(&self) -> impl Iterator<Item = SceneItem<'_>> {
        self.walls
            .iter()
            .map(SceneItem::Wall)
            .chain(self.floors.iter().map(SceneItem::Floor))
            .chain(self.waters.iter().map(SceneItem::Water))
            .chain(self.ramps.iter().map(SceneItem::Ramp))
    }
}

/// Borrowed view of one scene object.
#[derive(Clone, Copy, Debug)]
pub enum SceneItem<'a> {
    Wall(&'a Wall),
    Floor(&'a Floor),
    Water(&'a WaterSurface),
    Ramp(&'a Ramp),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn argb_packing() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_argb(), 0x44_11_22_33);
        assert_eq!(Color::from_argb(0x44_11_22_33), c);
    }

    #[test]
    fn lerp_keeps_alpha() {
        let c = Color::rgba(200, 100, 0, 128).lerp_rgb(Color::BLACK, 0.5);
        assert_eq!(c, Color::rgba(100, 50, 0, 128));
    }

    #[test]
    fn identity_mapping_is_passthrough() {
        let uv = DVec2::new(0.25, 0.75);
        assert_eq!(TextureMapping::default().apply(uv), uv);
    }

    #[test]
    fn mapping_rotates_about_centre() {
        let m = TextureMapping {
            rotation: FRAC_PI_2,
            ..Default::default()
        };
        let uv = m.apply(DVec2::new(1.0, 0.5));
        assert!((uv - DVec2::new(0.5, 1.0)).length() < 1e-12);
    }

    #[test]
    fn wall_center_includes_half_height() {
        let w = Wall::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), 3.0, Color::WHITE);
        assert_eq!(w.center(), DVec3::new(1.0, 1.5, 0.0));
    }
}
