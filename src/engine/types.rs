use glam::{DVec2, DVec3};
use smallvec::SmallVec;

use crate::world::{Color, Floor, Ramp, TextureId, Wall, WaterSurface};

/// A quad clipped by one plane has at most 5 corners; 8 keeps every
/// per-object polygon on the stack.
pub type PolyBuf<T> = SmallVec<[T; 8]>;

/// Constants that depend on the *frame-buffer* and FoV, not on the map.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_w: f64, // pre-derived for speed
    pub half_h: f64, // pre-derived for speed
    /// `1 / tan(fov / 2)`
    pub scale: f64,
}

impl Screen {
    pub fn new(w: usize, h: usize, fov: f64) -> Self {
        Self {
            w,
            h,
            half_w: w as f64 * 0.5,
            half_h: h as f64 * 0.5,
            scale: 1.0 / (fov * 0.5).tan(),
        }
    }
}

/// Screen-space polygon shared by every renderable kind.
///
/// `screen_points.len() == tex_coords.len() >= 3` for anything a
/// processor emits.
#[derive(Clone, Debug)]
pub struct ProjectedPoly {
    pub distance: f64,
    pub screen_points: PolyBuf<DVec2>,
    pub tex_coords: PolyBuf<DVec2>,
    pub color: Color,
    pub texture: Option<TextureId>,
}

/// Camera-space polygon plus UVs, before projection.
#[derive(Clone, Debug, Default)]
pub struct CamPoly {
    pub points: PolyBuf<DVec3>,
    pub uvs: PolyBuf<DVec2>,
}

impl CamPoly {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn push(&mut self, p: DVec3, uv: DVec2) {
        self.points.push(p);
        self.uvs.push(uv);
    }
}

#[derive(Clone, Debug)]
pub struct WallInfo<'a> {
    pub poly: ProjectedPoly,
    pub wall: &'a Wall,
}

#[derive(Clone, Debug)]
pub struct FloorInfo<'a> {
    pub poly: ProjectedPoly,
    pub floor: &'a Floor,
    pub viewing_from_below: bool,
}

#[derive(Clone, Debug)]
pub struct WaterInfo<'a> {
    pub poly: ProjectedPoly,
    pub water: &'a WaterSurface,
    pub viewing_from_below: bool,
}

#[derive(Clone, Debug)]
pub struct RampInfo<'a> {
    pub poly: ProjectedPoly,
    pub ramp: &'a Ramp,
}

/// One entry of the per-frame painter's queue.
#[derive(Clone, Debug)]
pub enum Renderable<'a> {
    Wall(WallInfo<'a>),
    Floor(FloorInfo<'a>),
    Water(WaterInfo<'a>),
    Ramp(RampInfo<'a>),
}

impl Renderable<'_> {
    #[inline]
    pub fn poly(&self) -> &ProjectedPoly {
        match self {
            Renderable::Wall(w) => &w.poly,
            Renderable::Floor(f) => &f.poly,
            Renderable::Water(w) => &w.poly,
            Renderable::Ramp(r) => &r.poly,
        }
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.poly().distance
    }

    /// Extra opacity applied on top of the fog fade.
    #[inline]
    pub fn opacity(&self) -> f64 {
        match self {
            Renderable::Water(_) => WATER_ALPHA,
            Renderable::Wall(_) | Renderable::Floor(_) | Renderable::Ramp(_) => 1.0,
        }
    }
}

/// Water is drawn see-through.
pub const WATER_ALPHA: f64 = 0.7;
