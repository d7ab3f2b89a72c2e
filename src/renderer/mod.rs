//! Drawing-surface abstraction.
//!
//! *The scene renderer never touches a pixel buffer directly.*
//! It sorts screen-space polygons back-to-front and hands them to a type
//! that implements [`Surface`].
//!
//! * Plug any 2-D back-end (the bundled [`Canvas`], a GUI canvas, …)
//!   without touching the projection pipeline.
//! * Compositing state is explicit ([`SurfaceState`]) so the renderer can
//!   restore whatever the caller had set.

use glam::DVec2;

use crate::world::{Color, Texture};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Mutable drawing state that persists between calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    /// Global opacity applied to every subsequent draw (0‥1).
    pub alpha: f64,
    /// Hint only; back-ends without AA may ignore it.
    pub antialias: bool,
    pub stroke_width: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            antialias: false,
            stroke_width: 1.0,
        }
    }
}

/// The 2-D primitives the scene renderer relies on.
pub trait Surface {
    fn size(&self) -> (usize, usize);

    /// Overwrite the whole surface, ignoring the current alpha.
    fn fill(&mut self, color: Color);

    /// Fill a polygon given in screen pixels.
    fn fill_polygon(&mut self, points: &[DVec2], color: Color);

    /// Outline a closed polygon.
    fn stroke_polygon(&mut self, points: &[DVec2], color: Color, thickness: f64);

    /// Fill a polygon sampling `texture` at the per-vertex `uvs`.
    ///
    /// `points.len() == uvs.len()`; any shading is already baked into
    /// `texture`.
    fn draw_textured_polygon(&mut self, points: &[DVec2], uvs: &[DVec2], texture: &Texture);

    fn state(&self) -> SurfaceState;

    fn set_state(&mut self, state: SurfaceState);
}

pub mod software;

pub use software::Canvas;
