//! ---------------------------------------------------------------------------
//! Software (CPU) polygon surface
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Relies on the scene renderer to submit polygons *back-to-front*, so no
//!   Z-buffer is needed.
//! * Polygons are filled with an even-odd scanline walk sampling pixel
//!   centres; textures are mapped affinely over a triangle fan.
//! ---------------------------------------------------------------------------

use glam::DVec2;
use smallvec::SmallVec;

use crate::{
    renderer::{Rgba, Surface, SurfaceState},
    world::{Color, Texture},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Canvas {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    state: SurfaceState,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    /// (Re)allocate for a new resolution; contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.scratch.clear();
        self.scratch.resize(width * height, 0xFF_000000);
    }

    /// Finished frame, row-major, ready for `minifb::Window::update_with_buffer`.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    /// `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scratch.get(y * self.width + x).copied()
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, src: Rgba) {
        let idx = y * self.width + x;
        self.scratch[idx] = blend(self.scratch[idx], src, self.state.alpha);
    }

    /// Square brush of side `2r+1` centred on `(x, y)`.
    fn plot(&mut self, x: i32, y: i32, r: i32, src: Rgba) {
        for py in y - r..=y + r {
            for px in x - r..=x + r {
                if (0..self.width as i32).contains(&px) && (0..self.height as i32).contains(&py) {
                    self.put(px as usize, py as usize, src);
                }
            }
        }
    }

    /// Integer Bresenham line-drawing algorithm.
    fn draw_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, r: i32, col: Rgba) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x0, y0, r, col);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/*──────────────────────── Surface trait impl ─────────────────────────*/
impl Surface for Canvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Color) {
        self.scratch.fill(color.to_argb() | 0xFF_000000);
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        let src = color.to_argb();
        for_each_span(points, self.width, self.height, |y, x0, x1| {
            for x in x0..x1 {
                self.put(x, y, src);
            }
        });
    }

    fn stroke_polygon(&mut self, points: &[DVec2], color: Color, thickness: f64) {
        if points.len() < 2 {
            return;
        }
        let r = ((thickness - 1.0) * 0.5).round().max(0.0) as i32;
        let src = color.to_argb();
        let n = points.len();
        for i in 0..n {
            let (a, b) = (points[i], points[(i + 1) % n]);
            if !(a.is_finite() && b.is_finite()) {
                continue;
            }
            // far-off vertices are clamped so Bresenham stays bounded
            let lim = (self.width.max(self.height) * 4) as f64;
            let (a, b) = (a.clamp(DVec2::splat(-lim), DVec2::splat(lim)), b.clamp(DVec2::splat(-lim), DVec2::splat(lim)));
            self.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, r, src);
        }
    }

    fn draw_textured_polygon(&mut self, points: &[DVec2], uvs: &[DVec2], texture: &Texture) {
        let n = points.len().min(uvs.len());
        if n < 3 || texture.w == 0 || texture.h == 0 {
            return;
        }
        let fan: SmallVec<[FanTri; 6]> = (1..n - 1)
            .filter_map(|i| FanTri::new([points[0], points[i], points[i + 1]], [uvs[0], uvs[i], uvs[i + 1]]))
            .collect();
        if fan.is_empty() {
            return;
        }

        for_each_span(&points[..n], self.width, self.height, |y, x0, x1| {
            let py = y as f64 + 0.5;
            for x in x0..x1 {
                let uv = uv_at(&fan, DVec2::new(x as f64 + 0.5, py));
                self.put(x, y, texture.sample(uv.x, uv.y));
            }
        });
    }

    fn state(&self) -> SurfaceState {
        self.state
    }

    fn set_state(&mut self, state: SurfaceState) {
        self.state = state;
    }
}

/*──────────────────────── helpers ────────────────────────────────────*/

/// `src` over `dst` with `alpha` × source alpha; result is opaque.
#[inline]
fn blend(dst: Rgba, src: Rgba, alpha: f64) -> Rgba {
    let a = alpha * ((src >> 24) & 0xFF) as f64 / 255.0;
    if a >= 1.0 {
        return src | 0xFF_000000;
    }
    if a <= 0.0 {
        return dst;
    }
    let mix = |shift: u32| {
        let s = ((src >> shift) & 0xFF) as f64;
        let d = ((dst >> shift) & 0xFF) as f64;
        ((s * a + d * (1.0 - a)).round() as u32).min(255) << shift
    };
    0xFF_000000 | mix(16) | mix(8) | mix(0)
}

/// Even-odd scanline walk over pixel centres. Calls `f(y, x_start, x_end)`
/// for every horizontal run, `x_end` exclusive, already clipped to the surface.
fn for_each_span(points: &[DVec2], width: usize, height: usize, mut f: impl FnMut(usize, usize, usize)) {
    if points.len() < 3 || !points.iter().all(|p| p.is_finite()) {
        return;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let y_start = (min_y - 0.5).ceil().max(0.0) as i64;
    let y_end = ((max_y - 0.5).ceil() as i64).min(height as i64);

    let n = points.len();
    let mut xs: SmallVec<[f64; 8]> = SmallVec::new();
    for y in y_start..y_end {
        let sy = y as f64 + 0.5;
        xs.clear();
        for i in 0..n {
            let (a, b) = (points[i], points[(i + 1) % n]);
            if (a.y <= sy) != (b.y <= sy) {
                xs.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil().max(0.0) as i64;
            let x1 = ((pair[1] - 0.5).ceil() as i64).min(width as i64);
            if x0 < x1 {
                f(y as usize, x0 as usize, x1 as usize);
            }
        }
    }
}

/// One triangle of the fan with its barycentric set-up pre-computed.
struct FanTri {
    a: DVec2,
    e1: DVec2,
    e2: DVec2,
    inv_den: f64,
    uv: [DVec2; 3],
}

impl FanTri {
    fn new(p: [DVec2; 3], uv: [DVec2; 3]) -> Option<Self> {
        let e1 = p[1] - p[0];
        let e2 = p[2] - p[0];
        let den = e1.perp_dot(e2);
        if den.abs() < 1e-12 {
            return None;
        }
        Some(Self {
            a: p[0],
            e1,
            e2,
            inv_den: 1.0 / den,
            uv,
        })
    }

    /// Barycentric weights of `p` (may be negative outside).
    #[inline]
    fn weights(&self, p: DVec2) -> [f64; 3] {
        let d = p - self.a;
        let w1 = d.perp_dot(self.e2) * self.inv_den;
        let w2 = self.e1.perp_dot(d) * self.inv_den;
        [1.0 - w1 - w2, w1, w2]
    }
}

/// UV of pixel `p`: from the fan triangle that contains it, or the one it
/// is least outside of (edge pixels).
fn uv_at(fan: &[FanTri], p: DVec2) -> DVec2 {
    let mut best = (f64::NEG_INFINITY, DVec2::ZERO);
    for tri in fan {
        let w = tri.weights(p);
        let inside = w[0].min(w[1]).min(w[2]);
        if inside > best.0 {
            best = (inside, tri.uv[0] * w[0] + tri.uv[1] * w[1] + tri.uv[2] * w[2]);
            if inside >= 0.0 {
                break;
            }
        }
    }
    best.1
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> [DVec2; 4] {
        [
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
    }

    fn count(canvas: &Canvas, px: Rgba) -> usize {
        canvas.pixels().iter().filter(|&&p| p == px).count()
    }

    #[test]
    fn fill_polygon_covers_pixel_centres() {
        let mut c = Canvas::new(8, 8);
        c.fill_polygon(&square(2.0, 2.0, 6.0, 5.0), Color::WHITE);
        assert_eq!(count(&c, 0xFF_FFFFFF), 4 * 3);
        assert_eq!(c.pixel(2, 2), Some(0xFF_FFFFFF));
        assert_eq!(c.pixel(6, 2), Some(0xFF_000000));
    }

    #[test]
    fn offscreen_polygon_is_clipped() {
        let mut c = Canvas::new(4, 4);
        c.fill_polygon(&square(-100.0, -100.0, 100.0, 100.0), Color::WHITE);
        assert_eq!(count(&c, 0xFF_FFFFFF), 16);
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut c = Canvas::new(2, 2);
        c.fill(Color::rgb(0, 0, 200));
        c.set_state(SurfaceState {
            alpha: 0.5,
            ..Default::default()
        });
        c.fill_polygon(&square(0.0, 0.0, 2.0, 2.0), Color::rgb(200, 0, 0));
        assert_eq!(c.pixel(0, 0), Some(0xFF_640064));
    }

    #[test]
    fn stroke_draws_outline_only() {
        let mut c = Canvas::new(10, 10);
        c.stroke_polygon(&square(1.0, 1.0, 8.0, 8.0), Color::WHITE, 1.0);
        assert_eq!(c.pixel(1, 1), Some(0xFF_FFFFFF));
        assert_eq!(c.pixel(8, 5), Some(0xFF_FFFFFF));
        assert_eq!(c.pixel(4, 4), Some(0xFF_000000));
    }

    #[test]
    fn textured_polygon_samples_texture() {
        let mut c = Canvas::new(8, 8);
        let tex = Texture::checker("C", 2, 0xFF_FF0000, 0xFF_00FF00);
        let uvs = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        c.draw_textured_polygon(&square(0.0, 0.0, 8.0, 8.0), &uvs, &tex);
        // quadrants of a 2×2 checker
        assert_eq!(c.pixel(1, 1), Some(0xFF_FF0000));
        assert_eq!(c.pixel(6, 1), Some(0xFF_00FF00));
        assert_eq!(c.pixel(1, 6), Some(0xFF_00FF00));
        assert_eq!(c.pixel(6, 6), Some(0xFF_FF0000));
    }

    #[test]
    fn pixel_outside_is_none() {
        let c = Canvas::new(4, 3);
        assert_eq!(c.pixel(3, 2), Some(0xFF_000000));
        assert_eq!(c.pixel(4, 0), None);
        assert_eq!(c.pixel(0, 3), None);
        // in range for the flat buffer, but not a valid column
        assert_eq!(c.pixel(5, 1), None);
    }

    #[test]
    fn degenerate_input_is_ignored() {
        let mut c = Canvas::new(4, 4);
        c.fill_polygon(&[DVec2::ZERO, DVec2::ONE], Color::WHITE);
        c.fill_polygon(&[DVec2::ZERO, DVec2::new(f64::NAN, 1.0), DVec2::ONE], Color::WHITE);
        assert_eq!(count(&c, 0xFF_FFFFFF), 0);
    }
}
