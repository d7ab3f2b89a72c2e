//! World → camera → screen.
//!
//! Camera space: `x` right, `y` up, `z` forward depth.  Nothing with
//! `z <= near` may reach [`project_point`].

use glam::{DVec2, DVec3};

use crate::{
    engine::types::{CamPoly, PolyBuf, Screen},
    world::Camera,
};

/// Yaw/pitch rotation pre-computed once per frame.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    origin: DVec3,
    sin_yaw: f64,
    cos_yaw: f64,
    sin_pitch: f64,
    cos_pitch: f64,
}

impl ViewTransform {
    pub fn new(cam: &Camera) -> Self {
        let (sin_yaw, cos_yaw) = cam.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = cam.pitch.sin_cos();
        Self {
            origin: cam.pos,
            sin_yaw,
            cos_yaw,
            sin_pitch,
            cos_pitch,
        }
    }

    /// Translate by −position, undo yaw, then undo pitch.
    #[inline]
    pub fn apply(&self, p: DVec3) -> DVec3 {
        let d = p - self.origin;
        // Rotate by -yaw about Y: right = (cos, 0, sin), forward = (-sin, 0, cos)
        let x = d.x * self.cos_yaw + d.z * self.sin_yaw;
        let z_flat = -d.x * self.sin_yaw + d.z * self.cos_yaw;
        // Rotate by -pitch about the camera's X axis
        let y = d.y * self.cos_pitch - z_flat * self.sin_pitch;
        let z = d.y * self.sin_pitch + z_flat * self.cos_pitch;
        DVec3::new(x, y, z)
    }
}

/// One-off helper; per-frame code should keep a [`ViewTransform`].
pub fn transform_point(p: DVec3, cam: &Camera) -> DVec3 {
    ViewTransform::new(cam).apply(p)
}

/// A segment that survived [`clip_line_to_near_plane`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClippedLine {
    pub p1: DVec3,
    pub p2: DVec3,
    pub uv1: DVec2,
    pub uv2: DVec2,
}

/// Clip a segment to `z > near`. Returns `None` if completely behind.
pub fn clip_line_to_near_plane(
    p1: DVec3,
    p2: DVec3,
    near: f64,
    uv1: DVec2,
    uv2: DVec2,
) -> Option<ClippedLine> {
    if p1.z <= near && p2.z <= near {
        return None;
    }
    let mut out = ClippedLine { p1, p2, uv1, uv2 };
    if p1.z > near && p2.z > near {
        return Some(out);
    }

    let t = (near - p1.z) / (p2.z - p1.z);
    let hit = p1.lerp(p2, t).with_z(near);
    let hit_uv = uv1.lerp(uv2, t);
    if p1.z <= near {
        out.p1 = hit;
        out.uv1 = hit_uv;
    } else {
        out.p2 = hit;
        out.uv2 = hit_uv;
    }
    Some(out)
}

/// Sutherland–Hodgman against the single plane `z = near`, UVs in lockstep.
///
/// May return an empty polygon.
pub fn clip_polygon_to_near_plane(points: &[DVec3], uvs: &[DVec2], near: f64) -> CamPoly {
    debug_assert_eq!(points.len(), uvs.len());
    let n = points.len().min(uvs.len());
    let mut out = CamPoly::default();
    if n == 0 {
        return out;
    }

    let mut prev = n - 1;
    for cur in 0..n {
        let (a, b) = (points[prev], points[cur]);
        let (a_in, b_in) = (a.z > near, b.z > near);
        if a_in != b_in {
            let t = (near - a.z) / (b.z - a.z);
            out.push(a.lerp(b, t).with_z(near), uvs[prev].lerp(uvs[cur], t));
        }
        if b_in {
            out.push(b, uvs[cur]);
        }
        prev = cur;
    }
    out
}

/// Everything a processor needs to turn world geometry into screen polygons.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub transform: ViewTransform,
    pub eye: DVec3,
    pub near: f64,
    pub screen: Screen,
    /// Scene clock, seconds.
    pub time: f64,
}

impl View {
    pub fn new(cam: &Camera, near: f64, screen: Screen, time: f64) -> Self {
        Self {
            transform: ViewTransform::new(cam),
            eye: cam.pos,
            near,
            screen,
            time,
        }
    }

    #[inline]
    pub fn to_cam(&self, p: DVec3) -> DVec3 {
        self.transform.apply(p)
    }

    #[inline]
    pub fn all_behind(&self, pts: &[DVec3]) -> bool {
        pts.iter().all(|p| p.z <= self.near)
    }

    pub fn project_all(&self, pts: &[DVec3]) -> PolyBuf<DVec2> {
        pts.iter()
            .map(|&p| project_point(p, self.near, &self.screen))
            .collect()
    }
}

/// Perspective divide and viewport mapping; screen Y grows downward.
#[inline]
pub fn project_point(p: DVec3, near: f64, screen: &Screen) -> DVec2 {
    let z = p.z.max(near);
    DVec2::new(
        screen.half_w + (p.x / z) * screen.scale * screen.half_w,
        screen.half_h - (p.y / z) * screen.scale * screen.half_h,
    )
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
