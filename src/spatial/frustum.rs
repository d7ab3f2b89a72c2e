//! Six-plane view frustum, rebuilt from the camera pose every frame.

use glam::DVec3;

use crate::world::Camera;

/// `dot(normal, p) + offset >= 0` ⇔ `p` is on the inner side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub offset: f64,
}

impl Plane {
    /// Plane through `point` facing `normal` (normalised here).
    fn through(point: DVec3, normal: DVec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            offset: -n.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.offset
    }
}

/// Plane order matches [`ViewFrustum::planes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left = 0,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

#[derive(Clone, Debug)]
pub struct ViewFrustum {
    planes: [Plane; 6],
    fov: f64,
    near: f64,
    far: f64,
}

impl ViewFrustum {
    /// `fov` is the full opening angle, used both horizontally and
    /// vertically (the projection scales both axes by the same factor).
    pub fn new(fov: f64, near: f64, far: f64) -> Self {
        Self {
            planes: [Plane::default(); 6],
            fov,
            near,
            far,
        }
    }

    pub fn set_clip(&mut self, fov: f64, near: f64, far: f64) {
        self.fov = fov;
        self.near = near;
        self.far = far;
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn plane(&self, side: Side) -> &Plane {
        &self.planes[side as usize]
    }

    pub fn update(&mut self, cam: &Camera) {
        let (fwd, right, up) = (cam.forward(), cam.right(), cam.up());
        let (s, c) = (self.fov * 0.5).sin_cos();
        let eye = cam.pos;

        self.planes = [
            Plane::through(eye, right * c + fwd * s),
            Plane::through(eye, -right * c + fwd * s),
            Plane::through(eye, up * c + fwd * s),
            Plane::through(eye, -up * c + fwd * s),
            Plane::through(eye + fwd * self.near, fwd),
            Plane::through(eye + fwd * self.far, -fwd),
        ];
    }

    pub fn is_point_in_frustum(&self, p: DVec3) -> bool {
        self.is_sphere_in_frustum(p, 0.0)
    }

    pub fn is_sphere_in_frustum(&self, center: DVec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|pl| pl.signed_distance(center) >= -radius)
    }

    /// Conservative: rejects only when all 8 corners fail one single plane,
    /// so some boxes outside near a frustum edge still pass.
    pub fn is_box_in_frustum(&self, min: DVec3, max: DVec3) -> bool {
        let corners = [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ];
        self.planes
            .iter()
            .all(|pl| corners.iter().any(|&c| pl.signed_distance(c) >= 0.0))
    }
}
