use glam::DVec3;
use std::f64::consts::{FRAC_PI_3, PI, TAU};

/// Pitch is clamped to ±60° so the view never flips over the vertical.
pub const MAX_PITCH: f64 = FRAC_PI_3;

/// Default radians per unit of rotation input.
pub const DEFAULT_ROTATION_SPEED: f64 = 0.003;

/// Heading bucket reported to HUD / minimap collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinal {
    South,
    East,
    North,
    West,
}

/// First-person view-point in world space.
///
/// * `y` is up; with `yaw = 0` the camera looks down **+Z**.
/// * Positive `dx` in [`Camera::rotate`] turns right (yaw decreases).
/// * Positive pitch looks up.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: DVec3,
    pub yaw: f64,   // radians, kept in (−π, π]
    pub pitch: f64, // radians, kept in [−π/3, π/3]
    pub rotation_speed: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 0.0, 0.0)
    }
}

impl Camera {
    pub fn new(pos: DVec3, yaw: f64, pitch: f64) -> Self {
        Self {
            pos,
            yaw: normalize_yaw(yaw),
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }

    pub fn with_rotation_speed(mut self, speed: f64) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Apply mouse / key deltas.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.yaw = normalize_yaw(self.yaw - dx * self.rotation_speed);
        self.pitch = (self.pitch + dy * self.rotation_speed).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Heading bucket; boundaries sit at 45/135/225/315°.
    pub fn cardinal_direction(&self) -> Cardinal {
        let deg = self.yaw.to_degrees().rem_euclid(360.0);
        if !(45.0..315.0).contains(&deg) {
            Cardinal::South
        } else if deg < 135.0 {
            Cardinal::East
        } else if deg < 225.0 {
            Cardinal::North
        } else {
            Cardinal::West
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit view direction, pitch included.
    #[inline]
    pub fn forward(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        DVec3::new(-sy * cp, sp, cy * cp)
    }

    /// Unit vector to the camera's right; always horizontal.
    #[inline]
    pub fn right(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        DVec3::new(cy, 0.0, sy)
    }

    /// Unit vector to the top of the screen.
    #[inline]
    pub fn up(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        DVec3::new(sy * sp, cp, -cy * sp)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units along the heading and `side` units to the right,
    /// staying on the current horizontal plane.
    pub fn step(&mut self, forward: f64, side: f64) {
        let (sy, cy) = self.yaw.sin_cos();
        let flat_fwd = DVec3::new(-sy, 0.0, cy);
        self.pos += flat_fwd * forward + self.right() * side;
    }
}

/// Wrap an angle into (−π, π].
pub fn normalize_yaw(yaw: f64) -> f64 {
    let wrapped = (yaw + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(DVec3::ZERO, 0.7, -0.4);
        let (f, r, u) = (cam.forward(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < 1e-12);
        assert!((r.length() - 1.0).abs() < 1e-12);
        assert!((u.length() - 1.0).abs() < 1e-12);
        assert!(f.dot(r).abs() < 1e-12);
        assert!(f.dot(u).abs() < 1e-12);
        assert!(r.dot(u).abs() < 1e-12);
    }

    #[test]
    fn rotate_wraps_yaw_into_half_open_range() {
        let mut cam = Camera::new(DVec3::ZERO, 0.0, 0.0).with_rotation_speed(1.0);
        cam.rotate(-PI, 0.0);
        assert!((cam.yaw - PI).abs() < 1e-12, "π stays π, got {}", cam.yaw);
        cam.rotate(-0.5, 0.0);
        assert!(cam.yaw > -PI && cam.yaw <= PI);
        assert!((cam.yaw - (-PI + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn rotate_clamps_pitch() {
        let mut cam = Camera::new(DVec3::ZERO, 0.0, 0.0).with_rotation_speed(1.0);
        cam.rotate(0.0, 10.0);
        assert_eq!(cam.pitch, MAX_PITCH);
        cam.rotate(0.0, -20.0);
        assert_eq!(cam.pitch, -MAX_PITCH);
    }

    #[test]
    fn positive_dx_turns_right() {
        let mut cam = Camera::new(DVec3::ZERO, 0.0, 0.0).with_rotation_speed(1.0);
        cam.rotate(FRAC_PI_2, 0.0);
        // was looking down +Z with +X on the right; now looking down +X
        assert!((cam.forward() - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn cardinal_buckets() {
        let at = |deg: f64| Camera::new(DVec3::ZERO, deg.to_radians(), 0.0).cardinal_direction();
        assert_eq!(at(0.0), Cardinal::South);
        assert_eq!(at(44.0), Cardinal::South);
        assert_eq!(at(46.0), Cardinal::East);
        assert_eq!(at(90.0), Cardinal::East);
        assert_eq!(at(180.0), Cardinal::North);
        assert_eq!(at(-90.0), Cardinal::West);
        assert_eq!(at(-44.0), Cardinal::South);
    }

    #[test]
    fn step_keeps_height() {
        let mut cam = Camera::new(DVec3::new(0.0, 1.5, 0.0), 0.0, 0.5);
        cam.step(2.0, 1.0);
        assert!((cam.pos - DVec3::new(1.0, 1.5, 2.0)).length() < 1e-12);
    }
}
