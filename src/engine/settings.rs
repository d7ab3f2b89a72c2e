use bitflags::bitflags;
use std::f64::consts::FRAC_PI_3;

use crate::world::Color;

bitflags! {
    /// Feature toggles of the scene renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Drop anything further than `max_render_distance`.
        const RENDER_DISTANCE   = 0x01;
        /// Darken with distance.
        const SHADOWS           = 0x02;
        /// Fade out toward `visibility_radius`; needs `RENDER_DISTANCE` too.
        const VISIBILITY_RADIUS = 0x04;
        /// Outline every polygon.
        const BORDERS           = 0x08;
        /// Pre-filter through the quadtree in `draw_scene_indexed`.
        const FRUSTUM_CULLING   = 0x10;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::RENDER_DISTANCE | RenderFlags::SHADOWS
    }
}

/// Full configuration surface of the scene renderer.
///
/// Copied once per frame, so nothing changes halfway through a draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub fov: f64, // radians
    pub near_plane: f64,
    pub far_plane: f64,
    pub max_render_distance: f64,

    pub shadow_distance: f64,
    pub shadow_intensity: f64,
    pub ambient_light: f64,
    pub shadow_color: Color,

    pub visibility_radius: f64,
    pub visibility_falloff: f64,
    pub outside_color: Color,

    pub border_color: Color,
    pub border_thickness: f64,

    pub flags: RenderFlags,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_3,
            near_plane: 0.1,
            far_plane: 1000.0,
            max_render_distance: 50.0,
            shadow_distance: 20.0,
            shadow_intensity: 0.8,
            ambient_light: 0.25,
            shadow_color: Color::BLACK,
            visibility_radius: 25.0,
            visibility_falloff: 5.0,
            outside_color: Color::BLACK,
            border_color: Color::rgb(20, 20, 20),
            border_thickness: 1.0,
            flags: RenderFlags::default(),
        }
    }
}

impl RenderSettings {
    #[inline]
    pub fn enabled(&self, flag: RenderFlags) -> bool {
        self.flags.contains(flag)
    }

    /// The radius fade only applies when render distance is on as well.
    #[inline]
    pub fn fog_active(&self) -> bool {
        self.enabled(RenderFlags::VISIBILITY_RADIUS | RenderFlags::RENDER_DISTANCE)
    }

    /// Furthest distance anything can be drawn at.
    pub fn cull_distance(&self) -> f64 {
        if self.enabled(RenderFlags::RENDER_DISTANCE) {
            self.max_render_distance
        } else {
            self.far_plane
        }
    }

    /// 1.0 at the eye, falling linearly to `ambient_light` at `shadow_distance`.
    pub fn shadow_factor(&self, distance: f64) -> f64 {
        if !self.enabled(RenderFlags::SHADOWS) {
            return 1.0;
        }
        if self.shadow_distance <= 0.0 {
            return if distance <= 0.0 { 1.0 } else { self.ambient_light.max(1.0 - self.shadow_intensity) };
        }
        let t = (distance / self.shadow_distance).min(1.0);
        (1.0 - t * self.shadow_intensity).max(self.ambient_light)
    }

    /// 1.0 inside `radius − falloff`, 0.0 beyond `radius`, linear between.
    pub fn visibility_factor(&self, distance: f64) -> f64 {
        if !self.fog_active() {
            return 1.0;
        }
        let (radius, falloff) = (self.visibility_radius, self.visibility_falloff);
        if falloff <= 0.0 {
            return if distance < radius { 1.0 } else { 0.0 };
        }
        if distance < radius - falloff {
            1.0
        } else if distance > radius {
            0.0
        } else {
            (radius - distance) / falloff
        }
    }

    /// Untextured shading: move toward `shadow_color` by `1 − shade`.
    pub fn shade_color(&self, color: Color, shade: f64) -> Color {
        color.lerp_rgb(self.shadow_color, 1.0 - shade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on() -> RenderSettings {
        RenderSettings {
            flags: RenderFlags::all(),
            ..Default::default()
        }
    }

    #[test]
    fn shadow_factor_curve() {
        let s = all_on();
        assert_eq!(s.shadow_factor(0.0), 1.0);
        for d in [s.shadow_distance, s.shadow_distance * 1.5, 1e6] {
            assert_eq!(s.shadow_factor(d), s.ambient_light);
        }
        let mut last = f64::INFINITY;
        for i in 0..=100 {
            let f = s.shadow_factor(i as f64 * 0.3);
            assert!(f <= last);
            last = f;
        }
    }

    #[test]
    fn zero_shadow_distance_is_a_step() {
        let s = RenderSettings {
            shadow_distance: 0.0,
            ..all_on()
        };
        assert_eq!(s.shadow_factor(0.0), 1.0);
        assert!(!s.shadow_factor(0.0).is_nan());
        assert_eq!(s.shadow_factor(0.5), s.ambient_light.max(1.0 - s.shadow_intensity));
    }

    #[test]
    fn shadows_off_is_full_bright() {
        let s = RenderSettings {
            flags: RenderFlags::RENDER_DISTANCE,
            ..Default::default()
        };
        assert_eq!(s.shadow_factor(1e3), 1.0);
    }

    #[test]
    fn visibility_factor_curve() {
        let s = all_on();
        assert_eq!(s.visibility_factor(0.0), 1.0);
        assert_eq!(s.visibility_factor(s.visibility_radius), 0.0);
        assert_eq!(s.visibility_factor(s.visibility_radius + 3.0), 0.0);
        let mid = s.visibility_radius - s.visibility_falloff * 0.5;
        assert!((s.visibility_factor(mid) - 0.5).abs() < 1e-12);
        // continuous at the inner edge
        let inner = s.visibility_radius - s.visibility_falloff;
        assert!((s.visibility_factor(inner) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn visibility_needs_render_distance() {
        let s = RenderSettings {
            flags: RenderFlags::VISIBILITY_RADIUS,
            ..Default::default()
        };
        assert!(!s.fog_active());
        assert_eq!(s.visibility_factor(1e3), 1.0);
    }

    #[test]
    fn shade_color_moves_toward_shadow() {
        let s = RenderSettings {
            shadow_color: Color::rgb(0, 0, 100),
            ..Default::default()
        };
        let c = s.shade_color(Color::rgba(200, 200, 0, 77), 0.5);
        assert_eq!(c, Color::rgba(100, 100, 50, 77));
        assert_eq!(s.shade_color(Color::WHITE, 1.0), Color::WHITE);
    }
}
