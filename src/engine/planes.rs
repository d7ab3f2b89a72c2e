//! Horizontal and sloped surfaces: floors, water, ramps.

use glam::{DVec2, DVec3};

use crate::{
    engine::{
        projection::{View, clip_polygon_to_near_plane},
        types::{CamPoly, FloorInfo, ProjectedPoly, RampInfo, WaterInfo},
    },
    world::{Color, Floor, Ramp, TextureMapping, WaterSurface},
};

/// Inset on every edge so neighbouring tiles don't leave a seam.
pub const SEAM_EPSILON: f64 = 0.01;

/// Floors this close to eye height sort slightly nearer than walls.
pub const NEAR_FLOOR_BAND: f64 = 0.5;
pub const NEAR_FLOOR_BIAS: f64 = 1.0;

/// Water UV scroll per second per unit of wave speed.
const WATER_SCROLL: f64 = 0.05;

/// Ramp quads map the whole texture once.
const RAMP_UVS: [DVec2; 4] = [
    DVec2::new(0.0, 0.0),
    DVec2::new(1.0, 0.0),
    DVec2::new(1.0, 1.0),
    DVec2::new(0.0, 1.0),
];

/// World-space corners + base UVs of a floor rectangle at height `y`.
///
/// Counter-clockwise seen from above; reversed (and `v` flipped) when
/// `from_below` so the texture keeps its orientation.
pub fn floor_corners(rect: &Floor, y: f64, from_below: bool) -> [(DVec3, DVec2); 4] {
    let (x1, x2) = (rect.x1 + SEAM_EPSILON, rect.x2 - SEAM_EPSILON);
    let (z1, z2) = (rect.z1 + SEAM_EPSILON, rect.z2 - SEAM_EPSILON);
    let span_x = rect.x2 - rect.x1;
    let span_z = rect.z2 - rect.z1;

    let corner = |x: f64, z: f64| {
        let u = if span_x != 0.0 { (x - rect.x1) / span_x } else { 0.0 };
        let v = if span_z != 0.0 { (z - rect.z1) / span_z } else { 0.0 };
        let v = if from_below { 1.0 - v } else { v };
        (DVec3::new(x, y, z), DVec2::new(u, v))
    };

    let mut out = [corner(x1, z1), corner(x1, z2), corner(x2, z2), corner(x2, z1)];
    if from_below {
        out.reverse();
    }
    out
}

/// Sort key for a horizontal tile centred at `center`.
pub fn floor_distance(eye: DVec3, center: DVec3) -> f64 {
    let d = eye.distance(center);
    if (eye.y - center.y).abs() < NEAR_FLOOR_BAND {
        (d - NEAR_FLOOR_BIAS).max(0.0)
    } else {
        d
    }
}

pub fn process_floor<'a>(floor: &'a Floor, view: &View) -> Option<FloorInfo<'a>> {
    let from_below = floor.y > view.eye.y;
    let corners = floor_corners(floor, floor.y, from_below);
    let poly = clip_and_project(&corners, &floor.mapping, DVec2::ZERO, view)?;

    Some(FloorInfo {
        poly: ProjectedPoly {
            distance: floor_distance(view.eye, floor.center()),
            color: floor.color,
            texture: floor.texture,
            ..poly
        },
        floor,
        viewing_from_below: from_below,
    })
}

pub fn process_water<'a>(water: &'a WaterSurface, view: &View) -> Option<WaterInfo<'a>> {
    let rect = &water.surface;
    let y = water.level_at(view.time);
    let from_below = y > view.eye.y;
    let corners = floor_corners(rect, y, from_below);
    let scroll = DVec2::new(view.time * water.wave_speed * WATER_SCROLL, 0.0);
    let poly = clip_and_project(&corners, &rect.mapping, scroll, view)?;

    Some(WaterInfo {
        poly: ProjectedPoly {
            distance: floor_distance(view.eye, rect.center().with_y(y)),
            color: rect.color,
            texture: rect.texture,
            ..poly
        },
        water,
        viewing_from_below: from_below,
    })
}

pub fn process_ramp<'a>(ramp: &'a Ramp, view: &View) -> Option<RampInfo<'a>> {
    let mut corners = [(DVec3::ZERO, DVec2::ZERO); 4];
    for (slot, (&p, &uv)) in corners.iter_mut().zip(ramp.corners.iter().zip(RAMP_UVS.iter())) {
        *slot = (p, uv);
    }
    let poly = clip_and_project(&corners, &ramp.mapping, DVec2::ZERO, view)?;

    Some(RampInfo {
        poly: ProjectedPoly {
            distance: view.eye.distance(ramp.center()),
            color: ramp.color,
            texture: ramp.texture,
            ..poly
        },
        ramp,
    })
}

/// transform → all-behind test → clip → project. Distance, colour and
/// texture are left for the caller to fill in.
fn clip_and_project(
    corners: &[(DVec3, DVec2); 4],
    mapping: &TextureMapping,
    uv_shift: DVec2,
    view: &View,
) -> Option<ProjectedPoly> {
    let mut cam = CamPoly::default();
    for &(p, uv) in corners {
        cam.push(view.to_cam(p), uv);
    }
    if view.all_behind(&cam.points) {
        return None;
    }

    let clipped = clip_polygon_to_near_plane(&cam.points, &cam.uvs, view.near);
    if clipped.len() < 3 {
        return None;
    }

    Some(ProjectedPoly {
        distance: 0.0,
        screen_points: view.project_all(&clipped.points),
        tex_coords: clipped.uvs.iter().map(|&uv| mapping.apply(uv + uv_shift)).collect(),
        color: Color::BLACK,
        texture: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::types::Screen, world::Camera};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    const NEAR: f64 = 0.1;

    fn view_from(cam: &Camera) -> View {
        View::new(cam, NEAR, Screen::new(800, 600, FRAC_PI_3), 0.0)
    }

    fn tile() -> Floor {
        Floor::new(0.0, 0.0, 2.0, 2.0, 0.0, Color::WHITE)
    }

    /// UV of each corner keyed by its world (x, z).
    fn uv_at(corners: &[(DVec3, DVec2); 4], x: f64, z: f64) -> DVec2 {
        corners
            .iter()
            .find(|(p, _)| (p.x - x).abs() < 1e-12 && (p.z - z).abs() < 1e-12)
            .map(|&(_, uv)| uv)
            .unwrap()
    }

    #[test]
    fn corners_are_inset() {
        let c = floor_corners(&tile(), 0.0, false);
        assert_eq!(c[0].0, DVec3::new(0.01, 0.0, 0.01));
        assert!((c[2].0 - DVec3::new(1.99, 0.0, 1.99)).length() < 1e-12);
        assert!((c[0].1 - DVec2::new(0.005, 0.005)).length() < 1e-12);
    }

    #[test]
    fn from_below_reverses_and_flips_v() {
        let above = floor_corners(&tile(), 0.0, false);
        let below = floor_corners(&tile(), 0.0, true);
        let order_above: Vec<_> = above.iter().map(|c| c.0).collect();
        let mut order_below: Vec<_> = below.iter().map(|c| c.0).collect();
        order_below.reverse();
        assert_eq!(order_above, order_below);

        for &(p, uv) in &above {
            let flipped = uv_at(&below, p.x, p.z);
            assert_eq!(flipped.x, uv.x);
            assert!((flipped.y - (1.0 - uv.y)).abs() < 1e-12);
        }
    }

    #[test]
    fn camera_above_and_below_floor() {
        let floor = tile();
        let look_down = Camera::new(DVec3::new(1.0, 5.0, 1.0), 0.0, -FRAC_PI_3);
        let info = process_floor(&floor, &view_from(&look_down)).expect("floor visible from above");
        assert!(!info.viewing_from_below);

        let look_up = Camera::new(DVec3::new(1.0, -5.0, 1.0), 0.0, FRAC_PI_3);
        let below = process_floor(&floor, &view_from(&look_up)).expect("floor visible from below");
        assert!(below.viewing_from_below);

        // both unclipped; below walks the corners in reverse with v flipped
        let (up, down) = (&info.poly.tex_coords, &below.poly.tex_coords);
        assert_eq!(up.len(), 4);
        assert_eq!(down.len(), 4);
        for i in 0..4 {
            assert_eq!(down[3 - i].x, up[i].x);
            assert!((down[3 - i].y - (1.0 - up[i].y)).abs() < 1e-12);
        }
    }

    #[test]
    fn floor_sort_bias_near_eye_level() {
        let center = DVec3::new(0.0, 0.0, 3.0);
        assert!((floor_distance(DVec3::new(0.0, 0.2, 0.0), center) - (0.2f64.hypot(3.0) - 1.0)).abs() < 1e-12);
        assert!((floor_distance(DVec3::new(0.0, 4.0, 0.0), center) - 5.0).abs() < 1e-12);
        // never negative
        assert_eq!(floor_distance(DVec3::new(0.0, 0.1, 3.0), center), 0.0);
    }

    #[test]
    fn floor_behind_camera_is_dropped() {
        let cam = Camera::new(DVec3::new(1.0, 1.0, 10.0), 0.0, 0.0);
        assert!(process_floor(&tile(), &view_from(&cam)).is_none());
    }

    #[test]
    fn floor_under_camera_is_clipped() {
        let cam = Camera::new(DVec3::new(1.0, 1.0, 1.0), 0.0, 0.0);
        let view = view_from(&cam);
        let floor = tile();
        let info = process_floor(&floor, &view).unwrap();
        assert!(info.poly.screen_points.len() >= 3);
        // clipped front edge lands on the near plane, far below the horizon
        assert!(info.poly.screen_points.iter().any(|p| p.y > 600.0));
    }

    #[test]
    fn water_rides_the_wave() {
        let water = WaterSurface {
            wave_amplitude: 0.5,
            wave_speed: 1.0,
            ..WaterSurface::new(tile())
        };
        let cam = Camera::new(DVec3::new(1.0, 0.2, -3.0), 0.0, 0.0);
        let calm = View::new(&cam, NEAR, Screen::new(800, 600, FRAC_PI_3), 0.0);
        let crest = View {
            time: FRAC_PI_2,
            ..calm
        };
        assert!(!process_water(&water, &calm).unwrap().viewing_from_below);
        // the crest rises above the eye
        assert!(process_water(&water, &crest).unwrap().viewing_from_below);
    }

    #[test]
    fn ramp_uses_corner_centroid() {
        let ramp = Ramp::new(
            [
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 2.0),
                DVec3::new(0.0, 1.0, 2.0),
            ],
            Color::WHITE,
        );
        let cam = Camera::new(DVec3::new(0.5, 0.5, -4.0), 0.0, 0.0);
        let info = process_ramp(&ramp, &view_from(&cam)).unwrap();
        assert_eq!(info.poly.tex_coords.as_slice(), &RAMP_UVS);
        assert!((info.poly.distance - 5.0).abs() < 1e-12);
    }
}
