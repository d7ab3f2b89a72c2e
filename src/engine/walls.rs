use glam::{DVec2, DVec3};

use crate::{
    engine::{
        projection::{View, clip_line_to_near_plane},
        types::{CamPoly, ProjectedPoly, WallInfo},
    },
    world::Wall,
};

/// Fixed texture corners: u runs start → end, v runs top → bottom.
const UV_BOTTOM_START: DVec2 = DVec2::new(0.0, 1.0);
const UV_BOTTOM_END: DVec2 = DVec2::new(1.0, 1.0);
const UV_TOP_END: DVec2 = DVec2::new(1.0, 0.0);
const UV_TOP_START: DVec2 = DVec2::new(0.0, 0.0);

/// Turn one wall into a clipped, projected polygon.
///
/// Returns `None` when nothing of it is in front of the near plane.
pub fn process_wall<'a>(wall: &'a Wall, view: &View) -> Option<WallInfo<'a>> {
    let up = DVec3::new(0.0, wall.height, 0.0);
    let bs = view.to_cam(wall.start);
    let be = view.to_cam(wall.end);
    let te = view.to_cam(wall.end + up);
    let ts = view.to_cam(wall.start + up);

    if view.all_behind(&[bs, be, te, ts]) {
        return None;
    }

    let poly = clip_wall_edges(
        [
            (bs, UV_BOTTOM_START),
            (be, UV_BOTTOM_END),
            (te, UV_TOP_END),
            (ts, UV_TOP_START),
        ],
        view.near,
    );
    if poly.points.len() < 3 || poly.uvs.len() < 3 {
        log::trace!("wall {:?}→{:?} degenerate after clip", wall.start, wall.end);
        return None;
    }

    Some(WallInfo {
        poly: ProjectedPoly {
            distance: view.eye.distance(wall.center()),
            screen_points: view.project_all(&poly.points),
            tex_coords: poly.uvs.iter().map(|&uv| wall.mapping.apply(uv)).collect(),
            color: wall.color,
            texture: wall.texture,
        },
        wall,
    })
}

/// Clip the bottom, end, top and start edges one by one, gathering the
/// surviving endpoints in cyclic order. Corners shared by two edges are
/// only kept once.
fn clip_wall_edges(corners: [(DVec3, DVec2); 4], near: f64) -> CamPoly {
    let mut acc = CamPoly::default();
    for i in 0..4 {
        let (p1, uv1) = corners[i];
        let (p2, uv2) = corners[(i + 1) % 4];
        if let Some(line) = clip_line_to_near_plane(p1, p2, near, uv1, uv2) {
            push_unique(&mut acc, line.p1, line.uv1);
            push_unique(&mut acc, line.p2, line.uv2);
        }
    }
    acc
}

#[inline]
fn push_unique(acc: &mut CamPoly, p: DVec3, uv: DVec2) {
    if !acc.points.contains(&p) {
        acc.push(p, uv);
    }
}
