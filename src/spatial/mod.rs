//! Optional visibility pre-filter: a quadtree of scene objects queried
//! with the camera frustum.

mod bounds;
mod frustum;
mod quadtree;

pub use bounds::AabbBounds;
pub use frustum::{Plane, Side, ViewFrustum};
pub use quadtree::{MAX_DEPTH, MAX_OBJECTS, NODE_Y_EXTENT, ObjectRef, QuadObject, Quadtree};

use glam::DVec2;

use crate::world::{Floor, Ramp, Scene, SceneItem, Wall, WaterSurface};

impl QuadObject {
    pub fn wall(idx: usize, w: &Wall) -> Self {
        Self {
            item: ObjectRef::Wall(idx),
            bounds: AabbBounds::new(w.start.x, w.start.z, w.end.x, w.end.z),
            center_y: w.center().y,
        }
    }

    pub fn floor(idx: usize, f: &Floor) -> Self {
        Self {
            item: ObjectRef::Floor(idx),
            bounds: AabbBounds::new(f.x1, f.z1, f.x2, f.z2),
            center_y: f.y,
        }
    }

    pub fn water(idx: usize, w: &WaterSurface) -> Self {
        let f = &w.surface;
        Self {
            item: ObjectRef::Water(idx),
            bounds: AabbBounds::new(f.x1, f.z1, f.x2, f.z2),
            center_y: f.y,
        }
    }

    pub fn ramp(idx: usize, r: &Ramp) -> Self {
        let bounds = AabbBounds::around(r.corners.iter().map(|c| DVec2::new(c.x, c.z)))
            .unwrap_or(AabbBounds::new(0.0, 0.0, 0.0, 0.0));
        Self {
            item: ObjectRef::Ramp(idx),
            bounds,
            center_y: r.center().y,
        }
    }
}

impl ObjectRef {
    /// Look the object up again; `None` if the scene changed under the index.
    pub fn resolve(self, scene: &Scene) -> Option<SceneItem<'_>> {
        match self {
            ObjectRef::Wall(i) => scene.walls.get(i).map(SceneItem::Wall),
            ObjectRef::Floor(i) => scene.floors.get(i).map(SceneItem::Floor),
            ObjectRef::Water(i) => scene.waters.get(i).map(SceneItem::Water),
            ObjectRef::Ramp(i) => scene.ramps.get(i).map(SceneItem::Ramp),
        }
    }
}

/// Quadtree over every object of one [`Scene`].
///
/// Static geometry only: rebuild (or [`SceneIndex::rebuild`]) whenever the
/// scene's lists change.
#[derive(Debug)]
pub struct SceneIndex {
    tree: Quadtree,
}

impl SceneIndex {
    /// Margin added around the scene extents.
    const MARGIN: f64 = 1.0;

    pub fn build(scene: &Scene) -> Self {
        let objects = Self::objects(scene);
        let bounds = objects
            .iter()
            .map(|o| o.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(AabbBounds::new(0.0, 0.0, 0.0, 0.0))
            .expanded(Self::MARGIN);

        let mut tree = Quadtree::new(bounds);
        for obj in objects {
            tree.insert(obj);
        }
        log::debug!("scene index: {} objects over {:?}", tree.len(), bounds);
        Self { tree }
    }

    pub fn rebuild(&mut self, scene: &Scene) {
        *self = Self::build(scene);
    }

    pub fn tree(&self) -> &Quadtree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Objects surviving the frustum + distance test, resolved against `scene`.
    pub fn visible<'a>(
        &self,
        scene: &'a Scene,
        frustum: &ViewFrustum,
        eye: glam::DVec3,
        max_distance: f64,
    ) -> Vec<SceneItem<'a>> {
        self.tree
            .query_frustum(frustum, eye, max_distance)
            .into_iter()
            .filter_map(|o| o.item.resolve(scene))
            .collect()
    }

    fn objects(scene: &Scene) -> Vec<QuadObject> {
        let walls = scene.walls.iter().enumerate().map(|(i, w)| QuadObject::wall(i, w));
        let floors = scene.floors.iter().enumerate().map(|(i, f)| QuadObject::floor(i, f));
        let waters = scene.waters.iter().enumerate().map(|(i, w)| QuadObject::water(i, w));
        let ramps = scene.ramps.iter().enumerate().map(|(i, r)| QuadObject::ramp(i, r));
        walls.chain(floors).chain(waters).chain(ramps).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Camera, Color, GridMap, GridTextures};
    use glam::DVec3;

    #[test]
    fn index_holds_every_object_once() {
        let scene = GridMap::demo().build_scene(&GridTextures::default());
        let index = SceneIndex::build(&scene);
        assert_eq!(index.len(), scene.len());

        let all = index.tree().query(index.tree().bounds());
        assert_eq!(all.len(), scene.len());
        assert!(all.iter().all(|o| o.item.resolve(&scene).is_some()));
    }

    #[test]
    fn visible_is_subset_in_front() {
        let scene = GridMap::demo().build_scene(&GridTextures::default());
        let index = SceneIndex::build(&scene);
        // west edge of the map looking east (+X)
        let mut cam = Camera::new(DVec3::new(1.5, 0.5, 3.5), 0.0, 0.0).with_rotation_speed(1.0);
        cam.rotate(std::f64::consts::FRAC_PI_2, 0.0);
        let mut frustum = ViewFrustum::new(std::f64::consts::FRAC_PI_3, 0.1, 100.0);
        frustum.update(&cam);

        let seen = index.visible(&scene, &frustum, cam.pos, 100.0);
        assert!(!seen.is_empty());
        assert!(seen.len() < scene.len());
    }

    #[test]
    fn wall_bounds_cover_segment() {
        let w = Wall::new(DVec3::new(3.0, 0.0, 1.0), DVec3::new(1.0, 0.0, 1.0), 2.0, Color::WHITE);
        let q = QuadObject::wall(7, &w);
        assert_eq!(q.bounds, AabbBounds::new(1.0, 1.0, 3.0, 1.0));
        assert_eq!(q.center_y, 1.0);
        assert_eq!(q.item, ObjectRef::Wall(7));
    }
}
