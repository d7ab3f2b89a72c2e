//! Region quadtree over the X-Z plane.
//!
//! * An object is stored **once**, in the deepest node whose quadrant fully
//!   contains its bounds; anything straddling a split line stays with the
//!   parent, so queries never see duplicates.
//! * Nodes split lazily, on the first insert past [`MAX_OBJECTS`].

use glam::{DVec2, DVec3};

use crate::spatial::{bounds::AabbBounds, frustum::ViewFrustum};

pub const MAX_OBJECTS: usize = 10;
pub const MAX_DEPTH: usize = 5;

/// Node boxes are tested against the frustum with this vertical extent.
pub const NODE_Y_EXTENT: f64 = 1000.0;

/// Which scene list an indexed object lives in, and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Wall(usize),
    Floor(usize),
    Water(usize),
    Ramp(usize),
}

/// Storage unit of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadObject {
    pub item: ObjectRef,
    pub bounds: AabbBounds,
    /// Height of the bounding-sphere centre (type specific).
    pub center_y: f64,
}

impl QuadObject {
    /// Sphere around the object: XZ-box centre at `center_y`, radius half
    /// the XZ diagonal.
    pub fn bounding_sphere(&self) -> (DVec3, f64) {
        let c = self.bounds.center();
        (DVec3::new(c.x, self.center_y, c.y), self.bounds.half_diagonal())
    }
}

#[derive(Debug)]
pub struct Quadtree {
    bounds: AabbBounds,
    depth: usize,
    objects: Vec<QuadObject>,
    children: Option<Box<[Quadtree; 4]>>,
}

impl Quadtree {
    pub fn new(bounds: AabbBounds) -> Self {
        Self::with_depth(bounds, 0)
    }

    fn with_depth(bounds: AabbBounds, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            objects: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> &AabbBounds {
        &self.bounds
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// Objects stored in this node and below.
    pub fn len(&self) -> usize {
        self.objects.len()
            + self
                .children
                .iter()
                .flat_map(|c| c.iter())
                .map(Quadtree::len)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `false` if `obj` lies outside this node entirely.
    pub fn insert(&mut self, obj: QuadObject) -> bool {
        if !self.bounds.intersects(&obj.bounds) {
            return false;
        }

        if self.objects.len() < MAX_OBJECTS || self.depth >= MAX_DEPTH {
            self.objects.push(obj);
            return true;
        }

        let depth = self.depth;
        let children = self.children.get_or_insert_with(|| {
            let [a, b, c, d] = self.bounds.quadrants();
            Box::new([
                Quadtree::with_depth(a, depth + 1),
                Quadtree::with_depth(b, depth + 1),
                Quadtree::with_depth(c, depth + 1),
                Quadtree::with_depth(d, depth + 1),
            ])
        });

        // first quadrant that can hold it whole takes it; straddlers stay here
        match children.iter_mut().find(|c| c.bounds.contains(&obj.bounds)) {
            Some(child) => child.insert(obj),
            None => {
                self.objects.push(obj);
                true
            }
        }
    }

    /// Every object whose bounds intersect `range`.
    pub fn query(&self, range: &AabbBounds) -> Vec<&QuadObject> {
        let mut out = Vec::new();
        self.query_into(range, &mut out);
        out
    }

    fn query_into<'a>(&'a self, range: &AabbBounds, out: &mut Vec<&'a QuadObject>) {
        if !self.bounds.intersects(range) {
            return;
        }
        out.extend(self.objects.iter().filter(|o| o.bounds.intersects(range)));
        for child in self.children.iter().flat_map(|c| c.iter()) {
            child.query_into(range, out);
        }
    }

    /// Objects whose bounding sphere is inside `frustum` and whose sphere
    /// centre is within `max_distance` of `eye`.
    ///
    /// A node whose box misses the frustum, or whose nearest possible point
    /// (centre distance minus half diagonal) is further than `max_distance`,
    /// is skipped together with its subtree.
    pub fn query_frustum(&self, frustum: &ViewFrustum, eye: DVec3, max_distance: f64) -> Vec<&QuadObject> {
        let mut out = Vec::new();
        self.query_frustum_into(frustum, eye, max_distance, &mut out);
        out
    }

    fn query_frustum_into<'a>(
        &'a self,
        frustum: &ViewFrustum,
        eye: DVec3,
        max_distance: f64,
        out: &mut Vec<&'a QuadObject>,
    ) {
        let b = &self.bounds;
        let node_min = DVec3::new(b.min_x, -NODE_Y_EXTENT, b.min_z);
        let node_max = DVec3::new(b.max_x, NODE_Y_EXTENT, b.max_z);
        if !frustum.is_box_in_frustum(node_min, node_max) {
            return;
        }
        let c = b.center();
        let node_dist = c.distance(DVec2::new(eye.x, eye.z));
        if node_dist - b.half_diagonal() > max_distance {
            return;
        }

        let max_sq = max_distance * max_distance;
        for obj in &self.objects {
            let (center, radius) = obj.bounding_sphere();
            if frustum.is_sphere_in_frustum(center, radius) && center.distance_squared(eye) <= max_sq {
                out.push(obj);
            }
        }
        for child in self.children.iter().flat_map(|c| c.iter()) {
            child.query_frustum_into(frustum, eye, max_distance, out);
        }
    }

    /// Drop every object and child; the node keeps its bounds.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.children = None;
    }
}
