//! Per-frame orchestration: processors → distance filter → back-to-front
//! sort → shade → draw.
//!
//! There is no depth buffer. Ordering is entirely the painter's queue, so
//! mutually intersecting polygons may overlap wrongly; that is accepted.

use crate::{
    engine::{
        cache::TextureCache,
        planes::{process_floor, process_ramp, process_water},
        projection::View,
        settings::{RenderFlags, RenderSettings},
        types::{Renderable, Screen},
        walls::process_wall,
    },
    renderer::{Surface, SurfaceState},
    spatial::{SceneIndex, ViewFrustum},
    world::{Camera, Scene, SceneItem, TextureBank},
};

/// Objects this faint are not drawn at all.
const VISIBILITY_CUTOFF: f64 = 0.01;

/// Counters for one `draw_scene*` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Dropped by the quadtree before processing (indexed path only).
    pub culled_by_index: usize,
    /// Emitted by the processors.
    pub processed: usize,
    /// Further than the cull distance (`max_render_distance`, or
    /// `far_plane` with render distance off).
    pub out_of_range: usize,
    /// Faded out by the visibility radius.
    pub invisible: usize,
    pub drawn: usize,
}

/// Everything read during one frame, captured once at its start.
#[derive(Clone, Copy, Debug)]
struct Frame {
    settings: RenderSettings,
    view: View,
}

pub struct SceneRenderer {
    settings: RenderSettings,
    screen: Screen,
    cache: TextureCache,
    frustum: ViewFrustum,
}

impl SceneRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_settings(width, height, RenderSettings::default())
    }

    pub fn with_settings(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            screen: Screen::new(width, height, settings.fov),
            cache: TextureCache::default(),
            frustum: ViewFrustum::new(settings.fov, settings.near_plane, settings.far_plane),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Replace the whole configuration; projection scale follows `fov`.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
        self.screen = Screen::new(self.screen.w, self.screen.h, settings.fov);
        self.frustum
            .set_clip(settings.fov, settings.near_plane, settings.far_plane);
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.set_settings(RenderSettings { fov, ..self.settings });
    }

    pub fn set_flag(&mut self, flag: RenderFlags, on: bool) {
        self.settings.flags.set(flag, on);
    }

    /// Must be called whenever the target surface is resized.
    pub fn update_dimensions(&mut self, width: usize, height: usize) {
        self.screen = Screen::new(width, height, self.settings.fov);
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TextureCache {
        &mut self.cache
    }

    fn begin_frame(&self, camera: &Camera, time: f64) -> Frame {
        let settings = self.settings;
        Frame {
            settings,
            view: View::new(camera, settings.near_plane, self.screen, time),
        }
    }

    /// Process, range-filter and sort `items` the way a frame would,
    /// without drawing. Furthest first.
    pub fn build_queue<'a>(
        &self,
        items: impl IntoIterator<Item = SceneItem<'a>>,
        camera: &Camera,
        time: f64,
    ) -> Vec<Renderable<'a>> {
        let frame = self.begin_frame(camera, time);
        assemble(&frame, items, &mut FrameStats::default())
    }

    /// Draw every object of `scene`.
    pub fn draw_scene<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        bank: &TextureBank,
        scene: &Scene,
        camera: &Camera,
    ) -> FrameStats {
        let frame = self.begin_frame(camera, scene.time);
        let mut stats = FrameStats::default();
        let queue = assemble(&frame, scene.items(), &mut stats);
        self.paint(surface, bank, &frame, &queue, &mut stats);
        log_stats(&stats);
        stats
    }

    /// Like [`SceneRenderer::draw_scene`], but only objects the quadtree
    /// reports inside the view frustum are processed.
    ///
    /// Falls back to the full list when `FRUSTUM_CULLING` is off.
    pub fn draw_scene_indexed<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        bank: &TextureBank,
        scene: &Scene,
        index: &SceneIndex,
        camera: &Camera,
    ) -> FrameStats {
        if !self.settings.enabled(RenderFlags::FRUSTUM_CULLING) {
            return self.draw_scene(surface, bank, scene, camera);
        }

        let frame = self.begin_frame(camera, scene.time);
        let s = &frame.settings;
        self.frustum.set_clip(s.fov, s.near_plane, s.far_plane);
        self.frustum.update(camera);

        let candidates = index.visible(scene, &self.frustum, camera.pos, s.cull_distance());
        let mut stats = FrameStats {
            culled_by_index: scene.len().saturating_sub(candidates.len()),
            ..Default::default()
        };
        let queue = assemble(&frame, candidates, &mut stats);
        self.paint(surface, bank, &frame, &queue, &mut stats);
        log_stats(&stats);
        stats
    }

    fn paint<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        bank: &TextureBank,
        frame: &Frame,
        queue: &[Renderable<'_>],
        stats: &mut FrameStats,
    ) {
        let s = &frame.settings;
        let entry = surface.state();
        let base = SurfaceState {
            alpha: 1.0,
            antialias: true,
            stroke_width: s.border_thickness,
        };
        surface.set_state(base);

        if s.fog_active() {
            surface.fill(s.outside_color);
        }

        for item in queue {
            let poly = item.poly();
            let shade = s.shadow_factor(poly.distance);
            let visibility = s.visibility_factor(poly.distance);
            if visibility <= VISIBILITY_CUTOFF {
                stats.invisible += 1;
                continue;
            }

            let alpha = visibility * item.opacity();
            if alpha < 1.0 {
                surface.set_state(SurfaceState { alpha, ..base });
            }

            match poly.texture {
                Some(id) => {
                    let tex = self.cache.shaded(bank, id, shade);
                    surface.draw_textured_polygon(&poly.screen_points, &poly.tex_coords, tex);
                }
                None => surface.fill_polygon(&poly.screen_points, s.shade_color(poly.color, shade)),
            }

            if s.enabled(RenderFlags::BORDERS) {
                surface.stroke_polygon(&poly.screen_points, s.border_color, s.border_thickness);
            }

            if alpha < 1.0 {
                surface.set_state(base);
            }
            stats.drawn += 1;
        }

        surface.set_state(entry);
    }
}

fn process_item<'a>(item: SceneItem<'a>, view: &View) -> Option<Renderable<'a>> {
    match item {
        SceneItem::Wall(w) => process_wall(w, view).map(Renderable::Wall),
        SceneItem::Floor(f) => process_floor(f, view).map(Renderable::Floor),
        SceneItem::Water(w) => process_water(w, view).map(Renderable::Water),
        SceneItem::Ramp(r) => process_ramp(r, view).map(Renderable::Ramp),
    }
}

fn assemble<'a>(
    frame: &Frame,
    items: impl IntoIterator<Item = SceneItem<'a>>,
    stats: &mut FrameStats,
) -> Vec<Renderable<'a>> {
    let mut queue: Vec<Renderable<'a>> = items
        .into_iter()
        .filter_map(|item| process_item(item, &frame.view))
        .collect();
    stats.processed = queue.len();

    let limit = frame.settings.cull_distance();
    queue.retain(|r| r.distance() <= limit);
    stats.out_of_range = stats.processed - queue.len();

    // stable, so equal distances keep list order
    queue.sort_by(|a, b| b.distance().total_cmp(&a.distance()));
    queue
}

fn log_stats(stats: &FrameStats) {
    log::debug!(
        "frame: {} processed, {} index-culled, {} out of range, {} faded, {} drawn",
        stats.processed,
        stats.culled_by_index,
        stats.out_of_range,
        stats.invisible,
        stats.drawn
    );
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
