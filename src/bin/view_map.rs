//! Interactive first-person viewer for ASCII grid maps.
//!
//! ```bash
//! RUST_LOG=gridview_rs=debug cargo run --release -- --map level.txt --cull
//! ```
//!
//! ←/→ turn, ↑/↓ look, W/S/A/D move, Esc quits.

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use gridview_rs::{
    engine::{RenderFlags, RenderSettings, SceneRenderer},
    renderer::{Canvas, Surface},
    spatial::SceneIndex,
    world::{Camera, GridMap, GridTextures, Texture, TextureBank},
};

/// Radians per frame while a turn key is held (rotation speed is 1.0).
const TURN_STEP: f64 = 0.04;
/// World units per frame while a move key is held.
const MOVE_STEP: f64 = 0.05;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// ASCII grid map; the built-in demo level when omitted
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov_deg: f64,

    /// Outline every polygon
    #[arg(long)]
    borders: bool,

    #[arg(long)]
    no_shadows: bool,

    /// Drop anything further away than this
    #[arg(long, value_name = "UNITS")]
    render_distance: Option<f64>,

    /// Fade geometry out toward this radius (needs render distance)
    #[arg(long, value_name = "UNITS")]
    visibility_radius: Option<f64>,

    /// Pre-filter through the quadtree + view frustum
    #[arg(long)]
    cull: bool,
}

impl Opts {
    fn settings(&self) -> RenderSettings {
        let mut s = RenderSettings {
            fov: self.fov_deg.to_radians(),
            ..Default::default()
        };
        s.flags.set(RenderFlags::BORDERS, self.borders);
        s.flags.set(RenderFlags::SHADOWS, !self.no_shadows);
        s.flags.set(RenderFlags::FRUSTUM_CULLING, self.cull);
        if let Some(d) = self.render_distance {
            s.max_render_distance = d;
        }
        if let Some(r) = self.visibility_radius {
            s.visibility_radius = r;
            s.flags.insert(RenderFlags::VISIBILITY_RADIUS);
        }
        s
    }
}

/// Procedural stand-ins, stored under the names [`GridTextures::from_bank`] looks for.
fn load_textures() -> anyhow::Result<TextureBank> {
    let mut bank = TextureBank::default_with_checker();
    bank.insert(Texture::checker(GridTextures::WALL, 16, 0xFF_A0_60_40, 0xFF_70_40_30))?;
    bank.insert(Texture::checker(GridTextures::FLOOR, 8, 0xFF_70_70_70, 0xFF_50_50_50))?;
    bank.insert(Texture::checker(GridTextures::WATER, 8, 0xFF_30_60_D0, 0xFF_20_40_A0))?;
    Ok(bank)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let map = match &opts.map {
        Some(path) => {
            let src = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            GridMap::parse(&src).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GridMap::demo(),
    };
    let bank = load_textures()?;
    log::info!("{} textures loaded", bank.len());
    let mut scene = map.build_scene(&GridTextures::from_bank(&bank));
    let index = SceneIndex::build(&scene);
    println!(
        "map {}x{}: {} objects ({} indexed)",
        map.width(),
        map.height(),
        scene.len(),
        index.len()
    );

    let mut camera = Camera::new(map.spawn(), 0.0, 0.0).with_rotation_speed(1.0);
    let mut renderer = SceneRenderer::with_settings(opts.width, opts.height, opts.settings());
    let mut canvas = Canvas::new(opts.width, opts.height);

    let mut win = Window::new(
        "gridview",
        opts.width,
        opts.height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let start = Instant::now();
    let mut heading = camera.cardinal_direction();
    println!("facing {heading:?}");

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* input ------------------------------------------------------------ */
        let (mut dx, mut dy) = (0.0, 0.0);
        if win.is_key_down(Key::Left) {
            dx -= TURN_STEP;
        }
        if win.is_key_down(Key::Right) {
            dx += TURN_STEP;
        }
        if win.is_key_down(Key::Up) {
            dy += TURN_STEP;
        }
        if win.is_key_down(Key::Down) {
            dy -= TURN_STEP;
        }
        camera.rotate(dx, dy);

        let (mut fwd, mut side) = (0.0, 0.0);
        if win.is_key_down(Key::W) {
            fwd += MOVE_STEP;
        }
        if win.is_key_down(Key::S) {
            fwd -= MOVE_STEP;
        }
        if win.is_key_down(Key::A) {
            side -= MOVE_STEP;
        }
        if win.is_key_down(Key::D) {
            side += MOVE_STEP;
        }
        camera.step(fwd, side);

        let now = camera.cardinal_direction();
        if now != heading {
            heading = now;
            println!("facing {heading:?}");
        }

        /* resize ----------------------------------------------------------- */
        let (w, h) = win.get_size();
        if (w, h) != canvas.size() && w > 0 && h > 0 {
            canvas.resize(w, h);
            renderer.update_dimensions(w, h);
        }

        /* draw ------------------------------------------------------------- */
        scene.time = start.elapsed().as_secs_f64();
        canvas.fill(renderer.settings().outside_color);
        renderer.draw_scene_indexed(&mut canvas, &bank, &scene, &index, &camera);

        acc_time += t0.elapsed();
        acc_frames += 1;
        let (cw, ch) = canvas.size();
        win.update_with_buffer(canvas.pixels(), cw, ch)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let fps = 1000.0 / avg_ms;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
