//! World geometry → sorted, shaded screen polygons.

pub mod cache;
pub mod planes;
pub mod projection;
pub mod scene;
pub mod settings;
pub mod types;
pub mod walls;

pub use cache::{DEFAULT_CACHE_CAPACITY, SHADE_LEVELS, TextureCache};
pub use projection::View;
pub use scene::{FrameStats, SceneRenderer};
pub use settings::{RenderFlags, RenderSettings};
pub use types::{ProjectedPoly, Renderable, Screen, WATER_ALPHA};
