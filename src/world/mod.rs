mod camera;
mod geometry;
mod grid;
mod texture;

pub use camera::{Camera, Cardinal, DEFAULT_ROTATION_SPEED, MAX_PITCH, normalize_yaw};

pub use geometry::{Color, Floor, Ramp, Scene, SceneItem, TextureMapping, Wall, WaterSurface};

pub use grid::{DEMO_MAP, GridMap, GridTextures, MapError, Tile};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
