//! ASCII grid maps → renderer world lists.
//!
//! ```text
//! #  wall block        .  floor        ~  water
//! /  ramp (rises +Z)   P  spawn        ␠  void
//! ```
//!
//! Row `r`, column `c` covers `x ∈ [c, c+1]`, `z ∈ [r, r+1]`.

use glam::DVec3;

use crate::world::{
    geometry::{Color, Floor, Ramp, Scene, Wall, WaterSurface},
    texture::{TextureBank, TextureId},
};

pub const WALL_HEIGHT: f64 = 1.0;
pub const WATER_LEVEL: f64 = -0.2;
pub const RAMP_RISE: f64 = 0.5;
pub const EYE_HEIGHT: f64 = 0.5;

pub const WALL_COLOR: Color = Color::rgb(150, 150, 160);
pub const FLOOR_COLOR: Color = Color::rgb(90, 80, 70);
pub const WATER_COLOR: Color = Color::rgb(40, 90, 200);
pub const RAMP_COLOR: Color = Color::rgb(120, 110, 90);

/// Built-in level used when the viewer is started without `--map`.
pub const DEMO_MAP: &str = "\
##########
#P...#...#
#....#.~~#
#.##...~~#
#.#..../.#
#...##...#
##########";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Void,
    Wall,
    Floor,
    Water,
    Ramp,
}

impl Tile {
    fn walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Water | Tile::Ramp)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },
    #[error("map has no spawn point `P`")]
    NoSpawn,
}

/// Which bank textures to hang on each tile kind (`None` = flat colour).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridTextures {
    pub wall: Option<TextureId>,
    pub floor: Option<TextureId>,
    pub water: Option<TextureId>,
    pub ramp: Option<TextureId>,
}

impl GridTextures {
    /// Bank names looked up by [`GridTextures::from_bank`].
    pub const WALL: &'static str = "WALL";
    pub const FLOOR: &'static str = "FLOOR";
    pub const WATER: &'static str = "WATER";
    pub const RAMP: &'static str = "RAMP";

    /// Pick up whichever of the conventional names the bank holds; tile
    /// kinds without one stay flat-coloured.
    pub fn from_bank(bank: &TextureBank) -> Self {
        Self {
            wall: bank.id(Self::WALL),
            floor: bank.id(Self::FLOOR),
            water: bank.id(Self::WATER),
            ramp: bank.id(Self::RAMP),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    spawn: (usize, usize),
}

impl GridMap {
    pub fn parse(src: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = src.lines().filter(|l| !l.trim().is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };
        let width = first.chars().count();

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut spawn = None;
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(MapError::Ragged {
                    row,
                    len,
                    expected: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Floor,
                    '~' => Tile::Water,
                    '/' => Tile::Ramp,
                    ' ' => Tile::Void,
                    'P' => {
                        spawn = Some((col, row));
                        Tile::Floor
                    }
                    _ => return Err(MapError::UnknownTile { row, col, ch }),
                };
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
            spawn: spawn.ok_or(MapError::NoSpawn)?,
        })
    }

    pub fn demo() -> Self {
        Self::parse(DEMO_MAP).expect("built-in demo map is well-formed")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range cells read as void.
    pub fn tile(&self, col: isize, row: isize) -> Tile {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return Tile::Void;
        }
        self.tiles[row as usize * self.width + col as usize]
    }

    /// Eye position at the centre of the spawn cell.
    pub fn spawn(&self) -> DVec3 {
        let (c, r) = self.spawn;
        DVec3::new(c as f64 + 0.5, EYE_HEIGHT, r as f64 + 0.5)
    }

    pub fn build_scene(&self, tex: &GridTextures) -> Scene {
        let mut scene = Scene::default();

        for row in 0..self.height as isize {
            for col in 0..self.width as isize {
                let (x, z) = (col as f64, row as f64);
                match self.tile(col, row) {
                    Tile::Void => {}
                    Tile::Floor => scene.floors.push(Floor {
                        texture: tex.floor,
                        ..Floor::new(x, z, x + 1.0, z + 1.0, 0.0, FLOOR_COLOR)
                    }),
                    Tile::Water => scene.waters.push(WaterSurface::new(Floor {
                        texture: tex.water,
                        ..Floor::new(x, z, x + 1.0, z + 1.0, WATER_LEVEL, WATER_COLOR)
                    })),
                    Tile::Ramp => scene.ramps.push(Ramp {
                        texture: tex.ramp,
                        ..Ramp::new(
                            [
                                DVec3::new(x, 0.0, z),
                                DVec3::new(x + 1.0, 0.0, z),
                                DVec3::new(x + 1.0, RAMP_RISE, z + 1.0),
                                DVec3::new(x, RAMP_RISE, z + 1.0),
                            ],
                            RAMP_COLOR,
                        )
                    }),
                    Tile::Wall => self.push_wall_faces(col, row, tex.wall, &mut scene.walls),
                }
            }
        }

        log::debug!(
            "grid {}x{} → {} walls, {} floors, {} water, {} ramps",
            self.width,
            self.height,
            scene.walls.len(),
            scene.floors.len(),
            scene.waters.len(),
            scene.ramps.len()
        );
        scene
    }

    /// One face per side that borders a walkable cell.
    fn push_wall_faces(&self, col: isize, row: isize, tex: Option<TextureId>, out: &mut Vec<Wall>) {
        let (x, z) = (col as f64, row as f64);
        let faces = [
            ((0, -1), DVec3::new(x, 0.0, z), DVec3::new(x + 1.0, 0.0, z)),
            ((0, 1), DVec3::new(x, 0.0, z + 1.0), DVec3::new(x + 1.0, 0.0, z + 1.0)),
            ((-1, 0), DVec3::new(x, 0.0, z), DVec3::new(x, 0.0, z + 1.0)),
            ((1, 0), DVec3::new(x + 1.0, 0.0, z), DVec3::new(x + 1.0, 0.0, z + 1.0)),
        ];
        for ((dc, dr), start, end) in faces {
            if self.tile(col + dc, row + dr).walkable() {
                out.push(Wall {
                    texture: tex,
                    ..Wall::new(start, end, WALL_HEIGHT, WALL_COLOR)
                });
            }
        }
    }
}
