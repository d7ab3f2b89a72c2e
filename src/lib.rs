pub mod engine;
pub mod renderer;
pub mod spatial;
pub mod world;
