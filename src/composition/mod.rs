//! Composition - building and rasterizing the squad decoration

mod blend;
mod frame;
mod layout;
mod raster;
mod scene;

// Re-export public API
pub use frame::{default_frame, FRAME_SIZE};
pub use layout::{squad_scene, SquadLayout, BACKGROUND_SCALE, BACKGROUND_Z_INDEX};
pub use raster::rasterize;
pub use scene::{Bounds, Container, Sprite};
