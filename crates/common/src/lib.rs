//! Shared types for the flatworld engine: entity ids and 2D geometry.

mod geometry;
mod types;

pub use geometry::Aabb;
pub use types::EntityId;
