//! World Kernel: entity registry, movement and collision resolution, camera
//! tracking and the tick/draw orchestrator.
//!
//! # Invariants
//! - Every entity lives in exactly one of the active or inactive sets.
//! - The view always lies inside the world boundary.
//! - Handlers never mutate the registry directly; deletions are deferred to
//!   the next tick and spawns to the end of the current dispatch.
//! - An entity marked for deletion any number of times is destroyed once.

mod collision;
mod config;
mod entity;
mod error;
mod event;
mod placement;
mod queue;
mod scene;
mod viewport;
mod world;

pub use collision::{CollisionQuery, LinearScan, Probe};
pub use config::{MAX_ALTITUDE, MAX_PLACEMENT_RADIUS, WorldConfig};
pub use entity::{Body, Canvas, Entity, OverlapPolicy, Prop, Solidness};
pub use error::{ConfigError, RejectReason, WorldError};
pub use event::{Collision, Event, EventContext};
pub use placement::{SpawnDecision, ring, spiral_search};
pub use queue::DeletionQueue;
pub use scene::SceneGraph;
pub use viewport::Viewport;
pub use world::{MoveOutcome, WorldManager};

pub fn crate_info() -> &'static str {
    "flatworld-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
