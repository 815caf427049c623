//! Spawn policy resolution and the ring-by-ring placement search.

use glam::{IVec2, Vec2};

use crate::entity::OverlapPolicy;
use crate::error::RejectReason;

/// Offsets on the square ring of Chebyshev radius `radius`, in scan order:
/// top row, bottom row, then the left and right columns without corners.
/// Radii beyond `i32::MAX` saturate.
pub fn ring(radius: u32) -> impl Iterator<Item = IVec2> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let rows = [-r, r]
        .into_iter()
        .flat_map(move |dy| (-r..=r).map(move |dx| IVec2::new(dx, dy)));
    let columns = [-r, r]
        .into_iter()
        .flat_map(move |dx| (-r + 1..r).map(move |dy| IVec2::new(dx, dy)));
    rows.chain(columns)
}

/// Try rings `1..=max_radius` around `origin` and return the first candidate
/// accepted by `is_free`.
pub fn spiral_search(
    origin: Vec2,
    max_radius: u32,
    step: f32,
    mut is_free: impl FnMut(Vec2) -> bool,
) -> Option<Vec2> {
    (1..=max_radius)
        .flat_map(ring)
        .map(|offset| origin + offset.as_vec2() * step)
        .find(|candidate| is_free(*candidate))
}

/// Outcome of applying an [`OverlapPolicy`] to an overlapping spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnDecision {
    /// Insert at this position. `overlapping` is set when the caller accepted
    /// an unresolved overlap.
    Place { at: Vec2, overlapping: bool },
    Reject(RejectReason),
}

impl OverlapPolicy {
    /// Decide what happens to a spawn at `origin` that overlaps `count`
    /// solids. `search` runs the placement search when the policy asks for it.
    pub fn resolve(
        self,
        origin: Vec2,
        count: usize,
        max_radius: u32,
        search: impl FnOnce(Vec2) -> Option<Vec2>,
    ) -> SpawnDecision {
        match self {
            Self::DoNotSpawn => refuse(count),
            Self::AttemptToMove => relocate(origin, max_radius, search),
            Self::SpawnAlways => force(origin),
        }
    }
}

fn refuse(count: usize) -> SpawnDecision {
    SpawnDecision::Reject(RejectReason::Overlap { count })
}

fn relocate(
    origin: Vec2,
    max_radius: u32,
    search: impl FnOnce(Vec2) -> Option<Vec2>,
) -> SpawnDecision {
    match search(origin) {
        Some(at) => SpawnDecision::Place {
            at,
            overlapping: false,
        },
        None => SpawnDecision::Reject(RejectReason::NoFreeSpace { radius: max_radius }),
    }
}

fn force(origin: Vec2) -> SpawnDecision {
    SpawnDecision::Place {
        at: origin,
        overlapping: true,
    }
}
