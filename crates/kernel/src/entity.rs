use flatworld_common::Aabb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventContext};

/// Whether an entity can block the movement of others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Solidness {
    /// Blocks other hard entities.
    #[default]
    Hard,
    /// Collides but only blocks movers that reject soft contact.
    Soft,
    /// Never collides.
    Spectral,
}

/// What to do when an entity's spawn position overlaps existing solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Refuse the insertion.
    #[default]
    DoNotSpawn,
    /// Search the surrounding rings for a free position.
    AttemptToMove,
    /// Insert anyway and leave the overlap for the caller to sort out.
    SpawnAlways,
}

/// State shared by every entity: placement, motion and collision attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Type tag, e.g. `"player"` or `"wall"`.
    pub kind: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Local box, offset from `position`.
    pub bounds: Aabb,
    /// Draw layer in `0..=max_altitude`.
    pub altitude: i32,
    pub solidness: Solidness,
    /// Soft entities block this one when set.
    pub no_soft: bool,
    pub overlap: OverlapPolicy,
    /// Receives the world's gravity every tick when set.
    pub gravity: bool,
    /// Positioned in view coordinates and drawn regardless of the view.
    pub view_relative: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            kind: String::from("entity"),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            bounds: Aabb::unit(),
            altitude: 0,
            solidness: Solidness::Hard,
            no_soft: false,
            overlap: OverlapPolicy::DoNotSpawn,
            gravity: false,
            view_relative: false,
        }
    }
}

impl Body {
    /// A default body with the given type tag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn is_solid(&self) -> bool {
        self.solidness != Solidness::Spectral
    }

    /// World-space box at the current position.
    pub fn world_box(&self) -> Aabb {
        self.world_box_at(self.position)
    }

    /// World-space box if the body stood at `position`.
    pub fn world_box_at(&self, position: Vec2) -> Aabb {
        self.bounds.translated(position)
    }

    /// Whether `other` stops this body from moving into it.
    pub fn is_blocked_by(&self, other: &Body) -> bool {
        (self.solidness == Solidness::Hard && other.solidness == Solidness::Hard)
            || (self.no_soft && other.solidness == Solidness::Soft)
    }
}

/// Draw target handed to entities during the draw pass.
pub trait Canvas {
    /// Put a glyph at a position in view coordinates.
    fn put(&mut self, at: Vec2, glyph: char);
}

/// An entity living in the world.
///
/// The scene graph owns every entity. Behaviour plugs in through
/// [`Entity::predict_position`], [`Entity::on_event`] and [`Entity::draw`].
pub trait Entity {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Where the entity wants to be next tick. Must not have side effects.
    fn predict_position(&self) -> Vec2 {
        let body = self.body();
        body.position + body.velocity
    }

    /// Handle a world event. The return value is for the caller's
    /// bookkeeping only.
    fn on_event(&mut self, event: &Event, cx: &mut EventContext<'_>) -> bool {
        let _ = (event, cx);
        false
    }

    /// Draw into `canvas`. `view` is the world-space viewport.
    fn draw(&mut self, canvas: &mut dyn Canvas, view: &Aabb) {
        let _ = (canvas, view);
    }
}

/// A plain entity with no behaviour beyond drawing a single glyph.
///
/// Useful for walls, pickups and markers.
#[derive(Debug, Clone)]
pub struct Prop {
    pub body: Body,
    pub glyph: char,
}

impl Prop {
    pub fn new(body: Body, glyph: char) -> Self {
        Self { body, glyph }
    }
}

impl Entity for Prop {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, view: &Aabb) {
        let at = if self.body.view_relative {
            self.body.position
        } else {
            self.body.position - view.corner
        };
        canvas.put(at, self.glyph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(solidness: Solidness) -> Body {
        Body {
            solidness,
            ..Body::default()
        }
    }

    #[test]
    fn spectral_is_not_solid() {
        assert!(body(Solidness::Hard).is_solid());
        assert!(body(Solidness::Soft).is_solid());
        assert!(!body(Solidness::Spectral).is_solid());
    }

    #[test]
    fn hard_blocks_hard_only() {
        let hard = body(Solidness::Hard);
        let soft = body(Solidness::Soft);
        assert!(hard.is_blocked_by(&hard));
        assert!(!hard.is_blocked_by(&soft));
        assert!(!soft.is_blocked_by(&hard));
        assert!(!soft.is_blocked_by(&soft));
    }

    #[test]
    fn no_soft_is_blocked_by_soft() {
        let picky = Body {
            solidness: Solidness::Soft,
            no_soft: true,
            ..Body::default()
        };
        assert!(picky.is_blocked_by(&body(Solidness::Soft)));
        assert!(!picky.is_blocked_by(&body(Solidness::Hard)));
    }

    #[test]
    fn world_box_follows_position() {
        let b = Body {
            position: Vec2::new(10.0, 10.0),
            bounds: Aabb::new(Vec2::new(-0.5, -0.5), 1.0, 1.0),
            ..Body::default()
        };
        assert_eq!(b.world_box().min(), Vec2::new(9.5, 9.5));
        assert_eq!(b.world_box_at(Vec2::ZERO).max(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn default_prediction_integrates_velocity() {
        let prop = Prop::new(
            Body {
                position: Vec2::new(1.0, 2.0),
                velocity: Vec2::new(0.5, -1.0),
                ..Body::default()
            },
            '#',
        );
        assert_eq!(prop.predict_position(), Vec2::new(1.5, 1.0));
    }
}
