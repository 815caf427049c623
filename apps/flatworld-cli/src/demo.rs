use flatworld_common::{Aabb, EntityId};
use flatworld_kernel::{
    Body, Canvas, Entity, Event, EventContext, OverlapPolicy, Prop, Solidness, WorldConfig,
    WorldError, WorldManager,
};
use glam::Vec2;

/// World used when no config file is given: wider than the view so the
/// camera has somewhere to go.
pub fn default_config() -> WorldConfig {
    WorldConfig {
        boundary: Aabb::new(Vec2::ZERO, 120.0, 30.0),
        view: Aabb::new(Vec2::ZERO, 48.0, 16.0),
        view_slack: Vec2::new(0.5, 0.5),
        ..WorldConfig::default()
    }
}

/// Walks in a straight line, turns around when it bumps into something and
/// removes itself once it leaves the world.
pub struct Walker {
    body: Body,
    glyph: char,
    bumps: u32,
}

impl Walker {
    pub fn new(position: Vec2, velocity: Vec2, glyph: char) -> Self {
        Self {
            body: Body {
                position,
                velocity,
                altitude: 1,
                overlap: OverlapPolicy::AttemptToMove,
                ..Body::new("walker")
            },
            glyph,
            bumps: 0,
        }
    }
}

impl Entity for Walker {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_event(&mut self, event: &Event, cx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Collision(hit) if hit.mover == cx.id() => {
                self.body.velocity = -self.body.velocity;
                self.bumps += 1;
                true
            }
            Event::Out { hard: true } => {
                tracing::info!(id = %cx.id(), bumps = self.bumps, "walker left the world");
                cx.delete_self();
                true
            }
            _ => false,
        }
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, view: &Aabb) {
        canvas.put(self.body.position - view.corner, self.glyph);
    }
}

/// Overlay line showing the current step in the top-left corner.
pub struct StepCounter {
    body: Body,
    step: u64,
}

impl StepCounter {
    pub fn new(max_altitude: i32) -> Self {
        Self {
            body: Body {
                altitude: max_altitude,
                solidness: Solidness::Spectral,
                view_relative: true,
                ..Body::new("hud")
            },
            step: 0,
        }
    }
}

impl Entity for StepCounter {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_event(&mut self, event: &Event, _cx: &mut EventContext<'_>) -> bool {
        if let Event::Step { step } = event {
            self.step = *step;
            return true;
        }
        false
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, _view: &Aabb) {
        let label = format!("t={}", self.step);
        for (i, glyph) in label.chars().enumerate() {
            canvas.put(self.body.position + Vec2::new(i as f32, 0.0), glyph);
        }
    }
}

/// Populate `world` with a row of pillars, a hud and `walkers` walkers
/// heading in alternating directions. Returns the first walker, if any
/// could be placed.
pub fn populate(world: &mut WorldManager, walkers: usize) -> Result<Option<EntityId>, WorldError> {
    let bounds = world.boundary();
    let mid = bounds.center();

    for i in 1..8 {
        let x = bounds.corner.x + bounds.width() * i as f32 / 8.0;
        let body = Body {
            position: Vec2::new(x.floor(), mid.y.floor()),
            ..Body::new("pillar")
        };
        world.insert_with_policy(Box::new(Prop::new(body, '#')))?;
    }

    let max_altitude = world.config().max_altitude;
    world.insert_with_policy(Box::new(StepCounter::new(max_altitude)))?;

    let glyphs = ['@', '&', '%', '$', '*'];
    let mut first = None;
    for i in 0..walkers {
        let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
        let row = mid.y.floor() + (i % 3) as f32 - 1.0;
        let walker = Walker::new(
            Vec2::new(mid.x.floor() + 3.0 * i as f32, row),
            Vec2::new(dir, 0.0),
            glyphs[i % glyphs.len()],
        );
        match world.insert_with_policy(Box::new(walker)) {
            Ok(id) => {
                first.get_or_insert(id);
            }
            Err(err) => tracing::warn!(%err, "walker not placed"),
        }
    }
    Ok(first)
}
