use flatworld_common::{Aabb, EntityId};
use glam::Vec2;

/// Camera over the world: a view box kept inside the world boundary, an
/// optional followed entity and a dead-zone ("slack") around the view center.
///
/// The followed entity is held by id only. Callers check membership before
/// trusting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    view: Aabb,
    slack: Vec2,
    following: Option<EntityId>,
}

impl Viewport {
    /// Viewport over `view`, clamped into `boundary`, following nothing.
    pub fn new(view: Aabb, slack: Vec2, boundary: &Aabb) -> Self {
        let mut viewport = Self {
            view,
            slack: Vec2::ZERO,
            following: None,
        };
        viewport.set_slack(slack);
        viewport.clamp_to(boundary);
        viewport
    }

    /// Current view box.
    pub fn view(&self) -> Aabb {
        self.view
    }

    /// Dead-zone fractions per axis.
    pub fn slack(&self) -> Vec2 {
        self.slack
    }

    /// Followed entity id, unchecked.
    pub fn following(&self) -> Option<EntityId> {
        self.following
    }

    /// Set or clear the followed entity without moving the view.
    pub fn set_following(&mut self, id: Option<EntityId>) {
        self.following = id;
    }

    /// Slack fractions are clamped to `0..=1` per axis.
    pub fn set_slack(&mut self, slack: Vec2) {
        self.slack = slack.clamp(Vec2::ZERO, Vec2::ONE);
    }

    /// Replace the view box, then clamp it into `boundary`.
    pub fn set_view(&mut self, view: Aabb, boundary: &Aabb) {
        self.view = view;
        self.clamp_to(boundary);
    }

    /// Center the view on `center`, as far as `boundary` allows.
    pub fn center_on(&mut self, center: Vec2, boundary: &Aabb) {
        self.view.corner = center - self.view.size / 2.0;
        self.clamp_to(boundary);
    }

    /// React to the followed entity reaching `position`: shift the view by
    /// however far the position left the slack rectangle on each axis.
    pub fn track(&mut self, position: Vec2, boundary: &Aabb) {
        let mut center = self.view.center();
        let half_slack = self.view.size * self.slack / 2.0;
        let inner_min = center - half_slack;
        let inner_max = center + half_slack;

        if position.x < inner_min.x {
            center.x -= inner_min.x - position.x;
        } else if position.x > inner_max.x {
            center.x += position.x - inner_max.x;
        }
        if position.y < inner_min.y {
            center.y -= inner_min.y - position.y;
        } else if position.y > inner_max.y {
            center.y += position.y - inner_max.y;
        }

        self.center_on(center, boundary);
    }

    /// Pull the view back inside `boundary`. On an axis where the view is
    /// larger than the boundary the view is pinned to the boundary's min edge.
    pub fn clamp_to(&mut self, boundary: &Aabb) {
        let upper = boundary.max() - self.view.size;
        self.view.corner = self.view.corner.min(upper).max(boundary.min());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Aabb {
        Aabb::new(Vec2::ZERO, 100.0, 100.0)
    }

    fn viewport(slack: Vec2) -> Viewport {
        Viewport::new(Aabb::new(Vec2::ZERO, 20.0, 20.0), slack, &world())
    }

    /// splitmix64, used as a deterministic position generator.
    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    #[test]
    fn new_view_is_clamped() {
        let vp = Viewport::new(
            Aabb::new(Vec2::new(-5.0, 95.0), 20.0, 20.0),
            Vec2::ZERO,
            &world(),
        );
        assert_eq!(vp.view().corner, Vec2::new(0.0, 80.0));
    }

    #[test]
    fn oversized_view_pins_to_min_edge() {
        let mut vp = viewport(Vec2::ZERO);
        vp.set_view(Aabb::new(Vec2::new(30.0, 10.0), 150.0, 20.0), &world());
        assert_eq!(vp.view().corner, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn zero_slack_centers_on_position() {
        let mut vp = viewport(Vec2::ZERO);
        vp.track(Vec2::new(50.0, 40.0), &world());
        assert_eq!(vp.view().center(), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn movement_inside_dead_zone_keeps_view() {
        let mut vp = viewport(Vec2::new(0.5, 0.5));
        vp.center_on(Vec2::new(50.0, 50.0), &world());
        // Dead zone spans 45..55 on both axes.
        vp.track(Vec2::new(54.0, 46.0), &world());
        assert_eq!(vp.view().center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn leaving_dead_zone_shifts_by_excess() {
        let mut vp = viewport(Vec2::new(0.5, 0.5));
        vp.center_on(Vec2::new(50.0, 50.0), &world());
        vp.track(Vec2::new(58.0, 41.0), &world());
        assert_eq!(vp.view().center(), Vec2::new(53.0, 46.0));
    }

    #[test]
    fn tracking_stops_at_the_boundary() {
        let mut vp = viewport(Vec2::ZERO);
        vp.track(Vec2::new(99.0, 1.0), &world());
        assert_eq!(vp.view().corner, Vec2::new(80.0, 0.0));
    }

    #[test]
    fn slack_is_clamped() {
        let mut vp = viewport(Vec2::ZERO);
        vp.set_slack(Vec2::new(-1.0, 3.0));
        assert_eq!(vp.slack(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn view_never_leaves_boundary() {
        let boundary = Aabb::new(Vec2::new(-10.0, 5.0), 60.0, 40.0);
        let mut vp = Viewport::new(Aabb::new(Vec2::ZERO, 16.0, 9.0), Vec2::new(0.3, 0.6), &boundary);
        let mut state = 42u64;
        for _ in 0..1000 {
            // Positions range well outside the boundary on every side.
            let x = (splitmix64(&mut state) % 200) as f32 - 80.0;
            let y = (splitmix64(&mut state) % 200) as f32 - 80.0;
            vp.track(Vec2::new(x, y), &boundary);
            assert!(boundary.contains(&vp.view()), "view {:?} escaped", vp.view());
        }
    }
}
