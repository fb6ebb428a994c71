//! Arena geometry and the shared clock
//!
//! Everything that needs to know where the walls are, or whether two boxes
//! overlap, goes through here. Fighters and buff pickups both implement
//! [`Collider`] so they can be tested against each other without sharing any
//! other state.

use bevy::prelude::*;

use crate::constants::*;

/// The single time source for a frame.
///
/// `now` is a monotonic timestamp in seconds shared by every cooldown, combo
/// window and animation. `dt` is the duration of the frame being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    pub now: f32,
    pub dt: f32,
}

impl Clock {
    pub fn new(now: f32, dt: f32) -> Self {
        Self { now, dt }
    }

    /// Advance by `dt`, returning the clock for the next frame.
    pub fn tick(self) -> Self {
        Self {
            now: self.now + self.dt,
            dt: self.dt,
        }
    }
}

/// Something with a position and an axis-aligned square collision box.
pub trait Collider {
    /// Top-left corner of the collision box.
    fn origin(&self) -> Vec2;

    /// Side length of the collision box (already scaled).
    fn extent(&self) -> f32;

    /// Strict AABB overlap (touching edges do not count).
    fn overlaps(&self, other: &impl Collider) -> bool {
        let a = self.origin();
        let b = other.origin();
        let (sa, sb) = (self.extent(), other.extent());
        a.x < b.x + sb && a.x + sa > b.x && a.y < b.y + sb && a.y + sa > b.y
    }
}

/// Bounds fighters can walk in: a wide horizontal margin past the screen
/// edges and a vertical playable band.
pub fn walk_bounds(extent: f32) -> Rect {
    Rect {
        min: Vec2::new(-WALK_MARGIN_X, PLAYABLE_TOP),
        max: Vec2::new(
            ARENA_WIDTH - extent + WALK_MARGIN_X,
            ARENA_HEIGHT - extent + PLAYABLE_BOTTOM_SLACK,
        ),
    }
}

/// Bounds that keep the whole box on screen. Used by dodges and push-backs.
pub fn screen_bounds(extent: f32) -> Rect {
    Rect {
        min: Vec2::ZERO,
        max: Vec2::new(ARENA_WIDTH - extent, ARENA_HEIGHT - extent),
    }
}

/// Clamp a point into a rectangle.
pub fn clamp_into(point: Vec2, bounds: Rect) -> Vec2 {
    point.clamp(bounds.min, bounds.max)
}

/// Whether a point is inside the arena (edges inclusive).
pub fn in_arena(point: Vec2) -> bool {
    (0.0..=ARENA_WIDTH).contains(&point.x) && (0.0..=ARENA_HEIGHT).contains(&point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square(Vec2, f32);

    impl Collider for Square {
        fn origin(&self) -> Vec2 {
            self.0
        }
        fn extent(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Square(Vec2::ZERO, 10.0);
        let touching = Square(Vec2::new(10.0, 0.0), 10.0);
        let inside = Square(Vec2::new(9.0, 9.0), 10.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_walk_bounds_are_wider_than_screen() {
        let walk = walk_bounds(400.0);
        let screen = screen_bounds(400.0);

        assert!(walk.min.x < screen.min.x);
        assert!(walk.max.x > screen.max.x);
        assert_eq!(walk.min.y, PLAYABLE_TOP);
    }

    #[test]
    fn test_in_arena_edges_inclusive() {
        assert!(in_arena(Vec2::new(0.0, 0.0)));
        assert!(in_arena(Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)));
        assert!(!in_arena(Vec2::new(ARENA_WIDTH + 0.1, 10.0)));
        assert!(!in_arena(Vec2::new(10.0, -0.1)));
    }

    #[test]
    fn test_clock_tick() {
        let clock = Clock::new(1.0, 0.5).tick();
        assert_eq!(clock.now, 1.5);
        assert_eq!(clock.dt, 0.5);
    }
}
