//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Distance along a ray to the first intersection with a circle.
///
/// `direction` must be normalized. Returns `None` if the ray misses the
/// circle or the hit lies beyond `max_distance`. A ray starting inside the
/// circle hits at distance 0.
pub fn ray_circle_hit(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    center: Vec2,
    radius: f32,
) -> Option<f32> {
    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(0.0);
    }
    let along = to_center.dot(direction);
    if along < 0.0 {
        return None;
    }
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let hit = along - (radius_sq - closest_sq).sqrt();
    (hit <= max_distance).then_some(hit)
}

/// An axis-free disc, used for fog-of-war lit areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

impl Disc {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive containment: a point exactly on the rim is inside.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius
    }
}
