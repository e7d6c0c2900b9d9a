//! Collectible physics: gravity integration and ground resolution
//!
//! Plain Euler integration with a damped bounce at street level. Each
//! collectible is integrated exactly once per tick by `step_collectible`;
//! nothing here touches another entity's state.

use glam::Vec3;

use super::state::Collectible;
use crate::consts::*;
use crate::is_finite_vec3;

/// Apply gravity and advance position by one Euler step
///
/// `dt <= 0` leaves both vectors untouched.
pub fn integrate_gravity(pos: Vec3, vel: Vec3, dt: f32) -> (Vec3, Vec3) {
    if dt <= 0.0 {
        return (pos, vel);
    }
    let mut vel = vel;
    vel.y += GRAVITY * dt;
    let pos = pos + vel * dt;
    (pos, vel)
}

/// Resolve street contact: clamp to ground level, apply horizontal friction,
/// and either bounce (damped) or settle the vertical velocity
///
/// Returns the resolved vectors plus whether the collectible is on the ground.
pub fn resolve_ground(pos: Vec3, vel: Vec3) -> (Vec3, Vec3, bool) {
    if pos.y > GROUND_LEVEL {
        return (pos, vel, false);
    }
    let mut pos = pos;
    let mut vel = vel;
    pos.y = GROUND_LEVEL;
    vel.x *= GROUND_FRICTION;
    vel.z *= GROUND_FRICTION;
    if vel.y.abs() > BOUNCE_MIN_SPEED {
        vel.y = -vel.y * BOUNCE_DAMPING;
    } else {
        vel.y = 0.0;
    }
    (pos, vel, true)
}

/// Advance one collectible by one time step
///
/// Returns false when the update was skipped because the resulting state
/// would be non-finite; the caller logs and keeps the previous state.
/// Ground time accumulates while the collectible rests at street level and
/// resets the moment it leaves the ground.
pub fn step_collectible(c: &mut Collectible, dt: f32) -> bool {
    if dt <= 0.0 {
        return true;
    }

    let (pos, vel) = integrate_gravity(c.pos, c.vel, dt);
    let (pos, vel, on_ground) = resolve_ground(pos, vel);

    if !is_finite_vec3(pos) || !is_finite_vec3(vel) {
        return false;
    }

    c.pos = pos;
    c.vel = vel;
    if on_ground {
        c.ground_time += dt;
    } else {
        c.ground_time = 0.0;
    }
    true
}
