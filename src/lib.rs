//! Parade Catch - a street parade catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collectible physics, catch resolution, floats, bots)
//! - `tuning`: Data-driven game balance with JSON overrides
//!
//! Rendering, audio, and UI are external collaborators: the host loop feeds
//! `sim::tick` a delta time and input snapshot, then renders from the returned
//! state and events.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Nominal fixed simulation timestep (60 Hz, matches the render loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest delta time a single tick will integrate; frame hitches beyond
    /// this are clamped rather than letting collectibles tunnel
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Gravity acceleration (units/s², negative = down)
    pub const GRAVITY: f32 = -15.0;
    /// Resting height of a collectible on the street
    pub const GROUND_LEVEL: f32 = 0.3;
    /// Horizontal velocity retained per tick while on the ground
    pub const GROUND_FRICTION: f32 = 0.9;
    /// Vertical velocity retained on a bounce
    pub const BOUNCE_DAMPING: f32 = 0.4;
    /// Below this vertical speed a ground contact stops dead instead of bouncing
    pub const BOUNCE_MIN_SPEED: f32 = 0.5;

    /// Radius within which a collectible is considered catchable
    pub const CATCH_RADIUS: f32 = 2.0;
    /// Tight capture distance that actually completes a catch
    pub const CAPTURE_RADIUS: f32 = 0.8;
    /// Minimum height for an airborne catch
    pub const MIN_CATCH_HEIGHT: f32 = 0.5;
    /// Maximum height for an airborne catch (throws sail overhead above this)
    pub const MAX_CATCH_HEIGHT: f32 = 2.0;

    /// Street half-width; players, bots, and obstacles stay within ±this in x
    pub const STREET_HALF_WIDTH: f32 = 6.0;
    /// Street extent in z covered by the parade route
    pub const STREET_HALF_LENGTH: f32 = 30.0;
    /// Collectible resting on the ground longer than this is swept up (a miss)
    pub const GROUND_LIFETIME: f32 = 8.0;

    /// Player walk speed (units/s)
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Height of the player's catch point
    pub const PLAYER_HEIGHT: f32 = 0.5;

    /// Parade float forward speed along the street (units/s)
    pub const FLOAT_SPEED: f32 = 2.0;
    /// Lateral offset of a float lane from the street center
    pub const FLOAT_LANE_OFFSET: f32 = 4.0;

    /// Obstacle body radius
    pub const OBSTACLE_RADIUS: f32 = 0.6;
    /// Distance at which an obstacle bumps the player
    pub const COLLISION_DISTANCE: f32 = 0.8;

    /// Seconds after a catch during which the next catch extends the combo
    pub const COMBO_WINDOW: f32 = 4.0;
}

/// Euclidean distance ignoring the vertical axis
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// True if every component of the vector is a finite number
#[inline]
pub fn is_finite_vec3(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
