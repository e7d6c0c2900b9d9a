//! Catch classification
//!
//! A collectible is *catchable* inside the catch radius when it is either in
//! the airborne height window or, if a ground-pickup grace window is
//! configured, freshly settled on the street. It is *caught* only inside the
//! tight capture distance. All qualifying collectibles in one tick are judged
//! against the same catcher position snapshot.

use glam::Vec3;

use super::state::Collectible;
use crate::consts::*;

/// Outcome of testing one collectible against one catcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchJudgment {
    /// Too far away, or outside the height/grace window
    OutOfRange,
    /// Inside the catch radius and window, but not close enough to grab
    Catchable,
    /// Grabbed: remove and score
    Caught,
}

/// Judge a collectible against a catcher position
///
/// `capture_radius` is the tight grab distance (0.8 for the player; bots scale
/// it by skill). `grace_window` is the ground-pickup window in seconds; zero
/// disables ground pickups entirely.
pub fn judge_catch(
    c: &Collectible,
    catcher_pos: Vec3,
    capture_radius: f32,
    grace_window: f32,
) -> CatchJudgment {
    let distance = c.pos.distance(catcher_pos);
    if distance >= CATCH_RADIUS {
        return CatchJudgment::OutOfRange;
    }

    let in_air_window = c.pos.y >= MIN_CATCH_HEIGHT && c.pos.y < MAX_CATCH_HEIGHT;
    let in_grace_window =
        grace_window > 0.0 && c.is_grounded() && c.ground_time <= grace_window;

    if !(in_air_window || in_grace_window) {
        return CatchJudgment::OutOfRange;
    }

    if distance < capture_radius {
        CatchJudgment::Caught
    } else {
        CatchJudgment::Catchable
    }
}
