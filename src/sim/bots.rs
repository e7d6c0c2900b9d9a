//! AI catchers that compete with the player
//!
//! Bots use the same catch rules as the player, with a skill-scaled capture
//! distance. Targeting is greedy: chase the nearest collectible that is still
//! worth chasing (airborne or inside the ground-pickup grace window).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::catch::{CatchJudgment, judge_catch};
use super::state::Collectible;
use crate::consts::*;
use crate::tuning::BotConfig;

/// One AI catcher on the street
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: u32,
    pub name: String,
    pub pos: Vec3,
    /// Walk speed (units/s)
    pub speed: f32,
    /// 0..1, scales the capture distance; 1.0 matches the player's reach
    pub skill: f32,
    /// Collectibles caught this run
    pub catches: u32,
}

impl Bot {
    pub fn new(id: u32, config: &BotConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            pos: Vec3::new(config.start_x, PLAYER_HEIGHT, config.start_z),
            speed: config.speed,
            skill: config.skill.clamp(0.0, 1.0),
            catches: 0,
        }
    }

    /// Effective grab distance for this bot
    pub fn capture_radius(&self) -> f32 {
        CAPTURE_RADIUS * self.skill
    }

    /// Pick the nearest collectible still worth chasing, by horizontal
    /// distance. Ties are impossible in practice; iteration order (entity id)
    /// breaks exact ones deterministically.
    pub fn choose_target<'a>(
        &self,
        collectibles: &'a [Collectible],
        grace_window: f32,
    ) -> Option<&'a Collectible> {
        collectibles
            .iter()
            .filter(|c| {
                !c.is_grounded() || (grace_window > 0.0 && c.ground_time <= grace_window)
            })
            .min_by(|a, b| {
                let da = crate::horizontal_distance(a.pos, self.pos);
                let db = crate::horizontal_distance(b.pos, self.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Walk toward a target point, clamped to the street bounds
    pub fn advance_toward(&mut self, target: Vec3, dt: f32) {
        let mut dir = target - self.pos;
        dir.y = 0.0;
        let dir = dir.normalize_or_zero();
        self.pos += dir * self.speed * dt;
        self.pos.x = self.pos.x.clamp(-STREET_HALF_WIDTH, STREET_HALF_WIDTH);
        self.pos.z = self.pos.z.clamp(-STREET_HALF_LENGTH, STREET_HALF_LENGTH);
        self.pos.y = PLAYER_HEIGHT;
    }

    /// Judge a collectible against this bot's reach
    pub fn judge(&self, c: &Collectible, grace_window: f32) -> CatchJudgment {
        judge_catch(c, self.pos, self.capture_radius(), grace_window)
    }
}
