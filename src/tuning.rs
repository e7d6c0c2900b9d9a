//! Data-driven game balance
//!
//! Ships with a bundled default table; hosts may supply a JSON override
//! (admin edits, playtest variants). A malformed override is logged and
//! ignored rather than failing the game.

use serde::{Deserialize, Serialize};

/// One parade float on the route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatConfig {
    /// -1 = left lane, +1 = right lane
    pub lane: i8,
    /// Starting position along the street
    pub start_z: f32,
    /// Seconds between throws
    pub throw_interval: f32,
}

/// One AI catcher in the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    /// Walk speed (units/s)
    pub speed: f32,
    /// 0..1, scales the bot's capture distance
    pub skill: f32,
    #[serde(default)]
    pub start_x: f32,
    #[serde(default)]
    pub start_z: f32,
}

/// Game balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Catches needed to finish level 1
    pub target_score: u32,
    /// Seconds a settled collectible stays catchable on the ground
    /// (0 = airborne catches only)
    pub ground_pickup_window: f32,
    /// Number of patrolling street obstacles
    pub obstacle_count: u32,
    /// Parade float roster
    pub floats: Vec<FloatConfig>,
    /// AI catcher roster
    pub bots: Vec<BotConfig>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_score: 5,
            ground_pickup_window: 0.0,
            obstacle_count: 3,
            floats: vec![
                FloatConfig { lane: -1, start_z: -25.0, throw_interval: 2.5 },
                FloatConfig { lane: 1, start_z: -15.0, throw_interval: 3.0 },
                FloatConfig { lane: -1, start_z: -35.0, throw_interval: 2.8 },
                FloatConfig { lane: 1, start_z: -5.0, throw_interval: 3.2 },
            ],
            bots: vec![
                BotConfig {
                    name: "Rex".into(),
                    speed: 3.2,
                    skill: 0.8,
                    start_x: -3.0,
                    start_z: -8.0,
                },
                BotConfig {
                    name: "Zulu".into(),
                    speed: 2.8,
                    skill: 0.6,
                    start_x: 3.0,
                    start_z: 6.0,
                },
            ],
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from an optional JSON override, falling back to the bundled
    /// defaults when absent or malformed
    pub fn load_or_default(override_json: Option<&str>) -> Self {
        match override_json {
            Some(json) => match Self::from_json(json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::warn!("Failed to parse tuning override, using defaults: {e}");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
