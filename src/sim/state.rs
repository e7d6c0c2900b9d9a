//! Game state and core simulation types
//!
//! Everything needed to reproduce a run (snapshot + seed) lives here.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

use super::bots::Bot;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen / tutorial overlay
    Tutorial,
    /// Active gameplay
    Playing,
    /// Level target reached
    Won,
}

/// What a float throws into the crowd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Beads,
    Doubloon,
    Cup,
}

impl CollectibleKind {
    /// Visual scale used by the renderer (kind affects size only, not physics)
    pub fn scale(&self) -> f32 {
        match self {
            CollectibleKind::Cup => 0.3,
            _ => 0.25,
        }
    }
}

/// A thrown item in flight or resting on the street
///
/// Membership in `GameState::collectibles` is the liveness flag: removal is
/// immediate deletion, never a soft flag swept later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Accumulated seconds resting on the ground (0 while airborne)
    pub ground_time: f32,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, pos: Vec3, vel: Vec3) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            ground_time: 0.0,
        }
    }

    /// True once the collectible has settled at street level
    pub fn is_grounded(&self) -> bool {
        self.pos.y <= GROUND_LEVEL + 1e-4
    }

    /// True if the collectible has drifted off the playable street
    pub fn out_of_bounds(&self) -> bool {
        self.pos.x.abs() > STREET_HALF_WIDTH * 2.0 || self.pos.z.abs() > STREET_HALF_LENGTH + 10.0
    }
}

/// The catching player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, PLAYER_HEIGHT, 0.0),
        }
    }
}

impl Player {
    /// Move along the street by a normalized input direction (x = across,
    /// z = along), clamped to the street bounds. Height stays fixed.
    pub fn apply_move(&mut self, dir_x: f32, dir_z: f32, dt: f32) {
        let dir = Vec3::new(dir_x, 0.0, dir_z);
        let dir = dir.normalize_or_zero();
        self.pos += dir * PLAYER_SPEED * dt;
        self.pos.x = self.pos.x.clamp(-STREET_HALF_WIDTH, STREET_HALF_WIDTH);
        self.pos.z = self.pos.z.clamp(-STREET_HALF_LENGTH, STREET_HALF_LENGTH);
        self.pos.y = PLAYER_HEIGHT;
    }
}

/// A parade float rolling down the street, throwing collectibles on a timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParadeFloat {
    pub id: u32,
    /// -1 = left lane, +1 = right lane
    pub lane: i8,
    /// Current position along the street
    pub z: f32,
    /// Seconds between throws
    pub throw_interval: f32,
    /// Seconds until the next throw
    pub throw_timer: f32,
}

impl ParadeFloat {
    pub fn new(id: u32, lane: i8, start_z: f32, throw_interval: f32) -> Self {
        Self {
            id,
            lane,
            z: start_z,
            throw_interval,
            // Stagger the first throw so floats don't all fire on tick one
            throw_timer: throw_interval,
        }
    }

    /// Roll forward along the parade route, wrapping at the end of the street
    pub fn advance(&mut self, dt: f32) {
        self.z += FLOAT_SPEED * dt;
        if self.z > STREET_HALF_LENGTH {
            self.z = -STREET_HALF_LENGTH - 10.0;
        }
    }

    /// World position of the throw point (riders stand above street level)
    pub fn throw_point(&self) -> Vec3 {
        Vec3::new(self.lane as f32 * FLOAT_LANE_OFFSET, 1.5, self.z)
    }

    /// Count down the throw timer; returns true when a throw is due and
    /// resets the timer
    pub fn tick_throw_timer(&mut self, dt: f32) -> bool {
        self.throw_timer -= dt;
        if self.throw_timer <= 0.0 {
            self.throw_timer += self.throw_interval;
            true
        } else {
            false
        }
    }
}

/// A street obstacle (trash pile / barrier) patrolling across the route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec3,
    /// Patrol speed across the street (units/s)
    pub speed: f32,
    /// +1.0 or -1.0, flips at the street edges
    pub direction: f32,
    /// Latched after a bump until the player backs off
    pub bumped: bool,
}

impl Obstacle {
    /// Sweep left-right across the street, bouncing at the edges
    pub fn patrol(&mut self, dt: f32) {
        self.pos.x += self.direction * self.speed * dt;
        if self.pos.x.abs() > STREET_HALF_WIDTH {
            self.pos.x = self.pos.x.clamp(-STREET_HALF_WIDTH, STREET_HALF_WIDTH);
            self.direction = -self.direction;
        }
    }
}

/// Events produced by a tick, consumed by score HUD / audio / effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A float threw a collectible into the crowd
    Thrown {
        id: u32,
        kind: CollectibleKind,
        float_id: u32,
    },
    /// The player caught a collectible
    Caught {
        id: u32,
        kind: CollectibleKind,
        combo: u32,
    },
    /// A bot beat the player to a collectible
    BotCaught {
        id: u32,
        kind: CollectibleKind,
        bot_id: u32,
    },
    /// A collectible timed out on the ground or left the street (a miss)
    Expired { id: u32 },
    /// The player ran into an obstacle
    Stumbled { obstacle_id: u32 },
    /// A combo chain ended (window lapse, miss, or stumble)
    ComboBroken { length: u32 },
    /// Score target reached; phase moves to Won
    LevelComplete { level: u32, score: u32 },
}

/// RNG seed wrapper; throw randomness is derived per event from this seed so
/// the whole struct stays trivially serializable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Derive a stream for one throw event. Mixing in the tick counter and
    /// float id keeps every throw independent but reproducible.
    pub fn throw_rng(&self, time_ticks: u64, float_id: u32) -> Pcg32 {
        let mix = self
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(time_ticks)
            .wrapping_add((float_id as u64) << 32);
        Pcg32::seed_from_u64(mix)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Current level (1-based)
    pub level: u32,
    /// Catches this level
    pub score: u32,
    /// Catches needed to finish the level
    pub target_score: u32,
    /// Current combo chain length
    pub combo: u32,
    /// Longest combo this run
    pub max_combo: u32,
    /// Seconds left before the combo chain lapses
    pub combo_timer: f32,
    /// Catches across all levels
    pub total_catches: u32,
    /// Collectibles lost to expiry
    pub misses: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// The catching player
    pub player: Player,
    /// Parade floats (sorted by id for determinism)
    pub floats: Vec<ParadeFloat>,
    /// Live collectibles (sorted by id for determinism)
    pub collectibles: Vec<Collectible>,
    /// Street obstacles
    pub obstacles: Vec<Obstacle>,
    /// AI catchers competing with the player
    pub bots: Vec<Bot>,
    /// Ground-pickup grace window in seconds (0 = pure airborne catch rules)
    pub ground_pickup_window: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, &Tuning::default())
    }

    /// Create a new game from an explicit tuning table
    pub fn with_tuning(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            level: 1,
            score: 0,
            target_score: tuning.target_score,
            combo: 0,
            max_combo: 0,
            combo_timer: 0.0,
            total_catches: 0,
            misses: 0,
            time_ticks: 0,
            phase: GamePhase::Tutorial,
            player: Player::default(),
            floats: Vec::new(),
            collectibles: Vec::new(),
            obstacles: Vec::new(),
            bots: Vec::new(),
            ground_pickup_window: tuning.ground_pickup_window,
            next_id: 1,
        };

        for f in &tuning.floats {
            let id = state.next_entity_id();
            state
                .floats
                .push(ParadeFloat::new(id, f.lane, f.start_z, f.throw_interval));
        }

        for b in &tuning.bots {
            let id = state.next_entity_id();
            state.bots.push(Bot::new(id, b));
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        for _ in 0..tuning.obstacle_count {
            let id = state.next_entity_id();
            state.obstacles.push(super::tick::spawn_obstacle(id, &mut rng));
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a collectible to the live set, returning its id
    pub fn spawn_collectible(&mut self, kind: CollectibleKind, pos: Vec3, vel: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible::new(id, kind, pos, vel));
        id
    }

    /// Leave the tutorial and start play
    pub fn start_game(&mut self) {
        if self.phase == GamePhase::Tutorial {
            self.phase = GamePhase::Playing;
        }
    }

    /// Start the next level after a win: higher target, fresh street
    pub fn advance_level(&mut self) {
        if self.phase != GamePhase::Won {
            return;
        }
        self.level += 1;
        self.score = 0;
        self.target_score += 5;
        self.combo = 0;
        self.combo_timer = 0.0;
        self.collectibles.clear();
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} started (target {})",
            self.level,
            self.target_score
        );
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.collectibles.sort_by_key(|c| c.id);
        self.floats.sort_by_key(|f| f.id);
        self.obstacles.sort_by_key(|o| o.id);
        self.bots.sort_by_key(|b| b.id);
    }
}
