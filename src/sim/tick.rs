//! Simulation tick
//!
//! Advances the whole game by one time step: float movement and throws,
//! collectible physics, catch resolution (player first, then bots), expiry,
//! obstacle patrol, and score/combo bookkeeping. Returns the events the host
//! (HUD, audio, effects) needs to react to.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::catch::CatchJudgment;
use super::physics::step_collectible;
use super::state::{CollectibleKind, GameEvent, GamePhase, GameState, Obstacle};
use crate::consts::*;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement across the street (-1..1)
    pub move_x: f32,
    /// Movement along the street (-1..1)
    pub move_z: f32,
    /// Leave the tutorial and start playing
    pub start: bool,
    /// Idle/demo mode - AI moves the player
    pub idle_mode: bool,
}

/// Advance the game state by one time step
///
/// `dt` is clamped to `[0, MAX_TICK_DT]`; zero (or invalid) dt changes no
/// physics state. The player position is snapshotted once, so every
/// collectible this tick is judged against the same position.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Invalid dt is a bug in the host loop, not a reason to blow up
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_TICK_DT)
    } else {
        0.0
    };

    if input.start {
        state.start_game();
    }
    if state.phase != GamePhase::Playing || dt == 0.0 {
        return events;
    }

    state.time_ticks += 1;

    // Player movement (demo AI steers when idle)
    let (move_x, move_z) = if input.idle_mode {
        idle_move(state)
    } else {
        (input.move_x, input.move_z)
    };
    state.player.apply_move(move_x, move_z, dt);

    // Single snapshot for every catch test this tick
    let player_pos = state.player.pos;
    let grace = state.ground_pickup_window;

    // Combo window lapses before this tick's catches can refresh it
    if state.combo > 0 {
        state.combo_timer -= dt;
        if state.combo_timer <= 0.0 {
            events.push(GameEvent::ComboBroken {
                length: state.combo,
            });
            state.combo = 0;
            state.combo_timer = 0.0;
        }
    }

    // Floats roll and throw
    let mut throws: Vec<u32> = Vec::new();
    for float in &mut state.floats {
        float.advance(dt);
        if float.tick_throw_timer(dt) {
            throws.push(float.id);
        }
    }
    for float_id in throws {
        throw_from_float(state, float_id, &mut events);
    }

    // Physics: each collectible integrates exactly once per tick
    for c in &mut state.collectibles {
        if !step_collectible(c, dt) {
            log::warn!("collectible {} has non-finite state, update skipped", c.id);
        }
    }

    // Player catches (all qualifying collectibles this tick are taken)
    let mut removed: Vec<u32> = Vec::new();
    let mut player_catches: Vec<(u32, CollectibleKind)> = Vec::new();
    for c in &state.collectibles {
        if super::catch::judge_catch(c, player_pos, CAPTURE_RADIUS, grace) == CatchJudgment::Caught
        {
            removed.push(c.id);
            player_catches.push((c.id, c.kind));
        }
    }

    for (id, kind) in player_catches {
        if state.combo > 0 {
            state.combo += 1;
        } else {
            state.combo = 1;
        }
        state.combo_timer = COMBO_WINDOW;
        state.max_combo = state.max_combo.max(state.combo);
        state.score += 1;
        state.total_catches += 1;
        events.push(GameEvent::Caught {
            id,
            kind,
            combo: state.combo,
        });
    }

    // Bots chase and catch whatever the player didn't take
    for bot in state.bots.iter_mut() {
        let target = bot
            .choose_target(&state.collectibles, grace)
            .map(|c| (c.id, c.pos));
        if let Some((target_id, target_pos)) = target {
            bot.advance_toward(target_pos, dt);
            if let Some(c) = state.collectibles.iter().find(|c| c.id == target_id) {
                if !removed.contains(&c.id) && bot.judge(c, grace) == CatchJudgment::Caught {
                    removed.push(c.id);
                    bot.catches += 1;
                    events.push(GameEvent::BotCaught {
                        id: c.id,
                        kind: c.kind,
                        bot_id: bot.id,
                    });
                }
            }
        }
    }

    // Expiry: swept off the ground or drifted off the street
    let mut missed = 0u32;
    for c in &state.collectibles {
        if removed.contains(&c.id) {
            continue;
        }
        if c.ground_time > GROUND_LIFETIME || c.out_of_bounds() {
            removed.push(c.id);
            missed += 1;
            events.push(GameEvent::Expired { id: c.id });
        }
    }
    if missed > 0 {
        state.misses += missed;
        if state.combo > 0 {
            events.push(GameEvent::ComboBroken {
                length: state.combo,
            });
            state.combo = 0;
            state.combo_timer = 0.0;
        }
    }

    // Caught and expired collectibles are deleted outright
    state.collectibles.retain(|c| !removed.contains(&c.id));

    // Obstacles patrol the street and bump the careless
    for obstacle in state.obstacles.iter_mut() {
        obstacle.patrol(dt);
        let distance = obstacle.pos.distance(player_pos);
        if !obstacle.bumped && distance < COLLISION_DISTANCE {
            obstacle.bumped = true;
            events.push(GameEvent::Stumbled {
                obstacle_id: obstacle.id,
            });
            if state.combo > 0 {
                events.push(GameEvent::ComboBroken {
                    length: state.combo,
                });
                state.combo = 0;
                state.combo_timer = 0.0;
            }
        } else if obstacle.bumped && distance > COLLISION_DISTANCE * 2.0 {
            obstacle.bumped = false;
        }
    }

    // Level complete?
    if state.score >= state.target_score {
        state.phase = GamePhase::Won;
        events.push(GameEvent::LevelComplete {
            level: state.level,
            score: state.score,
        });
        log::info!(
            "Level {} complete: score {}, max combo {}",
            state.level,
            state.score,
            state.max_combo
        );
    }

    events
}

/// Demo AI: drift toward the most promising collectible, or idle at center
fn idle_move(state: &GameState) -> (f32, f32) {
    let target = state
        .collectibles
        .iter()
        .filter(|c| !c.is_grounded())
        .min_by(|a, b| {
            let da = crate::horizontal_distance(a.pos, state.player.pos);
            let db = crate::horizontal_distance(b.pos, state.player.pos);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|c| c.pos)
        .unwrap_or(Vec3::new(0.0, PLAYER_HEIGHT, 0.0));
    let dx = target.x - state.player.pos.x;
    let dz = target.z - state.player.pos.z;
    (dx.clamp(-1.0, 1.0), dz.clamp(-1.0, 1.0))
}

/// One float throws a handful of collectibles toward the crowd
fn throw_from_float(state: &mut GameState, float_id: u32, events: &mut Vec<GameEvent>) {
    let Some(float) = state.floats.iter().find(|f| f.id == float_id) else {
        return;
    };
    let throw_point = float.throw_point();
    let lane = float.lane as f32;

    let mut rng = state.rng_state.throw_rng(state.time_ticks, float_id);
    let count = rng.random_range(1..=3);
    for _ in 0..count {
        let kind = match rng.random_range(0..10) {
            0..5 => CollectibleKind::Beads,
            5..8 => CollectibleKind::Doubloon,
            _ => CollectibleKind::Cup,
        };
        // Toward the street center, up and out
        let vel = Vec3::new(
            -lane * rng.random_range(0.5..2.5),
            rng.random_range(4.0..6.5),
            rng.random_range(-1.0..1.0),
        );
        let id = state.spawn_collectible(kind, throw_point, vel);
        events.push(GameEvent::Thrown {
            id,
            kind,
            float_id,
        });
    }
}

/// Roll a patrolling obstacle somewhere on the route
pub fn spawn_obstacle(id: u32, rng: &mut Pcg32) -> Obstacle {
    Obstacle {
        id,
        pos: Vec3::new(
            rng.random_range(-4.0..4.0),
            GROUND_LEVEL,
            rng.random_range(-12.0..12.0),
        ),
        // 1.5 to 3.0, matching the original obstacle sweep
        speed: rng.random_range(1.5..3.0),
        direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
        bumped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    /// Empty street: no floats, bots, or obstacles in the way of the test
    fn bare_state(seed: u64) -> GameState {
        let tuning = Tuning {
            floats: Vec::new(),
            bots: Vec::new(),
            obstacle_count: 0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(seed, &tuning);
        state.start_game();
        state
    }

    fn playing_input() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_start_transitions_tutorial_to_playing() {
        let mut state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Tutorial);

        tick(&mut state, &playing_input(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Tutorial);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut state = bare_state(1);
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        );
        let before = state.collectibles[0].clone();
        let ticks = state.time_ticks;

        let events = tick(&mut state, &playing_input(), 0.0);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.collectibles[0].pos, before.pos);
        assert_eq!(state.collectibles[0].vel, before.vel);

        // Negative dt is treated as zero
        let events = tick(&mut state, &playing_input(), -0.5);
        assert!(events.is_empty());
        assert_eq!(state.collectibles[0].pos, before.pos);
    }

    #[test]
    fn test_catch_capture_emits_one_event() {
        let mut state = bare_state(1);
        let id = state.spawn_collectible(
            CollectibleKind::Doubloon,
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::ZERO,
        );

        let events = tick(&mut state, &playing_input(), SIM_DT);
        let catches: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Caught { .. }))
            .collect();
        assert_eq!(catches.len(), 1);
        assert!(matches!(catches[0], GameEvent::Caught { id: eid, .. } if *eid == id));
        assert!(state.collectibles.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_no_false_catch_outside_radius() {
        let mut state = bare_state(1);
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::ZERO,
        );

        for _ in 0..5 {
            let events = tick(&mut state, &playing_input(), SIM_DT);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Caught { .. })));
        }
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_simultaneous_catches_all_taken() {
        let mut state = bare_state(1);
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(0.3, 1.0, 0.0),
            Vec3::ZERO,
        );
        state.spawn_collectible(
            CollectibleKind::Cup,
            Vec3::new(-0.3, 1.0, 0.0),
            Vec3::ZERO,
        );

        let events = tick(&mut state, &playing_input(), SIM_DT);
        let catches = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Caught { .. }))
            .count();
        assert_eq!(catches, 2);
        assert_eq!(state.combo, 2);
        assert_eq!(state.max_combo, 2);
    }

    #[test]
    fn test_floats_throw_collectibles() {
        let mut state = GameState::new(7);
        state.start_game();

        let mut thrown = 0;
        for _ in 0..(4.0 / SIM_DT) as u32 {
            let events = tick(&mut state, &playing_input(), SIM_DT);
            thrown += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Thrown { .. }))
                .count();
        }
        assert!(thrown > 0, "no float threw anything in four seconds");
        // Ids are never reused
        let mut ids: Vec<u32> = state.collectibles.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), state.collectibles.len());
    }

    #[test]
    fn test_ground_expiry_counts_a_miss() {
        let mut state = bare_state(1);
        let id = state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(4.0, GROUND_LEVEL, 4.0),
            Vec3::ZERO,
        );
        state.collectibles[0].ground_time = GROUND_LIFETIME + 1.0;

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events.contains(&GameEvent::Expired { id }));
        assert!(state.collectibles.is_empty());
        assert_eq!(state.misses, 1);
    }

    #[test]
    fn test_miss_breaks_combo() {
        let mut state = bare_state(1);
        state.combo = 3;
        state.combo_timer = COMBO_WINDOW;
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(4.0, GROUND_LEVEL, 4.0),
            Vec3::new(0.0, 0.0, 0.0),
        );
        state.collectibles[0].ground_time = GROUND_LIFETIME + 1.0;

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events.contains(&GameEvent::ComboBroken { length: 3 }));
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_combo_window_lapses() {
        let mut state = bare_state(1);
        state.combo = 2;
        state.combo_timer = 0.01;

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events.contains(&GameEvent::ComboBroken { length: 2 }));
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_obstacle_bump_latches() {
        let mut state = bare_state(1);
        state.combo = 2;
        state.combo_timer = COMBO_WINDOW;
        state.obstacles.push(Obstacle {
            id: 99,
            pos: Vec3::new(0.2, GROUND_LEVEL, 0.0),
            speed: 0.0,
            direction: 1.0,
            bumped: false,
        });

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events.contains(&GameEvent::Stumbled { obstacle_id: 99 }));
        assert_eq!(state.combo, 0);

        // Latched: staying in contact doesn't re-fire
        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Stumbled { .. })));
    }

    #[test]
    fn test_win_on_target_score() {
        let mut state = bare_state(1);
        state.score = state.target_score - 1;
        state.spawn_collectible(
            CollectibleKind::Doubloon,
            Vec3::new(0.3, 1.0, 0.0),
            Vec3::ZERO,
        );

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelComplete { level: 1, .. }
        )));

        // Won phase is inert until the host advances the level
        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events.is_empty());
    }

    #[test]
    fn test_bot_catches_emit_bot_event_not_score() {
        let tuning = Tuning {
            floats: Vec::new(),
            obstacle_count: 0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(5, &tuning);
        state.start_game();
        // Park the player far away and drop a collectible on the first bot
        state.player.pos = Vec3::new(-6.0, PLAYER_HEIGHT, -30.0);
        let bot_pos = state.bots[0].pos;
        let id = state.spawn_collectible(
            CollectibleKind::Cup,
            bot_pos + Vec3::new(0.2, 0.6, 0.0),
            Vec3::ZERO,
        );

        let events = tick(&mut state, &playing_input(), SIM_DT);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::BotCaught { id: eid, .. } if *eid == id)));
        assert_eq!(state.score, 0);
        assert_eq!(state.bots[0].catches, 1);
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start_game();
        state2.start_game();

        let input = TickInput {
            move_x: 0.4,
            move_z: -0.2,
            ..Default::default()
        };
        for _ in 0..600 {
            let e1 = tick(&mut state1, &input, SIM_DT);
            let e2 = tick(&mut state2, &input, SIM_DT);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.collectibles.len(), state2.collectibles.len());
        for (a, b) in state1.collectibles.iter().zip(&state2.collectibles) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_single_integration_per_tick() {
        // One tick at dt applies exactly one gravity step, not two
        let mut state = bare_state(1);
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(4.0, 5.0, 4.0),
            Vec3::ZERO,
        );

        tick(&mut state, &playing_input(), 0.1);
        let c = &state.collectibles[0];
        assert!((c.vel.y - (-1.5)).abs() < 1e-5);
        assert!((c.pos.y - 4.85).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_collectible_survives_tick() {
        let mut state = bare_state(1);
        state.spawn_collectible(
            CollectibleKind::Beads,
            Vec3::new(f32::NAN, 1.0, 0.0),
            Vec3::ZERO,
        );
        state.spawn_collectible(
            CollectibleKind::Cup,
            Vec3::new(4.0, 3.0, 4.0),
            Vec3::ZERO,
        );

        // The poisoned collectible is skipped; the healthy one still integrates
        tick(&mut state, &playing_input(), 0.1);
        assert_eq!(state.collectibles.len(), 2);
        assert!((state.collectibles[1].vel.y - (-1.5)).abs() < 1e-5);
    }
}
