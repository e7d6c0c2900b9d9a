//! Parade Catch entry point
//!
//! Headless demo run: the AI plays the game for a few simulated minutes and
//! the event stream goes to the log. Useful for balance checks and smoke
//! testing without a renderer attached.

use parade_catch::consts::SIM_DT;
use parade_catch::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use parade_catch::tuning::Tuning;

/// Simulated wall-clock budget for the demo run
const DEMO_SECONDS: f32 = 180.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xCA7C4);
    log::info!("Parade Catch demo starting (seed {seed})");

    let tuning = match std::env::var("PARADE_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::load_or_default(Some(&json)),
            Err(e) => {
                log::warn!("Could not read tuning file {path}: {e}");
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut state = GameState::with_tuning(seed, &tuning);
    let input = TickInput {
        start: true,
        idle_mode: true,
        ..Default::default()
    };

    let total_ticks = (DEMO_SECONDS / SIM_DT) as u64;
    let mut levels_cleared = 0u32;
    for _ in 0..total_ticks {
        for event in tick(&mut state, &input, SIM_DT) {
            match event {
                GameEvent::Caught { kind, combo, .. } => {
                    log::info!("caught {kind:?} (combo x{combo}, score {})", state.score);
                }
                GameEvent::BotCaught { kind, bot_id, .. } => {
                    log::debug!("bot {bot_id} snagged a {kind:?}");
                }
                GameEvent::Stumbled { obstacle_id } => {
                    log::info!("stumbled over obstacle {obstacle_id}");
                }
                GameEvent::LevelComplete { level, score } => {
                    log::info!("level {level} complete with {score} catches");
                }
                _ => {}
            }
        }
        if state.phase == GamePhase::Won {
            levels_cleared += 1;
            state.advance_level();
        }
    }

    println!("=== demo run summary (seed {seed}) ===");
    println!("levels cleared : {levels_cleared}");
    println!("total catches  : {}", state.total_catches);
    println!("max combo      : {}", state.max_combo);
    println!("misses         : {}", state.misses);
    for bot in &state.bots {
        println!("bot {:<8}: {} catches", bot.name, bot.catches);
    }
}
