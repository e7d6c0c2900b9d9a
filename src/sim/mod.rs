//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio, or platform dependencies
//!
//! The host render loop owns nothing but the call site: it passes `tick` a
//! delta time and an input snapshot, and consumes the returned events. State
//! is only ever mutated inside a tick, so anything read between ticks is a
//! consistent snapshot.

pub mod bots;
pub mod catch;
pub mod physics;
pub mod state;
pub mod tick;

pub use bots::Bot;
pub use catch::{CatchJudgment, judge_catch};
pub use physics::{integrate_gravity, resolve_ground, step_collectible};
pub use state::{
    Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Obstacle, ParadeFloat, Player,
};
pub use tick::{TickInput, tick};
