//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One `step` per animation frame, timers advanced only by its `dt`
//! - Seeded RNG only, injected through `GameState`
//! - Fixed update order within a step
//! - No rendering, audio, or platform dependencies

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod particle;
pub mod state;
pub mod tick;
pub mod wave;

pub use bullet::{Bullet, BulletKind};
pub use collision::Rect;
pub use enemy::{Enemy, EnemyKind, Phase};
pub use particle::Particle;
pub use state::{GamePhase, GameState, Player, Renderables, SessionState};
pub use tick::step;
pub use wave::{spawn_wave, unlocked_kinds, wave_size};
