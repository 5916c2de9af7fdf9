//! Wave generation: roster sizing, formation layout, kind distribution
//!
//! Intentionally non-deterministic: slots are filled by layered weighted
//! draws with front/back-row overrides, so only counts and pool membership
//! are stable for a given level.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyKind};
use crate::audio::Cue;

/// Grid origin and cell spacing for formation slots
const GRID_ORIGIN_X: f32 = 100.0;
const GRID_ORIGIN_Y: f32 = 30.0;
const GRID_COL_SPACING: f32 = 70.0;
const GRID_ROW_SPACING: f32 = 50.0;

/// Number of enemies in a wave at the given level
pub fn wave_size(level: u32) -> usize {
    (8 + 3 * level) as usize
}

/// Formation row count at the given level
pub fn row_count(level: u32) -> usize {
    (3 + level / 2).min(6) as usize
}

/// Kinds that may appear at the given level. The pool only ever grows.
pub fn unlocked_kinds(level: u32) -> Vec<EnemyKind> {
    let mut kinds = vec![EnemyKind::Basic];
    if level >= 2 {
        kinds.extend([EnemyKind::Fast, EnemyKind::Scout]);
    }
    if level >= 3 {
        kinds.extend([EnemyKind::Heavy, EnemyKind::Bomber]);
    }
    if level >= 4 {
        kinds.push(EnemyKind::Sniper);
    }
    if level >= 5 {
        kinds.push(EnemyKind::Boss);
    }
    kinds
}

/// Layered weighted draw for one slot. Thresholds only open up as levels
/// unlock the rarer kinds.
fn roll_kind(level: u32, rng: &mut Pcg32) -> EnemyKind {
    let r: f32 = rng.random();
    if level >= 5 && r < 0.05 {
        EnemyKind::Boss
    } else if level >= 4 && r < 0.10 {
        EnemyKind::Sniper
    } else if level >= 3 && r < 0.15 {
        if r < 0.08 {
            EnemyKind::Heavy
        } else {
            EnemyKind::Bomber
        }
    } else if level >= 2 && r < 0.25 {
        if r < 0.15 {
            EnemyKind::Fast
        } else {
            EnemyKind::Scout
        }
    } else {
        EnemyKind::Basic
    }
}

/// Build the full roster for a level
pub fn spawn_wave(level: u32, rng: &mut Pcg32, cues: &mut Vec<Cue>) -> Vec<Enemy> {
    let size = wave_size(level);
    let rows = row_count(level);
    let cols = size.div_ceil(rows);

    cues.push(Cue::WaveSpawn);

    let mut enemies = Vec::with_capacity(size);
    'grid: for row in 0..rows {
        for col in 0..cols {
            if enemies.len() >= size {
                break 'grid;
            }
            let slot = Vec2::new(
                GRID_ORIGIN_X + col as f32 * GRID_COL_SPACING,
                GRID_ORIGIN_Y + row as f32 * GRID_ROW_SPACING,
            );

            let mut kind = roll_kind(level, rng);

            // Front row favors the fast movers, back row the artillery
            if row == 0 && level >= 2 && rng.random::<f32>() < 0.4 {
                kind = if rng.random::<f32>() < 0.5 {
                    EnemyKind::Scout
                } else {
                    EnemyKind::Fast
                };
            }
            if row == rows - 1 && level >= 3 && rng.random::<f32>() < 0.3 {
                kind = if rng.random::<f32>() < 0.6 {
                    EnemyKind::Sniper
                } else {
                    EnemyKind::Bomber
                };
            }

            let index = enemies.len();
            enemies.push(Enemy::new(kind, slot, index, rng));
        }
    }

    // High levels always field at least one boss
    if level >= 6 && !enemies.iter().any(|e| e.kind == EnemyKind::Boss) {
        let index = rng.random_range(0..enemies.len());
        let slot = enemies[index].formation_slot;
        enemies[index] = Enemy::new(EnemyKind::Boss, slot, index, rng);
        cues.push(Cue::BossSpawn);
        log::info!("level {level}: forced boss into slot {index}");
    }

    log::debug!(
        "level {level}: spawned {} enemies across {rows} rows ({} kinds unlocked)",
        enemies.len(),
        unlocked_kinds(level).len()
    );

    enemies
}
