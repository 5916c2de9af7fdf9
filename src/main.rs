//! Astro Siege headless demo
//!
//! Drives the simulation at a fixed 60 Hz with a scripted autopilot and logs
//! session state. Stands in for the render/input shell, which consumes the
//! same public surface: step, session state, renderable snapshots, input
//! intents, and the audio-cue queue.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use astro_siege::consts::{PLAY_WIDTH, SIM_DT};
use astro_siege::highscores::HighScores;
use astro_siege::settings::Settings;
use astro_siege::sim::{GamePhase, GameState, step};

/// Demo length cap (sim frames)
const MAX_FRAMES: u64 = 60 * 180;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();

    let settings = Settings::load(Path::new("settings.json"));
    let seed = settings.fixed_seed.unwrap_or_else(now_ms);
    let mut state = GameState::with_settings(seed, &settings);
    log::info!("starting run with seed {seed}");

    for frame in 0..MAX_FRAMES {
        autopilot(&mut state, frame);
        step(&mut state, SIM_DT);

        for cue in state.drain_cues() {
            log::debug!("cue: {cue:?}");
        }

        if frame % 60 == 0 {
            let s = state.session();
            log::info!(
                "t={}s score={} lives={} level={}",
                frame / 60,
                s.score,
                s.lives,
                s.level
            );
        }

        if state.phase() == GamePhase::GameOver {
            break;
        }
    }

    let s = state.session();
    println!("final: score {} level {} lives {}", s.score, s.lives, s.level);

    let path = Path::new("highscores.json");
    let mut scores = HighScores::load(path);
    if let Some(rank) = scores.add_score(s.score, s.level, now_ms()) {
        log::info!("new high score, rank {rank}");
        scores.save(path);
    }
}

/// Dodge the nearest descending bullet, otherwise sweep the play area, and
/// keep the trigger held
fn autopilot(state: &mut GameState, frame: u64) {
    state.request_fire();

    let view = state.renderables();
    let player_x = view.player.center().x;

    // Nearest enemy bullet closing in on our column
    let threat_x = view
        .enemy_bullets
        .iter()
        .filter(|b| b.pos.y > 300.0 && (b.pos.x - player_x).abs() < 60.0)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|b| b.pos.x);

    let dx = match threat_x {
        // Slide out from under the threat
        Some(x) if x >= player_x => -1.0,
        Some(_) => 1.0,
        None => {
            // Sweep back and forth to spread fire across the formation
            let t = frame as f32 * SIM_DT;
            let target = PLAY_WIDTH / 2.0 + (t * 0.7).sin() * (PLAY_WIDTH / 2.0 - 80.0);
            ((target - player_x) / 30.0).clamp(-1.0, 1.0)
        }
    };

    state.set_movement_intent(Vec2::new(dx, 0.0));
}
