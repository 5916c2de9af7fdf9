//! Game state and core simulation types
//!
//! Everything the engine mutates per frame lives here, exclusively owned by
//! `step`. Collaborators see only the accessor surface: session counters,
//! renderable snapshots, input intents, and the audio-cue queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bullet::Bullet;
use super::collision::Rect;
use super::enemy::Enemy;
use super::particle::Particle;
use super::wave;
use crate::audio::Cue;
use crate::consts::*;
use crate::settings::Settings;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay, including the pause between waves
    Playing,
    /// Run ended; only a reset leaves this state
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Time until the next shot is allowed (ms)
    pub shoot_cooldown_ms: f32,
    /// Remaining grace window (ms)
    pub invulnerable_ms: f32,
}

impl Player {
    fn new() -> Self {
        Self {
            pos: Vec2::new(400.0, 550.0),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            shoot_cooldown_ms: 0.0,
            invulnerable_ms: 0.0,
        }
    }

    pub fn hit_box(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.hit_box().center()
    }

    /// True while the post-hit grace window is running
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }
}

/// Score/lives/level view handed to UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Set while the wave-advance pause is pending; prevents double advances
    pub wave_complete: bool,
}

/// Buffered input intents, written by the input collaborator between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Movement direction, components in [-1, 1]
    pub movement: Vec2,
    /// One-shot fire request, consumed by the next step
    pub fire_requested: bool,
}

/// Read-only entity snapshot for the rendering collaborator
#[derive(Debug)]
pub struct Renderables<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub particles: &'a [Particle],
}

/// Complete simulation state
pub struct GameState {
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    pub(crate) session: SessionState,
    /// Accumulated sim time (ms), the only clock the core reads
    pub(crate) elapsed_ms: f32,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) player_bullets: Vec<Bullet>,
    pub(crate) enemy_bullets: Vec<Bullet>,
    pub(crate) particles: Vec<Particle>,
    /// Countdown to the next wave once the current one clears (ms)
    pub(crate) wave_break_ms: f32,
    pub(crate) starting_lives: u32,
    pub(crate) max_particles: usize,
    pub(crate) input: InputState,
    pub(crate) cues: Vec<Cue>,
}

impl GameState {
    /// Create a new run with the given seed; the first wave is already
    /// inbound
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, &Settings::default())
    }

    /// Create a new run honoring user preferences
    pub fn with_settings(seed: u64, settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut cues = Vec::new();
        let enemies = wave::spawn_wave(1, &mut rng, &mut cues);
        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            session: SessionState {
                score: 0,
                lives: settings.starting_lives,
                level: 1,
                wave_complete: false,
            },
            elapsed_ms: 0.0,
            player: Player::new(),
            enemies,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            wave_break_ms: 0.0,
            starting_lives: settings.starting_lives,
            max_particles: settings.max_particles,
            input: InputState::default(),
            cues,
        }
    }

    /// Restart the run from scratch, keeping preferences
    pub fn reset(&mut self, seed: u64) {
        let settings = Settings {
            starting_lives: self.starting_lives,
            max_particles: self.max_particles,
            fixed_seed: Some(seed),
        };
        *self = Self::with_settings(seed, &settings);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current score/lives/level
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Read-only snapshot of everything the renderer draws
    pub fn renderables(&self) -> Renderables<'_> {
        Renderables {
            player: &self.player,
            enemies: &self.enemies,
            player_bullets: &self.player_bullets,
            enemy_bullets: &self.enemy_bullets,
            particles: &self.particles,
        }
    }

    /// Set the movement intent for the next step; components are clamped
    /// to [-1, 1]
    pub fn set_movement_intent(&mut self, intent: Vec2) {
        self.input.movement = intent.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Request a shot; honored by the next step if the cooldown allows
    pub fn request_fire(&mut self) {
        self.input.fire_requested = true;
    }

    /// Hand the frame's audio cues to the playback collaborator
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_with_first_wave() {
        let state = GameState::new(42);
        assert_eq!(state.phase(), GamePhase::Playing);
        let s = state.session();
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, STARTING_LIVES);
        assert_eq!(s.level, 1);
        assert!(!s.wave_complete);
        // Level 1 wave: 8 + 3*1 enemies
        assert_eq!(state.renderables().enemies.len(), 11);
    }

    #[test]
    fn test_movement_intent_is_clamped() {
        let mut state = GameState::new(1);
        state.set_movement_intent(Vec2::new(5.0, -3.0));
        assert_eq!(state.input.movement, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_drain_cues_empties_queue() {
        let mut state = GameState::new(1);
        // Wave spawn enqueues at least one cue
        let cues = state.drain_cues();
        assert!(cues.contains(&Cue::WaveSpawn));
        assert!(state.drain_cues().is_empty());
    }

    #[test]
    fn test_reset_keeps_preferences() {
        let settings = Settings {
            starting_lives: 5,
            max_particles: 64,
            fixed_seed: None,
        };
        let mut state = GameState::with_settings(9, &settings);
        state.session.score = 1000;
        state.reset(10);
        assert_eq!(state.session().score, 0);
        assert_eq!(state.session().lives, 5);
        assert_eq!(state.max_particles, 64);
        assert_eq!(state.seed(), 10);
    }
}
