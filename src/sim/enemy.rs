//! Enemy entities and the per-kind behavior state machine
//!
//! One shared entity record plus a static stat table keyed on `EnemyKind`;
//! phase logic branches on the kind where behaviors diverge, and kind-only
//! runtime state lives in a tagged `KindState` so every variant is matched
//! exhaustively.
//!
//! Phases loop `Entering -> Formation -> {Attacking | Special} -> Formation`;
//! `Entering` is visited exactly once, along a precomputed curved fly-in.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::bullet::Bullet;
use super::collision::Rect;
use crate::audio::Cue;
use crate::consts::PLAY_WIDTH;

/// Waypoints in a fly-in path (inclusive of both endpoints)
const ENTRY_PATH_STEPS: usize = 60;

/// Distance at which a diving enemy breaks off and returns to formation
const ATTACK_BREAKOFF_DIST: f32 = 10.0;

/// Behavior phase of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Flying in along the entry path
    Entering,
    /// Holding a formation slot, oscillating, rolling for attacks
    Formation,
    /// Diving directly at the player
    Attacking,
    /// Running a scripted attack sequence (sniper/bomber/boss)
    Special,
}

/// Enemy role, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Fast,
    Heavy,
    Boss,
    Scout,
    Bomber,
    Sniper,
}

/// Static per-kind stats
#[derive(Debug, Clone, Copy)]
pub struct KindStats {
    pub health: u32,
    /// Base movement speed (px/s)
    pub speed: f32,
    pub size: Vec2,
    /// Score awarded on destruction
    pub points: u64,
    /// Base delay between passive shots (ms)
    pub shoot_cooldown_ms: f32,
    /// Probability gate on each attack roll
    pub attack_chance: f32,
}

impl EnemyKind {
    /// The behavior table: one entry per kind
    pub fn stats(self) -> KindStats {
        match self {
            EnemyKind::Basic => KindStats {
                health: 1,
                speed: 60.0,
                size: Vec2::new(25.0, 20.0),
                points: 25,
                shoot_cooldown_ms: 3000.0,
                attack_chance: 0.1,
            },
            EnemyKind::Fast => KindStats {
                health: 1,
                speed: 120.0,
                size: Vec2::new(20.0, 18.0),
                points: 50,
                shoot_cooldown_ms: 2000.0,
                attack_chance: 0.2,
            },
            EnemyKind::Heavy => KindStats {
                health: 2,
                speed: 30.0,
                size: Vec2::new(30.0, 25.0),
                points: 100,
                shoot_cooldown_ms: 4000.0,
                attack_chance: 0.05,
            },
            EnemyKind::Boss => KindStats {
                health: 4,
                speed: 48.0,
                size: Vec2::new(40.0, 30.0),
                points: 200,
                shoot_cooldown_ms: 1500.0,
                attack_chance: 0.3,
            },
            EnemyKind::Scout => KindStats {
                health: 1,
                speed: 180.0,
                size: Vec2::new(18.0, 15.0),
                points: 40,
                shoot_cooldown_ms: 2500.0,
                attack_chance: 0.4,
            },
            EnemyKind::Bomber => KindStats {
                health: 1,
                speed: 72.0,
                size: Vec2::new(28.0, 22.0),
                points: 75,
                shoot_cooldown_ms: 1800.0,
                attack_chance: 0.15,
            },
            EnemyKind::Sniper => KindStats {
                health: 1,
                speed: 48.0,
                size: Vec2::new(22.0, 24.0),
                points: 80,
                shoot_cooldown_ms: 2800.0,
                attack_chance: 0.08,
            },
        }
    }

    /// How long a kind idles in formation before rolling an attack (ms)
    fn attack_delay_ms(self) -> f32 {
        match self {
            EnemyKind::Scout => 3000.0,
            EnemyKind::Fast => 4000.0,
            EnemyKind::Heavy => 8000.0,
            _ => 6000.0,
        }
    }

    /// Dive speed multiplier while attacking
    fn attack_speed_mult(self) -> f32 {
        match self {
            EnemyKind::Scout => 3.0,
            EnemyKind::Fast => 2.5,
            _ => 2.0,
        }
    }

    /// Entry-path traversal rate (waypoints/s)
    fn entry_rate(self) -> f32 {
        match self {
            EnemyKind::Fast | EnemyKind::Scout => 180.0,
            _ => 120.0,
        }
    }
}

/// Which volley the boss fires next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossVolley {
    Spread,
    Homing,
}

/// Kind-specific runtime state
#[derive(Debug, Clone, Copy, PartialEq)]
enum KindState {
    Plain,
    Scout {
        zigzag_amplitude: f32,
        zigzag_frequency: f32,
    },
    Heavy {
        shield_active: bool,
        shield_ms: f32,
    },
    Sniper {
        aiming: bool,
        aim_ms: f32,
    },
    Bomber {
        drop_ms: f32,
        next_drop_ms: f32,
    },
    Boss {
        volley: BossVolley,
        volley_ms: f32,
    },
}

impl KindState {
    fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Scout => KindState::Scout {
                zigzag_amplitude: 30.0,
                zigzag_frequency: 0.02,
            },
            EnemyKind::Heavy => KindState::Heavy {
                shield_active: false,
                shield_ms: 0.0,
            },
            EnemyKind::Sniper => KindState::Sniper {
                aiming: false,
                aim_ms: 0.0,
            },
            EnemyKind::Bomber => KindState::Bomber {
                drop_ms: 0.0,
                next_drop_ms: 0.0,
            },
            EnemyKind::Boss => KindState::Boss {
                volley: BossVolley::Spread,
                volley_ms: 0.0,
            },
            EnemyKind::Basic | EnemyKind::Fast => KindState::Plain,
        }
    }
}

/// Everything an enemy needs from the wider sim during its update
pub struct EnemyWorld<'a> {
    pub player_center: Vec2,
    /// Accumulated sim time (ms), drives formation oscillation
    pub elapsed_ms: f32,
    pub rng: &'a mut Pcg32,
    pub bullets: &'a mut Vec<Bullet>,
    pub cues: &'a mut Vec<Cue>,
}

/// A single enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub points: u64,
    pub phase: Phase,
    /// Index into the wave's formation, phase-shifts the idle oscillation
    pub formation_index: usize,
    /// The formation slot this enemy flies in toward
    pub formation_slot: Vec2,
    entry_path: Vec<Vec2>,
    path_progress: f32,
    shoot_timer_ms: f32,
    shoot_cooldown_ms: f32,
    attack_timer_ms: f32,
    state: KindState,
}

/// Curved fly-in: a sinusoidal sweep from the nearer top corner to the slot
fn entry_path_to(slot: Vec2) -> Vec<Vec2> {
    let start_x = if slot.x < PLAY_WIDTH / 2.0 {
        -50.0
    } else {
        PLAY_WIDTH + 50.0
    };
    let start_y = -50.0;
    (0..=ENTRY_PATH_STEPS)
        .map(|i| {
            let t = i as f32 / ENTRY_PATH_STEPS as f32;
            let sweep = (std::f32::consts::TAU * t).sin() * 100.0;
            Vec2::new(
                start_x + (slot.x - start_x) * t + sweep,
                start_y + (slot.y - start_y) * t,
            )
        })
        .collect()
}

impl Enemy {
    /// Spawn an enemy bound for a formation slot; it flies in along a
    /// precomputed curved path
    pub fn new(kind: EnemyKind, slot: Vec2, formation_index: usize, rng: &mut Pcg32) -> Self {
        let stats = kind.stats();
        let entry_path = entry_path_to(slot);
        Self {
            kind,
            pos: entry_path[0],
            size: stats.size,
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            points: stats.points,
            phase: Phase::Entering,
            formation_index,
            formation_slot: slot,
            entry_path,
            path_progress: 0.0,
            shoot_timer_ms: 0.0,
            shoot_cooldown_ms: stats.shoot_cooldown_ms + rng.random_range(0.0..1000.0),
            attack_timer_ms: 0.0,
            state: KindState::for_kind(kind),
        }
    }

    pub fn hit_box(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.hit_box().center()
    }

    /// Bullet origin: center of the lower edge
    fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    /// Shield state, for the renderer (heavy only)
    pub fn shield_active(&self) -> bool {
        matches!(
            self.state,
            KindState::Heavy {
                shield_active: true,
                ..
            }
        )
    }

    /// Whether a sniper is telegraphing its shot
    pub fn is_aiming(&self) -> bool {
        matches!(self.state, KindState::Sniper { aiming: true, .. })
    }

    /// Advance one step of the behavior state machine
    pub fn update(&mut self, dt: f32, world: &mut EnemyWorld<'_>) {
        self.shoot_timer_ms += dt * 1000.0;
        self.update_passive(dt, world);

        match self.phase {
            Phase::Entering => self.update_entering(dt),
            Phase::Formation => self.update_formation(dt, world),
            Phase::Attacking => self.update_attacking(dt, world),
            Phase::Special => self.update_special(dt, world),
        }

        self.update_shooting(world);
    }

    /// Phase-independent per-kind upkeep. Heavy ships raise a shield after
    /// an idle spell once they have taken damage; it holds for a fixed
    /// window and absorbs exactly one hit.
    fn update_passive(&mut self, dt: f32, world: &mut EnemyWorld<'_>) {
        if let KindState::Heavy {
            shield_active,
            shield_ms,
        } = &mut self.state
        {
            *shield_ms += dt * 1000.0;
            if !*shield_active && self.health < self.max_health && *shield_ms > 5000.0 {
                *shield_active = true;
                *shield_ms = 0.0;
                world.cues.push(Cue::ShieldActivate);
            } else if *shield_active && *shield_ms > 3000.0 {
                *shield_active = false;
                *shield_ms = 0.0;
            }
        }
    }

    fn update_entering(&mut self, dt: f32) {
        self.path_progress += self.kind.entry_rate() * dt;
        let idx = self.path_progress as usize;
        if idx >= self.entry_path.len() - 1 {
            if let Some(&last) = self.entry_path.last() {
                self.pos = last;
            }
            self.phase = Phase::Formation;
        } else {
            self.pos = self.entry_path[idx];
        }
    }

    fn update_formation(&mut self, dt: f32, world: &mut EnemyWorld<'_>) {
        // Shared vertical bob (px/s), phase-shifted per formation slot
        let bob = (world.elapsed_ms * 0.002 + self.formation_index as f32).sin() * 30.0;

        match self.kind {
            EnemyKind::Scout => {
                if let KindState::Scout {
                    zigzag_amplitude,
                    zigzag_frequency,
                } = self.state
                {
                    self.pos.x +=
                        (world.elapsed_ms * zigzag_frequency).sin() * zigzag_amplitude * dt;
                }
                self.pos.y += bob * 2.0 * dt;
            }
            EnemyKind::Heavy => self.pos.y += bob * 0.3 * dt,
            EnemyKind::Fast => {
                self.pos.y += bob * 1.5 * dt;
                self.pos.x += world.rng.random_range(-15.0..15.0) * dt;
            }
            _ => self.pos.y += bob * dt,
        }

        // Attack roll: past the per-kind delay (plus jitter), gated on the
        // kind's attack chance
        self.attack_timer_ms += dt * 1000.0;
        let delay = self.kind.attack_delay_ms() + world.rng.random_range(0.0..5000.0);
        if self.attack_timer_ms > delay
            && world.rng.random::<f32>() < self.kind.stats().attack_chance
        {
            self.phase = match self.kind {
                EnemyKind::Sniper | EnemyKind::Bomber | EnemyKind::Boss => Phase::Special,
                _ => Phase::Attacking,
            };
            self.attack_timer_ms = 0.0;
        }
    }

    fn update_attacking(&mut self, dt: f32, world: &EnemyWorld<'_>) {
        let to_player = world.player_center - self.center();
        let dist = to_player.length();
        if dist > ATTACK_BREAKOFF_DIST {
            let dive_speed = self.speed * self.kind.attack_speed_mult();
            self.pos += to_player / dist * dive_speed * dt;
        } else {
            self.phase = Phase::Formation;
            // Negative offset delays the next attack roll
            self.attack_timer_ms = -2000.0;
        }
    }

    fn update_special(&mut self, dt: f32, world: &mut EnemyWorld<'_>) {
        let muzzle = self.muzzle();
        match &mut self.state {
            KindState::Sniper { aiming, aim_ms } => {
                if !*aiming {
                    *aiming = true;
                    *aim_ms = 0.0;
                    world.cues.push(Cue::SniperCharge);
                }
                *aim_ms += dt * 1000.0;
                if *aim_ms > 1500.0 {
                    *aiming = false;
                    world
                        .bullets
                        .push(Bullet::sniper_aimed(muzzle, world.player_center));
                    world.cues.push(Cue::SniperShoot);
                    self.phase = Phase::Formation;
                    self.attack_timer_ms = -3000.0;
                }
            }
            KindState::Bomber {
                drop_ms,
                next_drop_ms,
            } => {
                *drop_ms += dt * 1000.0;
                if *drop_ms > 2000.0 {
                    *drop_ms = 0.0;
                    *next_drop_ms = 0.0;
                    self.phase = Phase::Formation;
                    self.attack_timer_ms = -4000.0;
                } else if *drop_ms >= *next_drop_ms {
                    world.bullets.push(Bullet::gravity_bomb(muzzle));
                    world.cues.push(Cue::BombDrop);
                    *next_drop_ms += 400.0;
                }
            }
            KindState::Boss { volley, volley_ms } => {
                *volley_ms += dt * 1000.0;
                if *volley_ms > 3000.0 {
                    match *volley {
                        BossVolley::Spread => {
                            for slot in -2..=2 {
                                world.bullets.push(Bullet::boss_spread(muzzle, slot));
                            }
                            *volley = BossVolley::Homing;
                        }
                        BossVolley::Homing => {
                            world.bullets.push(Bullet::homing(muzzle));
                            world.cues.push(Cue::HomingLock);
                            *volley = BossVolley::Spread;
                        }
                    }
                    *volley_ms = 0.0;
                    self.phase = Phase::Formation;
                    self.attack_timer_ms = -2000.0;
                }
            }
            // Kinds without a scripted sequence fall back to formation
            _ => self.phase = Phase::Formation,
        }
    }

    /// Attack-independent shooting: every kind keeps firing its basic
    /// pattern on its own timer, in any phase past entry
    fn update_shooting(&mut self, world: &mut EnemyWorld<'_>) {
        if self.phase == Phase::Entering || self.shoot_timer_ms <= self.shoot_cooldown_ms {
            return;
        }
        let muzzle = self.muzzle();
        match self.kind {
            EnemyKind::Fast => {
                // Twin shot
                world
                    .bullets
                    .push(Bullet::enemy_fast(muzzle - Vec2::new(4.0, 0.0)));
                world
                    .bullets
                    .push(Bullet::enemy_fast(muzzle + Vec2::new(4.0, 0.0)));
            }
            EnemyKind::Heavy => world.bullets.push(Bullet::enemy_heavy(muzzle)),
            EnemyKind::Bomber => {
                for lane in -1..=1 {
                    world.bullets.push(Bullet::bomber_spread(muzzle, lane));
                }
            }
            // Everything else falls back to the single straight shot
            _ => world.bullets.push(Bullet::enemy_basic(muzzle)),
        }
        self.shoot_timer_ms = 0.0;
        self.shoot_cooldown_ms =
            self.kind.stats().shoot_cooldown_ms + world.rng.random_range(0.0..1000.0);
    }

    /// Apply one point of damage. An active shield absorbs the hit outright,
    /// leaving health untouched. Returns true iff the enemy was destroyed.
    pub fn take_damage(&mut self) -> bool {
        if let KindState::Heavy {
            shield_active,
            shield_ms,
        } = &mut self.state
        {
            if *shield_active {
                *shield_active = false;
                *shield_ms = 0.0;
                return false;
            }
        }
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}
