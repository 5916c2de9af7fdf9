//! Ephemeral visual-effect particles
//!
//! Purely cosmetic: nothing in collision or scoring ever reads these.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Downward drift applied to every particle (px/s^2)
const PARTICLE_GRAVITY: f32 = 360.0;

/// A short-lived effect particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed RGB for the renderer's palette lookup
    pub color: u32,
    /// Seconds of life remaining
    pub life: f32,
    /// Initial lifetime, for alpha fade on the render side
    pub max_life: f32,
    pub size: f32,
}

/// Spawn `count` particles at a point with randomized spread.
///
/// Velocities and lifetimes are drawn fresh per particle; only their bounds
/// are stable. Oldest particles are evicted once `cap` is reached.
pub fn spawn_particles(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    color: u32,
    count: usize,
    cap: usize,
) {
    if cap == 0 {
        return;
    }
    for _ in 0..count {
        if particles.len() >= cap {
            particles.remove(0);
        }
        let vel = Vec2::new(
            rng.random_range(-120.0..120.0),
            rng.random_range(-120.0..120.0) - 60.0,
        );
        let life = rng.random_range(0.5..1.5);
        particles.push(Particle {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size: rng.random_range(1.0..4.0),
        });
    }
}

/// Bomb-blast variant: scatter particles across the blast disc, pushed
/// outward from the detonation point
pub fn spawn_explosion_ring(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    center: Vec2,
    radius: f32,
    color: u32,
    count: usize,
    cap: usize,
) {
    if cap == 0 {
        return;
    }
    for i in 0..count {
        if particles.len() >= cap {
            particles.remove(0);
        }
        let angle = std::f32::consts::TAU * (i as f32 / count as f32);
        let dist = rng.random_range(0.0..radius);
        let offset = Vec2::new(angle.cos(), angle.sin()) * dist;
        let vel = Vec2::new(angle.cos(), angle.sin()) * rng.random_range(60.0..180.0);
        let life = rng.random_range(0.4..1.0);
        particles.push(Particle {
            pos: center + offset,
            vel,
            color,
            life,
            max_life: life,
            size: rng.random_range(1.0..4.0),
        });
    }
}

/// Advance all particles and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
