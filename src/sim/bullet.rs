//! Bullet entities and per-kind kinematics
//!
//! Each kind has one position-update rule applied once per step. Straight
//! kinds fly a fixed vector; homing bullets steer toward the player with a
//! clamped converging curve; gravity bombs accelerate downward until they
//! detonate (resolved in the engine step).

use glam::Vec2;

use super::collision::Rect;
use crate::consts::{
    BOMB_GROUND_ALTITUDE, OFFSCREEN_MARGIN, PLAY_HEIGHT, PLAY_WIDTH, PLAYER_BULLET_SPEED,
};

/// Steering acceleration applied to homing bullets (px/s^2)
pub const HOMING_ACCEL: f32 = 180.0;
/// Downward acceleration on gravity bombs (px/s^2)
pub const BOMB_GRAVITY: f32 = 360.0;

/// Flight behavior of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletKind {
    Basic,
    Fast,
    Heavy,
    BomberSpread,
    SniperAimed,
    BossSpread,
    Homing,
    GravityBomb,
}

/// A projectile, player- or enemy-owned
#[derive(Debug, Clone)]
pub struct Bullet {
    pub kind: BulletKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Base speed; homing bullets are clamped to twice this
    pub speed: f32,
    pub vel: Vec2,
}

impl Bullet {
    /// The player's straight-up shot
    pub fn player_shot(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::Basic,
            pos: origin,
            size: Vec2::new(4.0, 8.0),
            speed: PLAYER_BULLET_SPEED,
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
        }
    }

    /// Single straight shot, the fallback pattern for any enemy kind
    pub fn enemy_basic(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::Basic,
            pos: origin,
            size: Vec2::new(4.0, 8.0),
            speed: 180.0,
            vel: Vec2::new(0.0, 180.0),
        }
    }

    /// One half of a fast enemy's twin shot
    pub fn enemy_fast(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::Fast,
            pos: origin,
            size: Vec2::new(3.0, 6.0),
            speed: 240.0,
            vel: Vec2::new(0.0, 240.0),
        }
    }

    /// Heavy enemy's slow, large slug
    pub fn enemy_heavy(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::Heavy,
            pos: origin,
            size: Vec2::new(6.0, 10.0),
            speed: 120.0,
            vel: Vec2::new(0.0, 120.0),
        }
    }

    /// One lane of the bomber's three-way spread, `lane` in -1..=1
    pub fn bomber_spread(origin: Vec2, lane: i32) -> Self {
        Self {
            kind: BulletKind::BomberSpread,
            pos: origin,
            size: Vec2::new(4.0, 8.0),
            speed: 180.0,
            vel: Vec2::new(lane as f32 * 30.0, 180.0),
        }
    }

    /// Sniper's aimed shot: fixed speed along the normalized line to `target`
    pub fn sniper_aimed(origin: Vec2, target: Vec2) -> Self {
        let dir = (target - origin).normalize_or_zero();
        // A degenerate aim point falls back to straight down
        let dir = if dir == Vec2::ZERO { Vec2::Y } else { dir };
        Self {
            kind: BulletKind::SniperAimed,
            pos: origin,
            size: Vec2::new(5.0, 12.0),
            speed: 300.0,
            vel: dir * 300.0,
        }
    }

    /// One bullet of the boss's angular spread, `slot` in -2..=2
    pub fn boss_spread(origin: Vec2, slot: i32) -> Self {
        let angle = slot as f32 * 0.3;
        Self {
            kind: BulletKind::BossSpread,
            pos: origin,
            size: Vec2::new(5.0, 8.0),
            speed: 240.0,
            vel: Vec2::new(angle.sin() * 240.0, angle.cos() * 240.0),
        }
    }

    /// Boss's self-correcting homing bullet
    pub fn homing(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::Homing,
            pos: origin,
            size: Vec2::new(6.0, 10.0),
            speed: 120.0,
            vel: Vec2::new(0.0, 120.0),
        }
    }

    /// Bomber's gravity bomb
    pub fn gravity_bomb(origin: Vec2) -> Self {
        Self {
            kind: BulletKind::GravityBomb,
            pos: origin,
            size: Vec2::new(8.0, 8.0),
            speed: 120.0,
            vel: Vec2::new(0.0, 120.0),
        }
    }

    /// Advance one step. Homing bullets steer toward `player_center`.
    pub fn update(&mut self, dt: f32, player_center: Vec2) {
        match self.kind {
            BulletKind::Homing => {
                let to_player = (player_center - self.pos).normalize_or_zero();
                if to_player != Vec2::ZERO {
                    self.vel += to_player * HOMING_ACCEL * dt;
                    let max_speed = self.speed * 2.0;
                    if self.vel.length() > max_speed {
                        self.vel = self.vel.normalize() * max_speed;
                    }
                }
            }
            BulletKind::GravityBomb => {
                self.vel.y += BOMB_GRAVITY * dt;
            }
            _ => {}
        }
        self.pos += self.vel * dt;
    }

    /// Bullets survive until they leave the play bounds by the cull margin
    pub fn in_bounds(&self) -> bool {
        self.pos.x > -OFFSCREEN_MARGIN
            && self.pos.x < PLAY_WIDTH + OFFSCREEN_MARGIN
            && self.pos.y > -OFFSCREEN_MARGIN
            && self.pos.y < PLAY_HEIGHT + OFFSCREEN_MARGIN
    }

    /// Gravity bombs detonate once they fall to ground altitude
    pub fn at_ground(&self) -> bool {
        self.kind == BulletKind::GravityBomb && self.pos.y > PLAY_HEIGHT - BOMB_GROUND_ALTITUDE
    }

    pub fn hit_box(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_bullet_is_linear() {
        let mut b = Bullet::enemy_basic(Vec2::new(100.0, 100.0));
        b.update(0.5, Vec2::ZERO);
        assert_eq!(b.pos, Vec2::new(100.0, 190.0));
        b.update(0.5, Vec2::new(999.0, 999.0));
        // The player's position never influences straight kinds
        assert_eq!(b.pos, Vec2::new(100.0, 280.0));
    }

    #[test]
    fn test_sniper_shot_is_normalized() {
        let b = Bullet::sniper_aimed(Vec2::new(0.0, 0.0), Vec2::new(300.0, 400.0));
        assert!((b.vel.length() - 300.0).abs() < 1e-3);
        assert!((b.vel.x - 180.0).abs() < 1e-3);
        assert!((b.vel.y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_sniper_shot_degenerate_target() {
        let origin = Vec2::new(50.0, 50.0);
        let b = Bullet::sniper_aimed(origin, origin);
        assert_eq!(b.vel, Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_gravity_bomb_accelerates() {
        let mut b = Bullet::gravity_bomb(Vec2::new(400.0, 0.0));
        let v0 = b.vel.y;
        b.update(0.1, Vec2::ZERO);
        let v1 = b.vel.y;
        b.update(0.1, Vec2::ZERO);
        assert!(v1 > v0);
        assert!(b.vel.y > v1);
        assert_eq!(b.vel.x, 0.0);
    }

    #[test]
    fn test_bomb_ground_detonation_threshold() {
        let mut b = Bullet::gravity_bomb(Vec2::new(400.0, 540.0));
        assert!(!b.at_ground());
        b.pos.y = PLAY_HEIGHT - BOMB_GROUND_ALTITUDE + 1.0;
        assert!(b.at_ground());
        // Only bombs detonate; other kinds pass through the threshold
        let low = Bullet::enemy_basic(Vec2::new(400.0, 580.0));
        assert!(!low.at_ground());
    }

    #[test]
    fn test_bounds_margin() {
        let mut b = Bullet::player_shot(Vec2::new(400.0, 10.0));
        assert!(b.in_bounds());
        b.pos.y = -49.0;
        assert!(b.in_bounds());
        b.pos.y = -51.0;
        assert!(!b.in_bounds());
        b.pos = Vec2::new(PLAY_WIDTH + 51.0, 300.0);
        assert!(!b.in_bounds());
    }

    #[test]
    fn test_homing_converges_toward_player() {
        let player = Vec2::new(400.0, 550.0);
        let mut b = Bullet::homing(Vec2::new(100.0, 100.0));
        let initial_dist = b.pos.distance(player);
        for _ in 0..300 {
            b.update(1.0 / 60.0, player);
        }
        assert!(b.pos.distance(player) < initial_dist);
    }

    proptest! {
        /// Homing velocity magnitude never exceeds twice the base speed,
        /// wherever the player sits and however long the bullet flies.
        #[test]
        fn prop_homing_speed_clamped(
            px in 0.0f32..800.0,
            py in 360.0f32..600.0,
            steps in 1usize..600,
        ) {
            let player = Vec2::new(px, py);
            let mut b = Bullet::homing(Vec2::new(400.0, 30.0));
            for _ in 0..steps {
                b.update(1.0 / 60.0, player);
                prop_assert!(b.vel.length() <= b.speed * 2.0 + 1e-3);
            }
        }
    }
}
