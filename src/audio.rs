//! Audio cue vocabulary
//!
//! The sim never plays sound. It enqueues cues as it steps; the playback
//! collaborator drains them via `GameState::drain_cues` and maps each to a
//! sound. Fire-and-forget: no return values, no ordering guarantees within
//! a frame.

/// Named audio event triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player fired a shot
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player lost a life
    PlayerHit,
    /// Wave cleared
    LevelComplete,
    /// Run ended
    GameOver,
    /// New wave inbound
    WaveSpawn,
    /// A boss was forced into the wave
    BossSpawn,
    /// Heavy enemy raised its shield
    ShieldActivate,
    /// Boss launched a homing bullet
    HomingLock,
    /// Bomber released a gravity bomb
    BombDrop,
    /// Gravity bomb detonated
    BombExplosion,
    /// Sniper began its aiming telegraph
    SniperCharge,
    /// Sniper fired its aimed shot
    SniperShoot,
}
