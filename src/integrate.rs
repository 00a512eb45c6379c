//! Per-frame particle integration.
//!
//! For each active slot, in this order:
//!
//! 1. gravity: `velocity.y -= GRAVITY_IMPULSE`
//! 2. move: `position += velocity * dt`
//! 3. walls: if `|position.x| >= WALL_X`, reflect `velocity.x`
//! 4. floor: if `position.y < FLOOR_Y`, deactivate
//!
//! The gravity impulse is applied once per frame and is not scaled by `dt`,
//! so particles fall faster at higher frame rates. The walls reflect velocity
//! without clamping position; a particle may overshoot for one frame before
//! heading back.

use crate::particle::ParticlePool;

/// Downward velocity change applied every frame, independent of `dt`.
pub const GRAVITY_IMPULSE: f32 = 0.01;
/// Horizontal distance from center at which particles bounce.
pub const WALL_X: f32 = 0.99;
/// Particles below this height are retired.
pub const FLOOR_Y: f32 = -1.0;

/// Advance every active particle by `dt` seconds.
///
/// Returns the number of particles retired this step.
pub fn step(pool: &mut ParticlePool, dt: f32) -> usize {
    let mut retired = 0;
    let mut active = 0;

    for p in pool.slots_mut().iter_mut().filter(|p| p.active) {
        p.velocity.y -= GRAVITY_IMPULSE;
        p.position += p.velocity * dt;

        if p.position.x.abs() >= WALL_X {
            p.velocity.x = -p.velocity.x;
        }

        if p.position.y < FLOOR_Y {
            p.active = false;
            retired += 1;
        } else {
            active += 1;
        }
    }

    pool.set_active_count(active);
    retired
}
