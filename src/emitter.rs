//! Splash emission into the particle pool.
//!
//! Two bursts exist, both spawned at the cursor:
//!
//! | Splash | Trigger | Count | Velocity x | Velocity y |
//! |--------|---------|-------|------------|------------|
//! | [`Splash::Click`] | click while wet (rising edge) | 100 | U(-4, 4) | 0.3 + U(-1, 1) |
//! | [`Splash::Submersion`] | cursor dips below the water line (rising edge) | 20 | U(-1, 1) | U(0, 2) |
//!
//! A burst claims the lowest free slots in ascending order. If the pool runs
//! out, the rest of the burst is dropped: there is no backlog and no error.
//! Edge detection lives in the frame driver; the functions here fire
//! unconditionally.

use glam::Vec2;
use rand::Rng;

use crate::particle::ParticlePool;

/// Particles spawned by a click-splash.
pub const CLICK_SPLASH_COUNT: usize = 100;
/// Particles spawned by a submersion-splash.
pub const SUBMERSION_SPLASH_COUNT: usize = 20;

/// The two kinds of splash burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Splash {
    /// Wrung out of a wet sponge by a click. Wide horizontal spray.
    Click,
    /// Kicked up when the sponge is dunked. Narrow, upward.
    Submersion,
}

impl Splash {
    /// Number of particles this burst requests.
    pub const fn count(self) -> usize {
        match self {
            Splash::Click => CLICK_SPLASH_COUNT,
            Splash::Submersion => SUBMERSION_SPLASH_COUNT,
        }
    }

    /// Draw an initial velocity. Each axis is an independent uniform draw.
    pub fn sample_velocity<R: Rng + ?Sized>(self, rng: &mut R) -> Vec2 {
        match self {
            Splash::Click => Vec2::new(
                rng.gen_range(-4.0..4.0),
                0.3 + rng.gen_range(-1.0..1.0),
            ),
            Splash::Submersion => Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(0.0..2.0)),
        }
    }
}

/// Spawn one `splash` burst at `origin`.
///
/// Returns the number of particles actually activated, which is less than
/// [`Splash::count`] only when the pool ran out of free slots.
pub fn emit<R: Rng + ?Sized>(
    pool: &mut ParticlePool,
    splash: Splash,
    origin: Vec2,
    rng: &mut R,
) -> usize {
    burst(pool, splash.count(), origin, |rng| splash.sample_velocity(rng), rng)
}

/// Activate up to `count` free slots at `origin`, lowest index first.
///
/// `velocity` is called once per spawned particle.
pub fn burst<R, F>(
    pool: &mut ParticlePool,
    count: usize,
    origin: Vec2,
    mut velocity: F,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Vec2,
{
    let mut spawned = 0;
    let mut cursor = 0;
    while spawned < count {
        // Slots below `cursor` were free-checked already, resume after the last claim
        let Some(index) = pool.find_free_slot_from(cursor) else {
            break;
        };
        pool.activate(index, origin, velocity(rng));
        spawned += 1;
        cursor = index + 1;
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::MAX_PARTICLES;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn click_velocity_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = Splash::Click.sample_velocity(&mut rng);
            assert!((-4.0..4.0).contains(&v.x));
            assert!((-0.7..1.3).contains(&v.y));
        }
    }

    #[test]
    fn submersion_velocity_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = Splash::Submersion.sample_velocity(&mut rng);
            assert!((-1.0..1.0).contains(&v.x));
            assert!((0.0..2.0).contains(&v.y));
        }
    }

    #[test]
    fn burst_claims_lowest_free_slots() {
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(1);
        // Occupy everything below 12 except 2, 5 and 9
        for i in 0..12 {
            if ![2, 5, 9].contains(&i) {
                pool.activate(i, Vec2::ZERO, Vec2::ZERO);
            }
        }

        let spawned = burst(&mut pool, 4, Vec2::new(0.25, -0.5), |_| Vec2::X, &mut rng);
        assert_eq!(spawned, 4);
        for i in [2, 5, 9, 12] {
            let p = pool.get(i).expect("slot should be active");
            assert_eq!(p.position, Vec2::new(0.25, -0.5));
            assert_eq!(p.velocity, Vec2::X);
        }
        assert!(!pool.is_active(13));
    }

    #[test]
    fn emit_truncates_when_pool_is_nearly_full() {
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..MAX_PARTICLES - 7 {
            pool.activate(i, Vec2::ZERO, Vec2::ZERO);
        }

        let spawned = emit(&mut pool, Splash::Submersion, Vec2::ZERO, &mut rng);
        assert_eq!(spawned, 7);
        assert_eq!(pool.active_count(), MAX_PARTICLES);

        let spawned = emit(&mut pool, Splash::Click, Vec2::ZERO, &mut rng);
        assert_eq!(spawned, 0);
    }
}
