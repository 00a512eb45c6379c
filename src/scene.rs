//! CPU side of the demo: simulation state, particle pool and RNG, advanced
//! together once per frame.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::frame::{FrameInput, FrameReport, SimulationState};
use crate::integrate;
use crate::particle::ParticlePool;

/// Result of [`Scene::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStep {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// State machine outcome.
    pub report: FrameReport,
    /// Particles that fell out of the window this frame.
    pub retired: usize,
}

pub struct Scene {
    state: SimulationState,
    pool: ParticlePool,
    rng: StdRng,
}

impl Scene {
    /// Create a scene. `seed` fixes the splash RNG; `None` seeds from the OS.
    pub fn new(water_level: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: SimulationState::new(water_level),
            pool: ParticlePool::new(),
            rng,
        }
    }

    /// Advance one frame stamped `now` seconds: run the state machine (which
    /// may spawn splashes), then integrate every active particle.
    pub fn step(&mut self, now: f32, input: &FrameInput) -> FrameStep {
        let dt = self.state.tick(now);
        let report = self.state.update(input, dt, &mut self.pool, &mut self.rng);
        let retired = integrate::step(&mut self.pool, dt);
        self.state.end_frame();

        FrameStep {
            dt,
            report,
            retired,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }
}
