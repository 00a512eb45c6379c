//! Per-frame driver state: timestep, water level, and the wet/submersion
//! edge detection that decides when splashes fire.
//!
//! Within a frame the order is fixed:
//!
//! 1. water level follows the Up/Down keys
//! 2. click handling: a click that starts while wet fires a click-splash, and
//!    any held click wrings the sponge dry
//! 3. submersion handling: dipping below the water line fires a
//!    submersion-splash, and staying below keeps the sponge wet
//!
//! A click made while the cursor is under water therefore leaves the sponge
//! wet again by the end of the same frame.

use glam::Vec2;
use rand::Rng;

use crate::emitter::{self, Splash};
use crate::particle::ParticlePool;

/// Water level change per second while Up or Down is held.
pub const WATER_STEP: f32 = 0.25;
/// Water level at startup, as a fraction of the window height.
pub const INITIAL_WATER_LEVEL: f32 = 0.5;

/// Convert a cursor position in window pixels to viewport space.
///
/// X maps `[0, width]` to `[-1, 1]`, Y maps `[0, height]` to `[1, -1]`.
/// A zero-sized window maps everything to the origin.
pub fn to_viewport(cursor: Vec2, width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        cursor.x / width as f32 * 2.0 - 1.0,
        cursor.y / height as f32 * -2.0 + 1.0,
    )
}

/// What the frame driver needs from the input devices for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Cursor in viewport space.
    pub cursor: Vec2,
    /// Left mouse button is down.
    pub clicking: bool,
    /// Up key is held.
    pub raise_water: bool,
    /// Down key is held.
    pub lower_water: bool,
}

/// Outcome of one frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The button is down, so the sponge is drawn squished.
    pub squished: bool,
    /// Sponge is wet after this frame.
    pub wet: bool,
    /// Particles spawned by a click-splash this frame, if one fired.
    pub click_splash: Option<usize>,
    /// Particles spawned by a submersion-splash this frame, if one fired.
    pub submersion_splash: Option<usize>,
}

/// Mutable frame-to-frame state of the demo.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    /// Water surface height in `[0, 1]`, 0 = bottom of the window.
    pub water_level: f32,
    /// Sponge has soaked up water and can be wrung out.
    pub is_wet: bool,
    /// Left button was down last frame.
    pub was_clicking: bool,
    /// Cursor was below the water line last frame.
    pub cursor_was_under_water: bool,
    /// Timestamp of the previous frame, in seconds.
    pub last_time: f32,
    /// Timestamp of the current frame, in seconds.
    pub cur_time: f32,
}

impl SimulationState {
    pub fn new(water_level: f32) -> Self {
        Self {
            water_level: water_level.clamp(0.0, 1.0),
            is_wet: false,
            was_clicking: false,
            cursor_was_under_water: false,
            last_time: 0.0,
            cur_time: 0.0,
        }
    }

    /// Record the timestamp of a new frame and return the seconds since the
    /// previous one.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.cur_time = now;
        (self.cur_time - self.last_time).max(0.0)
    }

    /// Close the frame opened by [`tick`](Self::tick).
    pub fn end_frame(&mut self) {
        self.last_time = self.cur_time;
    }

    /// Water line height in viewport space.
    pub fn water_line(&self) -> f32 {
        self.water_level * 2.0 - 1.0
    }

    /// Whether a viewport-space point is under the water.
    pub fn is_submerged(&self, point: Vec2) -> bool {
        point.y < self.water_line()
    }

    /// Move the water level for held keys, clamped to `[0, 1]`.
    pub fn adjust_water(&mut self, input: &FrameInput, dt: f32) {
        if input.raise_water {
            self.water_level = (self.water_level + WATER_STEP * dt).min(1.0);
        }
        if input.lower_water {
            self.water_level = (self.water_level - WATER_STEP * dt).max(0.0);
        }
    }

    /// Run the frame's state machine, spawning splashes into `pool` on
    /// rising edges.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        input: &FrameInput,
        dt: f32,
        pool: &mut ParticlePool,
        rng: &mut R,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        self.adjust_water(input, dt);

        if input.clicking {
            report.squished = true;
            if !self.was_clicking && self.is_wet {
                let spawned = emitter::emit(pool, Splash::Click, input.cursor, rng);
                log::debug!("click splash: {spawned} particles");
                report.click_splash = Some(spawned);
            }
            self.is_wet = false;
            self.was_clicking = true;
        } else {
            self.was_clicking = false;
        }

        if self.is_submerged(input.cursor) {
            if !self.cursor_was_under_water {
                let spawned = emitter::emit(pool, Splash::Submersion, input.cursor, rng);
                log::debug!("submersion splash: {spawned} particles");
                report.submersion_splash = Some(spawned);
            }
            self.is_wet = true;
            self.cursor_was_under_water = true;
        } else {
            self.cursor_was_under_water = false;
        }

        report.wet = self.is_wet;
        report
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(INITIAL_WATER_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ABOVE: Vec2 = Vec2::new(0.0, 0.5);
    const BELOW: Vec2 = Vec2::new(0.0, -0.5);

    fn frame(cursor: Vec2, clicking: bool) -> FrameInput {
        FrameInput {
            cursor,
            clicking,
            ..Default::default()
        }
    }

    #[test]
    fn viewport_transform() {
        assert_eq!(to_viewport(Vec2::new(0.0, 0.0), 800, 600), Vec2::new(-1.0, 1.0));
        assert_eq!(to_viewport(Vec2::new(800.0, 600.0), 800, 600), Vec2::new(1.0, -1.0));
        assert_eq!(to_viewport(Vec2::new(400.0, 300.0), 800, 600), Vec2::ZERO);
        // Outside the window goes past the unit square
        assert!(to_viewport(Vec2::new(1200.0, 0.0), 800, 600).x > 1.0);
        assert_eq!(to_viewport(Vec2::new(5.0, 5.0), 0, 600), Vec2::ZERO);
    }

    #[test]
    fn tick_measures_between_frames() {
        let mut state = SimulationState::default();
        assert_eq!(state.tick(0.5), 0.5);
        // Without end_frame, the previous timestamp stays put
        assert_eq!(state.tick(0.75), 0.75);
        state.end_frame();
        assert_eq!(state.tick(1.0), 0.25);
    }

    #[test]
    fn water_level_clamps() {
        let mut state = SimulationState::new(0.9);
        let up = FrameInput {
            raise_water: true,
            ..Default::default()
        };
        state.adjust_water(&up, 1.0);
        assert_eq!(state.water_level, 1.0);

        let down = FrameInput {
            lower_water: true,
            ..Default::default()
        };
        for _ in 0..10 {
            state.adjust_water(&down, 1.0);
        }
        assert_eq!(state.water_level, 0.0);
        assert_eq!(state.water_line(), -1.0);
    }

    #[test]
    fn initial_level_is_clamped() {
        assert_eq!(SimulationState::new(3.0).water_level, 1.0);
        assert_eq!(SimulationState::new(-1.0).water_level, 0.0);
    }

    #[test]
    fn dunking_wets_and_splashes_once() {
        let mut state = SimulationState::default();
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(11);

        let report = state.update(&frame(BELOW, false), 0.016, &mut pool, &mut rng);
        assert_eq!(report.submersion_splash, Some(20));
        assert!(report.wet);
        // Spawned at the cursor, integration has not run yet
        assert!(pool.iter_active().all(|(_, p)| p.position == BELOW));

        let report = state.update(&frame(BELOW, false), 0.016, &mut pool, &mut rng);
        assert_eq!(report.submersion_splash, None);
        assert_eq!(pool.active_count(), 20);

        // Surface and dip again
        state.update(&frame(ABOVE, false), 0.016, &mut pool, &mut rng);
        let report = state.update(&frame(BELOW, false), 0.016, &mut pool, &mut rng);
        assert_eq!(report.submersion_splash, Some(20));
    }

    #[test]
    fn click_consumes_wetness() {
        let mut state = SimulationState::default();
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(5);

        state.update(&frame(BELOW, false), 0.016, &mut pool, &mut rng);
        state.update(&frame(ABOVE, false), 0.016, &mut pool, &mut rng);
        assert!(state.is_wet);

        let report = state.update(&frame(ABOVE, true), 0.016, &mut pool, &mut rng);
        assert!(report.squished);
        assert_eq!(report.click_splash, Some(100));
        assert!(!report.wet);

        // Release and click again while dry: nothing
        state.update(&frame(ABOVE, false), 0.016, &mut pool, &mut rng);
        let report = state.update(&frame(ABOVE, true), 0.016, &mut pool, &mut rng);
        assert_eq!(report.click_splash, None);
    }

    #[test]
    fn clicking_under_water_stays_wet() {
        let mut state = SimulationState::default();
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(5);

        state.update(&frame(BELOW, false), 0.016, &mut pool, &mut rng);
        let report = state.update(&frame(BELOW, true), 0.016, &mut pool, &mut rng);
        assert_eq!(report.click_splash, Some(100));
        assert!(report.wet);
    }

    #[test]
    fn dry_sponge_never_click_splashes() {
        let mut state = SimulationState::default();
        let mut pool = ParticlePool::new();
        let mut rng = StdRng::seed_from_u64(5);

        let report = state.update(&frame(ABOVE, true), 0.016, &mut pool, &mut rng);
        assert!(report.squished);
        assert_eq!(report.click_splash, None);
        assert_eq!(pool.active_count(), 0);
    }
}
