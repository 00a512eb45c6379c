//! # Sponge
//!
//! A small interactive splash demo. A textured sponge follows the cursor over a
//! pool of animated water; dunking it soaks it, clicking a wet sponge squeezes
//! out a burst of droplets that arc under gravity and bounce off the walls.
//!
//! ## Quick Start
//!
//! ```ignore
//! fn main() -> Result<(), sponge::DemoError> {
//!     sponge::Demo::new()
//!         .with_water_level(0.4)
//!         .run()
//! }
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Mouse | Move the sponge |
//! | Left button | Squeeze (splashes if wet) |
//! | Up / Down | Raise / lower the water |
//! | Escape | Quit |
//!
//! ## Layout
//!
//! The particle core is plain CPU code with no GPU types in it:
//!
//! - [`particle`]: the fixed 999-slot pool.
//! - [`emitter`]: splash bursts into free slots.
//! - [`integrate`]: gravity, motion, wall bounce and expiry.
//! - [`frame`]: the wet/submersion state machine run once per frame.
//! - [`bridge`]: packs positions into a write mapping and issues one draw per
//!   active slot.
//!
//! [`Scene`] ties those together. The wgpu renderer and winit event loop sit
//! behind [`Demo`].
//!
//! ## Coordinates
//!
//! Everything in the core lives in viewport space: x and y in `[-1, 1]`, y up.
//! Cursor pixels are converted with [`frame::to_viewport`].

mod app;
pub mod bridge;
pub mod emitter;
pub mod error;
pub mod frame;
mod gpu;
pub mod input;
pub mod integrate;
pub mod particle;
pub mod scene;
pub mod sponge;
pub mod textures;
pub mod time;

pub use app::{Demo, DemoConfig};
pub use bridge::RenderBridge;
pub use emitter::Splash;
pub use error::{DemoError, GpuError, TextureError};
pub use frame::{FrameInput, FrameReport, SimulationState};
pub use glam::Vec2;
pub use particle::{Particle, ParticlePool, MAX_PARTICLES};
pub use scene::Scene;

/// Convenient re-exports for driving the core directly.
pub mod prelude {
    pub use crate::bridge::{PointDraw, PositionTarget, RenderBridge, Uploaded};
    pub use crate::emitter::{burst, emit, Splash};
    pub use crate::frame::{FrameInput, FrameReport, SimulationState};
    pub use crate::input::{Input, KeyCode};
    pub use crate::integrate;
    pub use crate::particle::{GpuPosition, Particle, ParticlePool, MAX_PARTICLES};
    pub use crate::scene::Scene;
    pub use crate::textures::{FilterMode, TextureConfig};
    pub use crate::time::Time;
    pub use crate::{Demo, DemoConfig, Vec2};
}
