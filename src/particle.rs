//! Fixed-capacity particle store.
//!
//! The pool is an arena of [`MAX_PARTICLES`] slots addressed by index. A slot
//! is either active (simulated and drawn) or inactive (its data is stale and
//! must not be read). Slots are never removed or moved, so an index stays a
//! valid handle to the same slot for the lifetime of the pool. Reuse happens
//! implicitly through the `active` flag.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Number of slots in the particle pool.
pub const MAX_PARTICLES: usize = 999;

/// CPU-side particle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in viewport space, nominally `[-1, 1]` on each axis.
    pub position: Vec2,
    /// Velocity in viewport units per second.
    pub velocity: Vec2,
    /// Whether the slot currently participates in simulation and drawing.
    pub active: bool,
}

impl Particle {
    /// An inactive slot with zeroed state.
    pub const fn inactive() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            active: false,
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::inactive()
    }
}

/// GPU vertex data for one slot - matches `@location(0) vec2<f32>` in
/// `particle.wgsl`. 8 bytes, tightly packed.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuPosition {
    pub xy: [f32; 2],
}

impl From<Vec2> for GpuPosition {
    fn from(position: Vec2) -> Self {
        Self {
            xy: position.to_array(),
        }
    }
}

/// Fixed-size pool of particle slots.
///
/// All storage is allocated in [`ParticlePool::new`]; nothing afterwards
/// allocates.
pub struct ParticlePool {
    slots: Box<[Particle]>,
    active_count: usize,
}

impl ParticlePool {
    /// Create a pool of [`MAX_PARTICLES`] inactive slots.
    pub fn new() -> Self {
        Self {
            slots: vec![Particle::inactive(); MAX_PARTICLES].into_boxed_slice(),
            active_count: 0,
        }
    }

    /// Total number of slots. Always [`MAX_PARTICLES`].
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently active.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Lowest index whose slot is inactive, or `None` if the pool is saturated.
    pub fn find_free_slot(&self) -> Option<usize> {
        self.find_free_slot_from(0)
    }

    /// Lowest inactive index at or after `start`.
    pub(crate) fn find_free_slot_from(&self, start: usize) -> Option<usize> {
        if self.active_count >= self.slots.len() {
            return None;
        }
        self.slots
            .iter()
            .skip(start)
            .position(|p| !p.active)
            .map(|offset| start + offset)
    }

    /// Mark slot `index` active with the given initial state.
    ///
    /// Activating an already active slot overwrites its state without
    /// changing the active count.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub fn activate(&mut self, index: usize, position: Vec2, velocity: Vec2) {
        let slot = &mut self.slots[index];
        if !slot.active {
            self.active_count += 1;
        }
        *slot = Particle {
            position,
            velocity,
            active: true,
        };
    }

    /// Clear the active flag of slot `index`. Position and velocity are left
    /// untouched and become stale.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub fn deactivate(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.active {
            slot.active = false;
            self.active_count -= 1;
        }
    }

    /// Deactivate every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.active = false;
        }
        self.active_count = 0;
    }

    /// Whether slot `index` is active. Out-of-range indices are inactive.
    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|p| p.active)
    }

    /// The particle in slot `index`, only if it is active.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index).filter(|p| p.active)
    }

    /// Iterate `(index, particle)` over active slots in ascending index order.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Particle)> + '_ {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    /// Indices of active slots in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter_active().map(|(i, _)| i)
    }

    /// Position of every slot in index order, stale ones included.
    ///
    /// Only meant for packing the fixed-size GPU buffer.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.slots.iter().map(|p| p.position)
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[Particle] {
        &self.slots
    }

    /// Every slot mutably, for the integrator.
    pub(crate) fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.slots
    }

    /// Recount after a bulk pass that flipped active flags in place.
    pub(crate) fn set_active_count(&mut self, count: usize) {
        debug_assert!(count <= self.slots.len());
        self.active_count = count;
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}
