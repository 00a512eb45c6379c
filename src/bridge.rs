//! Moves simulation state to the GPU once per frame.
//!
//! A frame is synced in two steps:
//!
//! 1. [`RenderBridge::upload`] packs one `(x, y)` pair per slot, in slot order
//!    and including stale inactive slots, and writes all of them through an
//!    exclusive write mapping of the position buffer. The mapping is a guard
//!    that is dropped before `upload` returns.
//! 2. [`RenderBridge::submit`] issues one point draw per active slot at that
//!    slot's offset. It takes the [`Uploaded`] receipt returned by step 1, so
//!    draws cannot be recorded while the buffer is still mapped.
//!
//! The GPU side implements [`PositionTarget`] and [`PointDraw`]; tests use
//! recording fakes.

use std::ops::DerefMut;

use crate::particle::{GpuPosition, ParticlePool, MAX_PARTICLES};

/// Window width at which particles are drawn at [`BASE_POINT_SIZE`].
pub const REFERENCE_WIDTH: u32 = 800;
/// Point size in pixels at [`REFERENCE_WIDTH`].
pub const BASE_POINT_SIZE: u32 = 5;

/// Size in bytes of the position buffer.
pub const POSITION_BUFFER_SIZE: u64 = (MAX_PARTICLES * std::mem::size_of::<GpuPosition>()) as u64;

/// Point size for a viewport `width` pixels wide.
///
/// Uses integer division, so anything narrower than [`REFERENCE_WIDTH`] gets
/// a size of zero and sizes only grow in whole multiples of the reference.
pub fn point_size(width: u32) -> u32 {
    width / REFERENCE_WIDTH * BASE_POINT_SIZE
}

/// Point size for a surface `physical_width` pixels wide.
///
/// The reference width is in logical pixels, so the physical width is
/// divided by the window's scale factor first. A non-positive or non-finite
/// factor is treated as 1.
pub fn scaled_point_size(physical_width: u32, scale_factor: f64) -> u32 {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    point_size((physical_width as f64 / scale) as u32)
}

/// A GPU buffer that can be mapped for writing.
pub trait PositionTarget {
    /// Write access to the mapped bytes. Dropping it releases the mapping.
    type Mapping<'a>: DerefMut<Target = [u8]>
    where
        Self: 'a;

    /// Acquire an exclusive write mapping of the whole buffer, or `None` if
    /// the buffer could not be mapped.
    fn map_write(&mut self) -> Option<Self::Mapping<'_>>;
}

/// Something that records point draws.
pub trait PointDraw {
    /// Draw the single point stored at `slot` in the position buffer.
    fn draw_point(&mut self, slot: u32);
}

/// Proof that this frame's positions were written and the mapping released.
#[derive(Debug)]
#[must_use = "pass the receipt to RenderBridge::submit"]
pub struct Uploaded {
    slots: usize,
}

impl Uploaded {
    /// Number of slots written.
    pub fn slots(&self) -> usize {
        self.slots
    }
}

/// Staging area and draw logic for the particle position buffer.
pub struct RenderBridge {
    staging: Vec<GpuPosition>,
}

impl RenderBridge {
    pub fn new() -> Self {
        Self {
            staging: vec![GpuPosition::default(); MAX_PARTICLES],
        }
    }

    /// Pack every slot's position in index order.
    ///
    /// Inactive slots carry whatever stale position they last had.
    pub fn pack(&mut self, pool: &ParticlePool) -> &[GpuPosition] {
        for (dst, position) in self.staging.iter_mut().zip(pool.positions()) {
            *dst = GpuPosition::from(position);
        }
        &self.staging
    }

    /// Write all slot positions into `target`.
    ///
    /// Returns `None` when the target refused the mapping; nothing should be
    /// drawn from the buffer this frame in that case.
    pub fn upload<T>(&mut self, pool: &ParticlePool, target: &mut T) -> Option<Uploaded>
    where
        T: PositionTarget + ?Sized,
    {
        let bytes: &[u8] = bytemuck::cast_slice(self.pack(pool));
        {
            let Some(mut mapping) = target.map_write() else {
                log::warn!("particle buffer could not be mapped, skipping frame");
                return None;
            };
            // Write-only: reading a wgpu staging view through Deref warns
            let dst: &mut [u8] = &mut mapping;
            let len = bytes.len().min(dst.len());
            dst[..len].copy_from_slice(&bytes[..len]);
        }
        Some(Uploaded {
            slots: self.staging.len(),
        })
    }

    /// Issue one point draw per active slot, in ascending slot order.
    ///
    /// Returns the number of draws issued.
    pub fn submit<D>(&self, pool: &ParticlePool, _uploaded: &Uploaded, draw: &mut D) -> usize
    where
        D: PointDraw + ?Sized,
    {
        let mut issued = 0;
        for index in pool.active_indices() {
            draw.draw_point(index as u32);
            issued += 1;
        }
        issued
    }
}

impl Default for RenderBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    struct VecTarget(Vec<u8>);

    impl PositionTarget for VecTarget {
        type Mapping<'a> = &'a mut [u8];

        fn map_write(&mut self) -> Option<Self::Mapping<'_>> {
            Some(&mut self.0[..])
        }
    }

    struct Refusing;

    impl PositionTarget for Refusing {
        type Mapping<'a> = &'a mut [u8];

        fn map_write(&mut self) -> Option<Self::Mapping<'_>> {
            None
        }
    }

    #[test]
    fn point_size_truncates() {
        assert_eq!(point_size(0), 0);
        assert_eq!(point_size(799), 0);
        assert_eq!(point_size(800), 5);
        assert_eq!(point_size(1599), 5);
        assert_eq!(point_size(1600), 10);
    }

    #[test]
    fn point_size_uses_logical_width() {
        assert_eq!(scaled_point_size(1600, 1.0), 10);
        assert_eq!(scaled_point_size(1600, 2.0), 5);
        assert_eq!(scaled_point_size(1500, 2.0), 0);
        assert_eq!(scaled_point_size(800, 0.0), 5);
        assert_eq!(scaled_point_size(800, f64::NAN), 5);
    }

    /// Mapping that counts reads through `Deref`.
    struct CountingMapping<'a> {
        bytes: Vec<u8>,
        reads: &'a std::cell::Cell<usize>,
    }

    impl std::ops::Deref for CountingMapping<'_> {
        type Target = [u8];

        fn deref(&self) -> &[u8] {
            self.reads.set(self.reads.get() + 1);
            &self.bytes
        }
    }

    impl DerefMut for CountingMapping<'_> {
        fn deref_mut(&mut self) -> &mut [u8] {
            &mut self.bytes
        }
    }

    struct CountingTarget<'a> {
        reads: &'a std::cell::Cell<usize>,
    }

    impl<'r> PositionTarget for CountingTarget<'r> {
        type Mapping<'a> = CountingMapping<'r> where Self: 'a;

        fn map_write(&mut self) -> Option<Self::Mapping<'_>> {
            Some(CountingMapping {
                bytes: vec![0; POSITION_BUFFER_SIZE as usize],
                reads: self.reads,
            })
        }
    }

    #[test]
    fn upload_never_reads_the_mapping() {
        let reads = std::cell::Cell::new(0);
        let mut target = CountingTarget { reads: &reads };
        let mut bridge = RenderBridge::new();

        let mut pool = ParticlePool::new();
        assert!(bridge.upload(&pool, &mut target).is_some());
        pool.activate(4, Vec2::new(0.5, 0.5), Vec2::ZERO);
        assert!(bridge.upload(&pool, &mut target).is_some());

        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn upload_writes_every_slot() {
        let mut pool = ParticlePool::new();
        pool.activate(1, Vec2::new(0.25, -0.75), Vec2::ZERO);

        let mut target = VecTarget(vec![0xAA; POSITION_BUFFER_SIZE as usize]);
        let mut bridge = RenderBridge::new();
        let uploaded = bridge.upload(&pool, &mut target).unwrap();
        assert_eq!(uploaded.slots(), MAX_PARTICLES);

        let written: Vec<GpuPosition> = target
            .0
            .chunks_exact(std::mem::size_of::<GpuPosition>())
            .map(bytemuck::pod_read_unaligned)
            .collect();
        assert_eq!(written.len(), MAX_PARTICLES);
        assert_eq!(written[0].xy, [0.0, 0.0]);
        assert_eq!(written[1].xy, [0.25, -0.75]);
    }

    #[test]
    fn refused_mapping_yields_no_receipt() {
        let pool = ParticlePool::new();
        let mut bridge = RenderBridge::new();
        assert!(bridge.upload(&pool, &mut Refusing).is_none());
    }
}
