//! The sponge cube and the full-screen water quad: static geometry and the
//! per-frame sponge transform.

use glam::{Mat4, Vec2, Vec3};

use crate::frame::FrameReport;

/// Distance of the sponge in front of the camera.
pub const SPONGE_DEPTH: f32 = -2.5;
/// Base scale applied to the unit cube.
pub const SPONGE_SCALE: f32 = 0.35;
/// Extra scale while the button is held.
pub const SQUISH_SCALE: Vec3 = Vec3::new(1.25, 0.6, 0.8);
/// Extra scale while wet.
pub const WET_SCALE: f32 = 1.1;
/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Unit cube corners.
#[rustfmt::skip]
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [ 0.5, -0.5, -0.5],
    [ 0.5,  0.5, -0.5],
    [-0.5,  0.5, -0.5],
    [-0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5],
    [ 0.5,  0.5,  0.5],
    [-0.5,  0.5,  0.5],
];

/// Counter-clockwise triangles for the six cube faces.
#[rustfmt::skip]
pub const CUBE_INDICES: [u32; 36] = [
    // back
    1, 0, 3,  3, 2, 1,
    // front
    4, 5, 6,  6, 7, 4,
    // left
    7, 3, 0,  0, 4, 7,
    // right
    1, 2, 6,  6, 5, 1,
    // bottom
    0, 1, 5,  5, 4, 0,
    // top
    6, 2, 3,  3, 7, 6,
];

/// Two triangles covering the viewport.
#[rustfmt::skip]
pub const SCREEN_QUAD: [[f32; 2]; 6] = [
    [ 1.0, -1.0],
    [-1.0,  1.0],
    [-1.0, -1.0],

    [-1.0,  1.0],
    [ 1.0, -1.0],
    [ 1.0,  1.0],
];

/// Model, view and projection for drawing the sponge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpongePose {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl SpongePose {
    /// Pose the sponge under `cursor` (viewport space) for a viewport of the
    /// given pixel size.
    pub fn new(cursor: Vec2, width: u32, height: u32, report: &FrameReport) -> Self {
        let aspect = aspect_ratio(width, height);
        Self {
            model: model_matrix(cursor, aspect, report.squished, report.wet),
            view: Mat4::IDENTITY,
            projection: Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR),
        }
    }
}

/// Width over height, falling back to 1 for a degenerate viewport.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Sponge model matrix.
///
/// The field of view is vertical, so the horizontal offset is stretched by
/// the aspect ratio to keep the sponge's center under the cursor.
pub fn model_matrix(cursor: Vec2, aspect: f32, squished: bool, wet: bool) -> Mat4 {
    let mut model = Mat4::from_translation(Vec3::new(cursor.x * aspect, cursor.y, SPONGE_DEPTH))
        * Mat4::from_scale(Vec3::splat(SPONGE_SCALE));
    if squished {
        model *= Mat4::from_scale(SQUISH_SCALE);
    }
    if wet {
        model *= Mat4::from_scale(Vec3::splat(WET_SCALE));
    }
    model
}
