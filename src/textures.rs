//! Sponge texture loading.
//!
//! The sponge is drawn with a cube map whose six faces share one image. The
//! image is flipped vertically on load so row 0 is the bottom row. If the file
//! can't be decoded the demo keeps running with a flat sponge-colored texture.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::Path;

use crate::error::TextureError;

/// Default sponge texture file, relative to the working directory.
pub const DEFAULT_TEXTURE_PATH: &str = "SpongeTextureEdges.png";

/// Color used when the sponge texture can't be loaded.
pub const FALLBACK_COLOR: [u8; 4] = [230, 200, 70, 255];

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Decoded RGBA pixels for one cube map face.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
}

impl TextureConfig {
    /// Create a texture configuration from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
        }
    }

    /// Load and vertically flip an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| TextureError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .flipv()
            .into_rgba8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::from_rgba(img.into_raw(), width, height))
    }

    /// Load an image file, or log the failure and fall back to a solid color.
    pub fn load_or_fallback<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(tex) => {
                log::info!(
                    "loaded texture '{}' ({}x{})",
                    path.as_ref().display(),
                    tex.width,
                    tex.height
                );
                tex
            }
            Err(e) => {
                log::error!("{e}; using a flat fallback texture");
                let [r, g, b, a] = FALLBACK_COLOR;
                Self::solid(r, g, b, a)
            }
        }
    }

    /// Create a solid color texture (1x1 pixel).
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            filter: FilterMode::Nearest,
        }
    }

    /// Cube map faces must be square. Resample to the shorter side if needed.
    pub fn into_square(self) -> Self {
        if self.width == self.height {
            return self;
        }
        let side = self.width.min(self.height);
        let Some(img) = image::RgbaImage::from_raw(self.width, self.height, self.data) else {
            // from_rgba/from_file guarantee the buffer length
            let [r, g, b, a] = FALLBACK_COLOR;
            return Self::solid(r, g, b, a);
        };
        log::warn!(
            "sponge texture is {}x{}, resampling to {side}x{side}",
            self.width,
            self.height
        );
        let resized = image::imageops::resize(&img, side, side, image::imageops::FilterType::Triangle);
        Self {
            data: resized.into_raw(),
            width: side,
            height: side,
            filter: self.filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_is_one_pixel() {
        let tex = TextureConfig::solid(1, 2, 3, 4);
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(tex.data, vec![1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "RGBA data size mismatch")]
    fn from_rgba_checks_size() {
        TextureConfig::from_rgba(vec![0; 3], 1, 1);
    }

    #[test]
    fn into_square_resamples() {
        let tex = TextureConfig::from_rgba(vec![255; 4 * 4 * 2], 4, 2).into_square();
        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.data.len(), 2 * 2 * 4);

        let square = TextureConfig::solid(0, 0, 0, 255).into_square();
        assert_eq!((square.width, square.height), (1, 1));
    }

    #[test]
    fn missing_file_falls_back() {
        let err = TextureConfig::from_file("does/not/exist.png").unwrap_err();
        assert!(matches!(err, TextureError::ImageLoad { .. }));

        let tex = TextureConfig::load_or_fallback("does/not/exist.png");
        assert_eq!(tex.data, FALLBACK_COLOR.to_vec());
    }

    #[test]
    fn from_file_flips_rows() {
        let path = std::env::temp_dir().join(format!("sponge-flip-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let tex = TextureConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((tex.width, tex.height), (1, 2));
        // Bottom row comes first after the flip
        assert_eq!(&tex.data[..4], &[0, 0, 255, 255]);
        assert_eq!(&tex.data[4..], &[255, 0, 0, 255]);
    }
}
