//! Error types for the demo shell.
//!
//! The particle core has no fallible operations. Everything here belongs to
//! the window, GPU and asset layers around it.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "Surface reports no supported texture format"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur during texture loading.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode the image file.
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Decoded image has a zero dimension.
    Empty { path: PathBuf },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad { path, source } => {
                write!(f, "Failed to load texture '{}': {}", path.display(), source)
            }
            TextureError::Empty { path } => {
                write!(f, "Texture '{}' has no pixels", path.display())
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad { source, .. } => Some(source),
            TextureError::Empty { .. } => None,
        }
    }
}

/// Errors that can stop the demo from starting.
#[derive(Debug)]
pub enum DemoError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            DemoError::Window(e) => write!(f, "Failed to create window: {}", e),
            DemoError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::EventLoop(e) => Some(e),
            DemoError::Window(e) => Some(e),
            DemoError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for DemoError {
    fn from(e: winit::error::EventLoopError) -> Self {
        DemoError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for DemoError {
    fn from(e: winit::error::OsError) -> Self {
        DemoError::Window(e)
    }
}

impl From<GpuError> for DemoError {
    fn from(e: GpuError) -> Self {
        DemoError::Gpu(e)
    }
}
