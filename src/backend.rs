//! Active-backend configuration and descriptor source tagging.
//!
//! The compute backend is per-thread state, set once at runtime
//! initialization and read by descriptor extraction. Each thread has its
//! own current arch.
//!
//! # Example
//! ```
//! use strata::backend::{current_arch, with_arch, Arch};
//!
//! assert_eq!(current_arch(), Arch::X64);
//!
//! with_arch(Arch::Cuda, || {
//!     assert_eq!(current_arch(), Arch::Cuda);
//! });
//! // The previous arch is restored here
//! assert_eq!(current_arch(), Arch::X64);
//! ```

use std::cell::Cell;
use std::fmt;

use crate::error::{Error, Result};

/// The compute target the runtime is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arch {
    /// x86-64 host CPU
    #[default]
    X64,
    /// ARM64 host CPU
    Arm64,
    /// NVIDIA GPU via CUDA
    Cuda,
    /// Vulkan compute
    Vulkan,
    /// Metal compute (macOS)
    Metal,
    /// OpenGL compute shaders
    OpenGl,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X64 => write!(f, "x64"),
            Arch::Arm64 => write!(f, "arm64"),
            Arch::Cuda => write!(f, "cuda"),
            Arch::Vulkan => write!(f, "vulkan"),
            Arch::Metal => write!(f, "metal"),
            Arch::OpenGl => write!(f, "opengl"),
        }
    }
}

thread_local! {
    static CURRENT_ARCH: Cell<Arch> = const { Cell::new(Arch::X64) };
}

/// Get the current arch for this thread.
pub fn current_arch() -> Arch {
    CURRENT_ARCH.with(|arch| arch.get())
}

/// Set the current arch for this thread.
pub fn set_current_arch(arch: Arch) {
    CURRENT_ARCH.with(|cell| cell.set(arch));
}

/// Reset this thread's arch back to the default.
pub fn reset_current_arch() {
    set_current_arch(Arch::default());
}

/// Run a closure with a temporary current arch.
///
/// The previous arch is restored after the closure completes.
pub fn with_arch<F, R>(arch: Arch, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = current_arch();
    set_current_arch(arch);
    let result = f();
    set_current_arch(previous);
    result
}

/// The backend-origin tag a field descriptor carries.
///
/// Deliberately narrower than [`Arch`]: archs without a matching tag
/// cannot feed the rendering layer and fail descriptor extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    /// Field memory lives on a CUDA device
    Cuda,
    /// Field memory lives in host memory
    X64,
    /// Field memory lives in a Vulkan allocation
    Vulkan,
}

impl FieldSource {
    /// Map an arch to its descriptor source tag.
    ///
    /// ARM64 hosts share the x64 tag: both are plain host memory to a
    /// consumer. Archs outside the supported set are a fatal error, not
    /// a fallback.
    pub fn from_arch(arch: Arch) -> Result<FieldSource> {
        match arch {
            Arch::Cuda => Ok(FieldSource::Cuda),
            Arch::X64 => Ok(FieldSource::X64),
            Arch::Arm64 => Ok(FieldSource::X64),
            Arch::Vulkan => Ok(FieldSource::Vulkan),
            Arch::Metal | Arch::OpenGl => Err(Error::UnsupportedBackend(arch)),
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Cuda => write!(f, "cuda"),
            FieldSource::X64 => write!(f, "x64"),
            FieldSource::Vulkan => write!(f, "vulkan"),
        }
    }
}
