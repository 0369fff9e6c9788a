//! Error types for the rendering core.
//!
//! Every failure the core can surface is a [`RenderError`]. None of them are
//! retried: initialization errors abort startup, everything else aborts the
//! current operation.

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::GpuError;
use crate::shader::ProgramKind;

/// Convenience alias used by all fallible engine APIs.
pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// A platform subsystem (windowing, surface, device, fonts) failed to start.
    #[error("unable to initialise {subsystem}: {reason}")]
    Init {
        subsystem: &'static str,
        reason: String,
    },

    /// The font face could not be loaded.
    #[error("failed to load font {}: {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    /// Neither capability tier is available on this driver.
    #[error("none of the supported shader tiers is available (driver: {driver})")]
    UnsupportedDriver { driver: String },

    /// A shader source file could not be read.
    #[error("failed to read shader source {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver rejected a shader. Carries the full source for debugging.
    #[error("failed to compile shader {}:\n{source_text}\nInfo: {log}", path.display())]
    ShaderCompile {
        path: PathBuf,
        source_text: String,
        log: String,
    },

    /// The driver failed to link a program.
    #[error("failed to link {program} program:\n{log}")]
    ProgramLink { program: ProgramKind, log: String },

    /// A fatal diagnostic checkpoint found queued GPU errors.
    #[error("GPU error while {when} ({} error(s) reported)", errors.len())]
    Gpu { when: String, errors: Vec<GpuError> },

    /// A draw referenced a texture name that was never registered.
    #[error("texture {name} has not been generated")]
    TextureNotGenerated { name: String },

    /// The renderer was used after [`Renderer::shutdown`](crate::render::Renderer::shutdown).
    #[error("renderer has already been shut down")]
    ShutDown,

    /// An image file could not be decoded.
    #[error("failed to load image {}: {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: String },
}
