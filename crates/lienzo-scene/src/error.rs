//! Error types for the scene graph and frame driver.

use thiserror::Error;

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors surfaced past the library boundary.
///
/// Precondition violations (bad angles, empty action lists, out-of-range
/// indices, mutating actions mid-run) are debug assertions instead: they
/// are caller bugs, checked in debug and test builds and compiled out in
/// release.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The driver was asked to shut down. Expected termination, caught
    /// once at the outermost scope and treated as a clean exit.
    #[error("application closed")]
    Closed,

    /// Off-screen frame buffer construction failed. Recoverable: the
    /// caller may disable the feature and continue.
    #[error("frame buffer build failed: {0}")]
    FrameBufferBuild(String),

    /// Backend image resource creation failed.
    #[error("image build failed: {0}")]
    ImageBuild(String),

    /// Backend font resource lookup failed.
    #[error("font not found: {0}")]
    FontNotFound(String),

    /// Driver configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
