use spritefont::BuildError;

/// Errors raised by the cosmic-text collaborators.
#[derive(Debug, Clone)]
pub enum CosmicError {
    /// Font loading failed.
    FontLoadError(String),

    /// Font file not found.
    FontFileNotFound(std::path::PathBuf),

    /// Lock was poisoned (RwLock/Mutex).
    LockPoisoned(String),

    /// A face size that is not a positive, finite pixel size.
    InvalidFontSize(f32),

    /// The rasterizer was used before `begin` allocated a canvas.
    CanvasNotStarted,

    /// PNG encoding of the canvas failed.
    EncodeError(String),

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for CosmicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CosmicError::FontLoadError(msg) => write!(f, "Failed to load font: {}", msg),
            CosmicError::FontFileNotFound(path) => {
                write!(f, "Font file not found: {}", path.display())
            }
            CosmicError::LockPoisoned(msg) => {
                write!(
                    f,
                    "Lock was poisoned (likely due to panic in another thread): {}",
                    msg
                )
            }
            CosmicError::InvalidFontSize(size) => {
                write!(f, "Invalid font size {}: expected a positive pixel size", size)
            }
            CosmicError::CanvasNotStarted => write!(f, "Rasterizer used before begin"),
            CosmicError::EncodeError(msg) => write!(f, "Failed to encode atlas: {}", msg),
            CosmicError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for CosmicError {}

impl From<std::io::Error> for CosmicError {
    fn from(err: std::io::Error) -> Self {
        CosmicError::IoError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CosmicError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        CosmicError::LockPoisoned(err.to_string())
    }
}

impl From<image::ImageError> for CosmicError {
    fn from(err: image::ImageError) -> Self {
        CosmicError::EncodeError(err.to_string())
    }
}

impl From<CosmicError> for BuildError {
    fn from(err: CosmicError) -> Self {
        BuildError::collaborator(err.to_string())
    }
}

/// Result type for cosmic-text operations.
pub type CosmicResult<T> = Result<T, CosmicError>;
