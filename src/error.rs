use thiserror::Error;

/// Library error type for meme-frame operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Captions were submitted before an image was decoded onto the canvas.
    #[error("no decoded image to caption")]
    NoImage,

    /// Reset requested while nothing was rendered.
    #[error("nothing rendered to clear")]
    NothingRendered,

    /// Read-aloud requested before captions were rendered.
    #[error("no rendered captions to read aloud")]
    NothingToRead,

    /// No usable caption font could be located.
    #[error("caption font unavailable: {0}")]
    FontUnavailable(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
