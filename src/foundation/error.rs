use std::path::PathBuf;

pub type FramegifResult<T> = Result<T, FramegifError>;

#[derive(thiserror::Error, Debug)]
pub enum FramegifError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to write output '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramegifError {
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

/// A single input file that could not be turned into a frame.
///
/// The pipeline never propagates this as a fatal error; it is logged and collected into
/// [`crate::GifReport::failures`] while the remaining files are processed.
#[derive(thiserror::Error, Debug)]
#[error("failed to convert '{}': {source:#}", .path.display())]
pub struct ConversionError {
    pub path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

impl ConversionError {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}
