use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FractalError {
    #[error("could not open or write output file {path}: {source}")]
    OutputSinkUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("image of {width}x{height} pixels does not fit in a bitmap")]
    ImageTooLarge { width: u32, height: u32 },
    #[error("not a 24-bit bitmap: {0}")]
    NotABitmap(&'static str),
}

pub type Result<T> = std::result::Result<T, FractalError>;
