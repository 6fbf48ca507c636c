//! Error types shared by the `ext2` and `fat16` readers.

use std::fmt;
use std::io;

/// An error produced while inspecting a filesystem image.
#[derive(Debug)]
pub enum Error {
    /// A seek or read against the image file failed.
    Io(io::Error),
    /// The image does not match any supported filesystem.
    Format(String),
    /// A `cat` target did not resolve to a regular file.
    NotFound(String),
    /// Invalid command line usage.
    Arg(String),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(fmt, "{e}"),
            Self::Format(msg) => write!(fmt, "{msg}"),
            Self::NotFound(name) => write!(fmt, "file '{name}' not found"),
            Self::Arg(msg) => write!(fmt, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Shorthand result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
