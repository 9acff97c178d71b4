//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
///
/// None of these are retried internally. Once bytes have reached the sink they cannot be
/// retracted, so every failure is fatal to the in-progress archive generation call.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// an entry's content source failed or was cancelled mid-read
    #[error("entry content source failed mid-read")]
    ContentSource(#[source] std::io::Error),

    /// the archive sink rejected or failed a write
    #[error("archive sink failed a write")]
    SinkWrite(#[source] std::io::Error),

    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRw(#[from] binrw::Error),

    /// archive exceeds a classic 32-bit ZIP limit
    #[error("archive exceeds a classic 32-bit zip limit")]
    SizeLimitExceeded,

    /// file is an invalid zip archive
    #[error("file is an invalid zip archive")]
    InvalidArchive,

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

impl Error {
    /// Classify a serialization failure against the sink.
    ///
    /// [`binrw`] wraps I/O failures from the underlying writer; those are sink write
    /// failures as far as callers are concerned.
    pub(crate) fn for_sink(err: binrw::Error) -> Error {
        match err {
            binrw::Error::Io(err) => Error::SinkWrite(err),
            other => Error::BinRw(other),
        }
    }
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
