use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors raised while loading a torrent descriptor.
///
/// All of these are fatal to the session being started from the descriptor;
/// there is nothing to retry.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The file is not valid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing or has the wrong type.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// The `pieces` string length is not a multiple of 20.
    #[error("pieces length {0} is not a multiple of 20")]
    InvalidPiecesLength(usize),

    /// The file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
