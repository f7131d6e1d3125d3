use thiserror::Error;

/// Errors terminating a single peer connection.
///
/// These never propagate past the connection's own task; the session only
/// ever observes them through the absence of activate notifications.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Dial, write, or read failure, including a remote close.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The handshake reply was too short to carry the fixed fields.
    #[error("invalid handshake")]
    InvalidHandshake,

    /// The handshake reply echoed a different info hash (wrong swarm).
    #[error("info hash mismatch")]
    InfoHashMismatch,

    /// A known message arrived with a malformed payload.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
