use thiserror::Error;

/// Tracker announce failures.
///
/// Every variant except `NoAnnounceEndpoint` is per-endpoint and recovered
/// by tier fallback; the caller only sees the last one after every endpoint
/// has been exhausted.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The descriptor names no announce URL and no announce tiers.
    #[error("descriptor has no announce endpoint")]
    NoAnnounceEndpoint,

    /// The announce URL's scheme is neither http(s) nor udp.
    #[error("unsupported tracker scheme: {0}")]
    UnsupportedScheme(String),

    /// The announce URL could not be parsed or resolved.
    #[error("invalid tracker url: {0}")]
    InvalidUrl(String),

    /// The tracker could not be reached over HTTP.
    #[error("tracker unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// Socket-level failure talking to a UDP tracker.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A UDP tracker did not answer in time.
    #[error("tracker timed out")]
    Timeout,

    /// The tracker's response violates the announce protocol.
    #[error("tracker protocol error: {0}")]
    Protocol(String),

    /// The tracker's bencoded response is malformed or incomplete.
    #[error("bencode error: {0}")]
    Bencode(#[from] crate::bencode::BencodeError),
}
