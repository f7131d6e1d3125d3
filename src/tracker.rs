//! Tracker announce protocols (BEP-3, BEP-15, BEP-23).
//!
//! Given a descriptor, [`find_peers`] walks the configured announce
//! endpoints and returns candidate peer addresses. HTTP(S) trackers speak
//! the bencoded GET protocol; UDP trackers speak the binary connect +
//! announce exchange. Failures are per-endpoint: the next URL in the tier
//! is tried, then the next tier, and only exhaustion of every endpoint
//! reaches the caller.

mod error;
mod http;
mod response;
mod udp;

pub use error::TrackerError;
pub use response::{parse_compact_peers, AnnounceResponse};

use std::net::SocketAddr;

use tracing::{debug, warn};

use crate::metainfo::Descriptor;
use crate::peer::PeerId;

/// Announce port reported to trackers.
pub const ANNOUNCE_PORT: u16 = 6881;

/// Discovers peers for the descriptor's swarm.
///
/// Uses the single `announce` URL when present; otherwise walks
/// `announce_list` tier by tier, trying every URL of a tier in order and
/// stopping at the first announce that succeeds. Returns
/// [`TrackerError::NoAnnounceEndpoint`] if the descriptor names no tracker
/// at all, or the last per-endpoint error once every endpoint has failed.
pub async fn find_peers(
    descriptor: &Descriptor,
    peer_id: &PeerId,
) -> Result<Vec<SocketAddr>, TrackerError> {
    if let Some(url) = &descriptor.announce {
        let response = announce(url, descriptor, peer_id).await?;
        return Ok(response.peers);
    }

    let mut last_error = TrackerError::NoAnnounceEndpoint;
    let mut attempted = false;

    for (tier, urls) in descriptor.announce_list.iter().enumerate() {
        for url in urls {
            attempted = true;
            match announce(url, descriptor, peer_id).await {
                Ok(response) => {
                    debug!(url, tier, peers = response.peers.len(), "announce ok");
                    return Ok(response.peers);
                }
                Err(e) => {
                    warn!(url, tier, error = %e, "tracker announce failed");
                    last_error = e;
                }
            }
        }
    }

    if !attempted {
        return Err(TrackerError::NoAnnounceEndpoint);
    }
    Err(last_error)
}

async fn announce(
    url: &str,
    descriptor: &Descriptor,
    peer_id: &PeerId,
) -> Result<AnnounceResponse, TrackerError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        http::announce(url, descriptor, peer_id).await
    } else if url.starts_with("udp://") {
        udp::announce(url, descriptor, peer_id).await
    } else {
        Err(TrackerError::UnsupportedScheme(url.to_string()))
    }
}

#[cfg(test)]
mod tests;
