use std::time::Duration;

use reqwest::Client;

use crate::bencode::decode;
use crate::metainfo::Descriptor;
use crate::peer::PeerId;

use super::error::TrackerError;
use super::response::{parse_compact_peers, AnnounceResponse};
use super::ANNOUNCE_PORT;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Announces over HTTP(S) and extracts the peer list from the bencoded
/// response.
pub async fn announce(
    url: &str,
    descriptor: &Descriptor,
    peer_id: &PeerId,
) -> Result<AnnounceResponse, TrackerError> {
    let request_url = format!(
        "{}?info_hash={}&peer_id={}&uploaded=0&downloaded=0&port={}&left={}&compact=1",
        url,
        url_encode(descriptor.info_hash.as_bytes()),
        url_encode(peer_id.as_bytes()),
        ANNOUNCE_PORT,
        descriptor.total_length(),
    );

    let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let body = client.get(&request_url).send().await?.bytes().await?;

    let value = decode(&body)?;

    if let Some(failure) = value.get(b"failure reason").and_then(|v| v.as_str()) {
        return Err(TrackerError::Protocol(failure.to_string()));
    }

    let interval = value
        .get(b"interval")
        .and_then(|v| v.as_integer())
        .unwrap_or(0) as u32;

    // Only the compact form is decoded; the dictionary form yields an
    // empty list rather than an error.
    let peers = match value.require("peers")?.as_bytes() {
        Some(blob) => parse_compact_peers(blob),
        None => Vec::new(),
    };

    Ok(AnnounceResponse {
        interval,
        seeders: value
            .get(b"complete")
            .and_then(|v| v.as_integer())
            .map(|v| v as u32),
        leechers: value
            .get(b"incomplete")
            .and_then(|v| v.as_integer())
            .map(|v| v as u32),
        peers,
    })
}

/// Percent-encodes raw bytes for a query parameter, keeping the unreserved
/// characters literal.
fn url_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for &b in bytes {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
