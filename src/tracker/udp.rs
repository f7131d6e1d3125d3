use std::net::SocketAddr;
use std::time::Duration;

use rand::Rng as _;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;
use tracing::warn;

use crate::metainfo::Descriptor;
use crate::peer::PeerId;

use super::error::TrackerError;
use super::response::{parse_compact_peers, AnnounceResponse};
use super::ANNOUNCE_PORT;

const PROTOCOL_ID: u64 = 0x41727101980;
const ACTION_CONNECT: u32 = 0;
const ACTION_ANNOUNCE: u32 = 1;
const EVENT_STARTED: u32 = 2;
const NUM_WANT: u32 = 10;
const UDP_TIMEOUT: Duration = Duration::from_secs(15);

/// Announces over the BEP-15 UDP protocol: a connect round trip to obtain a
/// connection id, then the announce round trip. One fresh socket per call.
pub async fn announce(
    url: &str,
    descriptor: &Descriptor,
    peer_id: &PeerId,
) -> Result<AnnounceResponse, TrackerError> {
    let target = resolve_udp_url(url).await?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(target).await?;

    let transaction_id: u32 = rand::rng().random();
    let request = encode_connect_request(transaction_id);
    socket.send(&request).await?;

    let mut buf = [0u8; 16];
    let n = recv(&socket, &mut buf).await?;
    let connection_id = parse_connect_response(&buf[..n], transaction_id)?;

    let transaction_id: u32 = rand::rng().random();
    let request = encode_announce_request(
        connection_id,
        transaction_id,
        descriptor.info_hash.as_bytes(),
        peer_id.as_bytes(),
        descriptor.first_file_length(),
    );
    socket.send(&request).await?;

    let mut buf = vec![0u8; 20 + 6 * NUM_WANT as usize];
    let n = recv(&socket, &mut buf).await?;
    parse_announce_response(&buf[..n], transaction_id)
}

async fn recv(socket: &UdpSocket, buf: &mut [u8]) -> Result<usize, TrackerError> {
    match timeout(UDP_TIMEOUT, socket.recv(buf)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(TrackerError::Timeout),
    }
}

/// The 16-byte connect request: magic protocol id, action 0, transaction id.
pub(super) fn encode_connect_request(transaction_id: u32) -> [u8; 16] {
    let mut request = [0u8; 16];
    request[0..8].copy_from_slice(&PROTOCOL_ID.to_be_bytes());
    request[8..12].copy_from_slice(&ACTION_CONNECT.to_be_bytes());
    request[12..16].copy_from_slice(&transaction_id.to_be_bytes());
    request
}

/// Extracts the connection id from a connect response.
///
/// Action and transaction-id mismatches are logged as protocol anomalies
/// but tolerated; only a short response is an error.
pub(super) fn parse_connect_response(
    response: &[u8],
    transaction_id: u32,
) -> Result<u64, TrackerError> {
    if response.len() < 16 {
        return Err(TrackerError::Protocol(format!(
            "connect response too short: {} bytes",
            response.len()
        )));
    }

    let action = u32::from_be_bytes([response[0], response[1], response[2], response[3]]);
    let echoed = u32::from_be_bytes([response[4], response[5], response[6], response[7]]);

    if action != ACTION_CONNECT {
        warn!(action, "unexpected action in connect response");
    }
    if echoed != transaction_id {
        warn!(
            sent = transaction_id,
            echoed, "transaction id mismatch in connect response"
        );
    }

    Ok(u64::from_be_bytes([
        response[8],
        response[9],
        response[10],
        response[11],
        response[12],
        response[13],
        response[14],
        response[15],
    ]))
}

/// The fixed 98-byte big-endian announce request.
pub(super) fn encode_announce_request(
    connection_id: u64,
    transaction_id: u32,
    info_hash: &[u8; 20],
    peer_id: &[u8; 20],
    left: u64,
) -> Vec<u8> {
    let mut request = Vec::with_capacity(98);
    request.extend_from_slice(&connection_id.to_be_bytes());
    request.extend_from_slice(&ACTION_ANNOUNCE.to_be_bytes());
    request.extend_from_slice(&transaction_id.to_be_bytes());
    request.extend_from_slice(info_hash);
    request.extend_from_slice(peer_id);
    request.extend_from_slice(&0u64.to_be_bytes()); // downloaded
    request.extend_from_slice(&left.to_be_bytes());
    request.extend_from_slice(&0u64.to_be_bytes()); // uploaded
    request.extend_from_slice(&EVENT_STARTED.to_be_bytes());
    request.extend_from_slice(&0u32.to_be_bytes()); // ip (0 = source address)
    request.extend_from_slice(&0u32.to_be_bytes()); // key
    request.extend_from_slice(&NUM_WANT.to_be_bytes());
    request.extend_from_slice(&ANNOUNCE_PORT.to_be_bytes());
    request
}

/// Parses the announce response header and trailing compact peer blob.
///
/// Same tolerance as the connect path: action and transaction id are
/// checked advisorily, a short header is the only hard error.
pub(super) fn parse_announce_response(
    response: &[u8],
    transaction_id: u32,
) -> Result<AnnounceResponse, TrackerError> {
    if response.len() < 20 {
        return Err(TrackerError::Protocol(format!(
            "announce response too short: {} bytes",
            response.len()
        )));
    }

    let action = u32::from_be_bytes([response[0], response[1], response[2], response[3]]);
    let echoed = u32::from_be_bytes([response[4], response[5], response[6], response[7]]);

    if action != ACTION_ANNOUNCE {
        warn!(action, "unexpected action in announce response");
    }
    if echoed != transaction_id {
        warn!(
            sent = transaction_id,
            echoed, "transaction id mismatch in announce response"
        );
    }

    let interval = u32::from_be_bytes([response[8], response[9], response[10], response[11]]);
    let leechers = u32::from_be_bytes([response[12], response[13], response[14], response[15]]);
    let seeders = u32::from_be_bytes([response[16], response[17], response[18], response[19]]);

    Ok(AnnounceResponse {
        interval,
        seeders: Some(seeders),
        leechers: Some(leechers),
        peers: parse_compact_peers(&response[20..]),
    })
}

async fn resolve_udp_url(url: &str) -> Result<SocketAddr, TrackerError> {
    let rest = url
        .strip_prefix("udp://")
        .ok_or_else(|| TrackerError::InvalidUrl(url.to_string()))?;

    let host_port = rest.split('/').next().unwrap_or(rest);

    lookup_host(host_port)
        .await
        .map_err(|_| TrackerError::InvalidUrl(url.to_string()))?
        .next()
        .ok_or_else(|| TrackerError::InvalidUrl(url.to_string()))
}
