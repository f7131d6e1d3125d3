use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// What an announce (HTTP or UDP) yields.
#[derive(Debug, Clone)]
pub struct AnnounceResponse {
    /// Seconds the tracker wants us to wait before re-announcing.
    pub interval: u32,
    /// Peers with the complete content, when the tracker reports it.
    pub seeders: Option<u32>,
    /// Peers still downloading, when the tracker reports it.
    pub leechers: Option<u32>,
    /// Candidate peer addresses.
    pub peers: Vec<SocketAddr>,
}

/// Decodes a compact peer blob: 6 bytes per peer, 4 IPv4 octets followed by
/// a big-endian port.
///
/// A trailing partial group is ignored; an empty blob is an empty list.
pub fn parse_compact_peers(data: &[u8]) -> Vec<SocketAddr> {
    data.chunks_exact(6)
        .map(|chunk| {
            let ip = Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]);
            let port = u16::from_be_bytes([chunk[4], chunk[5]]);
            SocketAddr::new(IpAddr::V4(ip), port)
        })
        .collect()
}
