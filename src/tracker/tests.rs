use super::udp::{
    encode_announce_request, encode_connect_request, parse_announce_response,
    parse_connect_response,
};
use super::*;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};

use crate::metainfo::{Descriptor, FileEntry, InfoHash};
use crate::peer::PeerId;

fn descriptor(announce: Option<&str>, tiers: Vec<Vec<&str>>) -> Descriptor {
    Descriptor {
        info_hash: InfoHash([0xab; 20]),
        announce: announce.map(String::from),
        announce_list: tiers
            .into_iter()
            .map(|tier| tier.into_iter().map(String::from).collect())
            .collect(),
        name: "test".into(),
        piece_length: 512,
        piece_count: 4,
        files: vec![
            FileEntry {
                path: "a".into(),
                length: 1500,
            },
            FileEntry {
                path: "b".into(),
                length: 548,
            },
        ],
        private: false,
        creation_date: None,
        comment: None,
        created_by: None,
        encoding: None,
    }
}

#[test]
fn test_parse_compact_peers() {
    let data = [
        192, 168, 1, 1, 0x1a, 0xe1, // 192.168.1.1:6881
        10, 0, 0, 1, 0x00, 0x50, // 10.0.0.1:80
    ];

    let peers = parse_compact_peers(&data);
    assert_eq!(peers.len(), 2);
    assert_eq!(
        peers[0],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), 6881)
    );
    assert_eq!(
        peers[1],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 80)
    );
}

#[test]
fn test_parse_compact_peers_empty_and_partial() {
    assert!(parse_compact_peers(&[]).is_empty());
    // Trailing partial group is dropped.
    assert_eq!(parse_compact_peers(&[1, 2, 3, 4, 0, 80, 9, 9]).len(), 1);
}

#[test]
fn test_connect_request_layout() {
    let request = encode_connect_request(0xdead_beef);
    assert_eq!(&request[0..8], &0x41727101980u64.to_be_bytes());
    assert_eq!(&request[8..12], &[0, 0, 0, 0]);
    assert_eq!(&request[12..16], &0xdead_beefu32.to_be_bytes());
}

#[test]
fn test_connect_roundtrip_yields_connection_id() {
    let transaction_id = 0x0102_0304;
    let _request = encode_connect_request(transaction_id);

    let mut response = Vec::new();
    response.extend_from_slice(&0u32.to_be_bytes());
    response.extend_from_slice(&transaction_id.to_be_bytes());
    response.extend_from_slice(&0x1122_3344_5566_7788u64.to_be_bytes());

    let connection_id = parse_connect_response(&response, transaction_id).unwrap();
    assert_eq!(connection_id, 0x1122_3344_5566_7788);
}

#[test]
fn test_connect_response_mismatches_are_tolerated() {
    let mut response = Vec::new();
    response.extend_from_slice(&3u32.to_be_bytes()); // wrong action
    response.extend_from_slice(&999u32.to_be_bytes()); // wrong transaction id
    response.extend_from_slice(&42u64.to_be_bytes());

    assert_eq!(parse_connect_response(&response, 1).unwrap(), 42);
}

#[test]
fn test_connect_response_too_short() {
    assert!(parse_connect_response(&[0u8; 15], 1).is_err());
}

#[test]
fn test_announce_request_layout() {
    let request = encode_announce_request(0x0123, 0x4567, &[0xaa; 20], &[0xbb; 20], 1500);

    assert_eq!(request.len(), 98);
    assert_eq!(&request[0..8], &0x0123u64.to_be_bytes());
    assert_eq!(&request[8..12], &1u32.to_be_bytes()); // action: announce
    assert_eq!(&request[12..16], &0x4567u32.to_be_bytes());
    assert_eq!(&request[16..36], &[0xaa; 20]);
    assert_eq!(&request[36..56], &[0xbb; 20]);
    assert_eq!(&request[56..64], &0u64.to_be_bytes()); // downloaded
    assert_eq!(&request[64..72], &1500u64.to_be_bytes()); // left
    assert_eq!(&request[72..80], &0u64.to_be_bytes()); // uploaded
    assert_eq!(&request[80..84], &2u32.to_be_bytes()); // event: started
    assert_eq!(&request[84..88], &0u32.to_be_bytes()); // ip
    assert_eq!(&request[88..92], &0u32.to_be_bytes()); // key
    assert_eq!(&request[92..96], &10u32.to_be_bytes()); // num_want
    assert_eq!(&request[96..98], &6881u16.to_be_bytes()); // port
}

#[test]
fn test_announce_response_parsing() {
    let mut response = Vec::new();
    response.extend_from_slice(&1u32.to_be_bytes());
    response.extend_from_slice(&7u32.to_be_bytes());
    response.extend_from_slice(&1800u32.to_be_bytes());
    response.extend_from_slice(&1u32.to_be_bytes());
    response.extend_from_slice(&3u32.to_be_bytes());
    response.extend_from_slice(&[127, 0, 0, 1, 0x1a, 0xe1]);

    let parsed = parse_announce_response(&response, 7).unwrap();
    assert_eq!(parsed.interval, 1800);
    assert_eq!(parsed.leechers, Some(1));
    assert_eq!(parsed.seeders, Some(3));
    assert_eq!(parsed.peers.len(), 1);
}

#[test]
fn test_announce_response_too_short() {
    assert!(parse_announce_response(&[0u8; 19], 1).is_err());
}

#[tokio::test]
async fn test_unsupported_scheme() {
    let descriptor = descriptor(Some("wss://tracker.example/ann"), vec![]);
    let result = find_peers(&descriptor, &PeerId::generate()).await;
    assert!(matches!(result, Err(TrackerError::UnsupportedScheme(_))));
}

#[tokio::test]
async fn test_no_announce_endpoint() {
    let descriptor = descriptor(None, vec![]);
    let result = find_peers(&descriptor, &PeerId::generate()).await;
    assert!(matches!(result, Err(TrackerError::NoAnnounceEndpoint)));
}

/// Serves one canned HTTP response on a fresh listener, recording `label`
/// in `log` when hit.
async fn mock_http_tracker(
    label: &'static str,
    body: Vec<u8>,
    log: Arc<Mutex<Vec<&'static str>>>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            log.lock().push(label);

            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await;

            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{}/announce", addr)
}

fn bencoded_peers_body(peers: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"d8:intervali1800e5:peers");
    body.extend_from_slice(format!("{}:", peers.len()).as_bytes());
    body.extend_from_slice(peers);
    body.extend_from_slice(b"e");
    body
}

#[tokio::test]
async fn test_http_announce_yields_compact_peers() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let url = mock_http_tracker(
        "t",
        bencoded_peers_body(&[0x7f, 0x00, 0x00, 0x01, 0x1a, 0xe1]),
        log,
    )
    .await;

    let descriptor = descriptor(Some(url.as_str()), vec![]);
    let peers = find_peers(&descriptor, &PeerId::generate()).await.unwrap();

    assert_eq!(peers.len(), 1);
    assert_eq!(
        peers[0],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 6881)
    );
}

#[tokio::test]
async fn test_http_announce_failure_reason() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let url = mock_http_tracker("t", b"d14:failure reason7:refusede".to_vec(), log).await;

    let descriptor = descriptor(Some(url.as_str()), vec![]);
    let result = find_peers(&descriptor, &PeerId::generate()).await;
    assert!(matches!(result, Err(TrackerError::Protocol(_))));
}

#[tokio::test]
async fn test_hostile_body_is_per_endpoint_error() {
    // A response declaring a near-usize::MAX string length must fail the
    // endpoint, leaving the rest of the tier usable.
    let log = Arc::new(Mutex::new(Vec::new()));
    let bad = mock_http_tracker("bad", b"18446744073709551615:".to_vec(), log.clone()).await;
    let good = mock_http_tracker(
        "good",
        bencoded_peers_body(&[10, 0, 0, 9, 0x1a, 0xe1]),
        log.clone(),
    )
    .await;

    let descriptor = descriptor(None, vec![vec![bad.as_str(), good.as_str()]]);
    let peers = find_peers(&descriptor, &PeerId::generate()).await.unwrap();

    assert_eq!(peers.len(), 1);
    assert_eq!(log.lock().as_slice(), &["bad", "good"]);
}

#[tokio::test]
async fn test_tier_fallback_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    // Both tier-1 trackers answer with garbage; tier 2 succeeds. A fourth
    // tracker after the first success must never be contacted.
    let t1a = mock_http_tracker("t1a", b"not bencode at all".to_vec(), log.clone()).await;
    let t1b = mock_http_tracker("t1b", b"still not bencode".to_vec(), log.clone()).await;
    let t2a = mock_http_tracker(
        "t2a",
        bencoded_peers_body(&[10, 0, 0, 1, 0x1a, 0xe1]),
        log.clone(),
    )
    .await;
    let t2b = mock_http_tracker(
        "t2b",
        bencoded_peers_body(&[10, 0, 0, 2, 0x1a, 0xe1]),
        log.clone(),
    )
    .await;

    let descriptor = descriptor(
        None,
        vec![
            vec![t1a.as_str(), t1b.as_str()],
            vec![t2a.as_str(), t2b.as_str()],
        ],
    );

    let peers = find_peers(&descriptor, &PeerId::generate()).await.unwrap();
    assert_eq!(peers.len(), 1);
    assert_eq!(
        peers[0],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 6881)
    );

    assert_eq!(log.lock().as_slice(), &["t1a", "t1b", "t2a"]);
}

#[tokio::test]
async fn test_all_tiers_exhausted_surfaces_last_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let t1 = mock_http_tracker("t1", b"garbage".to_vec(), log.clone()).await;

    let descriptor = descriptor(None, vec![vec![t1.as_str(), "gopher://nope"]]);
    let result = find_peers(&descriptor, &PeerId::generate()).await;

    assert!(matches!(result, Err(TrackerError::UnsupportedScheme(_))));
    assert_eq!(log.lock().as_slice(), &["t1"]);
}

/// Completes one connect + announce exchange, then exits. The connect
/// reply deliberately carries a wrong action value; the client must treat
/// that as advisory.
async fn mock_udp_tracker(peers_blob: Vec<u8>, first_file_length: u64) -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = [0u8; 128];

        let (n, client) = socket.recv_from(&mut buf).await.unwrap();
        assert_eq!(n, 16);
        assert_eq!(&buf[0..8], &0x41727101980u64.to_be_bytes());
        let transaction_id = buf[12..16].to_vec();

        let mut reply = Vec::new();
        reply.extend_from_slice(&3u32.to_be_bytes()); // wrong action, advisory
        reply.extend_from_slice(&transaction_id);
        reply.extend_from_slice(&0x0102_0304_0506_0708u64.to_be_bytes());
        socket.send_to(&reply, client).await.unwrap();

        let (n, client) = socket.recv_from(&mut buf).await.unwrap();
        assert_eq!(n, 98);
        assert_eq!(&buf[0..8], &0x0102_0304_0506_0708u64.to_be_bytes());
        assert_eq!(&buf[8..12], &1u32.to_be_bytes());
        assert_eq!(&buf[64..72], &first_file_length.to_be_bytes());
        assert_eq!(&buf[80..84], &2u32.to_be_bytes());
        assert_eq!(&buf[92..96], &10u32.to_be_bytes());
        assert_eq!(&buf[96..98], &6881u16.to_be_bytes());
        let transaction_id = buf[12..16].to_vec();

        let mut reply = Vec::new();
        reply.extend_from_slice(&1u32.to_be_bytes());
        reply.extend_from_slice(&transaction_id);
        reply.extend_from_slice(&1800u32.to_be_bytes());
        reply.extend_from_slice(&1u32.to_be_bytes()); // leechers
        reply.extend_from_slice(&3u32.to_be_bytes()); // seeders
        reply.extend_from_slice(&peers_blob);
        socket.send_to(&reply, client).await.unwrap();
    });

    format!("udp://{}", addr)
}

#[tokio::test]
async fn test_udp_announce_end_to_end() {
    let blob = vec![
        127, 0, 0, 1, 0x1a, 0xe1, //
        127, 0, 0, 2, 0x1a, 0xe2,
    ];
    let url = mock_udp_tracker(blob, 1500).await;

    let descriptor = descriptor(Some(url.as_str()), vec![]);
    let peers = find_peers(&descriptor, &PeerId::generate()).await.unwrap();

    assert_eq!(peers.len(), 2);
    assert_eq!(
        peers[0],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 6881)
    );
    assert_eq!(
        peers[1],
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)), 6882)
    );
}
