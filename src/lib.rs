//! swarmbit - a BitTorrent protocol-layer client
//!
//! This library implements the protocol core of a BitTorrent client:
//! discovering peers through HTTP and UDP trackers, speaking the peer wire
//! protocol, and coordinating per-peer state for one session.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode encoding/decoding
//! - [`metainfo`] - `.torrent` descriptor parsing and info-hash computation
//! - [`tracker`] - BEP-3/15/23 HTTP and UDP tracker announce protocols
//! - [`peer`] - BEP-3 peer wire protocol (handshake + message loop)
//! - [`session`] - per-torrent coordination and the active-peer registry
//!
//! Piece scheduling, disk I/O, DHT, and encryption are out of scope; the
//! session exposes its active-peer registry as the hook point for a future
//! scheduler.

pub mod bencode;
pub mod metainfo;
pub mod peer;
pub mod session;
pub mod tracker;

pub use bencode::{decode, encode, BencodeError, Value};
pub use metainfo::{Descriptor, FileEntry, InfoHash, MetainfoError};
pub use peer::{Bitfield, Handshake, Message, PeerConnection, PeerError, PeerHandle, PeerId};
pub use session::{Session, SessionError};
pub use tracker::{AnnounceResponse, TrackerError};
