//! Peer wire protocol (BEP-3).
//!
//! One [`PeerConnection`] drives one TCP connection to one remote peer:
//! the 68-byte handshake, then an unbounded read loop that decodes
//! length-prefixed messages and tracks choke/interest state and the
//! remote's piece bitfield. State changes that matter to the session
//! (unchoke/choke) are published as notifications; nothing else leaves the
//! connection's task.

mod bitfield;
mod connection;
mod error;
mod message;
mod peer_id;

pub use bitfield::Bitfield;
pub use connection::{PeerConnection, PeerHandle};
pub use error::PeerError;
pub use message::{Handshake, Message, HANDSHAKE_LEN, PROTOCOL};
pub use peer_id::PeerId;
