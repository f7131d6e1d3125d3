use std::net::SocketAddr;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::metainfo::InfoHash;

use super::bitfield::Bitfield;
use super::error::PeerError;
use super::message::{Handshake, Message, HANDSHAKE_LEN};
use super::peer_id::PeerId;

/// Upper bound on a single frame. The largest legitimate message is a
/// `piece` with a 16 KiB block; anything near this limit is a hostile or
/// broken peer, and the length prefix must never size an allocation
/// unchecked.
const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// What the session registry stores for an unchoked peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerHandle {
    pub peer_id: PeerId,
    pub addr: SocketAddr,
}

/// Protocol state for one connection to one remote peer.
///
/// Every field is owned exclusively by the task driving [`run`]; the only
/// things that leave it are the activate/deactivate notifications.
///
/// [`run`]: PeerConnection::run
#[derive(Debug)]
pub struct PeerConnection {
    /// The remote endpoint.
    pub addr: SocketAddr,
    /// The id the remote presented in its handshake.
    pub remote_peer_id: Option<PeerId>,
    /// We are withholding data from the remote.
    pub am_choking: bool,
    /// We want data from the remote.
    pub am_interested: bool,
    /// The remote is withholding data from us.
    pub peer_choking: bool,
    /// The remote wants data from us.
    pub peer_interested: bool,
    /// Pieces the remote claims to have.
    pub pieces: Bitfield,
}

impl PeerConnection {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            remote_peer_id: None,
            am_choking: true,
            am_interested: false,
            peer_choking: true,
            peer_interested: false,
            pieces: Bitfield::new(),
        }
    }

    /// Drives the connection to completion: dial, handshake, message loop.
    ///
    /// Returns when the connection closes or fails; errors are logged, not
    /// returned, so one bad peer never disturbs its siblings. There is no
    /// timeout on dial, handshake, or reads and no reconnect: an
    /// unresponsive peer parks this task until its socket dies (known
    /// limitation).
    pub async fn run(
        &mut self,
        info_hash: InfoHash,
        local_peer_id: PeerId,
        activate: mpsc::Sender<PeerHandle>,
        deactivate: mpsc::Sender<PeerId>,
    ) {
        match self.drive(info_hash, local_peer_id, &activate, &deactivate).await {
            Ok(()) => debug!(addr = %self.addr, "peer connection closed"),
            Err(PeerError::InfoHashMismatch) => {
                debug!(addr = %self.addr, "peer is in a different swarm, abandoning")
            }
            Err(e) => debug!(addr = %self.addr, error = %e, "peer connection failed"),
        }

        // The registry must not keep an entry for a closed connection.
        if !self.peer_choking {
            self.peer_choking = true;
            if let Some(peer_id) = self.remote_peer_id {
                let _ = deactivate.send(peer_id).await;
            }
        }
    }

    async fn drive(
        &mut self,
        info_hash: InfoHash,
        local_peer_id: PeerId,
        activate: &mpsc::Sender<PeerHandle>,
        deactivate: &mpsc::Sender<PeerId>,
    ) -> Result<(), PeerError> {
        let mut stream = TcpStream::connect(self.addr).await?;

        let handshake = Handshake::new(*info_hash.as_bytes(), *local_peer_id.as_bytes());
        stream.write_all(&handshake.encode()).await?;

        let mut reply = [0u8; HANDSHAKE_LEN];
        stream.read_exact(&mut reply).await?;
        let reply = Handshake::decode(&reply)?;

        if reply.info_hash != *info_hash.as_bytes() {
            return Err(PeerError::InfoHashMismatch);
        }

        self.remote_peer_id = Some(PeerId(reply.peer_id));
        self.am_interested = true;
        debug!(addr = %self.addr, peer_id = %PeerId(reply.peer_id), "handshake complete");

        self.message_loop(&mut stream, activate, deactivate).await
    }

    async fn message_loop(
        &mut self,
        stream: &mut TcpStream,
        activate: &mpsc::Sender<PeerHandle>,
        deactivate: &mpsc::Sender<PeerId>,
    ) -> Result<(), PeerError> {
        loop {
            let length = stream.read_u32().await? as usize;

            if length == 0 {
                trace!(addr = %self.addr, "keep-alive");
                continue;
            }

            if length > MAX_MESSAGE_SIZE {
                return Err(PeerError::InvalidMessage(format!(
                    "frame length {} exceeds {} byte limit",
                    length, MAX_MESSAGE_SIZE
                )));
            }

            let id = stream.read_u8().await?;
            let mut payload = vec![0u8; length - 1];
            stream.read_exact(&mut payload).await?;

            let message = Message::parse(id, Bytes::from(payload))?;
            self.handle_message(message, activate, deactivate).await;
        }
    }

    async fn handle_message(
        &mut self,
        message: Message,
        activate: &mpsc::Sender<PeerHandle>,
        deactivate: &mpsc::Sender<PeerId>,
    ) {
        match message {
            Message::Choke => {
                self.peer_choking = true;
                if let Some(peer_id) = self.remote_peer_id {
                    trace!(addr = %self.addr, "choked");
                    let _ = deactivate.send(peer_id).await;
                }
            }
            Message::Unchoke => {
                self.peer_choking = false;
                if let Some(peer_id) = self.remote_peer_id {
                    trace!(addr = %self.addr, "unchoked");
                    let _ = activate
                        .send(PeerHandle {
                            peer_id,
                            addr: self.addr,
                        })
                        .await;
                }
            }
            Message::Interested => self.peer_interested = true,
            Message::NotInterested => self.peer_interested = false,
            Message::Have { piece } => self.pieces.set_piece(piece as usize),
            Message::Bitfield(bits) => {
                self.pieces = Bitfield::from_bytes(&bits);
                trace!(addr = %self.addr, pieces = self.pieces.count(), "bitfield");
            }
            Message::Request {
                index,
                begin,
                length,
            } => {
                // Serving data is out of scope; requests are observed only.
                debug!(addr = %self.addr, index, begin, length, "request ignored");
            }
            Message::Piece { index, begin, data } => {
                debug!(addr = %self.addr, index, begin, len = data.len(), "piece ignored");
            }
            Message::Cancel { index, .. } => {
                debug!(addr = %self.addr, index, "cancel ignored");
            }
            Message::Port(port) => {
                debug!(addr = %self.addr, port, "port ignored");
            }
            Message::Unknown { id } => {
                debug!(addr = %self.addr, id, "unknown message id, skipping");
            }
            Message::KeepAlive => {}
        }
    }
}
