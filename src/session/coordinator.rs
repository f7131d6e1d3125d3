use std::path::Path;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::metainfo::Descriptor;
use crate::peer::{PeerConnection, PeerHandle, PeerId};
use crate::tracker;

use super::error::SessionError;
use super::registry::Registry;

const NOTIFY_CAPACITY: usize = 64;

/// One download session: a descriptor, a session-wide peer id, and the
/// registry of peers currently willing to serve us.
///
/// ```no_run
/// use swarmbit::Session;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::from_file("example.torrent")?;
/// session.start().await?;
///
/// for peer in session.active_peers() {
///     println!("active: {} at {}", peer.peer_id, peer.addr);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session {
    descriptor: Descriptor,
    local_peer_id: PeerId,
    registry: Registry,
}

impl Session {
    /// Creates a session for an already-parsed descriptor. The session
    /// peer id is generated here, once, and shared by every announce and
    /// handshake of this session.
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            local_peer_id: PeerId::generate(),
            registry: Registry::new(),
        }
    }

    /// Loads a `.torrent` file and creates a session for it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        Ok(Self::new(Descriptor::from_file(path)?))
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn local_peer_id(&self) -> PeerId {
        self.local_peer_id
    }

    /// Discovers peers and fans out one connection task per address.
    ///
    /// Returns once discovery has succeeded and all tasks are launched;
    /// the connections themselves run until their sockets close. Fails
    /// only if every tracker endpoint is exhausted.
    pub async fn start(&self) -> Result<(), SessionError> {
        let peers = tracker::find_peers(&self.descriptor, &self.local_peer_id).await?;
        info!(
            info_hash = %self.descriptor.info_hash,
            peers = peers.len(),
            "peer discovery complete"
        );

        let (activate_tx, mut activate_rx) = mpsc::channel::<PeerHandle>(NOTIFY_CAPACITY);
        let (deactivate_tx, mut deactivate_rx) = mpsc::channel::<PeerId>(NOTIFY_CAPACITY);

        // The two consumers below are the only writers of the registry.
        let registry = self.registry.clone();
        tokio::spawn(async move {
            while let Some(handle) = activate_rx.recv().await {
                debug!(peer_id = %handle.peer_id, addr = %handle.addr, "peer active");
                registry.insert(handle);
            }
        });

        let registry = self.registry.clone();
        tokio::spawn(async move {
            while let Some(peer_id) = deactivate_rx.recv().await {
                debug!(peer_id = %peer_id, "peer inactive");
                registry.remove(&peer_id);
            }
        });

        for addr in peers {
            let info_hash = self.descriptor.info_hash;
            let local_peer_id = self.local_peer_id;
            let activate = activate_tx.clone();
            let deactivate = deactivate_tx.clone();

            tokio::spawn(async move {
                PeerConnection::new(addr)
                    .run(info_hash, local_peer_id, activate, deactivate)
                    .await;
            });
        }

        // The clones held by connection tasks keep the consumers alive;
        // once the last connection ends, both drain and exit.
        Ok(())
    }

    /// A snapshot of the peers we may currently request data from. This is
    /// where a piece scheduler would pick its targets.
    pub fn active_peers(&self) -> Vec<PeerHandle> {
        self.registry.snapshot()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
