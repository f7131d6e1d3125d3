use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::peer::{PeerHandle, PeerId};

/// The set of currently active (unchoked) peers, keyed by remote peer id.
///
/// A peer appears here if and only if its connection is open and the remote
/// is not choking us. Writes happen only in the session's two notification
/// consumers; every access goes through the single lock, so readers always
/// see a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<HashMap<PeerId, PeerHandle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn insert(&self, handle: PeerHandle) {
        self.inner.lock().insert(handle.peer_id, handle);
    }

    pub(super) fn remove(&self, peer_id: &PeerId) {
        self.inner.lock().remove(peer_id);
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.inner.lock().contains_key(peer_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// A point-in-time copy of every active peer.
    pub fn snapshot(&self) -> Vec<PeerHandle> {
        self.inner.lock().values().copied().collect()
    }
}
