use std::fmt;

use rand::Rng as _;

const PEER_ID_PREFIX: &[u8] = b"-SB0001-";
const SESSION_ID_RUNES: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A 20-byte peer identifier.
///
/// Locally generated ids follow the Azureus convention: the 8-byte client
/// prefix `-SB0001-` followed by a 12-character random session suffix drawn
/// from ASCII letters. One id is generated per session and shared by every
/// connection and announce in that session. Remote ids are arbitrary bytes
/// received in handshakes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub [u8; 20]);

impl PeerId {
    /// Generates a fresh session peer id.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut id = [0u8; 20];
        id[..8].copy_from_slice(PEER_ID_PREFIX);
        for byte in &mut id[8..] {
            *byte = SESSION_ID_RUNES[rng.random_range(0..SESSION_ID_RUNES.len())];
        }
        Self(id)
    }

    /// Wraps a 20-byte slice, or `None` if the length is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut id = [0u8; 20];
        if bytes.len() != 20 {
            return None;
        }
        id.copy_from_slice(bytes);
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The client identifier, if the id follows the `-XXXXXX-` convention.
    pub fn client_id(&self) -> Option<&str> {
        if self.0[0] == b'-' && self.0[7] == b'-' {
            std::str::from_utf8(&self.0[1..7]).ok()
        } else {
            None
        }
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            if byte.is_ascii_alphanumeric() || *byte == b'-' {
                write!(f, "{}", *byte as char)?;
            } else {
                write!(f, "%{:02x}", byte)?;
            }
        }
        Ok(())
    }
}
