use bytes::Bytes;

/// The set of piece indices a peer has, one bit per piece.
///
/// Bit 0 is the high bit of byte 0 (wire order). The backing storage grows
/// on demand: a `have` message may name a piece index past the end of the
/// bitfield the peer originally sent, and that index must not be lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitfield {
    bits: Vec<u8>,
}

impl Bitfield {
    /// Creates an empty bitfield.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bitfield wholesale with a wire payload.
    pub fn from_bytes(bytes: &Bytes) -> Self {
        Self {
            bits: bytes.to_vec(),
        }
    }

    /// Returns true if the piece at `index` is marked available.
    pub fn has_piece(&self, index: usize) -> bool {
        match self.bits.get(index / 8) {
            Some(byte) => (byte >> (7 - index % 8)) & 1 == 1,
            None => false,
        }
    }

    /// Marks the piece at `index` available, growing storage if needed.
    pub fn set_piece(&mut self, index: usize) {
        let byte_index = index / 8;
        if byte_index >= self.bits.len() {
            self.bits.resize(byte_index + 1, 0);
        }
        self.bits[byte_index] |= 1 << (7 - index % 8);
    }

    /// Number of pieces marked available.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// The raw wire representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}
