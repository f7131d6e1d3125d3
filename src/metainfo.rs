//! Torrent descriptor handling ([BEP-3]).
//!
//! Parses `.torrent` files into a [`Descriptor`] and computes the
//! [`InfoHash`] over the canonical bencoding of the `info` dictionary. The
//! info-hash is computed exactly once, at load time; everything downstream
//! (handshakes, announces) treats it as an opaque 20-byte value.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod descriptor;
mod error;
mod info_hash;

pub use descriptor::{Descriptor, FileEntry};
pub use error::MetainfoError;
pub use info_hash::InfoHash;
