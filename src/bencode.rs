//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used by `.torrent` files and HTTP
//! tracker responses. It has four data types: integers (`i42e`), byte
//! strings (`4:spam`), lists (`l...e`), and dictionaries (`d...e`, keys
//! sorted lexicographically).
//!
//! Decoded data is represented as a [`Value`] tree. Consumers that expect a
//! particular shape use the fallible accessors ([`Value::require`],
//! [`Value::require_bytes`], ...) which turn a missing key or a wrong type
//! into a typed [`BencodeError`] instead of a panic.
//!
//! ```
//! use swarmbit::bencode::decode;
//!
//! let value = decode(b"d8:intervali1800e5:peers0:e").unwrap();
//! assert_eq!(value.require("interval").unwrap().as_integer(), Some(1800));
//! assert!(value.require("missing").is_err());
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::BencodeError;
pub use value::Value;
