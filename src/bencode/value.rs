use bytes::Bytes;
use std::collections::BTreeMap;

use super::error::BencodeError;

/// A decoded bencode value.
///
/// Byte strings are kept as raw [`Bytes`] since bencode strings are not
/// required to be valid UTF-8 (piece hashes and compact peer lists are
/// arbitrary binary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Value>),
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Creates a byte-string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key if this value is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Looks up a key in a dictionary, failing if the value is not a
    /// dictionary or the key is absent.
    pub fn require(&self, key: &'static str) -> Result<&Value, BencodeError> {
        let dict = self.as_dict().ok_or(BencodeError::TypeMismatch {
            field: key,
            expected: "dict",
        })?;
        dict.get(key.as_bytes())
            .ok_or(BencodeError::MissingField(key))
    }

    /// Extracts a required integer field from a dictionary.
    pub fn require_integer(&self, key: &'static str) -> Result<i64, BencodeError> {
        self.require(key)?
            .as_integer()
            .ok_or(BencodeError::TypeMismatch {
                field: key,
                expected: "integer",
            })
    }

    /// Extracts a required byte-string field from a dictionary.
    pub fn require_bytes(&self, key: &'static str) -> Result<&Bytes, BencodeError> {
        self.require(key)?
            .as_bytes()
            .ok_or(BencodeError::TypeMismatch {
                field: key,
                expected: "bytes",
            })
    }

    /// Extracts a required UTF-8 string field from a dictionary.
    pub fn require_str(&self, key: &'static str) -> Result<&str, BencodeError> {
        self.require(key)?
            .as_str()
            .ok_or(BencodeError::TypeMismatch {
                field: key,
                expected: "utf-8 string",
            })
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(d)
    }
}
