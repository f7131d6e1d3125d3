use std::fmt;
use std::path::{Path, PathBuf};

use crate::bencode::{decode, encode, Value};

use super::error::MetainfoError;
use super::info_hash::InfoHash;

/// A parsed `.torrent` descriptor.
///
/// Immutable once loaded. Either `announce` or `announce_list` identifies
/// the tracker endpoints; `announce_list` is a list of tiers, each an
/// ordered fallback set of equivalent URLs ([BEP-12]).
///
/// [BEP-12]: http://bittorrent.org/beps/bep_0012.html
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Identifier of this torrent, used in handshakes and announces.
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Multi-tier tracker list.
    pub announce_list: Vec<Vec<String>>,
    /// Suggested file name (single file) or directory name (multi file).
    pub name: String,
    /// Bytes per piece.
    pub piece_length: u64,
    /// Number of pieces (length of `pieces` / 20).
    pub piece_count: usize,
    /// Files described by the torrent; exactly one for single-file torrents.
    pub files: Vec<FileEntry>,
    /// If true, only the listed trackers may be used for discovery.
    pub private: bool,
    /// Unix timestamp when the torrent was created (display only).
    pub creation_date: Option<i64>,
    /// Free-form comment (display only).
    pub comment: Option<String>,
    /// Program that created the torrent (display only).
    pub created_by: Option<String>,
    /// Declared string encoding (display only).
    pub encoding: Option<String>,
}

/// One file within a torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the torrent root.
    pub path: PathBuf,
    /// Size in bytes.
    pub length: u64,
}

impl Descriptor {
    /// Reads and parses a `.torrent` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetainfoError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parses a descriptor from raw `.torrent` bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let root = decode(data)?;
        if root.as_dict().is_none() {
            return Err(MetainfoError::InvalidField("root"));
        }

        let info = root.require("info")?;
        if info.as_dict().is_none() {
            return Err(MetainfoError::InvalidField("info"));
        }

        // The info-hash is the SHA-1 of the canonical re-encoding of the
        // info dictionary, computed here and never again.
        let raw_info = encode(info)?;
        let info_hash = InfoHash::from_info_bytes(&raw_info);

        let name = info.require_str("name")?.to_string();
        let piece_length = non_negative(info.require_integer("piece length")?, "piece length")?;

        let pieces = info.require_bytes("pieces")?;
        if pieces.len() % 20 != 0 {
            return Err(MetainfoError::InvalidPiecesLength(pieces.len()));
        }
        let piece_count = pieces.len() / 20;

        let files = parse_files(info, &name)?;

        let announce = root
            .get(b"announce")
            .and_then(|v| v.as_str())
            .map(String::from);

        let announce_list = root
            .get(b"announce-list")
            .and_then(|v| v.as_list())
            .map(|tiers| {
                tiers
                    .iter()
                    .filter_map(|tier| tier.as_list())
                    .map(|urls| {
                        urls.iter()
                            .filter_map(|u| u.as_str().map(String::from))
                            .collect()
                    })
                    .collect()
            })
            .unwrap_or_default();

        let private = info
            .get(b"private")
            .and_then(|v| v.as_integer())
            .map(|v| v == 1)
            .unwrap_or(false);

        Ok(Self {
            info_hash,
            announce,
            announce_list,
            name,
            piece_length,
            piece_count,
            files,
            private,
            creation_date: root.get(b"creation date").and_then(|v| v.as_integer()),
            comment: optional_string(&root, b"comment"),
            created_by: optional_string(&root, b"created by"),
            encoding: optional_string(&root, b"encoding"),
        })
    }

    /// Sum of all declared file lengths; the `left` value for HTTP
    /// announces.
    pub fn total_length(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }

    /// Length of the first declared file, zero if none.
    pub fn first_file_length(&self) -> u64 {
        self.files.first().map(|f| f.length).unwrap_or(0)
    }

    /// True if the torrent describes more than one file.
    pub fn is_multi_file(&self) -> bool {
        self.files.len() > 1
    }
}

fn parse_files(info: &Value, name: &str) -> Result<Vec<FileEntry>, MetainfoError> {
    let Some(file_list) = info.get(b"files").and_then(|v| v.as_list()) else {
        // Single-file torrent: the info dict carries the length directly.
        let length = non_negative(info.require_integer("length")?, "length")?;
        return Ok(vec![FileEntry {
            path: PathBuf::from(name),
            length,
        }]);
    };

    let mut files = Vec::with_capacity(file_list.len());
    for entry in file_list {
        let length = non_negative(entry.require_integer("length")?, "length")?;
        let path = entry
            .require("path")?
            .as_list()
            .ok_or(MetainfoError::InvalidField("path"))?
            .iter()
            .filter_map(|p| p.as_str())
            .collect::<PathBuf>();
        files.push(FileEntry { path, length });
    }

    if files.is_empty() {
        return Err(MetainfoError::InvalidField("files"));
    }

    Ok(files)
}

fn non_negative(value: i64, field: &'static str) -> Result<u64, MetainfoError> {
    u64::try_from(value).map_err(|_| MetainfoError::InvalidField(field))
}

fn optional_string(root: &Value, key: &[u8]) -> Option<String> {
    root.get(key).and_then(|v| v.as_str()).map(String::from)
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Info hash: {}", self.info_hash)?;
        if let Some(announce) = &self.announce {
            writeln!(f, "Announce: {}", announce)?;
        }
        for (i, tier) in self.announce_list.iter().enumerate() {
            writeln!(f, "Tier {}: {}", i, tier.join(", "))?;
        }
        if let Some(comment) = &self.comment {
            writeln!(f, "Comment: {}", comment)?;
        }
        if let Some(created_by) = &self.created_by {
            writeln!(f, "Created by: {}", created_by)?;
        }
        writeln!(
            f,
            "Pieces: {} x {} bytes",
            self.piece_count, self.piece_length
        )?;
        for file in &self.files {
            writeln!(f, "  {} ({} bytes)", file.path.display(), file.length)?;
        }
        write!(f, "Total: {} bytes", self.total_length())
    }
}
