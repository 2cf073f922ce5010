//! Persistence of the winning network in a single named slot.
//!
//! Networks are stored as a versioned JSON record of every level's weight
//! matrix and bias vector. Two backends are provided: one JSON file per slot
//! on disk, and an in-memory slot for headless runs and tests.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::brain::{Level, Network};

/// Version written into every record; other versions are rejected on load.
pub const RECORD_VERSION: u32 = 1;

/// Errors raised by a network store.
#[derive(Debug)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    Io(io::Error),
    /// The stored record is not valid JSON for a network.
    Format(serde_json::Error),
    /// The record was written by an incompatible version.
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "network store i/o failed: {e}"),
            Self::Format(e) => write!(f, "malformed network record: {e}"),
            Self::UnsupportedVersion { found } => write!(
                f,
                "unsupported network record version: {found} (expected {RECORD_VERSION})"
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

/// Serialized form of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Record format version.
    pub version: u32,
    /// Levels from input to output.
    pub levels: Vec<Level>,
}

impl NetworkRecord {
    /// Captures a network at the current record version.
    pub fn from_network(network: &Network) -> Self {
        Self {
            version: RECORD_VERSION,
            levels: network.levels.clone(),
        }
    }

    /// Rebuilds the network, rejecting records from other versions.
    pub fn into_network(self) -> Result<Network, StoreError> {
        if self.version != RECORD_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
            });
        }
        Ok(Network {
            levels: self.levels,
        })
    }

    /// Encodes a network as a JSON record.
    pub fn encode(network: &Network) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&Self::from_network(network))?)
    }

    /// Decodes a JSON record into a network.
    pub fn decode(json: &str) -> Result<Network, StoreError> {
        let record: Self = serde_json::from_str(json)?;
        record.into_network()
    }
}

/// A single durable slot holding at most one network.
pub trait NetworkStore {
    /// Writes the network, replacing any previous one.
    fn save(&mut self, network: &Network) -> Result<(), StoreError>;

    /// Reads the stored network, or `None` when the slot is empty.
    fn load(&self) -> Result<Option<Network>, StoreError>;

    /// Empties the slot. Discarding an empty slot succeeds.
    fn discard(&mut self) -> Result<(), StoreError>;
}

/// Stores the network as `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for `slot` inside `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
        }
    }

    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NetworkStore for FileStore {
    fn save(&mut self, network: &Network) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, NetworkRecord::encode(network)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Network>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => NetworkRecord::decode(&json).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the encoded record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose slot already holds `network`.
    pub fn with_network(network: &Network) -> Result<Self, StoreError> {
        Ok(Self {
            slot: Some(NetworkRecord::encode(network)?),
        })
    }

    /// Creates a store whose slot holds raw, possibly malformed, contents.
    pub fn from_raw(contents: impl Into<String>) -> Self {
        Self {
            slot: Some(contents.into()),
        }
    }

    /// Raw slot contents.
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl NetworkStore for MemoryStore {
    fn save(&mut self, network: &Network) -> Result<(), StoreError> {
        self.slot = Some(NetworkRecord::encode(network)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<Network>, StoreError> {
        self.slot
            .as_deref()
            .map(NetworkRecord::decode)
            .transpose()
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}
