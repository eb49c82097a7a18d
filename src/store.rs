//! JSON file persistence for the [`Ledger`].

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ladder::Ledger;

/// Errors that can occur when reading or writing the ledger file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Whole-file JSON store. Every save rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger from disk.
    ///
    /// A missing file, or one that does not decode as a ledger, is replaced
    /// with an empty ledger which is written out before returning. Only I/O
    /// failures other than "not found" are returned as errors.
    pub fn load(&self) -> Result<Ledger, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Ledger>(&bytes) {
                Ok(ledger) => {
                    debug!(
                        path = %self.path.display(),
                        players = ledger.players.len(),
                        matches = ledger.matches.len(),
                        "ledger loaded"
                    );
                    return Ok(ledger);
                }
                Err(e) => {
                    warn!(path = %self.path.display(), reason = %e, "discarding unreadable ledger");
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no ledger file, starting fresh");
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        let ledger = Ledger::default();
        self.save(&ledger)?;
        Ok(ledger)
    }

    /// Overwrite the backing file with `ledger`.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let bytes = encode(ledger)?;
        fs::write(&self.path, bytes).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Pretty-print with 4-space indentation.
fn encode(ledger: &Ledger) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    ledger.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
