// ==============================================================================
// annotation/document.rs - Persisted annotation response
// ==============================================================================
// Description: Writes and reads the verbatim annotation response file
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2025-11-24
// Version: 1.0.0
// ==============================================================================

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw annotation response as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDocument {
    pub path: PathBuf,
    pub text: String,
}

impl AnnotationDocument {
    /// Write `text` unmodified to `path`, creating or truncating the file
    pub fn persist(path: impl AsRef<Path>, text: String) -> io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, text.as_bytes())?;
        debug!("Wrote {} bytes to {}", text.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Read a previously persisted document back
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Lowercase hex SHA-256 of the document bytes
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
