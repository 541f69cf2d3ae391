//! Single-value persistence
//!
//! Stores one integer per backing location. The file format is the decimal
//! number as plain text (a valid JSON document, parsed with serde_json).

use std::cell::Cell;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while reading or writing a stored value
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt value in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Somewhere a single integer can be kept between runs
pub trait IntStore {
    /// Read the stored value. A missing value is `Ok(None)`.
    fn load(&self) -> Result<Option<u64>, StoreError>;
    fn save(&self, value: u64) -> Result<(), StoreError>;
}

/// An integer kept in a small text file
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntStore for TextFileStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str::<u64>(text.trim())
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, value: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, value.to_string()).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Cell<Option<u64>>,
    writes: Cell<u32>,
}

impl MemoryStore {
    pub fn with_value(value: u64) -> Self {
        Self {
            value: Cell::new(Some(value)),
            writes: Cell::new(0),
        }
    }

    /// Number of successful saves
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl IntStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value.get())
    }

    fn save(&self, value: u64) -> Result<(), StoreError> {
        self.value.set(Some(value));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl<T: IntStore + ?Sized> IntStore for std::rc::Rc<T> {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        (**self).load()
    }

    fn save(&self, value: u64) -> Result<(), StoreError> {
        (**self).save(value)
    }
}
