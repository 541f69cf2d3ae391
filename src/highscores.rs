//! All-time high score
//!
//! Read once at startup, written only when beaten. Storage failures never
//! interrupt play: reads fall back to 0 and writes are logged and dropped.

use crate::persistence::IntStore;

/// The persisted best score
pub struct HighScore {
    best: u64,
    store: Box<dyn IntStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Load the stored best score (0 when missing or unreadable)
    pub fn load(store: Box<dyn IntStore>) -> Self {
        let best = match store.load() {
            Ok(Some(best)) => {
                log::info!("Loaded high score {best}");
                best
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("{e}; high score reset to 0");
                0
            }
        };
        Self { best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record `score` if it beats the best. Returns true when it did.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.save(score) {
            log::warn!("Could not save high score {score}: {e}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError, TextFileStore};
    use std::rc::Rc;

    struct BrokenStore;

    impl IntStore for BrokenStore {
        fn load(&self) -> Result<Option<u64>, StoreError> {
            Err(StoreError::Io {
                path: "broken".into(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn save(&self, _value: u64) -> Result<(), StoreError> {
            self.load().map(|_| ())
        }
    }

    #[test]
    fn test_only_writes_when_beaten() {
        let store = Rc::new(MemoryStore::with_value(500));
        let mut hs = HighScore::load(Box::new(store.clone()));
        assert_eq!(hs.best(), 500);

        assert!(!hs.submit(400));
        assert!(!hs.submit(500));
        assert_eq!(store.writes(), 0);

        assert!(hs.submit(650));
        assert_eq!(hs.best(), 650);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let mut hs = HighScore::load(Box::new(BrokenStore));
        assert_eq!(hs.best(), 0);
        assert!(hs.submit(10));
        assert_eq!(hs.best(), 10);
    }

    #[test]
    fn test_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.txt");

        let mut first = HighScore::load(Box::new(TextFileStore::new(&path)));
        first.submit(1_230);
        drop(first);

        let second = HighScore::load(Box::new(TextFileStore::new(&path)));
        assert_eq!(second.best(), 1_230);
    }

    #[test]
    fn test_corrupt_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.txt");
        std::fs::write(&path, "{not a number").unwrap();
        let hs = HighScore::load(Box::new(TextFileStore::new(&path)));
        assert_eq!(hs.best(), 0);
    }
}
