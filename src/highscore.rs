use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt store {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk. Writes go to a temporary file that is then renamed
/// over the original, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

/// The persisted best score
pub struct HighScoreBook {
    store: Box<dyn KeyValueStore>,
    key: String,
    best: u32,
}

impl HighScoreBook {
    /// Read the stored best. Any failure leaves it at 0.
    pub fn load(store: Box<dyn KeyValueStore>, key: &str) -> Self {
        let best = match store.get(key) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(score) => {
                    info!("Loaded high score {}", score);
                    score
                }
                Err(err) => {
                    warn!("Error loading high score: {:?} is not a score ({})", raw, err);
                    0
                }
            },
            Ok(None) => {
                info!("No high score saved yet");
                0
            }
            Err(err) => {
                warn!("Error loading high score: {}", err);
                0
            }
        };

        Self {
            store,
            key: key.to_string(),
            best,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Persist `score` if it beats the stored best.
    ///
    /// Returns true when the score is a new best. The in-memory best updates
    /// even if the write fails.
    pub fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        match self.store.set(&self.key, &score.to_string()) {
            Ok(()) => info!("High score {} saved", score),
            Err(err) => warn!("Error saving high score: {}", err),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records writes; optionally fails every call
    #[derive(Default, Clone)]
    struct SpyStore {
        writes: Rc<RefCell<Vec<(String, String)>>>,
        stored: Option<String>,
        fail: bool,
    }

    impl KeyValueStore for SpyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            if self.fail {
                return Err(StoreError::Io {
                    path: PathBuf::from("spy"),
                    source: std::io::Error::other("disk gone"),
                });
            }
            Ok(self.stored.clone())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.writes
                .borrow_mut()
                .push((key.to_string(), value.to_string()));
            if self.fail {
                return Err(StoreError::Io {
                    path: PathBuf::from("spy"),
                    source: std::io::Error::other("disk gone"),
                });
            }
            Ok(())
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tilt_cannon_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_load_reads_stored_score() {
        let mut store = MemoryStore::new();
        store.set("highScore", "120").unwrap();
        let book = HighScoreBook::load(Box::new(store), "highScore");
        assert_eq!(book.best(), 120);
    }

    #[test]
    fn test_load_defaults_to_zero() {
        let book = HighScoreBook::load(Box::new(MemoryStore::new()), "highScore");
        assert_eq!(book.best(), 0);
    }

    #[test]
    fn test_unparsable_value_defaults_to_zero() {
        let spy = SpyStore {
            stored: Some("lots".to_string()),
            ..SpyStore::default()
        };
        let book = HighScoreBook::load(Box::new(spy), "highScore");
        assert_eq!(book.best(), 0);
    }

    #[test]
    fn test_read_failure_defaults_to_zero() {
        let spy = SpyStore {
            stored: Some("500".to_string()),
            fail: true,
            ..SpyStore::default()
        };
        let book = HighScoreBook::load(Box::new(spy), "highScore");
        assert_eq!(book.best(), 0);
    }

    #[test]
    fn test_only_higher_scores_are_written() {
        let spy = SpyStore {
            stored: Some("100".to_string()),
            ..SpyStore::default()
        };
        let writes = spy.writes.clone();
        let mut book = HighScoreBook::load(Box::new(spy), "highScore");

        assert!(!book.submit(90));
        assert!(!book.submit(100));
        assert!(writes.borrow().is_empty());

        assert!(book.submit(110));
        assert_eq!(
            *writes.borrow(),
            vec![("highScore".to_string(), "110".to_string())]
        );
        assert_eq!(book.best(), 110);
    }

    #[test]
    fn test_write_failure_still_updates_best() {
        let spy = SpyStore {
            fail: true,
            ..SpyStore::default()
        };
        let mut book = HighScoreBook::load(Box::new(spy), "highScore");
        assert!(book.submit(40));
        assert_eq!(book.best(), 40);
    }

    #[test]
    fn test_json_store_round_trips_between_instances() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("highScore").unwrap(), None);
        store.set("highScore", "70").unwrap();
        store.set("other", "x").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("highScore").unwrap(), Some("70".to_string()));
        assert_eq!(reopened.get("other").unwrap(), Some("x".to_string()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_reports_corruption() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("highScore"),
            Err(StoreError::Corrupt { .. })
        ));

        // The book degrades to 0 instead of failing
        let book = HighScoreBook::load(Box::new(store), "highScore");
        assert_eq!(book.best(), 0);

        let _ = fs::remove_file(&path);
    }
}
