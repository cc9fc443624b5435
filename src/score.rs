use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const STORAGE_FILE_NAME: &str = "storage.json";

/// Key-value contents of the storage file.
///
/// The high score is kept as a raw value so a malformed entry can be
/// reported and replaced instead of failing the whole file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    #[serde(
        rename = "snakeHighScore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    high_score: Option<serde_json::Value>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode storage file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable home of the high score.
pub trait ScoreStorage {
    /// Returns the stored high score, or 0 when missing or unreadable.
    fn load(&self) -> u32;

    /// Persists `value` as the new high score.
    fn save(&mut self, value: u32) -> Result<(), ScoreError>;
}

impl<T: ScoreStorage + ?Sized> ScoreStorage for Box<T> {
    fn load(&self) -> u32 {
        (**self).load()
    }

    fn save(&mut self, value: u32) -> Result<(), ScoreError> {
        (**self).save(value)
    }
}

/// Returns the platform-correct storage file path.
#[must_use]
pub fn storage_path() -> PathBuf {
    data_dir().join(STORAGE_FILE_NAME)
}

/// Returns the per-user application data directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

/// JSON key-value file holding the high score under `snakeHighScore`.
///
/// Unrelated keys already in the file are kept on save.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> io::Result<StorageFile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StorageFile::default()),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ScoreStorage for JsonScoreStore {
    fn load(&self) -> u32 {
        let file = match self.read_file() {
            Ok(file) => file,
            Err(error) => {
                warn!("ignoring unreadable score file {}: {error}", self.path.display());
                return 0;
            }
        };

        match &file.high_score {
            None => 0,
            Some(value) => parse_score(value).unwrap_or_else(|| {
                warn!("ignoring malformed high score {value} in {}", self.path.display());
                0
            }),
        }
    }

    fn save(&mut self, value: u32) -> Result<(), ScoreError> {
        // A corrupt file is replaced rather than blocking the save.
        let mut file = self.read_file().unwrap_or_default();
        file.high_score = Some(serde_json::Value::from(value));

        let json = serde_json::to_string_pretty(&file)?;
        let io_error = |source: io::Error| ScoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&self.path, json).map_err(io_error)
    }
}

/// Accepts non-negative integers, either as JSON numbers or numeric strings.
fn parse_score(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Volatile store, used by tests and by `--no-save` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub value: Option<u32>,
    pub saves: usize,
}

impl ScoreStorage for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, value: u32) -> Result<(), ScoreError> {
        self.value = Some(value);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{JsonScoreStore, ScoreStorage};
    use crate::config::HIGH_SCORE_KEY;

    #[test]
    fn saved_score_survives_a_new_store() {
        let path = unique_test_path("persist");

        JsonScoreStore::new(path.clone())
            .save(42)
            .expect("score save should succeed");
        let loaded = JsonScoreStore::new(path.clone()).load();

        assert_eq!(loaded, 42);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_storage_file_returns_zero() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        assert_eq!(JsonScoreStore::new(path).load(), 0);
    }

    #[test]
    fn malformed_storage_file_returns_zero() {
        let path = unique_test_path("malformed");
        write_raw(&path, "not-json");

        assert_eq!(JsonScoreStore::new(path.clone()).load(), 0);
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_value_returns_zero() {
        let path = unique_test_path("bad-value");
        write_raw(&path, r#"{"snakeHighScore": "lots"}"#);

        assert_eq!(JsonScoreStore::new(path.clone()).load(), 0);
        cleanup_test_path(&path);
    }

    #[test]
    fn numeric_string_value_is_accepted() {
        let path = unique_test_path("string-value");
        write_raw(&path, r#"{"snakeHighScore": "17"}"#);

        assert_eq!(JsonScoreStore::new(path.clone()).load(), 17);
        cleanup_test_path(&path);
    }

    #[test]
    fn save_keeps_unrelated_keys() {
        let path = unique_test_path("other-keys");
        write_raw(&path, r#"{"theme": "dark", "snakeHighScore": 3}"#);

        let mut store = JsonScoreStore::new(path.clone());
        store.save(9).expect("score save should succeed");

        let raw = fs::read_to_string(&path).expect("storage file should exist");
        let map: serde_json::Value = serde_json::from_str(&raw).expect("storage file is json");
        assert_eq!(map["theme"], "dark");
        assert_eq!(map[HIGH_SCORE_KEY], 9);
        cleanup_test_path(&path);
    }

    #[test]
    fn file_without_the_score_key_returns_zero() {
        let path = unique_test_path("no-key");
        write_raw(&path, r#"{"theme": "dark"}"#);

        assert_eq!(JsonScoreStore::new(path.clone()).load(), 0);
        cleanup_test_path(&path);
    }

    #[test]
    fn save_overwrites_corrupt_file() {
        let path = unique_test_path("overwrite");
        write_raw(&path, "{{{");

        let mut store = JsonScoreStore::new(path.clone());
        store.save(5).expect("score save should succeed");

        assert_eq!(store.load(), 5);
        cleanup_test_path(&path);
    }

    fn write_raw(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-score-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &Path) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
