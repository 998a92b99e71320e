use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{SRS_DATA_KEY, SrsData};

/// Key-value store backed by one JSON file per key under the app data dir.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reibun");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.file_path(key);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("ignoring unreadable {}: {e}", path.display());
                T::default()
            }),
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_srs_data(&self) -> SrsData {
        self.load(SRS_DATA_KEY)
    }

    pub fn save_srs_data(&self, data: &SrsData) -> Result<()> {
        self.save(SRS_DATA_KEY, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_srs_data_is_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.load_srs_data().is_empty());
    }

    #[test]
    fn test_srs_data_persists_under_key() {
        let (dir, store) = make_test_store();
        let mut data = SrsData::default();
        data.levels.insert(3, 2);
        store.save_srs_data(&data).unwrap();

        assert!(dir.path().join("srsData.json").exists());
        assert!(!dir.path().join("srsData.tmp").exists());
        assert_eq!(store.load_srs_data(), data);
    }

    #[test]
    fn test_corrupt_srs_data_falls_back_to_empty() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join("srsData.json"), "not json").unwrap();
        assert!(store.load_srs_data().is_empty());
    }
}
