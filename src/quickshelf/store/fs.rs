use super::KeyValue;
use crate::error::{Result, ShelfError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed key-value storage. Each key is one file under the root
/// directory. Writes go through a temp file and a rename, so a failed write
/// leaves the previous value on disk and a reader never sees a torn file.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ShelfError::Io)?;
        }
        Ok(())
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShelfError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(ShelfError::Io)?;
        fs::rename(&tmp, &path).map_err(ShelfError::Io)?;
        Ok(())
    }
}
