//! Persistence boundary for normalized records.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::DelegationRecord;


pub trait Store {
    fn save(&self, records: &[DelegationRecord]) -> Result<()>;
    fn load(&self) -> Result<Vec<DelegationRecord>>;
}


/// One normalized record per line, see `DelegationRecord`'s `Display`.
///
/// Saving writes a sibling temporary file and renames it over the target,
/// so a reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn save(&self, records: &[DelegationRecord]) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new().create(true).write(true).truncate(true)
                .open(&tmp_path)?;
            file.write_all(b"# source|registry|cc|type|start|value|date|status\n")?;
            for record in records {
                file.write_all(format!("{}\n", record).as_bytes())?;
            }
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        info!("Saved {} records to {:?}", records.len(), self.path);

        Ok(())
    }

    fn load(&self) -> Result<Vec<DelegationRecord>> {
        let content = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let record = line.parse::<DelegationRecord>()
                .map_err(|e| Error::ParseRecordError(format!("{:?} line#{}: {}", self.path, line_idx + 1, e)))?;
            records.push(record);
        }
        info!("Loaded {} records from {:?}", records.len(), self.path);

        Ok(records)
    }
}
