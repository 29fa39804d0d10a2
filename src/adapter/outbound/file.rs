//! JSON file delivered-trade log.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::delivered::DeliveredRecord;
use crate::error::Result;
use crate::port::DeliveredLog;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogFile {
    version: u32,
    records: Vec<DeliveredRecord>,
}

const FORMAT_VERSION: u32 = 1;

/// [`DeliveredLog`] stored as one JSON document.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash leaves either the old or the new document on disk.
pub struct FileDeliveredLog {
    path: PathBuf,
}

impl FileDeliveredLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DeliveredLog for FileDeliveredLog {
    fn load(&self) -> Result<Vec<DeliveredRecord>> {
        let contents = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<LogFile>(&contents) {
            Ok(file) => Ok(file.records),
            Err(e) => {
                // A corrupt log only costs redundant deliveries; start empty.
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable delivered log");
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, records: &[DeliveredRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_vec_pretty(&LogFile {
            version: FORMAT_VERSION,
            records: records.to_vec(),
        })?;

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
