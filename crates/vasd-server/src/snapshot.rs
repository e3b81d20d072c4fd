//! Snapshot artifact writer.
//!
//! After every recorded transaction the pipeline overwrites one JSON
//! document, `{latest, recent}`, that the external presentation API
//! polls. The write goes through a temp file and a rename so readers
//! never observe a half-written document, and writes are serialized so
//! concurrent handler tasks cannot interleave file contents.

use std::path::PathBuf;

use tokio::fs;
use tokio::sync::Mutex;
use vasd_core::SnapshotDoc;

use crate::error::ServerError;

/// Overwrites the snapshot artifact on request.
pub struct SnapshotWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<()>,
}

impl SnapshotWriter {
    /// Create a writer targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_path = path.clone().into_os_string();
        tmp_path.push(".tmp");
        Self { tmp_path: PathBuf::from(tmp_path), path, write_lock: Mutex::new(()) }
    }

    /// Serialize the document and atomically replace the snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Snapshot`]; the caller logs it and keeps
    /// the previous snapshot on disk.
    pub async fn write(&self, doc: &SnapshotDoc) -> Result<(), ServerError> {
        let json = serde_json::to_vec_pretty(doc)
            .map_err(|error| self.failed(error.to_string()))?;

        let _guard = self.write_lock.lock().await;
        fs::write(&self.tmp_path, &json).await.map_err(|error| self.failed(error.to_string()))?;
        fs::rename(&self.tmp_path, &self.path)
            .await
            .map_err(|error| self.failed(error.to_string()))?;
        Ok(())
    }

    fn failed(&self, reason: String) -> ServerError {
        ServerError::Snapshot { path: self.path.clone(), reason }
    }
}

#[cfg(test)]
mod tests {
    use vasd_core::{Sequencer, SnapshotDoc};
    use vasd_proto::Reading;

    use super::*;

    #[tokio::test]
    async fn writes_latest_and_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        let writer = SnapshotWriter::new(&path);

        let mut seq = Sequencer::new(0);
        let reading = Reading { lane: "2".into(), speed_kmh: 95, observed_at: None };
        seq.record(reading, "2024-01-01 10:00:00".into());
        writer.write(&seq.snapshot()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["latest"]["txn"], 1);
        assert_eq!(value["latest"]["speed"], 95);
        assert_eq!(value["latest"]["overspeed"], true);
        assert_eq!(value["recent"].as_array().map(Vec::len), Some(1));

        // The document round-trips through the typed form as well.
        let doc: SnapshotDoc = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc.latest.map(|t| t.txn_no), Some(1));
    }

    #[tokio::test]
    async fn overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        let writer = SnapshotWriter::new(&path);

        let mut seq = Sequencer::new(0);
        for speed in [30, 90] {
            let reading = Reading { lane: "1".into(), speed_kmh: speed, observed_at: None };
            seq.record(reading, "t".into());
            writer.write(&seq.snapshot()).await.unwrap();
        }

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["latest"]["txn"], 2);
        assert_eq!(value["recent"].as_array().map(Vec::len), Some(2));
    }
}
