use sift_common::PostingRecord;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for the records of a run.
pub trait RecordSink {
    /// Persist `records` in order. Called at most once per run.
    fn write(&mut self, records: &[PostingRecord]) -> Result<(), SinkError>;

    /// Human-readable destination for logs.
    fn describe(&self) -> String;
}

/// Writes records as a UTF-8 CSV table: one header row named after the
/// record fields, then one row per record.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, records: &[PostingRecord]) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
