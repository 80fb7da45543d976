use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use super::model::{PrevalenceDataset, PrevalenceRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that stops a dataset from loading. Every variant is fatal for the
/// session: the viewer renders nothing rather than a partial table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("opening {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reading CSV header: {0}")]
    Header(#[source] csv::Error),

    #[error("CSV row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("dataset contains no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a prevalence table from a file. Only comma-separated files are
/// accepted (`.csv`, any case).
pub fn load_file(path: &Path) -> Result<PrevalenceDataset, DatasetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        return Err(DatasetError::UnsupportedExtension(ext));
    }

    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_csv(file)
}

/// Parse a prevalence table from any reader, e.g. an in-memory buffer.
pub fn load_csv<R: Read>(input: R) -> Result<PrevalenceDataset, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(input));
    read_records(reader)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least `location_id`, `location`,
/// `location_name`, `age_group_id`, `age_group`, `year`, `sex`, `sex_id`,
/// `metric`, `mean`, `lower` and `upper`. Column order does not matter and
/// extra columns (`unit`, `measure`, ...) are skipped.
fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<PrevalenceDataset, DatasetError> {
    // Surface a missing/garbled header separately from row errors.
    reader.headers().map_err(DatasetError::Header)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<PrevalenceRecord>().enumerate() {
        let record = result.map_err(|source| DatasetError::Row { row: row_no, source })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(PrevalenceDataset::from_records(records))
}
