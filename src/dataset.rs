//! Reading plan datasets and writing export bundles.
//!
//! A dataset is a JSON array of plan objects. Each plan maps category names
//! (and a few reserved metadata keys) to geometry values; see
//! [`crate::geometry::geojson`] for the accepted geometry encodings.
//!
//! The export bundle is a JSON array of [`PlanExportRecord`]s in processing
//! order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::ExportError;
use crate::export::PlanExportRecord;
use crate::plan::Plan;

/// Reads a whole dataset into memory.
///
/// # Errors
/// [`ExportError::DatasetNotFound`] if `path` does not exist, and
/// [`ExportError::DatasetParse`] if it is not a JSON array of objects.
pub fn read_dataset(path: &Path) -> Result<Vec<Plan>, ExportError> {
    if !path.exists() {
        return Err(ExportError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(ExportError::Io)?;
    let reader = BufReader::new(file);

    let plans: Vec<Plan> =
        serde_json::from_reader(reader).map_err(|source| ExportError::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path:? = path, plans = plans.len(); "Loaded dataset");
    Ok(plans)
}

/// Writes an export bundle to a file.
///
/// The file is only created once serialization is known to succeed, so a
/// failed export never leaves a partial document behind.
pub fn write_export(
    path: &Path,
    records: &[PlanExportRecord],
    pretty: bool,
) -> Result<(), ExportError> {
    let json = to_json_string(records, pretty).map_err(|source| ExportError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    let file = File::create(path).map_err(|source| ExportError::OutputCreate {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(path:? = path, records = records.len(); "Wrote export bundle");
    Ok(())
}

/// Parses a dataset from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Vec<Plan>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a dataset from raw bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<Plan>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes an export bundle, compact or indented by two spaces.
pub fn to_json_string(
    records: &[PlanExportRecord],
    pretty: bool,
) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    }
}
