//! Row describing a processed dump, as stored by the file catalog.
//!
//! Building the record is pure; writing it somewhere is the caller's job.

use crate::analysis::Analysis;
use crate::error::Result;
use crate::platform::{select_platform, PlatformProfile};
use crate::vin::Vin;
use serde::Serialize;
use tracing::debug;

/// Processing status of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Analyzed and accepted
    Processed,
}

/// Provenance of the values in a [`FileRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    /// Name the file was uploaded under
    pub original_name: String,
    /// Platform chosen for the file
    pub detected_platform: String,
    /// First VIN the scan found, if any
    pub detected_vin: Option<Vin>,
    /// VIN typed by the user, if any
    pub manual_vin: Option<Vin>,
}

/// One processed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Uploaded file name
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// Key under which the bytes are stored
    pub file_path: String,
    /// Platform name
    pub platform: String,
    /// Platform size label, e.g. `128KB EEPROM`
    pub eeprom_size: String,
    /// Manual VIN if given, else the detected one
    pub vin: Option<Vin>,
    /// Processing status
    pub status: RecordStatus,
    /// Provenance
    pub metadata: RecordMetadata,
}

/// Builds the record for an analyzed upload.
///
/// `platform` is required when several platforms match; `manual_vin`
/// overrides the detected VIN and is validated like any other VIN.
pub fn build_record(
    file_name: &str,
    content: &[u8],
    analysis: &Analysis,
    platform: Option<&str>,
    manual_vin: Option<&str>,
) -> Result<FileRecord> {
    let profile: &PlatformProfile = select_platform(content.len(), platform)?;
    let manual_vin = manual_vin
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Vin::parse)
        .transpose()?;
    let detected_vin = analysis.first_value;

    let record = FileRecord {
        file_name: file_name.to_string(),
        file_size: content.len() as u64,
        file_path: storage_path(file_name, content),
        platform: profile.name.to_string(),
        eeprom_size: profile.label.to_string(),
        vin: manual_vin.or(detected_vin),
        status: RecordStatus::Processed,
        metadata: RecordMetadata {
            original_name: file_name.to_string(),
            detected_platform: profile.name.to_string(),
            detected_vin,
            manual_vin,
        },
    };

    debug!("Built record for {} at {}", file_name, record.file_path);
    Ok(record)
}

/// Storage key for a dump: content digest prefix plus the original name
pub fn storage_path(file_name: &str, content: &[u8]) -> String {
    let hash = blake3::hash(content);
    format!("{}-{}", &hash.to_hex()[..16], file_name)
}
