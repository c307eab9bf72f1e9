//! Upload Payload Parser
//!
//! Turns an uploaded byte stream plus its declared filename into a sequence of
//! candidate employee records, or a structured failure. The format is derived
//! from the filename extension alone; the content is never sniffed.

use thiserror::Error;

use crate::records::types::Employee;

/// Number of positional fields in a delimited-text row: name, email, tel, joined.
const CSV_FIELD_COUNT: usize = 4;

/// Client-correctable failures of the upload decode path.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The filename carries no extension, so no format can be derived.
    #[error("uploaded filename has no extension")]
    MissingExtension,
    /// The extension names a format this service does not ingest.
    #[error("unsupported upload format: .{0}")]
    UnsupportedFormat(String),
    /// The stream is empty or does not decode as the declared format.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Upload formats derivable from a filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Json,
    Csv,
}

impl UploadFormat {
    /// Derives the format from a filename, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ParseError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .ok_or(ParseError::MissingExtension)?;

        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decodes an uploaded byte stream into candidate records.
///
/// Output order is input order: array order for JSON, surviving line order
/// for CSV.
pub fn parse_upload(bytes: &[u8], filename: &str) -> Result<Vec<Employee>, ParseError> {
    match UploadFormat::from_filename(filename)? {
        UploadFormat::Json => parse_json(bytes),
        UploadFormat::Csv => parse_csv(bytes),
    }
}

/// Decodes the full stream as a JSON array of employee objects.
///
/// An empty array is a successful decode; rejecting it is the pipeline's job,
/// not the parser's.
fn parse_json(bytes: &[u8]) -> Result<Vec<Employee>, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::MalformedPayload("uploaded file is empty".to_string()));
    }

    serde_json::from_slice(bytes)
        .map_err(|err| ParseError::MalformedPayload(format!("invalid JSON: {err}")))
}

/// Decodes the stream as comma-delimited text with the fixed column layout
/// `name,email,tel,joined`.
///
/// Lines whose field count is not exactly 4 are skipped, not rejected: a
/// partially well-formed file still ingests its good rows. There is no header
/// detection and no quote handling, so a value containing a comma misparses.
fn parse_csv(bytes: &[u8]) -> Result<Vec<Employee>, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::MalformedPayload("uploaded file is empty".to_string()));
    }

    let text = String::from_utf8_lossy(bytes);
    let mut candidates = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != CSV_FIELD_COUNT {
            tracing::debug!(
                "skipping line {} with {} fields (expected {})",
                line_no + 1,
                fields.len(),
                CSV_FIELD_COUNT
            );
            continue;
        }

        candidates.push(Employee {
            name: fields[0].trim().to_string(),
            email: optional_field(fields[1]),
            tel: optional_field(fields[2]),
            joined: optional_field(fields[3]),
        });
    }

    Ok(candidates)
}

fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
