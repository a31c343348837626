//! Export request parameters and the files they produce.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Form parameters of a REDCap EAV record export.
///
/// The shape is fixed; only the token and the field/form selections vary.
/// The token is never serialized and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(skip_serializing, default)]
    pub token: String,
    pub content: String,
    pub action: String,
    pub format: String,
    #[serde(rename = "type")]
    pub export_type: String,
    /// Comma-joined field names, in request order.
    pub fields: String,
    /// Comma-joined instrument names, in request order.
    pub forms: String,
    #[serde(rename = "csvDelimiter")]
    pub csv_delimiter: String,
    #[serde(rename = "returnFormat")]
    pub return_format: String,
}

impl ExportRequest {
    /// Builds the EAV/CSV export request for the given selections.
    pub fn eav_csv(token: impl Into<String>, forms: &[String], fields: &[String]) -> Self {
        Self {
            token: token.into(),
            content: "record".to_string(),
            action: "export".to_string(),
            format: "csv".to_string(),
            export_type: "eav".to_string(),
            fields: fields.join(","),
            forms: forms.join(","),
            csv_delimiter: ",".to_string(),
            return_format: "json".to_string(),
        }
    }

    /// Form body parameters in wire order.
    pub fn form_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("token", self.token.as_str()),
            ("content", self.content.as_str()),
            ("action", self.action.as_str()),
            ("format", self.format.as_str()),
            ("type", self.export_type.as_str()),
            ("fields", self.fields.as_str()),
            ("forms", self.forms.as_str()),
            ("csvDelimiter", self.csv_delimiter.as_str()),
            ("returnFormat", self.return_format.as_str()),
        ]
    }

    /// File extension matching the requested format.
    pub fn file_extension(&self) -> &str {
        &self.format
    }
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field("token", &"[REDACTED]")
            .field("content", &self.content)
            .field("action", &self.action)
            .field("format", &self.format)
            .field("type", &self.export_type)
            .field("fields", &self.fields)
            .field("forms", &self.forms)
            .field("csvDelimiter", &self.csv_delimiter)
            .field("returnFormat", &self.return_format)
            .finish()
    }
}

/// How the response bytes were written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEncoding {
    /// Byte-for-byte copy of the response body.
    Raw,
    /// Transcoded from the legacy 8-bit encoding to UTF-8.
    Decoded,
}

/// A file written by one export call. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    /// Absolute path of the written file.
    pub path: PathBuf,
    pub encoding: FileEncoding,
    pub created_at: DateTime<Utc>,
    pub origin_query: ExportRequest,
}
