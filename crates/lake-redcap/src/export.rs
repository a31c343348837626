//! EAV record export to the lake's ingest directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use lake_model::{ExportRequest, ExportedFile, FileEncoding, LakeLayout, RedcapConfig};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{RedcapClient, error_body};
use crate::encoding::transcode_legacy;
use crate::error::{RedcapError, Result};

/// Prefix of every export file name.
const FILE_PREFIX: &str = "redcap_records";

/// Selections for one export call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Instruments to export; empty means all.
    pub forms: Vec<String>,
    /// Fields to export; empty means "resolve from metadata first".
    pub fields: Vec<String>,
    /// Transcode the payload from the legacy encoding to UTF-8.
    pub decode: bool,
}

impl ExportOptions {
    #[must_use]
    pub fn with_forms(mut self, forms: Vec<String>) -> Self {
        self.forms = forms;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_decode(mut self, decode: bool) -> Self {
        self.decode = decode;
        self
    }
}

/// Builds `redcap_records_<YYYYMMDD_HHMMSS>_<uuid>.<ext>` for `created_at`.
pub fn export_file_name(created_at: DateTime<Utc>, token: Uuid, extension: &str) -> String {
    format!(
        "{FILE_PREFIX}_{}_{token}.{extension}",
        created_at.with_timezone(&Local).format("%Y%m%d_%H%M%S")
    )
}

/// Exports records with a default client and returns the written path.
pub fn export(config: &RedcapConfig, layout: &LakeLayout, options: &ExportOptions) -> Result<PathBuf> {
    RedcapClient::new(config.clone())?.export(layout, options)
}

pub(crate) fn export_records(
    client: &RedcapClient,
    layout: &LakeLayout,
    options: &ExportOptions,
) -> Result<ExportedFile> {
    let fields = if options.fields.is_empty() {
        let resolved = client.resolve_fields(&options.forms, false)?;
        if resolved.is_empty() {
            warn!("No exportable fields found in metadata; REDCap will export all fields");
        }
        resolved
    } else {
        options.fields.clone()
    };

    let request = ExportRequest::eav_csv(client.config().token(), &options.forms, &fields);
    let response = client.post_form(&request.form_params())?;

    let status = response.status();
    if !status.is_success() {
        return Err(RedcapError::ExportRequest {
            status: status.as_u16(),
            body: error_body(response.text()),
        });
    }
    let body = response.bytes()?;

    let (contents, encoding) = if options.decode {
        (
            transcode_legacy(&body)?.into_bytes(),
            FileEncoding::Decoded,
        )
    } else {
        (body.to_vec(), FileEncoding::Raw)
    };

    let created_at = Utc::now();
    let dir = layout.ingests_dir();
    std::fs::create_dir_all(&dir).map_err(|e| RedcapError::FileSystem {
        action: "create directory",
        path: dir.clone(),
        source: e,
    })?;

    let name = export_file_name(created_at, Uuid::new_v4(), request.file_extension());
    let path = absolute(&dir.join(name))?;
    write_new_file(&path, &contents)?;

    info!(
        path = %path.display(),
        bytes = contents.len(),
        fields = fields.len(),
        decoded = options.decode,
        "Wrote REDCap export"
    );

    Ok(ExportedFile {
        path,
        encoding,
        created_at,
        origin_query: request,
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| RedcapError::FileSystem {
        action: "resolve",
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes `contents` to a file that must not exist yet.
fn write_new_file(path: &Path, contents: &[u8]) -> Result<()> {
    let to_error = |source| RedcapError::FileSystem {
        action: "write",
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(contents).map_err(to_error)?;
    file.flush().map_err(to_error)
}
