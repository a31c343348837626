//! Blocking HTTP client for the REDCap Web API.

use std::path::PathBuf;

use lake_model::{ExportedFile, FieldMetadata, LakeLayout, RedcapConfig};
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::{RedcapError, Result};
use crate::export::{self, ExportOptions};
use crate::form::encode_form;
use crate::metadata;

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("redcap-lake/", env!("CARGO_PKG_VERSION"));

/// Stands in for an error response body that could not be read.
const UNREADABLE_BODY: &str = "<unreadable body>";

/// Content type of every REDCap API request.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client bound to one REDCap project (API URL + token).
///
/// The underlying [`reqwest::blocking::Client`] is injectable so callers own
/// timeout and proxy configuration.
#[derive(Debug, Clone)]
pub struct RedcapClient {
    config: RedcapConfig,
    http: Client,
}

impl RedcapClient {
    /// Creates a client with reqwest's default settings.
    pub fn new(config: RedcapConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self::with_http_client(config, http))
    }

    /// Creates a client around a preconfigured HTTP client.
    pub fn with_http_client(config: RedcapConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &RedcapConfig {
        &self.config
    }

    /// Fetches the data dictionary, optionally restricted to `forms`.
    pub fn fetch_metadata(&self, forms: &[String]) -> Result<Vec<FieldMetadata>> {
        let params = metadata::metadata_params(self.config.token(), forms);
        let response = self.post_form(&params)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedcapError::MetadataRequest {
                status: status.as_u16(),
                body: error_body(response.text()),
            });
        }

        let body = response.bytes()?;
        serde_json::from_slice(&body).map_err(|e| RedcapError::MetadataParse {
            message: e.to_string(),
        })
    }

    /// Returns the ordered, de-duplicated names of exportable fields.
    ///
    /// Fields of type descriptive, file, sql and signature are left out
    /// unless `include_nondata` is set.
    pub fn resolve_fields(&self, forms: &[String], include_nondata: bool) -> Result<Vec<String>> {
        let records = self.fetch_metadata(forms)?;
        let fields = lake_model::exportable_field_names(&records, include_nondata);
        debug!(
            records = records.len(),
            fields = fields.len(),
            include_nondata,
            "Resolved exportable fields"
        );
        Ok(fields)
    }

    /// Exports records and writes them under `<lake_root>/ingests`.
    pub fn export_records(
        &self,
        layout: &LakeLayout,
        options: &ExportOptions,
    ) -> Result<ExportedFile> {
        export::export_records(self, layout, options)
    }

    /// Exports records and returns the absolute path of the written file.
    pub fn export(&self, layout: &LakeLayout, options: &ExportOptions) -> Result<PathBuf> {
        self.export_records(layout, options).map(|file| file.path)
    }

    /// Sends one form-encoded POST to the API endpoint.
    pub(crate) fn post_form<K, V>(&self, params: &[(K, V)]) -> Result<Response>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let content = params
            .iter()
            .find(|(k, _)| k.as_ref() == "content")
            .map_or("", |(_, v)| v.as_ref());
        debug!(url = %self.config.api_url(), content, "POST REDCap API");

        let response = self
            .http
            .post(self.config.api_url())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_form(params))
            .send()?;

        debug!(status = %response.status(), "REDCap API responded");
        Ok(response)
    }
}

/// Diagnostic text of a non-2xx response.
pub(crate) fn error_body(body: reqwest::Result<String>) -> String {
    body.unwrap_or_else(|error| {
        debug!(%error, "Failed to read REDCap error response body");
        UNREADABLE_BODY.to_string()
    })
}
