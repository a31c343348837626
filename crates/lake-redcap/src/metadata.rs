//! Metadata-driven field discovery.

use lake_model::RedcapConfig;

use crate::client::RedcapClient;
use crate::error::Result;

/// Form parameters of a metadata request, in wire order.
pub fn metadata_params(token: &str, forms: &[String]) -> Vec<(String, String)> {
    let mut params = vec![
        ("token".to_string(), token.to_string()),
        ("content".to_string(), "metadata".to_string()),
        ("format".to_string(), "json".to_string()),
        ("returnFormat".to_string(), "json".to_string()),
    ];
    params.extend(
        forms
            .iter()
            .enumerate()
            .map(|(i, form)| (format!("forms[{i}]"), form.clone())),
    );
    params
}

/// Resolves the exportable field names of a project.
///
/// Convenience wrapper that builds a default [`RedcapClient`] for one call.
pub fn resolve_fields(
    config: &RedcapConfig,
    forms: &[String],
    include_nondata: bool,
) -> Result<Vec<String>> {
    RedcapClient::new(config.clone())?.resolve_fields(forms, include_nondata)
}
