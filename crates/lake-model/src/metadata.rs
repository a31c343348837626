//! REDCap field metadata (data dictionary) records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Field types that carry no exportable data value.
pub const NON_DATA_FIELD_TYPES: &[&str] = &["descriptive", "file", "sql", "signature"];

/// One row of the REDCap data dictionary.
///
/// REDCap returns many more attributes per field; only the ones used for
/// export planning are kept. Absent attributes parse as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(default)]
    pub field_name: String,

    #[serde(default)]
    pub field_type: String,

    /// Instrument the field belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
}

impl FieldMetadata {
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    /// Returns true when the field type holds no data (descriptive text, uploads, ...).
    #[must_use]
    pub fn is_non_data(&self) -> bool {
        NON_DATA_FIELD_TYPES
            .iter()
            .any(|t| self.field_type.trim().eq_ignore_ascii_case(t))
    }
}

/// Computes the ordered, de-duplicated list of exportable field names.
///
/// Records with a blank `field_name` are dropped. The first occurrence of a
/// name wins. Unless `include_nondata` is set, records whose type is listed in
/// [`NON_DATA_FIELD_TYPES`] are excluded.
pub fn exportable_field_names(records: &[FieldMetadata], include_nondata: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| !record.field_name.trim().is_empty())
        .filter(|record| include_nondata || !record.is_non_data())
        .filter(|record| seen.insert(record.field_name.as_str()))
        .map(|record| record.field_name.clone())
        .collect()
}
