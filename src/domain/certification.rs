use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of the low-voltage certification comparison table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CertificationRecord {
    pub country: String,
    pub standards: String,
    pub grid: String,
    pub certification: String,
    /// Any further columns (regulator, plug types, ...) kept for search
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CertificationRecord {
    pub fn new(country: &str, standards: &str, grid: &str, certification: &str) -> Self {
        Self {
            country: country.to_string(),
            standards: standards.to_string(),
            grid: grid.to_string(),
            certification: certification.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// All string fields, fixed columns first
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.country.as_str(),
            self.standards.as_str(),
            self.grid.as_str(),
            self.certification.as_str(),
        ]
        .into_iter()
        .chain(self.extra.values().filter_map(Value::as_str))
    }

    /// Case-insensitive substring match over every string field
    pub fn matches(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.text_fields()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keep the records matching `keyword`; an empty keyword keeps everything
pub fn filter_records<'a>(
    records: &'a [CertificationRecord],
    keyword: &str,
) -> Vec<&'a CertificationRecord> {
    records.iter().filter(|r| r.matches(keyword)).collect()
}
