use serde::{Deserialize, Serialize};

/// One dataset row as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: i64,
    pub name: String,
    pub source: String,
    pub record_count: u64,
    pub description: Option<String>,
}

/// Optional server-side constraints for a dataset query.
///
/// Values are kept exactly as typed; `None` means unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    source: Option<String>,
    min_records: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from raw form input. Empty inputs become unconstrained.
    pub fn from_inputs(source: impl Into<String>, min_records: impl Into<String>) -> Self {
        Self {
            source: non_empty(source.into()),
            min_records: non_empty(min_records.into()),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn min_records(&self) -> Option<&str> {
        self.min_records.as_deref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.source.is_none() && self.min_records.is_none()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
