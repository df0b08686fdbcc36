use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One health evaluation as persisted on disk.
///
/// Field order here is the key order of the written JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    pub id: String,
    pub created_at: String,
    /// Overwritten by the store on every save.
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default)]
    pub person_age: Option<i64>,
    #[serde(default)]
    pub person_sex: Option<String>,
    #[serde(default)]
    pub measurements: BTreeMap<String, Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationSummary {
    pub filename: String,
    pub name: String,
    pub age: Option<i64>,
    pub sex: Option<String>,
    pub measurement_count: usize,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AckStatus {
    Saved,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: AckStatus,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: AckStatus,
}
