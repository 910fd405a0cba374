//! On-disk shape of a timeline dataset (JSON).
//!
//! Records are keyed by id; the `id` inside each record must match its key.
//! Timestamps stay as strings here and are parsed by the mapper.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetDocument {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
    #[serde(default)]
    pub operations: BTreeMap<String, OperationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    #[serde(default)]
    pub cases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    pub id: String,
    pub procedure: String,
    pub description: String,
    #[serde(default)]
    pub summary: String,
    pub duration: f64,
    pub starttime: String,
    pub endtime: String,
    pub skintoskintime: f64,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub phase: String,
    pub event_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default, rename = "forceaverage")]
    pub force_average: Option<f64>,
    #[serde(default)]
    pub content_warning: Option<bool>,
}
