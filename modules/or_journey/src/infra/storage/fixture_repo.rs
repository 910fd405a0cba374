//! In-memory repository backed by a JSON dataset.
//!
//! The built-in dataset is compiled into the binary; a different one can be
//! loaded from disk. Once built the maps are never mutated, so the repository
//! is shared across request tasks without locking.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::contract::model::{Operation, User};
use crate::domain::repo::TimelineRepository;
use crate::infra::storage::entity::DatasetDocument;
use crate::infra::storage::mapper::{operation_record_to_contract, user_record_to_contract};

const BUILTIN_DATASET: &str = include_str!("fixtures/or_journey.json");

/// Counts reported by `check` and at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub users: usize,
    pub operations: usize,
    pub events: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} users, {} operations, {} events",
            self.users, self.operations, self.events
        )
    }
}

pub struct FixtureTimelineRepository {
    users: HashMap<String, User>,
    operations: HashMap<String, Operation>,
}

impl FixtureTimelineRepository {
    /// The dataset shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_DATASET).context("built-in dataset is invalid")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("failed to load dataset '{}'", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let doc: DatasetDocument =
            serde_json::from_str(raw).context("dataset is not valid JSON")?;

        let mut users = HashMap::with_capacity(doc.users.len());
        for (key, record) in doc.users {
            if key != record.id {
                bail!("user keyed '{key}' carries id '{}'", record.id);
            }
            users.insert(key, user_record_to_contract(record));
        }

        let mut operations = HashMap::with_capacity(doc.operations.len());
        for (key, record) in doc.operations {
            if key != record.id {
                bail!("operation keyed '{key}' carries id '{}'", record.id);
            }
            operations.insert(key, operation_record_to_contract(record)?);
        }

        Ok(Self { users, operations })
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            users: self.users.len(),
            operations: self.operations.len(),
            events: self.operations.values().map(|o| o.events.len()).sum(),
        }
    }

    /// Expectations the data model states but does not enforce. Each entry is
    /// a human-readable description; an empty list means the dataset is clean.
    /// Results are sorted so reports are deterministic.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();

        for user in self.users.values() {
            for case_id in &user.cases {
                if !self.operations.contains_key(case_id) {
                    issues.push(format!(
                        "user {} references unknown operation {case_id}",
                        user.id
                    ));
                }
                owners.entry(case_id.as_str()).or_default().push(&user.id);
            }
        }

        for op in self.operations.values() {
            match owners.get(op.id.as_str()).map(Vec::len).unwrap_or(0) {
                0 => issues.push(format!("operation {} is not in any user's cases", op.id)),
                1 => {}
                n => issues.push(format!("operation {} is owned by {n} users", op.id)),
            }
            if op.endtime < op.starttime {
                issues.push(format!("operation {} ends before it starts", op.id));
            }
            if op.duration <= 0.0 {
                issues.push(format!("operation {} has non-positive duration", op.id));
            }
            if op.skintoskintime <= 0.0 || op.skintoskintime > op.duration {
                issues.push(format!(
                    "operation {} skin-to-skin time {} is outside (0, {}]",
                    op.id, op.skintoskintime, op.duration
                ));
            }

            let mut seen = HashSet::new();
            for event in &op.events {
                if !seen.insert(event.event_id.as_str()) {
                    issues.push(format!(
                        "operation {} repeats event id {}",
                        op.id, event.event_id
                    ));
                }
                if let Some(force) = event.force_average {
                    if !(0.0..=1.0).contains(&force) {
                        issues.push(format!(
                            "event {} forceaverage {force} is outside [0, 1]",
                            event.event_id
                        ));
                    }
                }
            }
        }

        issues.sort();
        issues
    }
}

#[async_trait::async_trait]
impl TimelineRepository for FixtureTimelineRepository {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).cloned())
    }

    async fn find_operation(&self, id: &str) -> Result<Option<Operation>> {
        Ok(self.operations.get(id).cloned())
    }
}
