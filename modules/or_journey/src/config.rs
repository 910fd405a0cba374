use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::contract::model::EventOrder;

/// Configuration for the or_journey module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrJourneyConfig {
    /// JSON dataset to serve instead of the built-in one.
    #[serde(default)]
    pub dataset_path: Option<String>,
    /// Bearer token to user id. Tokens are issued by the identity provider.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
    /// "stored" or "chronological"; used when a request does not pick one.
    #[serde(default = "default_event_order")]
    pub default_event_order: String,
}

impl Default for OrJourneyConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            tokens: HashMap::new(),
            default_event_order: default_event_order(),
        }
    }
}

fn default_event_order() -> String {
    "stored".to_string()
}

impl OrJourneyConfig {
    pub fn event_order(&self) -> anyhow::Result<EventOrder> {
        self.default_event_order
            .parse()
            .map_err(|e: String| anyhow::anyhow!("or_journey.default_event_order: {e}"))
    }
}
