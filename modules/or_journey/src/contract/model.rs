use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

/// Pure patient model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    /// Operation ids in the order the patient's cases were recorded.
    pub cases: Vec<String>,
}

/// A single surgical procedure with its event timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: String,
    pub procedure: String,
    pub description: String,
    pub summary: String,
    /// Hours.
    pub duration: f64,
    pub starttime: NaiveDateTime,
    pub endtime: NaiveDateTime,
    /// Hours from incision to closure.
    pub skintoskintime: f64,
    /// Storage order; not guaranteed to be chronological.
    pub events: Vec<OperationEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationEvent {
    pub event_id: String,
    pub timestamp: NaiveDateTime,
    pub phase: EventPhase,
    pub event_name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub force_average: Option<f64>,
    pub content_warning: bool,
}

/// Phase label of an event. The set is open: labels outside the three
/// known phases are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventPhase {
    PreOperative,
    Intraoperative,
    PostOperative,
    Other(String),
}

impl EventPhase {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Pre Operative" => Self::PreOperative,
            "Intraoperative" => Self::Intraoperative,
            "Post Operative" => Self::PostOperative,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::PreOperative => "Pre Operative",
            Self::Intraoperative => "Intraoperative",
            Self::PostOperative => "Post Operative",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Ordering applied when listing the events of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    /// Order in which the events were stored.
    #[default]
    Stored,
    /// Stable sort by timestamp; equal timestamps keep storage order.
    Chronological,
}

impl FromStr for EventOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stored" => Ok(Self::Stored),
            "chronological" => Ok(Self::Chronological),
            other => Err(format!(
                "unknown event order '{other}' (expected 'stored' or 'chronological')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One image or video attached to an event, as shown in the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub event_id: String,
    pub event_name: String,
    pub timestamp: NaiveDateTime,
    pub kind: MediaKind,
    pub url: String,
    pub content_warning: bool,
    pub force_average: Option<f64>,
}

/// Events of one phase, in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseGroup {
    pub phase: EventPhase,
    pub events: Vec<OperationEvent>,
}

/// Identity of the authenticated patient for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientCtx {
    user_id: String,
}

impl PatientCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
