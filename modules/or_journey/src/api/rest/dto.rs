use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    EventOrder, MediaItem, MediaKind, Operation, OperationEvent, PhaseGroup, User,
};

/// REST DTO for patient representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub cases: Vec<String>,
}

/// REST DTO for a full operation record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationDto {
    pub id: String,
    pub procedure: String,
    pub description: String,
    pub summary: String,
    /// Hours.
    pub duration: f64,
    pub starttime: NaiveDateTime,
    pub endtime: NaiveDateTime,
    /// Hours.
    pub skintoskintime: f64,
    pub events: Vec<OperationEventDto>,
}

/// REST DTO for an operation in a patient's case list (no events)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummaryDto {
    pub id: String,
    pub procedure: String,
    pub description: String,
    pub summary: String,
    pub duration: f64,
    #[serde(rename = "starttime")]
    pub starttime: NaiveDateTime,
    #[serde(rename = "endtime")]
    pub endtime: NaiveDateTime,
    #[serde(rename = "skintoskintime")]
    pub skintoskintime: f64,
    pub event_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationEventDto {
    pub event_id: String,
    pub timestamp: NaiveDateTime,
    #[serde(rename = "type")]
    pub phase: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(
        default,
        rename = "forceaverage",
        skip_serializing_if = "Option::is_none"
    )]
    pub force_average: Option<f64>,
    #[serde(default)]
    pub content_warning: bool,
}

/// REST DTO for a patient's operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationListDto {
    pub user_id: String,
    pub operations: Vec<OperationSummaryDto>,
    pub total: usize,
}

/// REST DTO for the event list of an operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventListDto {
    pub operation_id: String,
    /// "stored" or "chronological".
    pub order: String,
    pub events: Vec<OperationEventDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKindDto {
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemDto {
    pub event_id: String,
    pub event_name: String,
    pub timestamp: NaiveDateTime,
    pub kind: MediaKindDto,
    pub url: String,
    pub content_warning: bool,
    #[serde(
        default,
        rename = "forceaverage",
        skip_serializing_if = "Option::is_none"
    )]
    pub force_average: Option<f64>,
}

/// REST DTO for the gallery of an operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaListDto {
    pub operation_id: String,
    pub items: Vec<MediaItemDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhaseGroupDto {
    pub phase: String,
    pub events: Vec<OperationEventDto>,
}

/// REST DTO for the journey view of an operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseListDto {
    pub operation_id: String,
    pub phases: Vec<PhaseGroupDto>,
}

/// REST DTO for query parameters
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// "stored" (default) or "chronological".
    pub order: Option<String>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            birthdate: user.birthdate,
            cases: user.cases,
        }
    }
}

impl From<OperationEvent> for OperationEventDto {
    fn from(e: OperationEvent) -> Self {
        Self {
            event_id: e.event_id,
            timestamp: e.timestamp,
            phase: e.phase.as_label().to_string(),
            event_name: e.event_name,
            description: e.description,
            image: e.image,
            video: e.video,
            force_average: e.force_average,
            content_warning: e.content_warning,
        }
    }
}

impl From<Operation> for OperationDto {
    fn from(op: Operation) -> Self {
        Self {
            id: op.id,
            procedure: op.procedure,
            description: op.description,
            summary: op.summary,
            duration: op.duration,
            starttime: op.starttime,
            endtime: op.endtime,
            skintoskintime: op.skintoskintime,
            events: op.events.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Operation> for OperationSummaryDto {
    fn from(op: Operation) -> Self {
        Self {
            event_count: op.events.len(),
            id: op.id,
            procedure: op.procedure,
            description: op.description,
            summary: op.summary,
            duration: op.duration,
            starttime: op.starttime,
            endtime: op.endtime,
            skintoskintime: op.skintoskintime,
        }
    }
}

impl From<MediaKind> for MediaKindDto {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
        }
    }
}

impl From<MediaItem> for MediaItemDto {
    fn from(m: MediaItem) -> Self {
        Self {
            event_id: m.event_id,
            event_name: m.event_name,
            timestamp: m.timestamp,
            kind: m.kind.into(),
            url: m.url,
            content_warning: m.content_warning,
            force_average: m.force_average,
        }
    }
}

impl From<PhaseGroup> for PhaseGroupDto {
    fn from(g: PhaseGroup) -> Self {
        Self {
            phase: g.phase.as_label().to_string(),
            events: g.events.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn order_label(order: EventOrder) -> &'static str {
    match order {
        EventOrder::Stored => "stored",
        EventOrder::Chronological => "chronological",
    }
}
