pub mod client;
pub mod error;
pub mod model;

pub use client::OrJourneyApi;
pub use error::{OrJourneyError, RecordKind};
pub use model::{
    EventOrder, EventPhase, MediaItem, MediaKind, Operation, OperationEvent, PatientCtx,
    PhaseGroup, User,
};
