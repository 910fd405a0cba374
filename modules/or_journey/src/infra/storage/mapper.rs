use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::contract::model::{EventPhase, Operation, OperationEvent, User};
use crate::infra::storage::entity::{EventRecord, OperationRecord, UserRecord};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a dataset timestamp. Minute precision is the norm; seconds are accepted.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("invalid timestamp '{raw}' (expected YYYY-MM-DDTHH:MM)"))
}

/// Convert a dataset record to a contract model
pub fn user_record_to_contract(record: UserRecord) -> User {
    User {
        id: record.id,
        name: record.name,
        birthdate: record.birthdate,
        cases: record.cases,
    }
}

/// Convert a dataset record to a contract model, parsing its timestamps
pub fn operation_record_to_contract(record: OperationRecord) -> Result<Operation> {
    let id = record.id;
    let starttime = parse_timestamp(&record.starttime)
        .with_context(|| format!("operation {id}: starttime"))?;
    let endtime =
        parse_timestamp(&record.endtime).with_context(|| format!("operation {id}: endtime"))?;

    let events = record
        .events
        .into_iter()
        .map(event_record_to_contract)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("operation {id}: events"))?;

    Ok(Operation {
        id,
        procedure: record.procedure,
        description: record.description,
        summary: record.summary,
        duration: record.duration,
        starttime,
        endtime,
        skintoskintime: record.skintoskintime,
        events,
    })
}

fn event_record_to_contract(record: EventRecord) -> Result<OperationEvent> {
    let timestamp = parse_timestamp(&record.timestamp)
        .with_context(|| format!("event {}", record.event_id))?;
    Ok(OperationEvent {
        event_id: record.event_id,
        timestamp,
        phase: EventPhase::from_label(&record.phase),
        event_name: record.event_name,
        description: record.description,
        image: record.image,
        video: record.video,
        force_average: record.force_average,
        content_warning: record.content_warning.unwrap_or(false),
    })
}
