//! Pure views over an operation's event sequence.

use crate::contract::model::{EventOrder, MediaItem, MediaKind, OperationEvent, PhaseGroup};

/// Return the events in the requested order. `sort_by_key` is stable, so
/// events sharing a timestamp keep their storage order.
pub fn ordered_events(events: &[OperationEvent], order: EventOrder) -> Vec<OperationEvent> {
    let mut out = events.to_vec();
    if order == EventOrder::Chronological {
        out.sort_by_key(|e| e.timestamp);
    }
    out
}

/// One media item per image and per video, in storage order. An event that
/// carries both yields the image first.
pub fn media_items(events: &[OperationEvent]) -> Vec<MediaItem> {
    let mut out = Vec::new();
    for event in events {
        let attached = [
            (MediaKind::Image, event.image.as_ref()),
            (MediaKind::Video, event.video.as_ref()),
        ];
        for (kind, url) in attached {
            if let Some(url) = url {
                out.push(MediaItem {
                    event_id: event.event_id.clone(),
                    event_name: event.event_name.clone(),
                    timestamp: event.timestamp,
                    kind,
                    url: url.clone(),
                    content_warning: event.content_warning,
                    force_average: event.force_average,
                });
            }
        }
    }
    out
}

/// Group events by phase. Groups appear in order of the phase's first
/// occurrence; events inside a group keep storage order.
pub fn group_by_phase(events: &[OperationEvent]) -> Vec<PhaseGroup> {
    let mut groups: Vec<PhaseGroup> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|g| g.phase == event.phase) {
            Some(group) => group.events.push(event.clone()),
            None => groups.push(PhaseGroup {
                phase: event.phase.clone(),
                events: vec![event.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::EventPhase;
    use chrono::NaiveDateTime;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn event(id: &str, ts: &str, phase: EventPhase) -> OperationEvent {
        OperationEvent {
            event_id: id.to_string(),
            timestamp: at(ts),
            phase,
            event_name: format!("event {id}"),
            description: None,
            image: None,
            video: None,
            force_average: None,
            content_warning: false,
        }
    }

    fn ids(events: &[OperationEvent]) -> Vec<&str> {
        events.iter().map(|e| e.event_id.as_str()).collect()
    }

    #[test]
    fn stored_order_is_untouched() {
        let events = vec![
            event("b", "2024-01-23T09:00", EventPhase::Intraoperative),
            event("a", "2024-01-23T08:00", EventPhase::Intraoperative),
        ];
        let out = ordered_events(&events, EventOrder::Stored);
        assert_eq!(ids(&out), vec!["b", "a"]);
    }

    #[test]
    fn chronological_sort_is_stable_for_ties() {
        let events = vec![
            event("late", "2024-01-23T10:00", EventPhase::Intraoperative),
            event("tie-1", "2024-01-23T08:15", EventPhase::Intraoperative),
            event("early", "2024-01-23T07:00", EventPhase::PreOperative),
            event("tie-2", "2024-01-23T08:15", EventPhase::Intraoperative),
        ];
        let out = ordered_events(&events, EventOrder::Chronological);
        assert_eq!(ids(&out), vec!["early", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn media_items_follow_storage_order_image_before_video() {
        let mut both = event("both", "2024-01-23T09:00", EventPhase::Intraoperative);
        both.image = Some("img.png".into());
        both.video = Some("clip.mp4".into());
        both.force_average = Some(0.4);
        both.content_warning = true;
        let mut img = event("img", "2024-01-23T08:00", EventPhase::Intraoperative);
        img.image = Some("mri.jpg".into());
        let plain = event("plain", "2024-01-23T07:00", EventPhase::PreOperative);

        let items = media_items(&[both, plain, img]);
        let got: Vec<(&str, MediaKind)> = items
            .iter()
            .map(|m| (m.event_id.as_str(), m.kind))
            .collect();
        assert_eq!(
            got,
            vec![
                ("both", MediaKind::Image),
                ("both", MediaKind::Video),
                ("img", MediaKind::Image),
            ]
        );
        assert!(items[1].content_warning);
        assert_eq!(items[1].force_average, Some(0.4));
        assert_eq!(items[1].url, "clip.mp4");
    }

    #[test]
    fn phases_grouped_by_first_appearance() {
        let events = vec![
            event("1", "2024-01-23T07:00", EventPhase::PreOperative),
            event("2", "2024-01-23T08:00", EventPhase::Intraoperative),
            event("3", "2024-01-23T11:00", EventPhase::PostOperative),
            event("4", "2024-01-23T08:30", EventPhase::Intraoperative),
            event("5", "2024-01-23T12:00", EventPhase::from_label("Recovery")),
        ];
        let groups = group_by_phase(&events);
        let phases: Vec<&str> = groups.iter().map(|g| g.phase.as_label()).collect();
        assert_eq!(
            phases,
            vec!["Pre Operative", "Intraoperative", "Post Operative", "Recovery"]
        );
        assert_eq!(ids(&groups[1].events), vec!["2", "4"]);
    }

    #[test]
    fn empty_sequence_yields_empty_views() {
        assert!(ordered_events(&[], EventOrder::Chronological).is_empty());
        assert!(media_items(&[]).is_empty());
        assert!(group_by_phase(&[]).is_empty());
    }
}
