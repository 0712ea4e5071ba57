//! Occurrence expansion over stored events.

use bcpms_core::error::CoreError;
use bcpms_core::rrule::{RecurrenceRule, MAX_OCCURRENCES};
use bcpms_core::types::{DbId, Timestamp};
use bcpms_db::models::calendar_event::CalendarEvent;
use serde::Serialize;

/// One concrete instance of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub event_id: DbId,
    pub title: String,
    pub project_id: Option<DbId>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub all_day: bool,
}

/// Parses recurrence rules and expands events into occurrences.
///
/// Stateless; exported so the dashboard can build its upcoming list without
/// going through the calendar's HTTP surface.
#[derive(Debug, Clone, Default)]
pub struct RRuleService;

impl RRuleService {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> Result<RecurrenceRule, CoreError> {
        raw.parse()
    }

    /// Occurrences of `events` starting in `[from, to)`, ordered by start.
    ///
    /// A single event contributes itself when its start is in the window.
    /// A stored rule that no longer parses is logged and the event skipped.
    pub fn expand_events(
        &self,
        events: &[CalendarEvent],
        from: Timestamp,
        to: Timestamp,
    ) -> Vec<Occurrence> {
        let mut out = Vec::new();
        for event in events {
            let duration = event.ends_at - event.starts_at;
            let starts: Vec<Timestamp> = match event.rrule.as_deref() {
                None => {
                    if event.starts_at >= from && event.starts_at < to {
                        vec![event.starts_at]
                    } else {
                        Vec::new()
                    }
                }
                Some(raw) => match self.parse(raw) {
                    Ok(rule) => rule.expand(event.starts_at, from, to, &event.exdates),
                    Err(e) => {
                        tracing::warn!(event_id = %event.id, error = %e, "Skipping event with unparsable rrule");
                        Vec::new()
                    }
                },
            };
            out.extend(starts.into_iter().map(|starts_at| Occurrence {
                event_id: event.id,
                title: event.title.clone(),
                project_id: event.project_id,
                starts_at,
                ends_at: starts_at + duration,
                all_day: event.all_day,
            }));
        }
        out.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.event_id.cmp(&b.event_id)));
        out.truncate(MAX_OCCURRENCES);
        out
    }
}

#[cfg(test)]
mod tests {
    use bcpms_core::types::new_id;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn event(title: &str, start: Timestamp, rrule: Option<&str>, exdates: Vec<Timestamp>) -> CalendarEvent {
        CalendarEvent {
            id: new_id(),
            project_id: None,
            title: title.to_string(),
            description: None,
            starts_at: start,
            ends_at: start + Duration::minutes(30),
            all_day: false,
            rrule: rrule.map(str::to_string),
            exdates,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn single_events_are_filtered_by_start() {
        let service = RRuleService::new();
        let events = vec![
            event("before", at(1, 9), None, vec![]),
            event("inside", at(3, 9), None, vec![]),
            event("at-end", at(5, 9), None, vec![]),
        ];
        let got = service.expand_events(&events, at(2, 0), at(5, 9));
        let titles: Vec<&str> = got.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["inside"]);
    }

    #[test]
    fn recurring_events_keep_duration_and_skip_exdates() {
        let service = RRuleService::new();
        let standup = event("standup", at(2, 9), Some("FREQ=DAILY;COUNT=4"), vec![at(3, 9)]);
        let got = service.expand_events(&[standup], at(1, 0), at(31, 0));
        let starts: Vec<Timestamp> = got.iter().map(|o| o.starts_at).collect();
        assert_eq!(starts, vec![at(2, 9), at(4, 9), at(5, 9)]);
        assert!(got.iter().all(|o| o.ends_at - o.starts_at == Duration::minutes(30)));
    }

    #[test]
    fn occurrences_from_several_events_are_merged_in_order() {
        let service = RRuleService::new();
        let events = vec![
            event("weekly", at(2, 10), Some("FREQ=WEEKLY;COUNT=2"), vec![]),
            event("once", at(4, 8), None, vec![]),
        ];
        let got = service.expand_events(&events, at(1, 0), at(31, 0));
        let titles: Vec<&str> = got.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["weekly", "once", "weekly"]);
    }

    #[test]
    fn unparsable_stored_rule_is_skipped() {
        let service = RRuleService::new();
        let broken = event("broken", at(2, 9), Some("FREQ=HOURLY"), vec![]);
        let fine = event("fine", at(3, 9), None, vec![]);
        let got = service.expand_events(&[broken, fine], at(1, 0), at(31, 0));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "fine");
    }
}
