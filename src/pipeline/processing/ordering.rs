use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use super::adapter::dates::start_of_day;
use crate::domain::AdaptedEvent;

/// Default size of the "newest" bucket
pub const NEWEST_COUNT: usize = 4;

/// Display partitions of a sorted listing. Membership overlaps.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EventBuckets<'a> {
    pub newest: Vec<&'a AdaptedEvent>,
    pub today: Vec<&'a AdaptedEvent>,
    pub all: Vec<&'a AdaptedEvent>,
}

/// Ascending by start; undated events go last
pub fn compare_by_start(a: &AdaptedEvent, b: &AdaptedEvent) -> Ordering {
    compare_start_dates(a.start_date, b.start_date)
}

pub(crate) fn compare_start_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, so undated events keep their relative order
pub fn sort_by_start(events: &mut [&AdaptedEvent]) {
    events.sort_by(|a, b| compare_by_start(a, b));
}

/// Whether an event still runs on or after `today`.
///
/// Uses the end date when present, else the start date. Events without
/// either date are kept.
pub fn is_upcoming(event: &AdaptedEvent, today: NaiveDate) -> bool {
    let day_start = start_of_day(today);
    match (event.end_date, event.start_date) {
        (Some(end), _) => end >= day_start,
        (None, Some(start)) => start >= day_start,
        (None, None) => true,
    }
}

/// Drop events that lie entirely in the past
pub fn retain_upcoming(events: Vec<AdaptedEvent>, today: NaiveDate) -> Vec<AdaptedEvent> {
    let total = events.len();
    let upcoming: Vec<AdaptedEvent> = events.into_iter().filter(|e| is_upcoming(e, today)).collect();
    debug!(total, upcoming = upcoming.len(), %today, "Removed past events");
    upcoming
}

/// Sort a filtered listing and derive its display buckets
pub fn bucket_events(events: Vec<&AdaptedEvent>, today: NaiveDate) -> EventBuckets<'_> {
    bucket_events_with(events, today, NEWEST_COUNT)
}

pub fn bucket_events_with(mut events: Vec<&AdaptedEvent>, today: NaiveDate, newest_count: usize) -> EventBuckets<'_> {
    sort_by_start(&mut events);
    EventBuckets {
        newest: events.iter().take(newest_count).copied().collect(),
        today: events.iter().filter(|e| e.date == Some(today)).copied().collect(),
        all: events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::Locale;
    use crate::pipeline::processing::adapter::DocumentAdapter;
    use serde_json::{json, Value};

    fn event(id: &str, start: Option<&str>, end: Option<&str>) -> AdaptedEvent {
        let mut raw = json!({"id": id, "status": "approved"});
        if let Some(start) = start {
            raw["startDate"] = Value::from(start);
        }
        if let Some(end) = end {
            raw["endDate"] = Value::from(end);
        }
        DocumentAdapter::new("", Locale::De).adapt_event(&raw).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(events: &[&AdaptedEvent]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_undated_sort_last_and_stay_stable() {
        let a = event("A", None, None);
        let b = event("B", Some("2025-01-01T10:00:00Z"), None);
        let c = event("C", None, None);
        let mut events = vec![&a, &b, &c];
        sort_by_start(&mut events);
        assert_eq!(ids(&events), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_today_bucket() {
        let first = event("first", Some("2025-06-10T09:00:00Z"), None);
        let second = event("second", Some("2025-06-10T18:00:00Z"), None);
        let tomorrow = event("tomorrow", Some("2025-06-11T09:00:00Z"), None);
        let buckets = bucket_events(vec![&tomorrow, &second, &first], day(2025, 6, 10));
        assert_eq!(ids(&buckets.today), vec!["first", "second"]);
        assert_eq!(ids(&buckets.all), vec!["first", "second", "tomorrow"]);
    }

    #[test]
    fn test_newest_bucket_takes_first_four() {
        let events: Vec<AdaptedEvent> = (1..=6)
            .map(|n| event(&format!("e{n}"), Some(&format!("2025-06-{:02}T10:00:00Z", 10 + n)), None))
            .collect();
        let refs: Vec<&AdaptedEvent> = events.iter().rev().collect();
        let buckets = bucket_events(refs, day(2025, 6, 1));
        assert_eq!(ids(&buckets.newest), vec!["e1", "e2", "e3", "e4"]);
        assert!(buckets.today.is_empty());
        assert_eq!(buckets.all.len(), 6);

        let short = bucket_events_with(vec![&events[0]], day(2025, 6, 11), 4);
        assert_eq!(ids(&short.newest), vec!["e1"]);
        assert_eq!(ids(&short.today), vec!["e1"]);
    }

    #[test]
    fn test_is_upcoming_prefers_end_date() {
        let today = day(2025, 6, 10);
        assert!(is_upcoming(&event("ongoing", Some("2025-06-01T10:00:00Z"), Some("2025-06-10T00:00:00Z")), today));
        assert!(!is_upcoming(&event("over", Some("2025-06-01T10:00:00Z"), Some("2025-06-09T23:59:59Z")), today));
        assert!(is_upcoming(&event("later-today", Some("2025-06-10T08:00:00Z"), None), today));
        assert!(!is_upcoming(&event("yesterday", Some("2025-06-09T20:00:00Z"), None), today));
        assert!(is_upcoming(&event("undated", None, None), today));
    }

    #[test]
    fn test_retain_upcoming() {
        let events = vec![
            event("past", Some("2025-05-01T10:00:00Z"), None),
            event("future", Some("2025-07-01T10:00:00Z"), None),
        ];
        let kept = retain_upcoming(events, day(2025, 6, 10));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "future");
    }
}
