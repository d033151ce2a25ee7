use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use event_discovery::collation::{Locale, LocaleCollator};
use event_discovery::config::DiscoveryConfig;
use event_discovery::pipeline::processing::{
    bucket_events, build_event_filter_options, filter_events, DocumentAdapter, EventKindFilter, FilterSelection,
    RelatedScorer,
};
use event_discovery::pipeline::storage::InMemoryRecordStore;
use event_discovery::DiscoveryUseCase;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn raw_events() -> Value {
    json!({
        "docs": [
            {
                "id": "e-concert",
                "title": "Sommerkonzert im Park",
                "eventType": "one-time",
                "status": "approved",
                "startDate": "2025-06-10T18:00:00.000Z",
                "endDate": "2025-06-10T21:00:00.000Z",
                "time": {"from": "20:00", "to": "23:00"},
                "location": {"id": "v-park", "name": "Stadtpark", "shortName": "Park", "coordinates": [8.68, 50.11]},
                "organizer": {"id": "o-kultur", "name": "Kulturamt"},
                "tags": [
                    {"id": "t1", "name": "Familien", "category": "target"},
                    {"id": "t2", "name": "Musik", "category": "topic"}
                ],
                "cost": {"isFree": true},
                "isAccessible": true
            },
            {
                "id": "e-choir",
                "title": "Offene Chorprobe",
                "eventType": "weekly",
                "status": "approved",
                "startDate": "2025-06-12T17:00:00.000Z",
                "time": {"from": "19:00"},
                "recurrence": {"daysOfWeek": ["thu"], "repeatUntil": "2025-09-25"},
                "location": {"id": "v-park", "name": "Stadtpark", "shortName": "Park"},
                "organizer": {"id": "o-kultur", "name": "Kulturamt"},
                "tags": [{"id": "t2", "name": "Musik", "category": "topic"}]
            },
            {
                "id": "e-talk",
                "title": "Vortrag: Stadtgeschichte",
                "eventType": "one-time",
                "status": "approved",
                "startDate": "2025-06-20T17:00:00.000Z",
                "location": "v-library",
                "organizer": "o-verein",
                "tags": [{"id": "t3", "name": "Erwachsene", "category": "target"}]
            },
            {
                "id": "e-old",
                "title": "Frühlingsfest",
                "status": "approved",
                "startDate": "2025-04-01T10:00:00.000Z",
                "organizer": {"id": "o-kultur", "name": "Kulturamt"},
                "tags": [{"id": "t2", "name": "Musik", "category": "topic"}]
            },
            {
                "id": "e-draft",
                "title": "Entwurf",
                "status": "draft",
                "startDate": "2025-06-11T10:00:00.000Z"
            }
        ],
        "totalDocs": 5
    })
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn write_fixture(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", value)?;
    Ok(file)
}

#[tokio::test]
async fn test_listing_from_json_export() -> Result<()> {
    let file = write_fixture(&raw_events())?;
    let store = InMemoryRecordStore::from_json_file(file.path()).await?;
    let use_case = DiscoveryUseCase::new(Arc::new(store), DiscoveryConfig::default());

    let snapshot = use_case.snapshot(today()).await?;
    let ids: Vec<&str> = snapshot.events().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e-concert", "e-choir", "e-talk"]);

    let facets = snapshot.facets();
    assert_eq!(facets.age_groups, vec!["Erwachsene", "Familien"]);
    assert_eq!(facets.themes, vec!["Musik"]);
    assert_eq!(facets.places, vec!["Park"]);
    assert_eq!(facets.dates.len(), 3);

    let recurring = FilterSelection {
        event_kind: EventKindFilter::Recurring,
        ..Default::default()
    };
    let listing = snapshot.listing(&recurring, None);
    assert_eq!(listing.matched, 1);
    assert_eq!(
        listing.buckets.all[0].recurrence_label,
        "Jeden Donnerstag, jeweils 19:00, bis 25.09.2025"
    );

    let all = snapshot.listing(&FilterSelection::default(), None);
    assert_eq!(all.buckets.today.len(), 1);
    assert_eq!(all.buckets.today[0].id, "e-concert");
    Ok(())
}

#[tokio::test]
async fn test_related_from_json_export() -> Result<()> {
    let file = write_fixture(&raw_events())?;
    let store = InMemoryRecordStore::from_json_file(file.path()).await?;
    let use_case = DiscoveryUseCase::new(Arc::new(store), DiscoveryConfig::default());

    let related = use_case.related("e-concert", today()).await?;
    let ids: Vec<&str> = related.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e-choir"]);
    Ok(())
}

#[test]
fn test_pure_pipeline_composes() {
    let adapter = DocumentAdapter::new("https://cms.example.org/api", Locale::De);
    let collator = LocaleCollator::new(Locale::De);
    let docs = raw_events();
    let events: Vec<_> = docs["docs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|raw| adapter.adapt_event(raw))
        .collect();
    assert_eq!(events.len(), 5);

    let facets = build_event_filter_options(&events, &collator);
    let selection = FilterSelection {
        places: facets.places.iter().cloned().collect(),
        ..Default::default()
    };
    let filtered = filter_events(&events, &selection, Some("chor"), &collator);
    let buckets = bucket_events(filtered, today());
    assert_eq!(buckets.all.len(), 1);
    assert_eq!(buckets.all[0].id, "e-choir");

    let scorer = RelatedScorer::default();
    let focal = &events[0];
    let talk = events.iter().find(|e| e.id == "e-talk").unwrap();
    assert_eq!(scorer.score(focal, talk), 0);
}
