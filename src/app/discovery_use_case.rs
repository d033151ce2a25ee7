use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::ports::{EventQuery, RecordStore, VenueQuery};
use crate::collation::Collator;
use crate::config::DiscoveryConfig;
use crate::domain::{AdaptedEvent, AdaptedLocation, EventStatus};
use crate::error::{DiscoveryError, Result};
use crate::pipeline::processing::adapter::DocumentAdapter;
use crate::pipeline::processing::facets::{build_event_filter_options, FacetOptions};
use crate::pipeline::processing::filter::{filter_events, FilterSelection};
use crate::pipeline::processing::ordering::{bucket_events_with, retain_upcoming, EventBuckets};
use crate::pipeline::processing::related::RelatedScorer;

/// Adapted, listable events together with the facets derived from exactly them.
///
/// Filtering always runs against the same events the facets were built
/// from, so offered options and applied filters cannot drift apart.
pub struct EventSnapshot {
    events: Vec<AdaptedEvent>,
    facets: FacetOptions,
    today: NaiveDate,
    newest_count: usize,
    collator: Arc<dyn Collator>,
}

/// A rendered listing request
#[derive(Debug, Serialize)]
pub struct Listing<'a> {
    pub facets: &'a FacetOptions,
    /// The selection actually applied, places in the facets' spelling
    pub selection: FilterSelection,
    pub matched: usize,
    pub buckets: EventBuckets<'a>,
}

impl EventSnapshot {
    pub fn new(events: Vec<AdaptedEvent>, today: NaiveDate, newest_count: usize, collator: Arc<dyn Collator>) -> Self {
        let facets = build_event_filter_options(&events, collator.as_ref());
        Self {
            events,
            facets,
            today,
            newest_count,
            collator,
        }
    }

    pub fn events(&self) -> &[AdaptedEvent] {
        &self.events
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn listing(&self, selection: &FilterSelection, query: Option<&str>) -> Listing<'_> {
        let mut selection = selection.clone();
        selection.align_with_facets(&self.facets, self.collator.as_ref());
        let matched = filter_events(&self.events, &selection, query, self.collator.as_ref());
        Listing {
            facets: &self.facets,
            matched: matched.len(),
            buckets: bucket_events_with(matched, self.today, self.newest_count),
            selection,
        }
    }
}

/// Drives the discovery pipeline against a record store
pub struct DiscoveryUseCase {
    store: Arc<dyn RecordStore>,
    adapter: DocumentAdapter,
    collator: Arc<dyn Collator>,
    scorer: RelatedScorer,
    config: DiscoveryConfig,
}

impl DiscoveryUseCase {
    pub fn new(store: Arc<dyn RecordStore>, config: DiscoveryConfig) -> Self {
        Self {
            store,
            adapter: DocumentAdapter::from_config(&config),
            collator: Arc::new(config.collator()),
            scorer: RelatedScorer::new(config.related),
            config,
        }
    }

    pub fn adapter(&self) -> &DocumentAdapter {
        &self.adapter
    }

    /// Fetch and adapt every approved event, past ones included
    pub async fn approved_events(&self) -> Result<Vec<AdaptedEvent>> {
        let query = EventQuery::approved(self.config.page_limit, self.config.depth);
        let page = self.store.query_events(&query).await?;
        if page.total_docs > page.docs.len() {
            warn!(
                total = page.total_docs,
                fetched = page.docs.len(),
                "Record store has more events than one page; listing is truncated"
            );
        }

        let fetched = page.docs.len();
        let events: Vec<AdaptedEvent> = page
            .docs
            .iter()
            .filter_map(|raw| self.adapter.adapt_event(raw))
            .filter(|event| event.status == EventStatus::Approved)
            .collect();
        debug!(fetched, approved = events.len(), "Adapted events");
        Ok(events)
    }

    /// Build the listing snapshot for `today`: approved events that have not ended yet
    pub async fn snapshot(&self, today: NaiveDate) -> Result<EventSnapshot> {
        let events = retain_upcoming(self.approved_events().await?, today);
        info!(events = events.len(), %today, "Built event snapshot");
        Ok(EventSnapshot::new(events, today, self.config.newest_count, self.collator.clone()))
    }

    /// Related events for the detail page of `event_id`
    pub async fn related(&self, event_id: &str, today: NaiveDate) -> Result<Vec<AdaptedEvent>> {
        let events = self.approved_events().await?;
        let focal = events
            .iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| DiscoveryError::EventNotFound { id: event_id.to_string() })?;
        Ok(self
            .scorer
            .score_related(focal, &events, today)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn venues(&self) -> Result<Vec<AdaptedLocation>> {
        let query = VenueQuery {
            limit: self.config.page_limit,
            depth: self.config.depth,
            sort: Some("name".to_string()),
        };
        let page = self.store.query_venues(&query).await?;
        let mut venues: Vec<AdaptedLocation> =
            page.docs.iter().filter_map(|raw| self.adapter.adapt_location(raw)).collect();
        venues.sort_by(|a, b| self.collator.compare(a.display_name(), b.display_name()));
        Ok(venues)
    }
}
