use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::facets::FacetOptions;
use crate::collation::Collator;
use crate::domain::{AdaptedEvent, EventType};

/// One-time vs. recurring restriction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EventKindFilter {
    #[default]
    All,
    OneTime,
    Recurring,
}

/// The visitor's active filter choices.
///
/// Multi-value sets are OR-ed internally; all active criteria are AND-ed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSelection {
    pub age_groups: BTreeSet<String>,
    pub accessible_only: bool,
    pub free_only: bool,
    pub event_kind: EventKindFilter,
    pub themes: BTreeSet<String>,
    pub places: BTreeSet<String>,
    pub dates: BTreeSet<NaiveDate>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Align the selection with the current facet vocabulary.
    ///
    /// Places are rewritten to the facet's spelling when the collator matches
    /// them. Values the facets no longer offer stay selected and match nothing.
    pub fn align_with_facets(&mut self, facets: &FacetOptions, collator: &dyn Collator) {
        self.places = std::mem::take(&mut self.places)
            .into_iter()
            .map(|selected| {
                facets
                    .places
                    .iter()
                    .find(|offered| collator.matches(offered.as_str(), &selected))
                    .cloned()
                    .unwrap_or(selected)
            })
            .collect();

        let unknown = self.age_groups.iter().filter(|v| !facets.age_groups.contains(v)).count()
            + self.themes.iter().filter(|v| !facets.themes.contains(v)).count()
            + self.places.iter().filter(|v| !facets.places.contains(v)).count()
            + self.dates.iter().filter(|d| !facets.dates.contains(d)).count();
        if unknown > 0 {
            warn!(unknown, "Selected filter values are not offered by the current facets");
        }
    }

    /// Turn the selection plus an optional free-text query into one predicate
    pub fn compile<'a>(&'a self, query: Option<&'a str>, collator: &'a dyn Collator) -> EventPredicate<'a> {
        let mut criteria = Vec::new();
        if !self.age_groups.is_empty() {
            criteria.push(Criterion::AgeGroups(&self.age_groups));
        }
        if self.accessible_only {
            criteria.push(Criterion::Accessible);
        }
        if self.free_only {
            criteria.push(Criterion::Free);
        }
        match self.event_kind {
            EventKindFilter::All => {}
            EventKindFilter::OneTime => criteria.push(Criterion::OneTime),
            EventKindFilter::Recurring => criteria.push(Criterion::Recurring),
        }
        if !self.themes.is_empty() {
            criteria.push(Criterion::Themes(&self.themes));
        }
        if !self.places.is_empty() {
            criteria.push(Criterion::Places(&self.places));
        }
        if !self.dates.is_empty() {
            criteria.push(Criterion::Dates(&self.dates));
        }
        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            criteria.push(Criterion::Text(query));
        }
        EventPredicate { criteria, collator }
    }
}

#[derive(Debug, Clone, Copy)]
enum Criterion<'a> {
    AgeGroups(&'a BTreeSet<String>),
    Accessible,
    Free,
    OneTime,
    Recurring,
    Themes(&'a BTreeSet<String>),
    Places(&'a BTreeSet<String>),
    Dates(&'a BTreeSet<NaiveDate>),
    Text(&'a str),
}

/// Conjunction of the active criteria
pub struct EventPredicate<'a> {
    criteria: Vec<Criterion<'a>>,
    collator: &'a dyn Collator,
}

impl EventPredicate<'_> {
    pub fn active_criteria(&self) -> usize {
        self.criteria.len()
    }

    pub fn matches(&self, event: &AdaptedEvent) -> bool {
        self.criteria.iter().all(|criterion| self.check(*criterion, event))
    }

    fn check(&self, criterion: Criterion<'_>, event: &AdaptedEvent) -> bool {
        match criterion {
            Criterion::AgeGroups(groups) => event.target_tags.iter().any(|t| groups.contains(t)),
            Criterion::Accessible => event.is_accessible,
            Criterion::Free => event.cost_is_free,
            Criterion::OneTime => event.event_type == EventType::OneTime,
            Criterion::Recurring => event.event_type.is_recurring(),
            Criterion::Themes(themes) => event.topic_tags.iter().any(|t| themes.contains(t)),
            Criterion::Places(places) => event
                .place()
                .is_some_and(|place| places.iter().any(|p| self.collator.matches(place, p))),
            Criterion::Dates(dates) => event.date.is_some_and(|d| dates.contains(&d)),
            Criterion::Text(query) => searchable_fields(event).any(|field| self.collator.contains(field, query)),
        }
    }
}

fn searchable_fields(event: &AdaptedEvent) -> impl Iterator<Item = &str> {
    let venue = event.location.as_ref();
    [
        Some(event.title.as_str()),
        Some(event.subtitle.as_str()),
        Some(event.excerpt.as_str()),
        venue.map(|v| v.short_name.as_str()),
        venue.map(|v| v.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .chain(event.topic_tags.iter().map(String::as_str))
    .chain(event.target_tags.iter().map(String::as_str))
}

/// Events satisfying every active criterion, in input order
pub fn filter_events<'a>(
    events: &'a [AdaptedEvent],
    selection: &FilterSelection,
    query: Option<&str>,
    collator: &dyn Collator,
) -> Vec<&'a AdaptedEvent> {
    let predicate = selection.compile(query, collator);
    let matched: Vec<&AdaptedEvent> = events.iter().filter(|e| predicate.matches(e)).collect();
    debug!(
        criteria = predicate.active_criteria(),
        total = events.len(),
        matched = matched.len(),
        "Applied event filters"
    );
    matched
}
