use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collation::Collator;
use crate::domain::AdaptedEvent;

/// Selectable values for each filterable dimension
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FacetOptions {
    pub age_groups: Vec<String>,
    pub themes: Vec<String>,
    pub places: Vec<String>,
    pub dates: Vec<NaiveDate>,
}

impl FacetOptions {
    pub fn is_empty(&self) -> bool {
        self.age_groups.is_empty() && self.themes.is_empty() && self.places.is_empty() && self.dates.is_empty()
    }
}

#[derive(Debug, Default)]
struct FacetAccumulator {
    age_groups: BTreeSet<String>,
    themes: BTreeSet<String>,
    places: BTreeSet<String>,
    dates: BTreeSet<NaiveDate>,
}

impl FacetAccumulator {
    fn with(mut self, event: &AdaptedEvent) -> Self {
        self.age_groups.extend(non_empty(&event.target_tags));
        self.themes.extend(non_empty(&event.topic_tags));
        self.places.extend(event.place().map(str::trim).filter(|p| !p.is_empty()).map(str::to_string));
        self.dates.extend(event.date);
        self
    }
}

fn non_empty(values: &[String]) -> impl Iterator<Item = String> + '_ {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Derive the filter vocabulary from a pool of adapted events.
///
/// Every returned value occurs in at least one event of `events`. Text facets
/// are ordered by `collator`; dates ascend.
pub fn build_event_filter_options(events: &[AdaptedEvent], collator: &dyn Collator) -> FacetOptions {
    let acc = events.iter().fold(FacetAccumulator::default(), FacetAccumulator::with);
    let options = FacetOptions {
        age_groups: collator.sort(acc.age_groups.into_iter().collect()),
        themes: collator.sort(acc.themes.into_iter().collect()),
        places: collator.sort(acc.places.into_iter().collect()),
        dates: acc.dates.into_iter().collect(),
    };
    debug!(
        events = events.len(),
        age_groups = options.age_groups.len(),
        themes = options.themes.len(),
        places = options.places.len(),
        dates = options.dates.len(),
        "Built facet options"
    );
    options
}
