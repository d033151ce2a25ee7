// Discovery pipeline stages: adapt, facet, filter, order, relate

pub mod adapter;
pub mod facets;
pub mod filter;
pub mod ordering;
pub mod related;

pub use adapter::DocumentAdapter;
pub use facets::{build_event_filter_options, FacetOptions};
pub use filter::{filter_events, EventKindFilter, FilterSelection};
pub use ordering::{bucket_events, retain_upcoming, EventBuckets};
pub use related::{RelatedScorer, RelevanceWeights};
