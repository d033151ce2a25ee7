use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ordering::{compare_start_dates, is_upcoming};
use crate::domain::AdaptedEvent;

/// Affinity weights for the "related events" list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelevanceWeights {
    pub organizer_weight: u32,
    pub venue_weight: u32,
    pub topic_weight: u32,
    pub limit: usize,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            organizer_weight: 5,
            venue_weight: 3,
            topic_weight: 2,
            limit: 3,
        }
    }
}

/// Ranks candidate events by affinity to a focal event
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedScorer {
    weights: RelevanceWeights,
}

impl RelatedScorer {
    pub fn new(weights: RelevanceWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RelevanceWeights {
        self.weights
    }

    /// Sum of the weights for shared organizer, shared venue and any shared topic
    pub fn score(&self, focal: &AdaptedEvent, candidate: &AdaptedEvent) -> u32 {
        let mut score: u32 = 0;
        if same_id(focal.organizer_id(), candidate.organizer_id()) {
            score = score.saturating_add(self.weights.organizer_weight);
        }
        if same_id(focal.location_id(), candidate.location_id()) {
            score = score.saturating_add(self.weights.venue_weight);
        }
        if candidate.topic_tags.iter().any(|t| focal.topic_tags.contains(t)) {
            score = score.saturating_add(self.weights.topic_weight);
        }
        score
    }

    /// Up to `limit` upcoming candidates with a non-zero score, best first.
    ///
    /// Equal scores are ordered by start date, undated last.
    pub fn score_related<'a>(
        &self,
        focal: &AdaptedEvent,
        candidates: &'a [AdaptedEvent],
        today: NaiveDate,
    ) -> Vec<&'a AdaptedEvent> {
        let mut scored: Vec<(u32, &AdaptedEvent)> = candidates
            .iter()
            .filter(|c| !is_focal(focal, c))
            .filter(|c| is_upcoming(c, today))
            .map(|c| (self.score(focal, c), c))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then_with(|| compare_start_dates(a.start_date, b.start_date))
        });

        let related: Vec<&AdaptedEvent> = scored
            .into_iter()
            .take(self.weights.limit)
            .map(|(_, event)| event)
            .collect();
        debug!(focal = %focal.id, candidates = candidates.len(), related = related.len(), "Scored related events");
        related
    }
}

/// The focal event itself, matched by identity or by a non-empty id
fn is_focal(focal: &AdaptedEvent, candidate: &AdaptedEvent) -> bool {
    std::ptr::eq(focal, candidate) || (!focal.id.is_empty() && focal.id == candidate.id)
}

/// Both sides resolved and equal
fn same_id(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if !a.is_empty() && a == b)
}
