//! Normalizes raw record-store documents into display-ready view models.
//!
//! Adaptation is total: any JSON object produces a fully populated view
//! model, and only non-object input yields `None`.

pub mod dates;
pub mod location;
pub mod media;
pub mod recurrence;
pub mod reference;
pub mod rich_text;

use serde_json::Value;
use tracing::warn;

use crate::collation::Locale;
use crate::config::DiscoveryConfig;
use crate::domain::{
    AdaptedEvent, AdaptedLocation, AdaptedOrganizer, AdaptedTag, EventStatus, EventType, TagCategory,
};
use dates::parse_instant;
use location::adapt_location_document;
use media::MediaResolver;
use recurrence::{parse_rule, RecurrenceLabeler};
use reference::{RawDocument, Reference};
use rich_text::plain_text;

/// Longest excerpt kept verbatim
pub const EXCERPT_MAX_CHARS: usize = 200;
/// Characters kept before the ellipsis when an excerpt is cut
pub const EXCERPT_CUT_CHARS: usize = 197;
pub const ELLIPSIS: char = '…';

/// Maps raw event and venue documents onto view models
#[derive(Debug, Clone, Default)]
pub struct DocumentAdapter {
    media: MediaResolver,
    labeler: RecurrenceLabeler,
    locale: Locale,
}

impl DocumentAdapter {
    pub fn new(api_base_url: &str, locale: Locale) -> Self {
        Self {
            media: MediaResolver::from_api_base(api_base_url),
            labeler: RecurrenceLabeler::new(locale),
            locale,
        }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(&config.api_base_url, config.locale)
    }

    pub fn media(&self) -> &MediaResolver {
        &self.media
    }

    pub fn untitled(&self) -> &'static str {
        match self.locale {
            Locale::De => "Ohne Titel",
            Locale::En => "Untitled",
        }
    }

    pub fn adapt_event(&self, raw: &Value) -> Option<AdaptedEvent> {
        let doc = RawDocument::from_value(raw)?;
        let id = doc.id().unwrap_or_default();

        let subtitle = doc.string("subtitle");
        let description = plain_text(doc.get("description"));
        let excerpt = excerpt(&subtitle, &description);

        let event_type = match doc.str("eventType") {
            None => EventType::OneTime,
            Some(value) => EventType::parse(value).unwrap_or_else(|| {
                warn!(event_id = %id, event_type = value, "Unknown event type, treating as one-time");
                EventType::OneTime
            }),
        };
        let status = doc.str("status").and_then(EventStatus::parse).unwrap_or_default();

        let start_date = parse_instant(doc.get("startDate"));
        let end_date = parse_instant(doc.get("endDate"));
        let time = doc.nested("time");
        let time_label = time_label(
            time.and_then(|t| t.str("from")),
            time.and_then(|t| t.str("to")),
        );
        let recurrence = parse_rule(doc.nested("recurrence"));
        let recurrence_label = self.labeler.label(event_type, &recurrence, &time_label);

        let tags: Vec<AdaptedTag> = doc
            .array("tags")
            .iter()
            .filter_map(Reference::from_value)
            .filter_map(Reference::resolved)
            .map(adapt_tag)
            .collect();
        let partition = partition_tags(&tags);

        let cost = doc.nested("cost");
        let registration = doc.nested("registration");

        Some(AdaptedEvent {
            title: doc.str("title").unwrap_or(self.untitled()).to_string(),
            subtitle,
            description,
            excerpt,
            event_type,
            status,
            start_date,
            end_date,
            date: start_date.map(|dt| dt.date_naive()),
            time_label,
            recurrence,
            recurrence_label,
            location: doc
                .reference("location")
                .and_then(Reference::resolved)
                .map(|venue| adapt_location_document(venue, &self.media)),
            organizer: doc.reference("organizer").and_then(Reference::resolved).map(adapt_organizer),
            image: self.media.adapt_image(doc.reference("image")),
            tags,
            target_tags: partition.target,
            topic_tags: partition.topic,
            format_tags: partition.format,
            is_accessible: doc.bool("isAccessible"),
            cost_is_free: cost.is_some_and(|c| c.bool("isFree")),
            cost_details: cost.and_then(|c| c.opt_string("details")),
            registration_required: registration.is_some_and(|r| r.bool("required")),
            registration_details: registration.and_then(|r| r.opt_string("details")),
            id,
        })
    }

    pub fn adapt_location(&self, raw: &Value) -> Option<AdaptedLocation> {
        RawDocument::from_value(raw).map(|doc| adapt_location_document(doc, &self.media))
    }
}

/// Subtitle if present, otherwise the description, cut to fit a teaser
pub fn excerpt(subtitle: &str, description: &str) -> String {
    let source = if subtitle.trim().is_empty() { description } else { subtitle };
    if source.chars().count() <= EXCERPT_MAX_CHARS {
        return source.to_string();
    }
    let mut cut: String = source.chars().take(EXCERPT_CUT_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

pub fn time_label(from: Option<&str>, to: Option<&str>) -> String {
    match (from, to) {
        (Some(from), Some(to)) => format!("{from} – {to}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

fn adapt_organizer(doc: RawDocument<'_>) -> AdaptedOrganizer {
    AdaptedOrganizer {
        id: doc.id().unwrap_or_default(),
        name: doc.string("name"),
        email: doc.opt_string("email"),
        phone: doc.opt_string("phone"),
        website: doc.opt_string("website"),
    }
}

fn adapt_tag(doc: RawDocument<'_>) -> AdaptedTag {
    let name = doc.str("name").or_else(|| doc.str("title")).unwrap_or_default().to_string();
    let category = doc.str("category").and_then(|value| {
        let parsed = TagCategory::parse(value);
        if parsed.is_none() {
            warn!(tag = %name, category = value, "Unknown tag category, tag left out of the name lists");
        }
        parsed
    });
    AdaptedTag {
        id: doc.id().unwrap_or_default(),
        name,
        category,
        color: doc.opt_string("color"),
    }
}

#[derive(Debug, Default)]
struct TagPartition {
    target: Vec<String>,
    topic: Vec<String>,
    format: Vec<String>,
}

/// Group tag names by category; uncategorised or nameless tags are dropped
fn partition_tags(tags: &[AdaptedTag]) -> TagPartition {
    tags.iter()
        .filter(|tag| !tag.name.is_empty())
        .fold(TagPartition::default(), |mut acc, tag| {
            match tag.category {
                Some(TagCategory::Target) => acc.target.push(tag.name.clone()),
                Some(TagCategory::Topic) => acc.topic.push(tag.name.clone()),
                Some(TagCategory::Format) => acc.format.push(tag.name.clone()),
                None => {}
            }
            acc
        })
}
