use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How an event repeats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    #[default]
    OneTime,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl EventType {
    /// Parse the record store's `eventType` value; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "one-time" | "onetime" | "single" => Some(Self::OneTime),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Self::OneTime
    }
}

/// Editorial lifecycle state of an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
    Archived,
}

impl EventStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }
}

/// The three tag vocabularies an editor can attach to an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    /// Audience / age group
    Target,
    /// Theme
    Topic,
    /// Format (workshop, concert, ...)
    Format,
}

impl TagCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "target" => Some(Self::Target),
            "topic" => Some(Self::Topic),
            "format" => Some(Self::Format),
            _ => None,
        }
    }
}

/// Ordinal week within a month for "nth weekday" monthly rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeekIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekIndex {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Some(Self::First),
            "second" | "2" => Some(Self::Second),
            "third" | "3" => Some(Self::Third),
            "fourth" | "4" => Some(Self::Fourth),
            "last" | "-1" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Monthly recurrence mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MonthlyRule {
    DayOfMonth { day: u32 },
    NthWeekday { week: WeekIndex, weekday: chrono::Weekday },
}

/// Stored recurrence rule. Only ever described, never expanded into dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    /// Weekdays for weekly rules, Monday first, no duplicates
    pub days_of_week: Vec<chrono::Weekday>,
    pub repeat_until: Option<NaiveDate>,
    pub monthly: Option<MonthlyRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdaptedImage {
    pub id: String,
    pub url: Option<String>,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedOrganizer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdaptedTag {
    pub id: String,
    pub name: String,
    pub category: Option<TagCategory>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedAddress {
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub city: String,
}

impl AdaptedAddress {
    /// Single display line, e.g. `Hauptstraße 12, 10115 Berlin`
    pub fn line(&self) -> String {
        let street = join_non_empty(&[&self.street, &self.number], " ");
        let city = join_non_empty(&[&self.postal_code, &self.city], " ");
        join_non_empty(&[&street, &city], ", ")
    }

    pub fn is_empty(&self) -> bool {
        self.line().is_empty()
    }
}

fn join_non_empty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Position on the site map, in percent of width/height
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedLocation {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub image: Option<AdaptedImage>,
    pub address: AdaptedAddress,
    pub coordinates: Option<Coordinates>,
    pub map_position: Option<MapPosition>,
    pub opening_hours: Option<String>,
}

impl AdaptedLocation {
    /// Short name when set, full name otherwise. This is the "place" facet value.
    pub fn display_name(&self) -> &str {
        if self.short_name.trim().is_empty() {
            &self.name
        } else {
            &self.short_name
        }
    }
}

/// Display-ready projection of a raw event document.
///
/// Always fully populated regardless of how deeply the source document was
/// embedded; unresolved references show up as `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedEvent {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub excerpt: String,
    pub event_type: EventType,
    pub status: EventStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Calendar day of `start_date`
    pub date: Option<NaiveDate>,
    pub time_label: String,
    pub recurrence: RecurrenceRule,
    pub recurrence_label: String,
    pub location: Option<AdaptedLocation>,
    pub organizer: Option<AdaptedOrganizer>,
    pub image: Option<AdaptedImage>,
    pub tags: Vec<AdaptedTag>,
    pub target_tags: Vec<String>,
    pub topic_tags: Vec<String>,
    pub format_tags: Vec<String>,
    pub is_accessible: bool,
    pub cost_is_free: bool,
    pub cost_details: Option<String>,
    pub registration_required: bool,
    pub registration_details: Option<String>,
}

impl AdaptedEvent {
    /// Venue display name, if the venue was embedded
    pub fn place(&self) -> Option<&str> {
        self.location.as_ref().map(AdaptedLocation::display_name)
    }

    pub fn organizer_id(&self) -> Option<&str> {
        self.organizer.as_ref().map(|o| o.id.as_str())
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.id.as_str())
    }
}
