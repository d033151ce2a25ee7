use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::EventStatus;
use crate::error::Result;

/// Query hints for the record store's event collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub limit: usize,
    /// How deep relational fields are embedded; 0 returns bare ids
    pub depth: u8,
    /// Field to sort by, `-` prefix for descending
    pub sort: Option<String>,
}

impl EventQuery {
    pub fn approved(limit: usize, depth: u8) -> Self {
        Self {
            status: Some(EventStatus::Approved),
            limit,
            depth,
            sort: Some("startDate".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueQuery {
    pub limit: usize,
    pub depth: u8,
    pub sort: Option<String>,
}

/// One page of raw documents plus the collection's total size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub docs: Vec<Value>,
    pub total_docs: usize,
}

/// Read access to the external record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn query_events(&self, query: &EventQuery) -> Result<Page>;

    async fn query_venues(&self, query: &VenueQuery) -> Result<Page>;
}
