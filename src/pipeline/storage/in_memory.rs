use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::app::ports::{EventQuery, Page, RecordStore, VenueQuery};
use crate::error::{DiscoveryError, Result};

/// Record store backed by documents held in memory.
///
/// Honors the status filter, limit and `startDate` sort hints. Documents are
/// returned exactly as stored, so embed depth is whatever the fixture holds.
pub struct InMemoryRecordStore {
    events: RwLock<Vec<Value>>,
    venues: RwLock<Vec<Value>>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl InMemoryRecordStore {
    pub fn new(events: Vec<Value>, venues: Vec<Value>) -> Self {
        Self {
            events: RwLock::new(events),
            venues: RwLock::new(venues),
        }
    }

    /// Load events from a JSON file holding either an array or a `{docs: [...]}` page
    pub async fn from_json_file(events_path: impl AsRef<Path>) -> Result<Self> {
        let events = read_documents(events_path.as_ref()).await?;
        Ok(Self::new(events, Vec::new()))
    }

    pub async fn with_venues_file(self, venues_path: impl AsRef<Path>) -> Result<Self> {
        let venues = read_documents(venues_path.as_ref()).await?;
        *self.venues.write().await = venues;
        Ok(self)
    }

    pub async fn insert_event(&self, event: Value) {
        self.events.write().await.push(event);
    }
}

async fn read_documents(path: &Path) -> Result<Vec<Value>> {
    let content = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&content)?;
    let docs = match value {
        Value::Array(docs) => docs,
        Value::Object(mut page) => match page.remove("docs") {
            Some(Value::Array(docs)) => docs,
            _ => {
                return Err(DiscoveryError::Store(format!(
                    "{} has no `docs` array",
                    path.display()
                )))
            }
        },
        _ => {
            return Err(DiscoveryError::Store(format!(
                "{} must contain an array or a page object",
                path.display()
            )))
        }
    };
    debug!(path = %path.display(), documents = docs.len(), "Loaded documents");
    Ok(docs)
}

fn status_matches(doc: &Value, query: &EventQuery) -> bool {
    match query.status {
        None => true,
        Some(status) => doc.get("status").and_then(Value::as_str) == Some(status.as_str()),
    }
}

fn start_key(doc: &Value) -> Option<&str> {
    doc.get("startDate").and_then(Value::as_str)
}

/// ISO timestamps compare chronologically as strings; undated sort last
fn compare_start_keys(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn query_events(&self, query: &EventQuery) -> Result<Page> {
        let events = self.events.read().await;
        let mut matching: Vec<Value> = events.iter().filter(|d| status_matches(d, query)).cloned().collect();
        match query.sort.as_deref() {
            Some("startDate") => matching.sort_by(|a, b| compare_start_keys(start_key(a), start_key(b))),
            Some("-startDate") => matching.sort_by(|a, b| compare_start_keys(start_key(b), start_key(a))),
            _ => {}
        }
        let total_docs = matching.len();
        matching.truncate(query.limit);
        debug!(status = ?query.status, total_docs, returned = matching.len(), "Queried events");
        Ok(Page { docs: matching, total_docs })
    }

    async fn query_venues(&self, query: &VenueQuery) -> Result<Page> {
        let venues = self.venues.read().await;
        let total_docs = venues.len();
        let docs = venues.iter().take(query.limit).cloned().collect();
        Ok(Page { docs, total_docs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn store() -> InMemoryRecordStore {
        InMemoryRecordStore::new(
            vec![
                json!({"id": "late", "status": "approved", "startDate": "2025-07-01T10:00:00.000Z"}),
                json!({"id": "draft", "status": "draft", "startDate": "2025-06-01T10:00:00.000Z"}),
                json!({"id": "undated", "status": "approved"}),
                json!({"id": "early", "status": "approved", "startDate": "2025-06-05T10:00:00.000Z"}),
            ],
            vec![json!({"id": "v1"}), json!({"id": "v2"})],
        )
    }

    fn ids(page: &Page) -> Vec<&str> {
        page.docs.iter().filter_map(|d| d["id"].as_str()).collect()
    }

    #[tokio::test]
    async fn test_query_filters_status_and_sorts() {
        let page = store().query_events(&EventQuery::approved(10, 2)).await.unwrap();
        assert_eq!(ids(&page), vec!["early", "late", "undated"]);
        assert_eq!(page.total_docs, 3);
    }

    #[tokio::test]
    async fn test_query_limit_keeps_total() {
        let page = store().query_events(&EventQuery::approved(1, 2)).await.unwrap();
        assert_eq!(ids(&page), vec!["early"]);
        assert_eq!(page.total_docs, 3);
    }

    #[tokio::test]
    async fn test_query_venues() {
        let page = store().query_venues(&VenueQuery { limit: 1, depth: 0, sort: None }).await.unwrap();
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.total_docs, 2);
    }

    #[tokio::test]
    async fn test_load_page_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"docs": [{{"id": "a", "status": "approved"}}], "totalDocs": 1}}"#).unwrap();
        let store = InMemoryRecordStore::from_json_file(file.path()).await.unwrap();
        let page = store.query_events(&EventQuery::approved(10, 0)).await.unwrap();
        assert_eq!(ids(&page), vec!["a"]);
    }

    #[tokio::test]
    async fn test_load_rejects_scalar_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "42").unwrap();
        assert!(matches!(
            InMemoryRecordStore::from_json_file(file.path()).await,
            Err(DiscoveryError::Store(_))
        ));
    }
}
