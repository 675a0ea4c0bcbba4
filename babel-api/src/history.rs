//! Paginated request history.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::json_body;
use crate::{ApiError, BabelClient, Result};

pub const HISTORY_PATH: &str = "/fetch-history";

/// Response header marking the last page.
pub const EXHAUSTED_HEADER: &str = "exhausted";

/// Sort, filter and page selection. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub sort: u32,
    pub filter: u32,
    pub page: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            sort: 0,
            filter: 0,
            page: 1,
        }
    }
}

impl HistoryQuery {
    pub fn new(sort: u32, filter: u32) -> Self {
        Self {
            sort,
            filter,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// The same selection, one page further.
    pub fn next_page(&self) -> Self {
        (*self).with_page(self.page.saturating_add(1))
    }
}

/// One past translation or transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub time_requested: String,
    pub content: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// One page of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub query: HistoryQuery,
    pub entries: Vec<HistoryEntry>,
    /// No further pages exist.
    pub exhausted: bool,
}

impl HistoryPage {
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Query for the following page, if there is one.
    pub fn next_query(&self) -> Option<HistoryQuery> {
        self.has_more().then(|| self.query.next_page())
    }
}

/// Any value other than `false` or `0` marks the last page.
fn is_exhausted(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => false,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
    }
}

impl BabelClient {
    /// Fetch one page of history.
    pub async fn fetch_history(&self, query: HistoryQuery) -> Result<HistoryPage> {
        let response = self
            .http()
            .get(self.config().api_url(HISTORY_PATH))
            .query("sort", query.sort)
            .query("filter", query.filter)
            .query("page", query.page)
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status()));
        }

        let exhausted = is_exhausted(response.header(EXHAUSTED_HEADER));
        let entries = serde_json::from_value(json_body(&response)?)
            .map_err(|e| ApiError::UnexpectedResponse(e.to_string()))?;

        Ok(HistoryPage {
            query,
            entries,
            exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_query() {
        let query = HistoryQuery::default();
        assert_eq!((query.sort, query.filter, query.page), (0, 0, 1));
        assert_eq!(query.next_page().page, 2);
        assert_eq!(HistoryQuery::new(1, 2).with_page(0).page, 1);
    }

    #[test]
    fn test_exhausted_header_values() {
        assert!(!is_exhausted(None));
        assert!(!is_exhausted(Some("false")));
        assert!(!is_exhausted(Some("FALSE")));
        assert!(!is_exhausted(Some("0")));
        assert!(is_exhausted(Some("true")));
        assert!(is_exhausted(Some("1")));
        assert!(is_exhausted(Some("")));
    }

    #[test]
    fn test_entry_ids() {
        let entries: Vec<HistoryEntry> = serde_json::from_value(json!([
            {"id": 7, "time_requested": "2024-05-01 10:00", "content": "hola"},
            {"id": "a1", "time_requested": "2024-05-01 10:01", "content": "adios"}
        ]))
        .unwrap();
        assert_eq!(entries[0].id, "7");
        assert_eq!(entries[1].id, "a1");
    }

    #[test]
    fn test_next_query_stops_when_exhausted() {
        let page = HistoryPage {
            query: HistoryQuery::default(),
            entries: Vec::new(),
            exhausted: true,
        };
        assert_eq!(page.next_query(), None);
    }
}
