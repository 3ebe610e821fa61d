use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::HistoryId;
use crate::models::{NewSearchHistory, SearchHistoryEntry};

/// Append-only; rows keep insertion order.
#[derive(Default)]
pub struct HistoryTable {
    rows: Vec<SearchHistoryEntry>,
    by_id: HashMap<HistoryId, usize>,
}

pub struct HistoryRepository<'a> {
    table: &'a RwLock<HistoryTable>,
}

impl<'a> HistoryRepository<'a> {
    #[must_use]
    pub const fn new(table: &'a RwLock<HistoryTable>) -> Self {
        Self { table }
    }

    pub async fn create(&self, new: NewSearchHistory) -> SearchHistoryEntry {
        let entry = SearchHistoryEntry::from_new(HistoryId::generate(), new);

        let mut table = self.table.write().await;
        let index = table.rows.len();
        table.by_id.insert(entry.id.clone(), index);
        table.rows.push(entry.clone());
        entry
    }

    pub async fn get(&self, id: &HistoryId) -> Option<SearchHistoryEntry> {
        let table = self.table.read().await;
        table
            .by_id
            .get(id)
            .and_then(|&index| table.rows.get(index))
            .cloned()
    }

    pub async fn recent(&self, user_id: Option<&str>, limit: usize) -> Vec<SearchHistoryEntry> {
        let table = self.table.read().await;

        // Newest insertion first, so the stable sort keeps that order for
        // entries sharing a timestamp.
        let mut entries: Vec<&SearchHistoryEntry> = table
            .rows
            .iter()
            .rev()
            .filter(|e| user_id.is_none_or(|u| e.user_id.as_deref() == Some(u)))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        entries.into_iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::limits::HISTORY_PAGE_SIZE;
    use crate::db::Store;
    use crate::models::NewSearchHistory;

    fn entry(query: &str, user: Option<&str>) -> NewSearchHistory {
        NewSearchHistory {
            user_id: user.map(str::to_string),
            facility_id: None,
            search_query: query.to_string(),
        }
    }

    #[tokio::test]
    async fn newest_entries_come_first() {
        let store = Store::new();
        store.create_search_history(entry("first", None)).await;
        store.create_search_history(entry("second", None)).await;

        let history = store.get_search_history(None, HISTORY_PAGE_SIZE).await;
        let queries: Vec<_> = history.iter().map(|e| e.search_query.as_str()).collect();
        assert_eq!(queries, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn limit_keeps_most_recent() {
        let store = Store::new();
        for i in 0..15 {
            store.create_search_history(entry(&format!("q{i}"), None)).await;
        }

        let history = store.get_search_history(None, HISTORY_PAGE_SIZE).await;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].search_query, "q14");
        assert_eq!(history[9].search_query, "q5");
    }

    #[tokio::test]
    async fn filters_by_user() {
        let store = Store::new();
        store.create_search_history(entry("a", Some("u1"))).await;
        store.create_search_history(entry("b", Some("u2"))).await;
        store.create_search_history(entry("c", None)).await;

        let history = store.get_search_history(Some("u1"), HISTORY_PAGE_SIZE).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].search_query, "a");

        let all = store.get_search_history(None, HISTORY_PAGE_SIZE).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn point_lookup_by_id() {
        let store = Store::new();
        let created = store.create_search_history(entry("x", None)).await;
        assert_eq!(
            store.get_search_history_entry(&created.id).await,
            Some(created)
        );
    }
}
