//! In-memory document collections for the liber catalog.
//!
//! One [`Collection`] per entity type. Documents are keyed by UUID and
//! filtered with host-language predicates; cross-collection references
//! are opaque ids resolved by the caller at read time. The store never
//! enforces referential integrity, that is the controllers' job.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// A record that can live in a [`Collection`].
pub trait Document: Clone + Send + Sync + 'static {
    /// Stable identifier for this record.
    fn id(&self) -> Uuid;
}

/// A typed collection of documents.
///
/// Reads take a shared lock and writes an exclusive one, so independent
/// reads issued together by one request can interleave with other
/// requests. There are no transactions: a check-then-write sequence is
/// two separate round-trips with no isolation.
pub struct Collection<T> {
    name: &'static str,
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Document> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a document, returning its id.
    pub async fn insert(&self, row: T) -> Uuid {
        let id = row.id();
        let mut rows = self.rows.write().await;
        let replaced = rows.insert(id, row);
        debug_assert!(replaced.is_none(), "duplicate document id");
        tracing::debug!(collection = self.name, %id, "document inserted");
        id
    }

    /// Fetch a document by id.
    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// All documents, unordered.
    pub async fn all(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }

    /// All documents sorted ascending by the given key.
    pub async fn all_sorted<K: Ord>(&self, key: impl Fn(&T) -> K) -> Vec<T> {
        let mut rows = self.all().await;
        rows.sort_by(|a, b| key(a).cmp(&key(b)));
        rows
    }

    /// Documents matching a predicate, unordered.
    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    /// Documents matching a predicate, sorted ascending by the given key.
    pub async fn find_sorted<K: Ord>(
        &self,
        pred: impl Fn(&T) -> bool,
        key: impl Fn(&T) -> K,
    ) -> Vec<T> {
        let mut rows = self.find(pred).await;
        rows.sort_by(|a, b| key(a).cmp(&key(b)));
        rows
    }

    /// First document matching a predicate, if any.
    pub async fn find_one(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .read()
            .await
            .values()
            .find(|row| pred(row))
            .cloned()
    }

    /// Apply a partial update to a document by id, returning the updated
    /// document or `None` when the id does not resolve.
    pub async fn update(&self, id: Uuid, apply: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id)?;
        apply(row);
        tracing::debug!(collection = self.name, %id, "document updated");
        Some(row.clone())
    }

    /// Remove a document by id, returning it if it existed.
    pub async fn remove(&self, id: Uuid) -> Option<T> {
        let removed = self.rows.write().await.remove(&id);
        if removed.is_some() {
            tracing::debug!(collection = self.name, %id, "document removed");
        }
        removed
    }

    /// Total number of documents.
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Number of documents matching a predicate.
    pub async fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.rows.read().await.values().filter(|row| pred(row)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: Uuid,
        label: String,
        rank: u32,
    }

    impl Document for Row {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn row(label: &str, rank: u32) -> Row {
        Row {
            id: Uuid::now_v7(),
            label: label.to_string(),
            rank,
        }
    }

    #[tokio::test]
    async fn insert_then_get_roundtrip() {
        let rows = Collection::new("rows");
        let original = row("alpha", 1);
        let id = rows.insert(original.clone()).await;

        assert_eq!(rows.get(id).await, Some(original));
        assert_eq!(rows.count().await, 1);
    }

    #[tokio::test]
    async fn get_missing_id_is_none() {
        let rows: Collection<Row> = Collection::new("rows");
        assert_eq!(rows.get(Uuid::now_v7()).await, None);
    }

    #[tokio::test]
    async fn find_sorted_orders_by_key() {
        let rows = Collection::new("rows");
        rows.insert(row("gamma", 3)).await;
        rows.insert(row("alpha", 1)).await;
        rows.insert(row("beta", 2)).await;

        let sorted = rows
            .find_sorted(|r| r.rank >= 2, |r| r.label.clone())
            .await;
        let labels: Vec<_> = sorted.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["beta", "gamma"]);
    }

    #[tokio::test]
    async fn update_applies_in_place() {
        let rows = Collection::new("rows");
        let id = rows.insert(row("alpha", 1)).await;

        let updated = rows.update(id, |r| r.rank = 9).await.unwrap();
        assert_eq!(updated.rank, 9);
        assert_eq!(rows.get(id).await.unwrap().rank, 9);
    }

    #[tokio::test]
    async fn update_missing_id_is_none() {
        let rows: Collection<Row> = Collection::new("rows");
        assert!(rows.update(Uuid::now_v7(), |r| r.rank = 9).await.is_none());
    }

    #[tokio::test]
    async fn remove_is_idempotent_on_missing() {
        let rows = Collection::new("rows");
        let id = rows.insert(row("alpha", 1)).await;

        assert!(rows.remove(id).await.is_some());
        assert!(rows.remove(id).await.is_none());
        assert_eq!(rows.count().await, 0);
    }

    #[tokio::test]
    async fn count_where_filters() {
        let rows = Collection::new("rows");
        rows.insert(row("alpha", 1)).await;
        rows.insert(row("beta", 2)).await;
        rows.insert(row("gamma", 2)).await;

        assert_eq!(rows.count_where(|r| r.rank == 2).await, 2);
    }
}
