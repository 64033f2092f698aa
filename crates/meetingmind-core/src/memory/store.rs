//! MemoryStore trait definition and its boxed wrapper.
//!
//! Follows the same blanket-impl pattern as `BoxLlmProvider`.

use std::future::Future;
use std::pin::Pin;

use meetingmind_types::error::MemoryStoreError;
use meetingmind_types::memory::{MemoryItem, MemoryRecord, SearchQuery, SearchResponse, StoreAck};

/// Trait for memory backends (local index, hosted service).
///
/// Both backends satisfy the same contract: `search` returns items grouped by
/// memory type, each group ordered by descending relevance with ties in
/// insertion order, and `top_k` bounds the total item count.
pub trait MemoryStore: Send + Sync {
    /// Backend name reported by health checks ("local", "hosted").
    fn backend(&self) -> &str;

    /// Persist one record. Each call is atomic at record granularity.
    fn store(
        &self,
        record: &MemoryRecord,
    ) -> impl Future<Output = Result<StoreAck, MemoryStoreError>> + Send;

    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResponse, MemoryStoreError>> + Send;

    /// Newest-first dump of stored items, for inspection.
    fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MemoryItem>, MemoryStoreError>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MemoryStoreError>> + Send + 'a>>;

/// Object-safe version of [`MemoryStore`].
pub trait MemoryStoreDyn: Send + Sync {
    fn backend(&self) -> &str;

    fn store_boxed<'a>(&'a self, record: &'a MemoryRecord) -> BoxFuture<'a, StoreAck>;

    fn search_boxed<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, SearchResponse>;

    fn list_recent_boxed<'a>(
        &'a self,
        user_id: Option<&'a str>,
        memory_type: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Vec<MemoryItem>>;
}

impl<T: MemoryStore> MemoryStoreDyn for T {
    fn backend(&self) -> &str {
        MemoryStore::backend(self)
    }

    fn store_boxed<'a>(&'a self, record: &'a MemoryRecord) -> BoxFuture<'a, StoreAck> {
        Box::pin(self.store(record))
    }

    fn search_boxed<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, SearchResponse> {
        Box::pin(self.search(query))
    }

    fn list_recent_boxed<'a>(
        &'a self,
        user_id: Option<&'a str>,
        memory_type: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Vec<MemoryItem>> {
        Box::pin(self.list_recent(user_id, memory_type, limit))
    }
}

/// Type-erased memory store, selected once from configuration.
pub struct BoxMemoryStore {
    inner: Box<dyn MemoryStoreDyn + Send + Sync>,
}

impl BoxMemoryStore {
    pub fn new<T: MemoryStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub fn backend(&self) -> &str {
        self.inner.backend()
    }

    pub async fn store(&self, record: &MemoryRecord) -> Result<StoreAck, MemoryStoreError> {
        self.inner.store_boxed(record).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, MemoryStoreError> {
        self.inner.search_boxed(query).await
    }

    pub async fn list_recent(
        &self,
        user_id: Option<&str>,
        memory_type: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryStoreError> {
        self.inner.list_recent_boxed(user_id, memory_type, limit).await
    }
}
