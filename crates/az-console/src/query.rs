//! List Queries
//!
//! A [`ListQuery`] owns one paginated list keyed by
//! `(resource, page, size, filters)`:
//! - Every fetch takes a new generation; a result is applied only while its
//!   generation is still the latest and the query is attached
//! - While a fetch is in flight `is_loading` is set and the previous error
//!   is cleared; previous rows stay visible until replaced
//!
//! [`QueryClient`] maps resource names to live queries so mutations can
//! refetch every list of a resource.

use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use az_client::ApiError;
use az_common::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterValue {
    Text(String),
    Int(i64),
}

/// Identity of one list request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub page_index: u32,
    pub page_size: u32,
    pub filters: BTreeMap<&'static str, FilterValue>,
}

impl QueryKey {
    pub fn new(resource: &'static str, page_size: u32) -> Self {
        Self {
            resource,
            page_index: 0,
            page_size,
            filters: BTreeMap::new(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page_index, self.page_size)
    }

    /// Set or clear a filter; blank text clears it
    pub fn with_filter(mut self, name: &'static str, value: Option<FilterValue>) -> Self {
        match value {
            Some(FilterValue::Text(text)) if text.trim().is_empty() => {
                self.filters.remove(name);
            }
            Some(value) => {
                self.filters.insert(name, value);
            }
            None => {
                self.filters.remove(name);
            }
        }
        self
    }

    pub fn text_filter(&self, name: &str) -> Option<&str> {
        match self.filters.get(name) {
            Some(FilterValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn int_filter(&self, name: &str) -> Option<i64> {
        match self.filters.get(name) {
            Some(FilterValue::Int(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Something that can fetch one page of a resource
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Row: Clone + Send + Sync + 'static;

    /// Resource name used for keys and invalidation
    fn name(&self) -> &'static str;

    async fn fetch(&self, key: &QueryKey) -> Result<Page<Self::Row>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub key: QueryKey,
    pub data: Option<Page<T>>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    pub fn rows(&self) -> &[T] {
        self.data.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn total_elements(&self) -> u64 {
        self.data.as_ref().map(|p| p.total_elements).unwrap_or(0)
    }

    /// Pager size, derived from the server's total
    pub fn page_count(&self) -> u32 {
        self.data
            .as_ref()
            .map(|p| p.page_count(self.key.page_size))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result stored
    Applied,
    /// Superseded by a newer fetch, or the query was detached
    Discarded,
}

pub struct ListQuery<S: ListSource> {
    source: Arc<S>,
    generation: AtomicU64,
    detached: AtomicBool,
    state: Mutex<QueryState<S::Row>>,
}

impl<S: ListSource> ListQuery<S> {
    pub fn new(source: Arc<S>, key: QueryKey) -> Arc<Self> {
        Arc::new(Self {
            source,
            generation: AtomicU64::new(0),
            detached: AtomicBool::new(false),
            state: Mutex::new(QueryState {
                key,
                data: None,
                is_loading: false,
                error: None,
            }),
        })
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn key(&self) -> QueryKey {
        self.state.lock().key.clone()
    }

    pub fn snapshot(&self) -> QueryState<S::Row> {
        self.state.lock().clone()
    }

    pub fn rows(&self) -> Vec<S::Row> {
        self.state.lock().rows().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub async fn set_key(&self, key: QueryKey) -> FetchOutcome {
        self.run(key).await
    }

    pub async fn set_page(&self, page_index: u32) -> FetchOutcome {
        let mut key = self.key();
        key.page_index = page_index;
        self.run(key).await
    }

    /// Change page size; returns to the first page
    pub async fn set_page_size(&self, page_size: u32) -> FetchOutcome {
        let mut key = self.key();
        key.page_size = page_size;
        key.page_index = 0;
        self.run(key).await
    }

    /// Change one filter; returns to the first page
    pub async fn set_filter(&self, name: &'static str, value: Option<FilterValue>) -> FetchOutcome {
        let mut key = self.key().with_filter(name, value);
        key.page_index = 0;
        self.run(key).await
    }

    /// Re-run the current key
    pub async fn refetch(&self) -> FetchOutcome {
        let key = self.key();
        self.run(key).await
    }

    /// Stop applying results; in-flight fetches will be discarded
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
        self.state.lock().is_loading = false;
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    async fn run(&self, key: QueryKey) -> FetchOutcome {
        if self.is_detached() {
            return FetchOutcome::Discarded;
        }

        let generation = {
            let mut state = self.state.lock();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.key = key.clone();
            state.is_loading = true;
            state.error = None;
            generation
        };

        let result = self.source.fetch(&key).await;

        let mut state = self.state.lock();
        if self.is_detached() || self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                resource = key.resource,
                generation,
                "Discarding stale list result"
            );
            return FetchOutcome::Discarded;
        }

        state.is_loading = false;
        match result {
            Ok(page) => {
                debug!(
                    resource = key.resource,
                    page = key.page_index,
                    rows = page.items.len(),
                    total = page.total_elements,
                    "List loaded"
                );
                state.data = Some(page);
            }
            Err(e) => {
                if !e.is_session_expired() {
                    warn!(resource = key.resource, error = %e, "List fetch failed");
                }
                state.error = Some(e);
            }
        }
        FetchOutcome::Applied
    }
}

/// Type-erased handle used by [`QueryClient`]
#[async_trait]
pub trait Refetch: Send + Sync {
    fn resource(&self) -> &'static str;

    fn is_detached(&self) -> bool;

    async fn refetch(&self) -> FetchOutcome;
}

#[async_trait]
impl<S: ListSource> Refetch for ListQuery<S> {
    fn resource(&self) -> &'static str {
        self.source.name()
    }

    fn is_detached(&self) -> bool {
        ListQuery::is_detached(self)
    }

    async fn refetch(&self) -> FetchOutcome {
        ListQuery::refetch(self).await
    }
}

/// Registry of live list queries by resource name
#[derive(Clone, Default)]
pub struct QueryClient {
    queries: Arc<DashMap<&'static str, Vec<Weak<dyn Refetch>>>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `query`; dropped and detached entries are pruned first
    pub fn register<Q: Refetch + 'static>(&self, query: &Arc<Q>) {
        let weak: Weak<dyn Refetch> = Arc::downgrade(query) as Weak<dyn Refetch>;
        let mut entry = self.queries.entry(query.resource()).or_default();
        entry.retain(is_live);
        entry.push(weak);
    }

    /// Number of live, attached queries for `resource`
    pub fn live_count(&self, resource: &str) -> usize {
        self.queries
            .get_mut(resource)
            .map(|mut entry| {
                entry.retain(is_live);
                entry.len()
            })
            .unwrap_or(0)
    }

    /// Entries held for `resource`, live or not
    #[cfg(test)]
    fn tracked(&self, resource: &str) -> usize {
        self.queries.get(resource).map(|entry| entry.len()).unwrap_or(0)
    }

    /// Refetch every live query of `resource` with its current key.
    /// Returns how many were refetched.
    pub async fn invalidate(&self, resource: &str) -> usize {
        let live: Vec<Arc<dyn Refetch>> = match self.queries.get_mut(resource) {
            Some(mut entry) => {
                entry.retain(is_live);
                entry.iter().filter_map(Weak::upgrade).collect()
            }
            None => Vec::new(),
        };

        debug!(resource, queries = live.len(), "Invalidating queries");
        join_all(live.iter().map(|q| q.refetch())).await;
        live.len()
    }
}

fn is_live(weak: &Weak<dyn Refetch>) -> bool {
    weak.upgrade().is_some_and(|q| !q.is_detached())
}
