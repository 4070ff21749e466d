//! Best-effort city suggestions for type-ahead search.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{runtime::TryCurrentError, sync::watch};

use crate::{
    debounce::{Debouncer, RequestGeneration, Ticket},
    geocode::CityLookup,
    model::CitySuggestion,
};

pub const DEFAULT_CACHE_CAPACITY: usize = 100;
/// Queries shorter than this never reach the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Bounded query cache. When full, the oldest inserted key is evicted;
/// reads do not refresh a key's position.
#[derive(Debug)]
pub struct SuggestionCache {
    capacity: usize,
    entries: HashMap<String, Vec<CitySuggestion>>,
    order: VecDeque<String>,
}

impl SuggestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[CitySuggestion]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the evicted key, if any.
    pub fn insert(&mut self, key: String, value: Vec<CitySuggestion>) -> Option<String> {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order.pop_front().inspect(|oldest| {
                self.entries.remove(oldest);
            })
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Caching front for a [`CityLookup`]. One per session.
pub struct SuggestionClient<L> {
    lookup: L,
    cache: Mutex<SuggestionCache>,
}

impl<L: CityLookup> SuggestionClient<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_cache(lookup, SuggestionCache::default())
    }

    pub fn with_cache(lookup: L, cache: SuggestionCache) -> Self {
        Self { lookup, cache: Mutex::new(cache) }
    }

    /// Never fails: short queries and lookup errors both produce an empty list.
    pub async fn suggest(&self, query: &str) -> Vec<CitySuggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let key = query.to_lowercase();
        let cached = self.cache.lock().get(&key).map(<[_]>::to_vec);
        if let Some(hit) = cached {
            tracing::debug!(query = %key, "suggestion cache hit");
            return hit;
        }

        match self.lookup.lookup(query).await {
            Ok(suggestions) => {
                if let Some(evicted) = self.cache.lock().insert(key, suggestions.clone()) {
                    tracing::debug!(query = %evicted, "evicted oldest cached suggestion query");
                }
                suggestions
            }
            Err(err) => {
                tracing::warn!("City suggestion lookup failed: {}", err);
                Vec::new()
            }
        }
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Suggestions published for one input generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub ticket: Ticket,
    pub query: String,
    pub suggestions: Vec<CitySuggestion>,
}

/// Type-ahead driver: debounces keystrokes and drops responses that arrive
/// after newer input.
pub struct SuggestionSession<L> {
    client: Arc<SuggestionClient<L>>,
    debouncer: Debouncer,
    generation: RequestGeneration,
    published: Arc<watch::Sender<Snapshot>>,
}

impl<L> Clone for SuggestionSession<L> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            debouncer: self.debouncer.clone(),
            generation: self.generation.clone(),
            published: Arc::clone(&self.published),
        }
    }
}

impl<L: CityLookup + 'static> SuggestionSession<L> {
    /// Must be called from within a Tokio runtime.
    pub fn new(client: SuggestionClient<L>, quiet: Duration) -> Result<Self, TryCurrentError> {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Ok(Self {
            client: Arc::new(client),
            debouncer: Debouncer::new(quiet)?,
            generation: RequestGeneration::default(),
            published: Arc::new(tx),
        })
    }

    /// Registers new input and returns the ticket its results will carry.
    pub fn on_input(&self, input: &str) -> Ticket {
        let ticket = self.generation.advance();
        let query = input.trim().to_string();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.debouncer.cancel();
            self.publish(Snapshot { ticket, query, suggestions: Vec::new() });
            return ticket;
        }

        let client = Arc::clone(&self.client);
        let generation = self.generation.clone();
        let published = Arc::clone(&self.published);
        self.debouncer.schedule(async move {
            let suggestions = client.suggest(&query).await;
            if generation.is_current(ticket) {
                published.send_replace(Snapshot { ticket, query, suggestions });
            } else {
                tracing::debug!(query = %query, "dropping stale suggestion response");
            }
        });

        ticket
    }

    /// Latest published snapshot, whatever its ticket.
    pub fn latest(&self) -> Snapshot {
        self.published.borrow().clone()
    }

    /// Waits until results for `ticket` are published. Returns `None` on
    /// timeout or when newer input superseded `ticket` first.
    pub async fn settled(&self, ticket: Ticket, timeout: Duration) -> Option<Snapshot> {
        let mut rx = self.published.subscribe();
        let wait = rx.wait_for(|snapshot| snapshot.ticket >= ticket);

        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(snapshot)) if snapshot.ticket == ticket => Some(snapshot.clone()),
            _ => None,
        }
    }

    fn publish(&self, snapshot: Snapshot) {
        self.published.send_replace(snapshot);
    }
}
