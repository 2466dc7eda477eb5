//! The pokédex data service.
//!
//! [`Pokedex`] owns every cache and all pagination/filter state, and
//! reconciles two overlapping pagination modes — plain paging over the
//! whole collection and paging within a type's membership — against the
//! same remote source.
//!
//! # State model
//!
//! All state lives behind one shared handle ([`Pokedex`] is `Clone` and
//! cheap to pass around); mutations happen in short lock scopes that are
//! never held across an await. Derived values (total pages, the visible
//! page) are recomputed from the underlying fields on every read.
//!
//! # Failure semantics
//!
//! Foreground loads either fully succeed (and advance the page pointer)
//! or fully fail, leaving the visible page at its last consistent value
//! with the loading flag cleared. The background prefetch of the next
//! page is best-effort: it only warms the listing cache and its errors
//! are logged at debug and dropped.

mod builder;

pub use builder::PokedexBuilder;

use std::collections::HashMap;
use std::future::ready;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::LruCache;
use crate::client::PokeApiClient;
use crate::retry::{RetryConfig, with_retry};
use crate::telemetry;
use crate::types::api::TypeResponse;
use crate::types::validation::{extract_pokemon_id_from_url, is_valid_pokemon_id};
use crate::types::{Pokemon, PokemonSummary, PokemonType, validation::sanitize_search_input};
use crate::{DexError, Result};

/// Entries per page, in both pagination modes.
pub const PAGE_SIZE: u32 = 10;

/// Cap on simultaneous in-flight detail requests during a bulk load.
const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Ordered member ids for one type tag, built from a single membership
/// listing call. At most 18 of these exist, so the map holding them is
/// never evicted.
#[derive(Debug, Clone)]
pub struct TypeIndex {
    /// Member ids, ascending.
    pub ids: Vec<u32>,
    /// Member count (`ids.len()`).
    pub total: u32,
}

impl TypeIndex {
    fn from_listing(listing: &TypeResponse) -> Self {
        let mut ids: Vec<u32> = listing
            .pokemon
            .iter()
            .filter_map(|member| extract_pokemon_id_from_url(&member.pokemon.url))
            .collect();
        ids.sort_unstable();
        Self {
            total: ids.len() as u32,
            ids,
        }
    }
}

/// Pagination and filter state. Derived values are computed on read.
struct ViewState {
    /// Declared total of the remote collection.
    total: u32,
    /// Current page in plain mode, 1-based.
    current_page: u32,
    /// Raw search term as last set by the caller.
    search_term: String,
    selected_type: Option<PokemonType>,
    /// Whether type-filtered pagination is active.
    type_filter_mode: bool,
    /// Current page in type-filtered mode, 1-based.
    type_page: u32,
    /// Member count of the selected type.
    type_total: u32,
}

struct DexState {
    client: PokeApiClient,
    prefetch_enabled: bool,
    /// Backoff delays shared by every retried call; counts are per site.
    retry_template: RetryConfig,
    /// Listing cache, keyed by position within the declared total.
    list_cache: Mutex<LruCache<u32, PokemonSummary>>,
    /// Detail cache, keyed by id.
    detail_cache: Mutex<LruCache<u32, Pokemon>>,
    /// Per-type member indices. Unbounded; at most 18 entries.
    type_index: Mutex<HashMap<PokemonType, TypeIndex>>,
    /// Summaries loaded through type-filtered paging, keyed by (tag, id).
    type_item_cache: Mutex<LruCache<(PokemonType, u32), PokemonSummary>>,
    view: Mutex<ViewState>,
    loading: AtomicBool,
}

/// The pokédex data service: caches, pagination, filtering, search.
///
/// Cloning shares the same underlying state; an application holds one
/// logical instance for its whole session.
#[derive(Clone)]
pub struct Pokedex {
    state: Arc<DexState>,
}

impl Pokedex {
    /// Create a service against the public API with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a service.
    pub fn builder() -> PokedexBuilder {
        PokedexBuilder::new()
    }

    pub(crate) fn from_builder(builder: &PokedexBuilder) -> Self {
        Self {
            state: Arc::new(DexState {
                client: PokeApiClient::with_base_url(builder.base_url.clone()),
                prefetch_enabled: builder.prefetch,
                retry_template: builder.retry_template.clone(),
                list_cache: Mutex::new(LruCache::new(builder.list_capacity)),
                detail_cache: Mutex::new(LruCache::new(builder.detail_capacity)),
                type_index: Mutex::new(HashMap::new()),
                type_item_cache: Mutex::new(LruCache::new(builder.type_item_capacity)),
                view: Mutex::new(ViewState {
                    total: 0,
                    current_page: 1,
                    search_term: String::new(),
                    selected_type: None,
                    type_filter_mode: false,
                    type_page: 1,
                    type_total: 0,
                }),
                loading: AtomicBool::new(false),
            }),
        }
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    /// Declared total of the remote collection (0 before `initialize`).
    pub fn total_count(&self) -> u32 {
        self.state.view.lock().total
    }

    /// Current page in plain mode.
    pub fn current_page(&self) -> u32 {
        self.state.view.lock().current_page
    }

    /// Whether a foreground load is in flight.
    pub fn loading(&self) -> bool {
        self.state.loading.load(Ordering::SeqCst)
    }

    /// The raw search term as last set.
    pub fn search_term(&self) -> String {
        self.state.view.lock().search_term.clone()
    }

    /// The active type filter, if any.
    pub fn selected_type(&self) -> Option<PokemonType> {
        self.state.view.lock().selected_type
    }

    /// Whether type-filtered pagination is active.
    pub fn type_filter_mode(&self) -> bool {
        self.state.view.lock().type_filter_mode
    }

    /// Current page in type-filtered mode.
    pub fn type_filter_page(&self) -> u32 {
        self.state.view.lock().type_page
    }

    /// Member count of the selected type.
    pub fn type_filter_total(&self) -> u32 {
        self.state.view.lock().type_total
    }

    /// Total pages for the active mode.
    pub fn total_pages(&self) -> u32 {
        let view = self.state.view.lock();
        if view.type_filter_mode {
            view.type_total.div_ceil(PAGE_SIZE)
        } else {
            view.total.div_ceil(PAGE_SIZE)
        }
    }

    /// Total pages within the selected type.
    pub fn type_filter_total_pages(&self) -> u32 {
        self.state.view.lock().type_total.div_ceil(PAGE_SIZE)
    }

    /// The page number the user is effectively on, whichever the mode.
    pub fn effective_page(&self) -> u32 {
        let view = self.state.view.lock();
        if view.type_filter_mode {
            view.type_page
        } else {
            view.current_page
        }
    }

    // ========================================================================
    // Derived item views
    // ========================================================================

    /// Cached summaries for the current plain-mode page, in position order.
    ///
    /// Positions not yet cached are simply absent; after a successful
    /// [`load_page`](Self::load_page) the full page is present.
    pub fn page_items(&self) -> Vec<PokemonSummary> {
        let (page, total) = {
            let view = self.state.view.lock();
            (view.current_page, view.total)
        };
        let (start, end) = page_bounds(page, total);
        let mut cache = self.state.list_cache.lock();
        (start..=end)
            .filter_map(|position| cache.get(&position).cloned())
            .collect()
    }

    /// Cached summaries for the current type-filtered page, in id order.
    pub fn type_page_items(&self) -> Vec<PokemonSummary> {
        let (tag, page) = {
            let view = self.state.view.lock();
            if !view.type_filter_mode {
                return Vec::new();
            }
            match view.selected_type {
                Some(tag) => (tag, view.type_page),
                None => return Vec::new(),
            }
        };
        let index = match self.state.type_index.lock().get(&tag).cloned() {
            Some(index) => index,
            None => return Vec::new(),
        };
        let start = ((page - 1) * PAGE_SIZE) as usize;
        let end = (page * PAGE_SIZE).min(index.total) as usize;
        if start >= end {
            return Vec::new();
        }
        let mut cache = self.state.type_item_cache.lock();
        index.ids[start..end]
            .iter()
            .filter_map(|id| cache.get(&(tag, *id)).cloned())
            .collect()
    }

    /// The visible list: the active page's items, refined by the search
    /// term when one is set.
    ///
    /// The term filters the already-fetched page by case-insensitive
    /// substring match against the name or the decimal id — a client-side
    /// refinement, not a new query.
    pub fn visible_pokemon(&self) -> Vec<PokemonSummary> {
        let (filtered_mode, search) = {
            let view = self.state.view.lock();
            (
                view.type_filter_mode,
                view.search_term.trim().to_lowercase(),
            )
        };
        let mut items = if filtered_mode {
            self.type_page_items()
        } else {
            self.page_items()
        };
        if !search.is_empty() {
            items.retain(|p| {
                p.name.to_lowercase().contains(&search) || p.id.to_string().contains(&search)
            });
        }
        items
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Fetch the collection total and load the first page.
    ///
    /// Non-fatal on failure: the loading flag is cleared and no data is
    /// recorded, so a later call can simply try again.
    pub async fn initialize(&self) -> Result<()> {
        self.set_loading(true);
        let retry = self.retry(3);
        match with_retry(&retry, "pokemon count", || self.state.client.list(0, 1)).await {
            Ok(listing) => {
                self.state.view.lock().total = listing.count;
                let loaded = self.load_page(1).await;
                // load_page leaves the flag alone when page 1 was already
                // warm, so settle it here either way
                self.set_loading(false);
                loaded
            }
            Err(e) => {
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Load a plain-mode page and advance to it.
    ///
    /// A page outside `[1, total_pages]` is a no-op: no request is made
    /// and the current page is untouched. The page pointer only advances
    /// once every position in the page's range is cached; on any failure
    /// the pointer stays where it was. A successful load kicks off a
    /// background prefetch of the following page.
    pub async fn load_page(&self, page: u32) -> Result<()> {
        let total = {
            let view = self.state.view.lock();
            view.total
        };
        if page < 1 || page > self.total_pages() {
            return Ok(());
        }

        let (start, end) = page_bounds(page, total);
        if self.positions_cached(start, end) {
            self.state.view.lock().current_page = page;
            return Ok(());
        }

        self.set_loading(true);
        match self.fill_positions(start, 2).await {
            Ok(()) => {
                if self.positions_cached(start, end) {
                    self.state.view.lock().current_page = page;
                    if self.state.prefetch_enabled {
                        self.prefetch_page(page + 1);
                    }
                }
                self.set_loading(false);
                Ok(())
            }
            Err(e) => {
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Warm the listing cache for a page in the background.
    ///
    /// Fire-and-forget: returns immediately, never touches the loading
    /// flag, and discards its own errors. Must be called from within a
    /// tokio runtime.
    pub fn prefetch_page(&self, page: u32) {
        let dex = self.clone();
        tokio::spawn(async move {
            if let Err(e) = dex.prefetch_inner(page).await {
                debug!(page, error = %e, "background prefetch failed");
            }
        });
    }

    async fn prefetch_inner(&self, page: u32) -> Result<()> {
        let total = self.total_count();
        if page < 1 || page > total.div_ceil(PAGE_SIZE) {
            return Ok(());
        }
        let (start, end) = page_bounds(page, total);
        if self.positions_cached(start, end) {
            return Ok(());
        }
        self.fill_positions(start, 1).await
    }

    /// Fetch the listing window starting at `start` and fan out to
    /// per-item detail requests, caching each result at its position
    /// as it arrives.
    async fn fill_positions(&self, start: u32, max_retries: u32) -> Result<()> {
        let retry = self.retry(max_retries);
        let listing = with_retry(&retry, "pokemon list", || {
            self.state.client.list(start - 1, PAGE_SIZE)
        })
        .await?;

        let targets: Vec<(u32, String)> = listing
            .results
            .iter()
            .enumerate()
            .map(|(i, entry)| (start + i as u32, entry.url.clone()))
            .collect();

        stream::iter(targets)
            .map(|(position, url)| {
                let client = self.state.client.clone();
                let retry = retry.clone();
                async move {
                    let raw = with_retry(&retry, "pokemon detail", || client.detail_url(&url))
                        .await?;
                    Ok::<_, DexError>((position, PokemonSummary::from_detail(&raw)))
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .try_for_each(|(position, summary)| {
                self.state.list_cache.lock().insert(position, summary);
                ready(Ok(()))
            })
            .await
    }

    /// Fetch a full detail record, serving from cache when possible.
    ///
    /// Rejects implausible ids before any network access. Fetch or
    /// decode failures propagate; nothing is cached on failure.
    pub async fn get_pokemon(&self, id: u32) -> Result<Pokemon> {
        if !is_valid_pokemon_id(i64::from(id)) {
            return Err(DexError::InvalidId(id));
        }

        if let Some(pokemon) = self.state.detail_cache.lock().get(&id).cloned() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => "detail").increment(1);
            return Ok(pokemon);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => "detail").increment(1);

        let retry = self.retry(2);
        let key = id.to_string();
        let raw = with_retry(&retry, "pokemon detail", || self.state.client.detail(&key)).await?;
        let pokemon = Pokemon::from_detail(raw);
        self.state
            .detail_cache
            .lock()
            .insert(id, pokemon.clone());
        Ok(pokemon)
    }

    /// Look up a single pokemon by name.
    ///
    /// The term is sanitized first; if nothing survives sanitization the
    /// lookup resolves to `None` without touching the network. Any fetch
    /// failure also resolves to `None` — "not found" and "request failed"
    /// are not distinguished here.
    pub async fn search_by_name(&self, name: &str) -> Option<Pokemon> {
        let sanitized = sanitize_search_input(name);
        if sanitized.is_empty() {
            return None;
        }
        match self.state.client.detail(&sanitized.to_lowercase()).await {
            Ok(raw) => Some(Pokemon::from_detail(raw)),
            Err(_) => None,
        }
    }

    /// Set the raw search term used by [`visible_pokemon`](Self::visible_pokemon).
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state.view.lock().search_term = term.into();
    }

    /// Enter or leave type-filtered mode.
    ///
    /// `None` leaves immediately with no network call and resets the
    /// filtered page counter. `Some(tag)` enters the mode and loads the
    /// tag's first page, reusing the member index when it is already
    /// known; if the membership fetch fails the mode is reverted, so
    /// filtered mode never remains active without backing data.
    pub async fn set_selected_type(&self, tag: Option<PokemonType>) -> Result<()> {
        let Some(tag) = tag else {
            let mut view = self.state.view.lock();
            view.type_filter_mode = false;
            view.selected_type = None;
            view.type_page = 1;
            view.type_total = 0;
            return Ok(());
        };

        self.state.view.lock().selected_type = Some(tag);
        self.load_type(tag).await
    }

    async fn load_type(&self, tag: PokemonType) -> Result<()> {
        self.set_loading(true);
        {
            let mut view = self.state.view.lock();
            view.type_filter_mode = true;
            view.type_page = 1;
        }

        let known = self.state.type_index.lock().get(&tag).map(|i| i.total);
        if let Some(total) = known {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => "type_index").increment(1);
            self.state.view.lock().type_total = total;
            return self.load_type_filter_page(1).await;
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => "type_index").increment(1);

        let retry = self.retry(2);
        match with_retry(&retry, "type listing", || self.state.client.type_listing(tag)).await {
            Ok(listing) => {
                let index = TypeIndex::from_listing(&listing);
                let total = index.total;
                self.state.type_index.lock().insert(tag, index);
                self.state.view.lock().type_total = total;
                self.load_type_filter_page(1).await
            }
            Err(e) => {
                self.set_loading(false);
                self.state.view.lock().type_filter_mode = false;
                Err(e)
            }
        }
    }

    /// Load a page within the selected type and advance to it.
    ///
    /// Same bounds, concurrency-cap and all-or-nothing semantics as
    /// [`load_page`](Self::load_page), but the range comes from the
    /// type's member id list and results are keyed by `(tag, id)`.
    pub async fn load_type_filter_page(&self, page: u32) -> Result<()> {
        let tag = {
            let view = self.state.view.lock();
            if !view.type_filter_mode {
                return Ok(());
            }
            match view.selected_type {
                Some(tag) => tag,
                None => return Ok(()),
            }
        };
        let index = match self.state.type_index.lock().get(&tag).cloned() {
            Some(index) => index,
            None => return Ok(()),
        };

        if page < 1 || page > index.total.div_ceil(PAGE_SIZE) {
            return Ok(());
        }
        let start = ((page - 1) * PAGE_SIZE) as usize;
        let end = (page * PAGE_SIZE).min(index.total) as usize;

        let missing: Vec<u32> = {
            let cache = self.state.type_item_cache.lock();
            index.ids[start..end]
                .iter()
                .copied()
                .filter(|id| !cache.contains_key(&(tag, *id)))
                .collect()
        };
        if missing.is_empty() {
            self.state.view.lock().type_page = page;
            self.set_loading(false);
            return Ok(());
        }

        self.set_loading(true);
        let retry = self.retry(2);
        let fetched: Result<Vec<(u32, PokemonSummary)>> = stream::iter(missing)
            .map(|id| {
                let client = self.state.client.clone();
                let retry = retry.clone();
                async move {
                    let key = id.to_string();
                    let raw = with_retry(&retry, "pokemon detail", || client.detail(&key)).await?;
                    Ok((id, PokemonSummary::from_detail(&raw)))
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .try_collect()
            .await;

        match fetched {
            Ok(items) => {
                {
                    let mut cache = self.state.type_item_cache.lock();
                    for (id, summary) in items {
                        cache.insert((tag, id), summary);
                    }
                }
                self.state.view.lock().type_page = page;
                self.set_loading(false);
                Ok(())
            }
            Err(e) => {
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Reset search and type filtering. Data caches are untouched.
    pub fn clear_filters(&self) {
        let mut view = self.state.view.lock();
        view.search_term.clear();
        view.selected_type = None;
        view.type_filter_mode = false;
        view.type_page = 1;
        view.type_total = 0;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Jump to a page in the active mode. Out-of-range pages are no-ops.
    pub async fn go_to_page(&self, page: u32) -> Result<()> {
        if self.type_filter_mode() {
            self.load_type_filter_page(page).await
        } else {
            self.load_page(page).await
        }
    }

    /// Advance one page in the active mode, saturating at the last page.
    pub async fn next_page(&self) -> Result<()> {
        let (filtered_mode, page) = {
            let view = self.state.view.lock();
            if view.type_filter_mode {
                (true, view.type_page)
            } else {
                (false, view.current_page)
            }
        };
        if page >= self.total_pages() {
            return Ok(());
        }
        if filtered_mode {
            self.load_type_filter_page(page + 1).await
        } else {
            self.load_page(page + 1).await
        }
    }

    /// Go back one page in the active mode, saturating at the first page.
    pub async fn previous_page(&self) -> Result<()> {
        let (filtered_mode, page) = {
            let view = self.state.view.lock();
            if view.type_filter_mode {
                (true, view.type_page)
            } else {
                (false, view.current_page)
            }
        };
        if page <= 1 {
            return Ok(());
        }
        if filtered_mode {
            self.load_type_filter_page(page - 1).await
        } else {
            self.load_page(page - 1).await
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Per-call-site retry config over the shared backoff delays.
    fn retry(&self, max_retries: u32) -> RetryConfig {
        self.state.retry_template.clone().max_retries(max_retries)
    }

    fn positions_cached(&self, start: u32, end: u32) -> bool {
        let cache = self.state.list_cache.lock();
        (start..=end).all(|position| cache.contains_key(&position))
    }

    fn set_loading(&self, value: bool) {
        self.state.loading.store(value, Ordering::SeqCst);
    }
}

impl Default for Pokedex {
    fn default() -> Self {
        Self::new()
    }
}

/// Position range for a page: `(page-1)*size + 1 ..= min(page*size, total)`.
///
/// With `total == 0` the range is empty.
fn page_bounds(page: u32, total: u32) -> (u32, u32) {
    let start = (page - 1) * PAGE_SIZE + 1;
    let end = (page * PAGE_SIZE).min(total);
    (start, end)
}
