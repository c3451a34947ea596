//! Catalog pagination for infinite scroll.
//!
//! [`CatalogPage`] holds the loaded prefix of the catalog and changes only
//! through its transition methods. [`CatalogLoader`] drives it: each load
//! asks the remote API first and falls back to slicing the static
//! [`Catalog`] when the call fails or returns nothing.
//!
//! # States
//!
//! - idle with `has_more` - a load-more may start
//! - loading - further load-more requests are ignored until it finishes
//! - exhausted (`has_more == false`) - terminal until the next reset

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use yammi_core::{Product, ProductId};

use crate::api::{ApiError, StorefrontApi};
use crate::catalog::Catalog;

/// Loaded catalog prefix plus pagination cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    items: Vec<Product>,
    cursor: usize,
    has_more: bool,
    loading: bool,
    generation: u64,
}

/// Ticket handed out when a load-more starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    /// Page index to fetch.
    pub page: usize,
    generation: u64,
}

/// Result of fetching one more page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items to append and whether more remain after them.
    Appended { items: Vec<Product>, has_more: bool },
    /// Nothing left to load.
    Exhausted,
}

impl CatalogPage {
    /// Loaded products in order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Index of the next page to fetch.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a load-more could return anything.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a load-more is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace everything with a freshly loaded first page.
    ///
    /// A load-more still in flight is orphaned; its result is discarded.
    pub fn reset(&mut self, first_page: Vec<Product>, has_more: bool) {
        self.items.clear();
        append_unique(&mut self.items, first_page);
        self.cursor = 1;
        self.has_more = has_more;
        self.loading = false;
        self.generation += 1;
    }

    /// Start a load-more, unless one is running or nothing is left.
    pub const fn begin_load_more(&mut self) -> Option<LoadTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(LoadTicket {
            page: self.cursor,
            generation: self.generation,
        })
    }

    /// Finish the load-more started with `ticket`.
    ///
    /// Returns `false` if the page was reset in the meantime and the
    /// outcome was dropped.
    pub fn finish_load_more(&mut self, ticket: LoadTicket, outcome: PageOutcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.loading = false;
        match outcome {
            PageOutcome::Appended { items, has_more } => {
                append_unique(&mut self.items, items);
                self.cursor += 1;
                self.has_more = has_more;
            }
            PageOutcome::Exhausted => {
                self.has_more = false;
            }
        }
        true
    }
}

/// Append `incoming`, skipping ids that are already loaded.
fn append_unique(items: &mut Vec<Product>, incoming: Vec<Product>) {
    let mut seen: HashSet<ProductId> = items.iter().map(|p| p.id).collect();
    items.extend(incoming.into_iter().filter(|p| seen.insert(p.id)));
}

/// Remote-first, static-fallback pager over the product catalog.
#[derive(Debug)]
pub struct CatalogLoader<A> {
    catalog: Arc<Catalog>,
    api: A,
    page_size: usize,
    page: Mutex<CatalogPage>,
}

impl<A: StorefrontApi> CatalogLoader<A> {
    /// Create a loader with nothing loaded yet.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(catalog: Arc<Catalog>, api: A, page_size: usize) -> Self {
        Self {
            catalog,
            api,
            page_size: page_size.max(1),
            page: Mutex::new(CatalogPage::default()),
        }
    }

    fn page(&self) -> MutexGuard<'_, CatalogPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current pagination state.
    pub fn snapshot(&self) -> CatalogPage {
        self.page().clone()
    }

    /// Products per page.
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// The static catalog backing this loader.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load the first page, replacing whatever was loaded.
    pub async fn initial_load(&self) -> CatalogPage {
        let (first_page, has_more) = match self.fetch_remote(0).await {
            Some(mut remote) => {
                let has_more = remote.len() > self.page_size;
                remote.truncate(self.page_size);
                info!(count = remote.len(), "Loaded first page from remote API");
                (remote, has_more)
            }
            None => {
                let local = self.catalog.slice(0, self.page_size).to_vec();
                if local.is_empty() {
                    warn!("Catalog is empty");
                }
                info!(count = local.len(), "Loaded first page from static catalog");
                (local, self.catalog.len() > self.page_size)
            }
        };

        let mut page = self.page();
        page.reset(first_page, has_more);
        page.clone()
    }

    /// Append the next page if more data is available and no load is running.
    ///
    /// Returns `true` if the state changed.
    pub async fn load_more(&self) -> bool {
        let Some(ticket) = self.page().begin_load_more() else {
            debug!("Load more skipped");
            return false;
        };

        let outcome = match self.remote_page(ticket.page).await {
            Some(outcome) => outcome,
            None => self.local_page(ticket.page),
        };

        self.page().finish_load_more(ticket, outcome)
    }

    /// Best-effort remote refresh, then reload the first page.
    pub async fn refresh(&self) -> CatalogPage {
        if let Err(e) = self.api.refresh_products().await {
            log_remote_failure("refresh_products", &e);
        }
        self.initial_load().await
    }

    /// Non-empty remote page, or `None` on failure or an empty response.
    async fn fetch_remote(&self, page: usize) -> Option<Vec<Product>> {
        match self.api.fetch_products(page, self.page_size).await {
            Ok(products) if !products.is_empty() => Some(products),
            Ok(_) => {
                debug!(page, "Remote API returned no products, using static catalog");
                None
            }
            Err(e) => {
                log_remote_failure("fetch_products", &e);
                None
            }
        }
    }

    /// Page `page` cut out of the remote product list.
    ///
    /// The remote response is the whole list; `page` selects
    /// `[page * page_size, (page + 1) * page_size)` from it. `None` when the
    /// call fails or the slice would add nothing new.
    async fn remote_page(&self, page: usize) -> Option<PageOutcome> {
        let remote = self.fetch_remote(page).await?;
        let start = page.saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size);
        let has_more = remote.len() > end;
        let items: Vec<Product> = remote
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        let loaded = self.page();
        let adds_new = items
            .iter()
            .any(|p| !loaded.items().iter().any(|l| l.id == p.id));
        drop(loaded);

        if adds_new {
            debug!(page, count = items.len(), "Loaded page from remote API");
            Some(PageOutcome::Appended { items, has_more })
        } else {
            debug!(page, "Remote list has nothing new for this page, using static catalog");
            None
        }
    }

    fn local_page(&self, page: usize) -> PageOutcome {
        let start = page * self.page_size;
        let end = start + self.page_size;
        let items = self.catalog.slice(start, end);

        if items.is_empty() {
            debug!(page, "Static catalog exhausted");
            PageOutcome::Exhausted
        } else {
            debug!(page, count = items.len(), "Loaded page from static catalog");
            PageOutcome::Appended {
                items: items.to_vec(),
                has_more: end < self.catalog.len(),
            }
        }
    }
}

fn log_remote_failure(call: &str, err: &ApiError) {
    if matches!(err, ApiError::Disabled) {
        debug!(call, "Remote API disabled, using static catalog");
    } else {
        warn!(call, error = %err, "Remote call failed, using static catalog");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, product, products};

    fn catalog(count: i32) -> Arc<Catalog> {
        Arc::new(Catalog::new(products(1, count)).unwrap())
    }

    fn ids(page: &CatalogPage) -> Vec<i32> {
        page.items().iter().map(|p| p.id.as_i32()).collect()
    }

    #[tokio::test]
    async fn test_offline_pagination_over_25_items() {
        let loader = CatalogLoader::new(catalog(25), FakeApi::failing(), 10);

        let page = loader.initial_load().await;
        assert_eq!(page.items().len(), 10);
        assert!(page.has_more());
        assert_eq!(page.cursor(), 1);

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(page.items().len(), 20);
        assert!(page.has_more());

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(page.items().len(), 25);
        assert!(!page.has_more());
        assert_eq!(ids(&page), (1..=25).collect::<Vec<_>>());

        assert!(!loader.load_more().await);
        assert_eq!(loader.snapshot(), page);
    }

    #[tokio::test]
    async fn test_exact_multiple_reaches_terminal_state() {
        let loader = CatalogLoader::new(catalog(20), FakeApi::failing(), 10);
        loader.initial_load().await;
        assert!(loader.load_more().await);

        let page = loader.snapshot();
        assert_eq!(page.items().len(), 20);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_small_catalog_has_no_more() {
        let loader = CatalogLoader::new(catalog(4), FakeApi::failing(), 10);
        let page = loader.initial_load().await;
        assert_eq!(page.items().len(), 4);
        assert!(!page.has_more());
        assert!(!loader.load_more().await);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let loader = CatalogLoader::new(Arc::new(Catalog::default()), FakeApi::failing(), 10);
        let page = loader.initial_load().await;
        assert!(page.items().is_empty());
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_remote_first_page_is_preferred() {
        let remote = products(100, 12);
        let loader = CatalogLoader::new(catalog(25), FakeApi::serving(remote), 10);

        let page = loader.initial_load().await;
        assert_eq!(page.items().len(), 10);
        assert_eq!(page.items()[0].id, ProductId::new(100));
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_remote_short_page_means_no_more() {
        let loader = CatalogLoader::new(catalog(25), FakeApi::serving(products(100, 3)), 10);
        let page = loader.initial_load().await;
        assert_eq!(page.items().len(), 3);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_empty_remote_page_falls_back_to_static() {
        let loader = CatalogLoader::new(catalog(25), FakeApi::succeeding(), 10);
        let page = loader.initial_load().await;
        assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_remote_full_list_pages_through() {
        let loader = CatalogLoader::new(catalog(25), FakeApi::serving(products(1, 25)), 10);

        let page = loader.initial_load().await;
        assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());
        assert!(page.has_more());

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(ids(&page), (1..=20).collect::<Vec<_>>());
        assert!(page.has_more());

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(ids(&page), (1..=25).collect::<Vec<_>>());
        assert!(!page.has_more());

        assert!(!loader.load_more().await);
        assert_eq!(loader.snapshot(), page);
    }

    #[tokio::test]
    async fn test_remote_tail_of_short_list() {
        let loader = CatalogLoader::new(catalog(25), FakeApi::serving(products(100, 12)), 10);
        loader.initial_load().await;

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(page.items().len(), 12);
        assert_eq!(page.items()[11].id, ProductId::new(111));
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_remote_page_without_new_items_falls_back_to_static() {
        let mut remote = products(1, 10);
        remote.extend(products(1, 5));
        let loader = CatalogLoader::new(catalog(25), FakeApi::serving(remote), 10);
        loader.initial_load().await;

        assert!(loader.load_more().await);
        let page = loader.snapshot();
        assert_eq!(ids(&page), (1..=20).collect::<Vec<_>>());
        assert_eq!(page.cursor(), 2);
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_load_more_requests_cursor_page() {
        let api = Arc::new(FakeApi::failing());
        let loader = CatalogLoader::new(catalog(25), Arc::clone(&api), 10);
        loader.initial_load().await;
        loader.load_more().await;
        loader.load_more().await;
        loader.load_more().await;

        assert_eq!(api.page_requests(), vec![(0, 10), (1, 10), (2, 10)]);
    }

    #[tokio::test]
    async fn test_refresh_pings_and_resets() {
        let api = Arc::new(FakeApi::failing());
        let loader = CatalogLoader::new(catalog(25), Arc::clone(&api), 10);
        loader.initial_load().await;
        loader.load_more().await;
        assert_eq!(loader.snapshot().items().len(), 20);

        let page = loader.refresh().await;
        assert_eq!(api.refreshes(), 1);
        assert_eq!(page.items().len(), 10);
        assert_eq!(page.cursor(), 1);
        assert!(page.has_more());
    }

    #[test]
    fn test_begin_load_more_guards_in_flight_request() {
        let mut page = CatalogPage::default();
        page.reset(vec![product(1, 1)], true);

        let ticket = page.begin_load_more().unwrap();
        assert_eq!(ticket.page, 1);
        assert!(page.is_loading());
        assert!(page.begin_load_more().is_none());

        assert!(page.finish_load_more(
            ticket,
            PageOutcome::Appended {
                items: vec![product(2, 1)],
                has_more: true
            }
        ));
        assert!(!page.is_loading());
        assert!(page.begin_load_more().is_some());
    }

    #[test]
    fn test_exhausted_is_terminal() {
        let mut page = CatalogPage::default();
        page.reset(vec![product(1, 1)], true);

        let ticket = page.begin_load_more().unwrap();
        page.finish_load_more(ticket, PageOutcome::Exhausted);

        assert!(!page.has_more());
        assert_eq!(page.cursor(), 1);
        assert!(page.begin_load_more().is_none());
    }

    #[test]
    fn test_stale_load_more_is_dropped_after_reset() {
        let mut page = CatalogPage::default();
        page.reset(vec![product(1, 1)], true);
        let stale = page.begin_load_more().unwrap();

        page.reset(vec![product(5, 1)], true);
        let applied = page.finish_load_more(
            stale,
            PageOutcome::Appended {
                items: vec![product(2, 1)],
                has_more: false,
            },
        );

        assert!(!applied);
        assert_eq!(page.items().len(), 1);
        assert!(page.has_more());
    }

    #[test]
    fn test_duplicates_are_not_appended() {
        let mut page = CatalogPage::default();
        page.reset(vec![product(1, 1), product(2, 1)], true);
        let ticket = page.begin_load_more().unwrap();
        page.finish_load_more(
            ticket,
            PageOutcome::Appended {
                items: vec![product(2, 1), product(3, 1)],
                has_more: false,
            },
        );
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }
}
