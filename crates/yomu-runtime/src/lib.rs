//! Async driver for the catalog, detail and reader views.
//!
//! Views never perform I/O themselves. The runtime turns the fetches they
//! request into tasks on a [`JoinSet`], and feeds each completion back through
//! the owning view's `update`, where stale results are dropped. All view state
//! is mutated from the task that owns the `Runtime`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{self, JoinSet};

use yomu_api::mangadex::MangaDexClient;
use yomu_api::traits::CatalogService;
use yomu_core::config::AppConfig;
use yomu_core::filter::{CategoryFilter, StatusFilter};
use yomu_core::request::Ticket;
use yomu_core::view::catalog::{self, CatalogView};
use yomu_core::view::detail::{self, DetailFetch, DetailView};
use yomu_core::view::reader::{self, ReaderFetch, ReaderView};

/// Completion messages, routed to the view that issued the request.
#[derive(Debug, Clone)]
pub enum Message {
    Catalog(catalog::Message),
    Detail(detail::Message),
    Reader(reader::Message),
}

/// What a spawned task is fetching, so a task that dies without a result
/// can still be reported to its view as a failure.
#[derive(Debug)]
enum Pending {
    Catalog(Ticket<String>),
    Detail(Ticket<String>),
    Pages(Ticket<String>),
    Chapter(Ticket<String>),
}

impl Pending {
    fn failed(self, error: String) -> Message {
        match self {
            Self::Catalog(ticket) => Message::Catalog(catalog::Message::Loaded(ticket, Err(error))),
            Self::Detail(ticket) => Message::Detail(detail::Message::Loaded {
                ticket,
                entry: Err(error.clone()),
                feed: Err(error),
            }),
            Self::Pages(ticket) => Message::Reader(reader::Message::PagesLoaded(ticket, Err(error))),
            Self::Chapter(ticket) => {
                Message::Reader(reader::Message::ChapterLoaded(ticket, Err(error)))
            }
        }
    }
}

pub struct Runtime<S> {
    service: Arc<S>,
    catalog: CatalogView,
    detail: DetailView,
    reader: ReaderView,
    in_flight: JoinSet<Message>,
    pending: HashMap<task::Id, Pending>,
}

impl Runtime<MangaDexClient> {
    /// A runtime talking to the MangaDex API configured in `config`.
    pub fn mangadex(config: &AppConfig) -> Self {
        Self::new(MangaDexClient::with_base_url(&config.api.base_url), config)
    }
}

impl<S: CatalogService + 'static> Runtime<S> {
    pub fn new(service: S, config: &AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            catalog: CatalogView::new(config),
            detail: DetailView::new(config),
            reader: ReaderView::new(),
            in_flight: JoinSet::new(),
            pending: HashMap::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn reader(&self) -> &ReaderView {
        &self.reader
    }

    /// Number of requests still running (including ones that will be discarded).
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ── Navigation ────────────────────────────────────────────────

    /// Show the catalog for `term`, always fetching.
    pub fn open_catalog(&mut self, term: &str) {
        let action = self.catalog.open(term);
        self.perform_catalog(action);
    }

    /// Submit a search term; fetches only when the term changed.
    pub fn search(&mut self, term: &str) {
        self.dispatch(Message::Catalog(catalog::Message::TermSubmitted(
            term.to_string(),
        )));
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.dispatch(Message::Catalog(catalog::Message::CategoryFilterChanged(
            category,
        )));
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.dispatch(Message::Catalog(catalog::Message::StatusFilterChanged(
            status,
        )));
    }

    pub fn open_entry(&mut self, manga_id: &str) {
        let fetch = self.detail.open(manga_id);
        self.spawn_detail(fetch);
    }

    pub fn open_chapter(&mut self, chapter_id: &str) {
        let fetch = self.reader.open(chapter_id);
        self.spawn_reader(fetch);
    }

    // ── Message loop ──────────────────────────────────────────────

    /// Apply one message to its view, starting any fetch it asks for.
    pub fn dispatch(&mut self, msg: Message) {
        match msg {
            Message::Catalog(msg) => {
                let action = self.catalog.update(msg);
                self.perform_catalog(action);
            }
            Message::Detail(msg) => self.detail.update(msg),
            Message::Reader(msg) => self.reader.update(msg),
        }
    }

    /// Wait for the next request to finish and apply it.
    ///
    /// A task that panics is applied as a failed fetch, so its view leaves
    /// the loading state the same way it would on a network error.
    /// Returns `false` once nothing is in flight.
    pub async fn next(&mut self) -> bool {
        match self.in_flight.join_next_with_id().await {
            Some(Ok((id, msg))) => {
                self.pending.remove(&id);
                self.dispatch(msg);
                true
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "fetch task failed");
                if let Some(pending) = self.pending.remove(&e.id()) {
                    self.dispatch(pending.failed(e.to_string()));
                }
                true
            }
            None => false,
        }
    }

    /// Apply completions until every request has finished.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    // ── Fetches ───────────────────────────────────────────────────

    fn perform_catalog(&mut self, action: catalog::Action) {
        let catalog::Action::Fetch(fetch) = action else {
            return;
        };
        let service = Arc::clone(&self.service);
        let pending = Pending::Catalog(fetch.ticket.clone());
        let handle = self.in_flight.spawn(async move {
            let result = service
                .search_manga(&fetch.query)
                .await
                .map_err(|e| e.to_string());
            Message::Catalog(catalog::Message::Loaded(fetch.ticket, result))
        });
        self.pending.insert(handle.id(), pending);
    }

    fn spawn_detail(&mut self, fetch: DetailFetch) {
        let service = Arc::clone(&self.service);
        let pending = Pending::Detail(fetch.ticket.clone());
        let handle = self.in_flight.spawn(async move {
            let (entry, feed) = futures::future::join(
                service.get_manga(fetch.manga_id()),
                service.get_chapter_feed(fetch.manga_id(), &fetch.feed),
            )
            .await;
            Message::Detail(detail::Message::Loaded {
                entry: entry.map_err(|e| e.to_string()),
                feed: feed.map_err(|e| e.to_string()),
                ticket: fetch.ticket,
            })
        });
        self.pending.insert(handle.id(), pending);
    }

    fn spawn_reader(&mut self, fetch: ReaderFetch) {
        let service = Arc::clone(&self.service);
        let ticket = fetch.ticket.clone();
        let pending = Pending::Pages(fetch.ticket.clone());
        let handle = self.in_flight.spawn(async move {
            let result = service
                .get_page_server(fetch.chapter_id())
                .await
                .map_err(|e| e.to_string());
            Message::Reader(reader::Message::PagesLoaded(fetch.ticket, result))
        });
        self.pending.insert(handle.id(), pending);

        let service = Arc::clone(&self.service);
        let pending = Pending::Chapter(ticket.clone());
        let handle = self.in_flight.spawn(async move {
            let result = service
                .get_chapter(ticket.key())
                .await
                .map_err(|e| e.to_string());
            Message::Reader(reader::Message::ChapterLoaded(ticket, result))
        });
        self.pending.insert(handle.id(), pending);
    }
}
