use yomu_api::models::CatalogEntry;
use yomu_api::traits::CatalogQuery;

use crate::config::AppConfig;
use crate::filter::{CategoryFilter, FilterState, StatusFilter};
use crate::normalize::{EntryCard, Normalizer};
use crate::request::{RequestTracker, Ticket};

// ── Messages & actions ────────────────────────────────────────────

/// Messages handled by the catalog view.
#[derive(Debug, Clone)]
pub enum Message {
    /// A search term was submitted; empty means the popular listing.
    TermSubmitted(String),
    CategoryFilterChanged(CategoryFilter),
    StatusFilterChanged(StatusFilter),
    Loaded(Ticket<String>, Result<Vec<CatalogEntry>, String>),
}

/// A catalog fetch the runtime must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFetch {
    pub ticket: Ticket<String>,
    pub query: CatalogQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Fetch(CatalogFetch),
}

// ── State ─────────────────────────────────────────────────────────

/// Catalog grid state: one fetched result set plus in-memory filters.
#[derive(Debug)]
pub struct CatalogView {
    term: String,
    requests: RequestTracker<String>,
    entries: Vec<CatalogEntry>,
    loading: bool,
    filter: FilterState,
    normalizer: Normalizer,
    config: AppConfig,
}

impl CatalogView {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            term: String::new(),
            requests: RequestTracker::new(),
            entries: Vec::new(),
            loading: false,
            filter: FilterState::default(),
            normalizer: config.normalizer(),
            config: config.clone(),
        }
    }

    /// Navigate to the catalog with `term`. Always fetches.
    pub fn open(&mut self, term: &str) -> Action {
        self.term = term.trim().to_string();
        self.fetch()
    }

    /// Current (trimmed) search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    /// The unfiltered result set of the latest completed fetch.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Filtered, display-ready cards in fetch order.
    pub fn visible(&self) -> Vec<EntryCard> {
        self.filter
            .apply(&self.entries)
            .into_iter()
            .map(|e| self.normalizer.card(e))
            .collect()
    }

    fn fetch(&mut self) -> Action {
        self.loading = true;
        let ticket = self.requests.issue(self.term.clone());
        tracing::debug!(term = %self.term, generation = ticket.generation(), "catalog fetch");
        Action::Fetch(CatalogFetch {
            query: self.config.catalog_query(&self.term),
            ticket,
        })
    }

    /// Handle a catalog message, returning the fetch to perform (if any).
    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::TermSubmitted(term) => {
                let term = term.trim();
                if term == self.term && self.requests.current_key().is_some() {
                    return Action::None;
                }
                self.term = term.to_string();
                self.fetch()
            }
            Message::CategoryFilterChanged(category) => {
                self.filter.category = category;
                Action::None
            }
            Message::StatusFilterChanged(status) => {
                self.filter.status = status;
                Action::None
            }
            Message::Loaded(ticket, result) => {
                if !self.requests.is_current(&ticket) {
                    tracing::debug!(
                        term = %ticket.key(),
                        generation = ticket.generation(),
                        "discarding stale catalog result"
                    );
                    return Action::None;
                }
                self.loading = false;
                match result {
                    Ok(entries) => self.entries = entries,
                    Err(e) => {
                        tracing::warn!(term = %ticket.key(), error = %e, "catalog fetch failed");
                        self.entries.clear();
                    }
                }
                Action::None
            }
        }
    }
}
