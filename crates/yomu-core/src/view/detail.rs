use yomu_api::models::{CatalogEntry, ChapterSummary};
use yomu_api::traits::FeedQuery;

use crate::config::AppConfig;
use crate::normalize::{EntryDetail, Normalizer};
use crate::request::{RequestTracker, Ticket};

pub const NO_CHAPTERS: &str = "No English chapters found.";
pub const NOT_FOUND: &str = "Not found.";

/// Shown in place of a missing chapter number.
const MISSING_CHAPTER: &str = "—";

// ── View model ────────────────────────────────────────────────────

/// One row of the chapter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    pub id: String,
    pub chapter: Option<String>,
    pub title: Option<String>,
}

impl ChapterRow {
    pub fn from_summary(summary: ChapterSummary) -> Self {
        Self {
            id: summary.id,
            chapter: summary.chapter,
            title: summary.title,
        }
    }

    /// `Ch. 12 — Title`, `Ch. 12`, or `Ch. —` for unnumbered chapters.
    pub fn label(&self) -> String {
        let number = self.chapter.as_deref().unwrap_or(MISSING_CHAPTER);
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("Ch. {number} — {title}"),
            None => format!("Ch. {number}"),
        }
    }
}

/// The chapter list; an empty feed is a normal, displayable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chapters {
    Empty,
    Listed(Vec<ChapterRow>),
}

impl Chapters {
    pub fn from_feed(feed: Vec<ChapterSummary>) -> Self {
        if feed.is_empty() {
            Self::Empty
        } else {
            Self::Listed(feed.into_iter().map(ChapterRow::from_summary).collect())
        }
    }

    pub fn rows(&self) -> &[ChapterRow] {
        match self {
            Self::Empty => &[],
            Self::Listed(rows) => rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailModel {
    pub entry: EntryDetail,
    pub chapters: Chapters,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    NotFound,
    Loaded(DetailModel),
}

/// Merge an entry lookup and its chapter feed into one view state.
///
/// The entry decides the outcome: without it the page is not found. A failed
/// feed next to a good entry degrades to an empty chapter list.
pub fn aggregate(
    normalizer: &Normalizer,
    manga_id: &str,
    entry: Result<CatalogEntry, String>,
    feed: Result<Vec<ChapterSummary>, String>,
) -> DetailState {
    let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(manga_id, error = %e, "entry lookup failed");
            return DetailState::NotFound;
        }
    };

    let chapters = match feed {
        Ok(feed) => Chapters::from_feed(feed),
        Err(e) => {
            tracing::warn!(manga_id, error = %e, "chapter feed failed");
            Chapters::Empty
        }
    };

    DetailState::Loaded(DetailModel {
        entry: normalizer.detail(&entry),
        chapters,
    })
}

// ── Messages & actions ────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    Loaded {
        ticket: Ticket<String>,
        entry: Result<CatalogEntry, String>,
        feed: Result<Vec<ChapterSummary>, String>,
    },
}

/// Entry lookup plus feed, to be fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFetch {
    pub ticket: Ticket<String>,
    pub feed: FeedQuery,
}

impl DetailFetch {
    pub fn manga_id(&self) -> &str {
        self.ticket.key()
    }
}

// ── State ─────────────────────────────────────────────────────────

/// Detail page for one catalog entry.
#[derive(Debug)]
pub struct DetailView {
    requests: RequestTracker<String>,
    state: DetailState,
    normalizer: Normalizer,
    feed_query: FeedQuery,
}

impl DetailView {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            requests: RequestTracker::new(),
            state: DetailState::Idle,
            normalizer: config.normalizer(),
            feed_query: config.feed_query(),
        }
    }

    /// Navigate to an entry, superseding any earlier navigation.
    pub fn open(&mut self, manga_id: &str) -> DetailFetch {
        self.state = DetailState::Loading;
        DetailFetch {
            ticket: self.requests.issue(manga_id.to_string()),
            feed: self.feed_query.clone(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// ID of the entry currently displayed or loading.
    pub fn manga_id(&self) -> Option<&str> {
        self.requests.current_key().map(String::as_str)
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::Loaded {
                ticket,
                entry,
                feed,
            } => {
                if !self.requests.is_current(&ticket) {
                    tracing::debug!(manga_id = %ticket.key(), "discarding stale detail result");
                    return;
                }
                self.state = aggregate(&self.normalizer, ticket.key(), entry, feed);
            }
        }
    }
}
