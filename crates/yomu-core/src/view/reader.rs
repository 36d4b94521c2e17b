use yomu_api::models::{ChapterSummary, PageServerAssignment};

use crate::request::{RequestTracker, Ticket};

pub const NO_PAGES: &str = "No pages available.";

// ── Page URLs ─────────────────────────────────────────────────────

/// Which file list of a page-server assignment a session reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    DataSaver,
    Full,
}

impl PageVariant {
    /// Path segment the page server expects for this variant.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::DataSaver => "data-saver",
            Self::Full => "data",
        }
    }
}

/// Prefer data-saver files whenever any exist.
pub fn select_variant(assignment: &PageServerAssignment) -> (PageVariant, &[String]) {
    if assignment.data_saver.is_empty() {
        (PageVariant::Full, assignment.data.as_slice())
    } else {
        (PageVariant::DataSaver, assignment.data_saver.as_slice())
    }
}

/// Page image URLs in file-list order, all from one variant.
pub fn page_urls(assignment: &PageServerAssignment) -> (PageVariant, Vec<String>) {
    let (variant, files) = select_variant(assignment);
    let base = assignment.base_url.trim_end_matches('/');
    let urls = files
        .iter()
        .map(|file| {
            format!(
                "{base}/{}/{}/{file}",
                variant.path_segment(),
                assignment.hash
            )
        })
        .collect();
    (variant, urls)
}

// ── Messages & actions ────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    PagesLoaded(Ticket<String>, Result<PageServerAssignment, String>),
    ChapterLoaded(Ticket<String>, Result<ChapterSummary, String>),
}

/// Page-server lookup and chapter metadata; independent of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderFetch {
    pub ticket: Ticket<String>,
}

impl ReaderFetch {
    pub fn chapter_id(&self) -> &str {
        self.ticket.key()
    }
}

// ── State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pages {
    #[default]
    Loading,
    Unavailable,
    Ready {
        variant: PageVariant,
        urls: Vec<String>,
    },
}

/// A reading session for one chapter.
#[derive(Debug, Default)]
pub struct ReaderView {
    requests: RequestTracker<String>,
    chapter_label: String,
    pages: Pages,
}

impl ReaderView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `chapter_id`, superseding any earlier one.
    pub fn open(&mut self, chapter_id: &str) -> ReaderFetch {
        self.pages = Pages::Loading;
        self.chapter_label.clear();
        ReaderFetch {
            ticket: self.requests.issue(chapter_id.to_string()),
        }
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn page_urls(&self) -> &[String] {
        match &self.pages {
            Pages::Ready { urls, .. } => urls,
            Pages::Loading | Pages::Unavailable => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pages == Pages::Loading
    }

    /// Chapter number for the header; blank until known or if lookup failed.
    pub fn chapter_label(&self) -> &str {
        &self.chapter_label
    }

    pub fn chapter_id(&self) -> Option<&str> {
        self.requests.current_key().map(String::as_str)
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::PagesLoaded(ticket, result) => {
                if !self.requests.is_current(&ticket) {
                    tracing::debug!(chapter_id = %ticket.key(), "discarding stale page list");
                    return;
                }
                self.pages = match result {
                    Ok(assignment) => {
                        let (variant, urls) = page_urls(&assignment);
                        if urls.is_empty() {
                            tracing::warn!(chapter_id = %ticket.key(), "page server returned no files");
                            Pages::Unavailable
                        } else {
                            Pages::Ready { variant, urls }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(chapter_id = %ticket.key(), error = %e, "page server lookup failed");
                        Pages::Unavailable
                    }
                };
            }
            Message::ChapterLoaded(ticket, result) => {
                if !self.requests.is_current(&ticket) {
                    return;
                }
                match result {
                    Ok(chapter) => self.chapter_label = chapter.chapter.unwrap_or_default(),
                    Err(e) => {
                        tracing::warn!(chapter_id = %ticket.key(), error = %e, "chapter lookup failed");
                        self.chapter_label.clear();
                    }
                }
            }
        }
    }
}
