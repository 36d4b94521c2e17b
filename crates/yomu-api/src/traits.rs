//! The catalog service interface and its query types.
//!
//! The view runtime is generic over [`CatalogService`], so tests can drive it
//! with an in-memory catalog while production uses the MangaDex client.

use std::future::Future;

use crate::models::{CatalogEntry, ChapterSummary, PageServerAssignment};

/// Fixed page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Maximum number of chapters fetched for a feed.
pub const DEFAULT_FEED_LIMIT: u32 = 100;

/// A read-only manga catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search or list catalog entries.
    fn search_manga(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<Vec<CatalogEntry>, Self::Error>> + Send;

    /// Look up one entry, including its cover-art relation.
    fn get_manga(
        &self,
        manga_id: &str,
    ) -> impl Future<Output = Result<CatalogEntry, Self::Error>> + Send;

    /// The chapter feed of an entry, filtered and ordered per `query`.
    fn get_chapter_feed(
        &self,
        manga_id: &str,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<Vec<ChapterSummary>, Self::Error>> + Send;

    /// Metadata for one chapter.
    fn get_chapter(
        &self,
        chapter_id: &str,
    ) -> impl Future<Output = Result<ChapterSummary, Self::Error>> + Send;

    /// The page-image server assigned to a chapter.
    fn get_page_server(
        &self,
        chapter_id: &str,
    ) -> impl Future<Output = Result<PageServerAssignment, Self::Error>> + Send;
}

/// Ordering of a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrder {
    /// Best title match first; used for searches.
    Relevance,
    /// Most followed first; used for the default listing.
    Popularity,
}

impl CatalogOrder {
    fn as_param(self) -> (&'static str, &'static str) {
        match self {
            Self::Relevance => ("order[relevance]", "desc"),
            Self::Popularity => ("order[followedCount]", "desc"),
        }
    }
}

/// The one parameter set used for catalog search/listing, by both the
/// in-process client and the HTTP proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Title search; `None` lists by popularity.
    pub title: Option<String>,
    pub limit: u32,
    pub translated_language: String,
    pub content_ratings: Vec<String>,
}

impl CatalogQuery {
    /// Build the query for a user-entered term. Whitespace-only terms list.
    pub fn for_term(term: &str) -> Self {
        let term = term.trim();
        Self {
            title: (!term.is_empty()).then(|| term.to_string()),
            ..Self::default()
        }
    }

    pub fn order(&self) -> CatalogOrder {
        if self.title.is_some() {
            CatalogOrder::Relevance
        } else {
            CatalogOrder::Popularity
        }
    }

    /// Query-string pairs, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(6 + self.content_ratings.len());
        if let Some(title) = &self.title {
            params.push(("title".to_string(), title.clone()));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("includes[]".to_string(), "cover_art".to_string()));
        params.push((
            "availableTranslatedLanguage[]".to_string(),
            self.translated_language.clone(),
        ));
        for rating in &self.content_ratings {
            params.push(("contentRating[]".to_string(), rating.clone()));
        }
        let (key, value) = self.order().as_param();
        params.push((key.to_string(), value.to_string()));
        params
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            title: None,
            limit: DEFAULT_PAGE_SIZE,
            translated_language: "en".to_string(),
            content_ratings: vec!["safe".to_string(), "suggestive".to_string()],
        }
    }
}

/// Parameters of a chapter feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub translated_language: String,
    pub limit: u32,
}

impl FeedQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            (
                "translatedLanguage[]".to_string(),
                self.translated_language.clone(),
            ),
            ("order[chapter]".to_string(), "asc".to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            translated_language: "en".to_string(),
            limit: DEFAULT_FEED_LIMIT,
        }
    }
}
