use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::MangaDexError;
use super::types::{MdAtHomeResponse, MdChapter, MdCollection, MdEntity, MdErrorResponse, MdManga};
use crate::models::{CatalogEntry, ChapterSummary, PageServerAssignment};
use crate::traits::{CatalogQuery, CatalogService, FeedQuery};

pub const BASE_URL: &str = "https://api.mangadex.org";

/// MangaDex rejects requests without an identifying user agent.
const USER_AGENT: &str = concat!("yomu/", env!("CARGO_PKG_VERSION"));

/// MangaDex REST API client.
#[derive(Debug, Clone)]
pub struct MangaDexClient {
    base_url: String,
    http: Client,
}

impl MangaDexClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at another API root (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });
        Self::with_http(http, base_url)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the HTTP response for errors and surface the API's message on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, MangaDexError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MdErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message())
                .unwrap_or(body);
            tracing::warn!(status, %message, "MangaDex API error");
            Err(MangaDexError::Api { status, message })
        }
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Each segment is percent-encoded as a single path segment, so an ID
    /// containing `/`, `?` or `#` cannot reach another resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MangaDexError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(MangaDexError::InvalidUrl(format!("bad path segment {bad:?}")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MangaDexError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| MangaDexError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(String, String)],
    ) -> Result<T, MangaDexError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "MangaDex request");

        let resp = self.http.get(url).query(params).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| MangaDexError::Parse(e.to_string()))
    }

    /// Run a catalog query and return the upstream body untouched.
    ///
    /// Used by the proxy, which relays the body verbatim. The body is still
    /// checked to be JSON so a broken upstream never leaks through.
    pub async fn search_raw(&self, query: &CatalogQuery) -> Result<String, MangaDexError> {
        let url = self.endpoint(&["manga"])?;
        let resp = self.http.get(url).query(&query.to_params()).send().await?;
        let resp = Self::check_response(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str::<serde::de::IgnoredAny>(&body)
            .map_err(|e| MangaDexError::Parse(e.to_string()))?;
        Ok(body)
    }
}

impl Default for MangaDexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogService for MangaDexClient {
    type Error = MangaDexError;

    async fn search_manga(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, MangaDexError> {
        let page: MdCollection<MdManga> = self.get_json(&["manga"], &query.to_params()).await?;
        Ok(page
            .data
            .into_iter()
            .map(MdManga::into_catalog_entry)
            .collect())
    }

    async fn get_manga(&self, manga_id: &str) -> Result<CatalogEntry, MangaDexError> {
        let params = [("includes[]".to_string(), "cover_art".to_string())];
        let entity: MdEntity<MdManga> = self
            .get_json(&["manga", manga_id], &params)
            .await?;
        Ok(entity.data.into_catalog_entry())
    }

    async fn get_chapter_feed(
        &self,
        manga_id: &str,
        query: &FeedQuery,
    ) -> Result<Vec<ChapterSummary>, MangaDexError> {
        let page: MdCollection<MdChapter> = self
            .get_json(&["manga", manga_id, "feed"], &query.to_params())
            .await?;
        Ok(page
            .data
            .into_iter()
            .map(MdChapter::into_chapter_summary)
            .collect())
    }

    async fn get_chapter(&self, chapter_id: &str) -> Result<ChapterSummary, MangaDexError> {
        let entity: MdEntity<MdChapter> = self
            .get_json(&["chapter", chapter_id], &[])
            .await?;
        Ok(entity.data.into_chapter_summary())
    }

    async fn get_page_server(
        &self,
        chapter_id: &str,
    ) -> Result<PageServerAssignment, MangaDexError> {
        let resp: MdAtHomeResponse = self
            .get_json(&["at-home", "server", chapter_id], &[])
            .await?;
        Ok(resp.into_assignment())
    }
}
