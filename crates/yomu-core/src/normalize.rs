//! Display models for catalog entries.
//!
//! Turns a [`CatalogEntry`] into the strings a front end renders: a resolved
//! title, a cover URL that is never broken, a category label derived from the
//! original language, and the leading tag names.

use std::fmt;

use serde::{Deserialize, Serialize};
use yomu_api::models::{CatalogEntry, CoverRelation, LocalizedText, PublicationStatus, Tag};

/// Locales tried, in order, before falling back to the first stored title.
const TITLE_LOCALES: &[&str] = &["en", "ja-ro", "ja"];

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description.";
pub const MISSING_YEAR: &str = "—";

/// Tags shown on a grid card.
pub const CARD_TAG_LIMIT: usize = 3;
/// Tags shown on the detail page.
pub const DETAIL_TAG_LIMIT: usize = 10;

const DEFAULT_COVER_BASE: &str = "https://uploads.mangadex.org/covers";
const DEFAULT_PLACEHOLDER: &str = "https://via.placeholder.com/240x340?text=No+Cover";

// ── Category ──────────────────────────────────────────────────────────

/// Comic category, derived from the original language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Manga,
    Manhwa,
    Manhua,
}

impl Category {
    /// Case-insensitive parse of a category label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manga" => Some(Self::Manga),
            "manhwa" => Some(Self::Manhwa),
            "manhua" => Some(Self::Manhua),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manga => write!(f, "Manga"),
            Self::Manhwa => write!(f, "Manhwa"),
            Self::Manhua => write!(f, "Manhua"),
        }
    }
}

/// Map an original-language code to a category. Unknown or missing codes are Manga.
pub fn category_for_language(lang: Option<&str>) -> Category {
    match lang {
        Some("ko") => Category::Manhwa,
        Some("zh" | "zh-hk" | "zh-ro") => Category::Manhua,
        _ => Category::Manga,
    }
}

// ── Field resolution ──────────────────────────────────────────────────

/// Best display title; never empty.
pub fn resolve_title(title: &LocalizedText) -> &str {
    TITLE_LOCALES
        .iter()
        .find_map(|locale| title.get(locale).filter(|t| !t.is_empty()))
        .or_else(|| title.first().filter(|t| !t.is_empty()))
        .unwrap_or(UNTITLED)
}

/// English description, then Japanese, then a fixed fallback.
pub fn resolve_description(description: &LocalizedText) -> &str {
    ["en", "ja"]
        .iter()
        .find_map(|locale| description.get(locale).filter(|d| !d.is_empty()))
        .unwrap_or(NO_DESCRIPTION)
}

/// English names of the first `limit` tags. A tag with no English name
/// yields an empty string so positions stay stable.
pub fn tag_names(tags: &[Tag], limit: usize) -> Vec<String> {
    tags.iter()
        .take(limit)
        .map(|t| t.name.get("en").unwrap_or_default().to_string())
        .collect()
}

// ── Display models ────────────────────────────────────────────────────

/// One tile of the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCard {
    pub id: String,
    pub title: String,
    pub cover_url: String,
    pub category: Category,
    pub year: Option<u32>,
    pub status: PublicationStatus,
    pub tag_names: Vec<String>,
}

impl EntryCard {
    pub fn year_label(&self) -> String {
        year_label(self.year)
    }
}

/// Header block of the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub id: String,
    pub title: String,
    pub cover_url: String,
    pub category: Category,
    pub year: Option<u32>,
    pub status: PublicationStatus,
    pub description: String,
    pub tag_names: Vec<String>,
}

impl EntryDetail {
    pub fn year_label(&self) -> String {
        year_label(self.year)
    }
}

fn year_label(year: Option<u32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| MISSING_YEAR.to_string())
}

/// Builds display models; holds the cover CDN settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    cover_base_url: String,
    placeholder_cover_url: String,
}

impl Normalizer {
    pub fn new(cover_base_url: &str, placeholder_cover_url: &str) -> Self {
        Self {
            cover_base_url: cover_base_url.trim_end_matches('/').to_string(),
            placeholder_cover_url: placeholder_cover_url.to_string(),
        }
    }

    /// `<cdn>/<entryId>/<fileName>.256.jpg`, or the placeholder.
    pub fn cover_url(&self, cover: &CoverRelation) -> String {
        match cover {
            CoverRelation::Found {
                entry_id,
                file_name,
            } => format!("{}/{entry_id}/{file_name}.256.jpg", self.cover_base_url),
            CoverRelation::NotFound => self.placeholder_cover_url.clone(),
        }
    }

    pub fn card(&self, entry: &CatalogEntry) -> EntryCard {
        EntryCard {
            id: entry.id.clone(),
            title: resolve_title(&entry.title).to_string(),
            cover_url: self.cover_url(&entry.cover),
            category: category_for_language(entry.original_language.as_deref()),
            year: entry.year,
            status: entry.status,
            tag_names: tag_names(&entry.tags, CARD_TAG_LIMIT),
        }
    }

    pub fn detail(&self, entry: &CatalogEntry) -> EntryDetail {
        EntryDetail {
            id: entry.id.clone(),
            title: resolve_title(&entry.title).to_string(),
            cover_url: self.cover_url(&entry.cover),
            category: category_for_language(entry.original_language.as_deref()),
            year: entry.year,
            status: entry.status,
            description: resolve_description(&entry.description).to_string(),
            tag_names: tag_names(&entry.tags, DETAIL_TAG_LIMIT),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_COVER_BASE, DEFAULT_PLACEHOLDER)
    }
}
