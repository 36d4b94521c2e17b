//! Service-agnostic catalog types.
//!
//! Every client converts its raw payloads into these, so the view models in
//! `yomu-core` never touch upstream JSON directly.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ── Localized text ──────────────────────────────────────────────

/// A locale → text mapping that keeps the upstream key order.
///
/// MangaDex encodes an empty localized field as `[]` instead of `{}`, and
/// occasionally sends `null`; both decode to an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText(Vec<(String, String)>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Text for an exact locale code.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == locale)
            .map(|(_, v)| v.as_str())
    }

    /// The first value in stored order.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LocalizedTextVisitor)
    }
}

struct LocalizedTextVisitor;

impl<'de> Visitor<'de> for LocalizedTextVisitor {
    type Value = LocalizedText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of locale codes to strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((locale, text)) = map.next_entry::<String, Option<String>>()? {
            if let Some(text) = text {
                pairs.push((locale, text));
            }
        }
        Ok(LocalizedText(pairs))
    }

    // `[]` is how an empty map comes over the wire.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LocalizedText::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LocalizedText::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LocalizedText::default())
    }
}

impl Serialize for LocalizedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (locale, text) in &self.0 {
            map.serialize_entry(locale, text)?;
        }
        map.end()
    }
}

// ── Catalog entry ───────────────────────────────────────────────

/// Publication status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
    #[default]
    Unknown,
}

impl PublicationStatus {
    /// Case-insensitive parse; anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ongoing" => Self::Ongoing,
            "completed" => Self::Completed,
            "hiatus" => Self::Hiatus,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Hiatus => "hiatus",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content tag (genre, theme, format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: LocalizedText,
}

/// Result of looking up the cover-art relation of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverRelation {
    Found { entry_id: String, file_name: String },
    NotFound,
}

/// One manga in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub original_language: Option<String>,
    pub status: PublicationStatus,
    pub year: Option<u32>,
    pub tags: Vec<Tag>,
    pub cover: CoverRelation,
}

// ── Chapters & pages ────────────────────────────────────────────

/// A chapter as listed in a manga's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub id: String,
    /// Chapter label; a string because chapters like "10.5" exist.
    pub chapter: Option<String>,
    pub title: Option<String>,
    pub volume: Option<String>,
    pub translated_language: Option<String>,
}

/// Page-image server assigned to one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageServerAssignment {
    pub base_url: String,
    pub hash: String,
    /// Full-quality file names, in page order.
    pub data: Vec<String>,
    /// Reduced-bandwidth file names, in page order.
    pub data_saver: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_text_keeps_upstream_order() {
        let text: LocalizedText =
            serde_json::from_str(r#"{"ko": "나 혼자만 레벨업", "en": "Solo Leveling"}"#).unwrap();
        assert_eq!(text.first(), Some("나 혼자만 레벨업"));
        assert_eq!(text.get("en"), Some("Solo Leveling"));
        assert_eq!(text.get("ja"), None);
    }

    #[test]
    fn localized_text_accepts_empty_array_and_null() {
        let from_array: LocalizedText = serde_json::from_str("[]").unwrap();
        assert!(from_array.is_empty());

        let from_null: LocalizedText = serde_json::from_str("null").unwrap();
        assert!(from_null.is_empty());
    }

    #[test]
    fn localized_text_skips_null_values() {
        let text: LocalizedText = serde_json::from_str(r#"{"en": null, "ja": "x"}"#).unwrap();
        assert_eq!(text.get("en"), None);
        assert_eq!(text.first(), Some("x"));
    }

    #[test]
    fn localized_text_serializes_as_map() {
        let text = LocalizedText::from_pairs([("en", "A"), ("ja", "B")]);
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"en":"A","ja":"B"}"#);
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(PublicationStatus::parse("Ongoing"), PublicationStatus::Ongoing);
        assert_eq!(PublicationStatus::parse("COMPLETED"), PublicationStatus::Completed);
        assert_eq!(PublicationStatus::parse("hiatus"), PublicationStatus::Hiatus);
        assert_eq!(PublicationStatus::parse("cancelled"), PublicationStatus::Cancelled);
        assert_eq!(PublicationStatus::parse("abandoned"), PublicationStatus::Unknown);
        assert_eq!(PublicationStatus::parse(""), PublicationStatus::Unknown);
    }
}
