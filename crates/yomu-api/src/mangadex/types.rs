use serde::Deserialize;

use crate::models::{
    CatalogEntry, ChapterSummary, CoverRelation, LocalizedText, PageServerAssignment,
    PublicationStatus, Tag,
};

// ── Response envelopes ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MdCollection<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct MdEntity<T> {
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct MdErrorResponse {
    #[serde(default)]
    pub errors: Vec<MdErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct MdErrorDetail {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl MdErrorResponse {
    /// First human-readable message in the error list.
    pub fn message(&self) -> Option<String> {
        self.errors
            .iter()
            .find_map(|e| e.detail.clone().or_else(|| e.title.clone()))
    }
}

// ── Manga ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MdManga {
    pub id: String,
    #[serde(default)]
    pub attributes: MdMangaAttributes,
    pub relationships: Option<Vec<MdRelationship>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdMangaAttributes {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub original_language: Option<String>,
    pub status: Option<String>,
    pub year: Option<u32>,
    pub tags: Option<Vec<MdTag>>,
}

#[derive(Debug, Deserialize)]
pub struct MdTag {
    pub id: String,
    #[serde(default)]
    pub attributes: MdTagAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub struct MdTagAttributes {
    #[serde(default)]
    pub name: LocalizedText,
}

#[derive(Debug, Deserialize)]
pub struct MdRelationship {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    /// Only populated for relation types requested via `includes[]`.
    pub attributes: Option<serde_json::Value>,
}

impl MdManga {
    /// Find the included cover-art relation.
    ///
    /// A cover relation without attributes (cover not included in the
    /// request) has no usable file name and counts as not found.
    pub fn cover_relation(&self) -> CoverRelation {
        let file_name = self
            .relationships
            .iter()
            .flatten()
            .find(|r| r.type_ == "cover_art")
            .and_then(|r| r.attributes.as_ref())
            .and_then(|a| a.get("fileName"))
            .and_then(|f| f.as_str())
            .filter(|f| !f.is_empty());

        match file_name {
            Some(file_name) => CoverRelation::Found {
                entry_id: self.id.clone(),
                file_name: file_name.to_string(),
            },
            None => CoverRelation::NotFound,
        }
    }

    pub fn into_catalog_entry(self) -> CatalogEntry {
        let cover = self.cover_relation();
        let attrs = self.attributes;
        CatalogEntry {
            id: self.id,
            title: attrs.title,
            description: attrs.description,
            original_language: attrs.original_language,
            status: attrs
                .status
                .as_deref()
                .map(PublicationStatus::parse)
                .unwrap_or_default(),
            year: attrs.year,
            tags: attrs
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|t| Tag {
                    id: t.id,
                    name: t.attributes.name,
                })
                .collect(),
            cover,
        }
    }
}

// ── Chapters ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MdChapter {
    pub id: String,
    #[serde(default)]
    pub attributes: MdChapterAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdChapterAttributes {
    pub volume: Option<String>,
    pub chapter: Option<String>,
    pub title: Option<String>,
    pub translated_language: Option<String>,
}

impl MdChapter {
    pub fn into_chapter_summary(self) -> ChapterSummary {
        let attrs = self.attributes;
        ChapterSummary {
            id: self.id,
            chapter: attrs.chapter.filter(|c| !c.is_empty()),
            title: attrs.title.filter(|t| !t.is_empty()),
            volume: attrs.volume,
            translated_language: attrs.translated_language,
        }
    }
}

// ── At-home page server ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdAtHomeResponse {
    pub base_url: String,
    pub chapter: MdAtHomeChapter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdAtHomeChapter {
    pub hash: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub data_saver: Vec<String>,
}

impl MdAtHomeResponse {
    pub fn into_assignment(self) -> PageServerAssignment {
        PageServerAssignment {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            hash: self.chapter.hash,
            data: self.chapter.data,
            data_saver: self.chapter.data_saver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
        "result": "ok",
        "response": "collection",
        "data": [
            {
                "id": "a1c7c817-4e59-43b7-9365-09675a149a6f",
                "type": "manga",
                "attributes": {
                    "title": { "en": "One Piece" },
                    "altTitles": [{ "ja": "ワンピース" }],
                    "description": { "en": "Gol D. Roger..." },
                    "originalLanguage": "ja",
                    "status": "ongoing",
                    "year": 1997,
                    "contentRating": "safe",
                    "tags": [
                        {
                            "id": "391b0423-d847-456f-aff0-8b0cfc03066b",
                            "type": "tag",
                            "attributes": { "name": { "en": "Action" }, "group": "genre" }
                        },
                        {
                            "id": "87cc87cd-a395-47af-b27a-93258283bbc6",
                            "type": "tag",
                            "attributes": { "name": { "en": "Adventure" }, "group": "genre" }
                        }
                    ]
                },
                "relationships": [
                    { "id": "f9c33607-9180-4ba6-b85c-e4b5faee7192", "type": "author" },
                    {
                        "id": "cdb1f1f5-0c0d-4e6b-8b8e-6f0b7e4fd58e",
                        "type": "cover_art",
                        "attributes": { "fileName": "e4a9a1a7.jpg", "volume": "108" }
                    }
                ]
            },
            {
                "id": "32d76d19-8a05-4db0-9fc2-e0b0648fe9d0",
                "type": "manga",
                "attributes": {
                    "title": { "ko": "나 혼자만 레벨업" },
                    "description": [],
                    "originalLanguage": "ko",
                    "status": "completed",
                    "year": null,
                    "tags": []
                },
                "relationships": []
            }
        ],
        "limit": 24,
        "offset": 0,
        "total": 2
    }"#;

    #[test]
    fn test_deserialize_search_response() {
        let resp: MdCollection<MdManga> = serde_json::from_str(SEARCH_JSON).unwrap();
        assert_eq!(resp.data.len(), 2);

        let entries: Vec<CatalogEntry> = resp
            .data
            .into_iter()
            .map(MdManga::into_catalog_entry)
            .collect();

        let one_piece = &entries[0];
        assert_eq!(one_piece.title.get("en"), Some("One Piece"));
        assert_eq!(one_piece.original_language.as_deref(), Some("ja"));
        assert_eq!(one_piece.status, PublicationStatus::Ongoing);
        assert_eq!(one_piece.year, Some(1997));
        assert_eq!(one_piece.tags.len(), 2);
        assert_eq!(one_piece.tags[1].name.get("en"), Some("Adventure"));
        assert_eq!(
            one_piece.cover,
            CoverRelation::Found {
                entry_id: "a1c7c817-4e59-43b7-9365-09675a149a6f".into(),
                file_name: "e4a9a1a7.jpg".into(),
            }
        );

        let solo = &entries[1];
        assert!(solo.description.is_empty());
        assert_eq!(solo.status, PublicationStatus::Completed);
        assert_eq!(solo.year, None);
        assert_eq!(solo.cover, CoverRelation::NotFound);
    }

    #[test]
    fn test_cover_relation_missing_relationships() {
        let manga: MdManga =
            serde_json::from_str(r#"{ "id": "x", "attributes": { "title": { "en": "T" } } }"#)
                .unwrap();
        assert_eq!(manga.cover_relation(), CoverRelation::NotFound);
    }

    #[test]
    fn test_cover_relation_without_included_attributes() {
        let manga: MdManga = serde_json::from_str(
            r#"{ "id": "x", "relationships": [{ "id": "c", "type": "cover_art" }] }"#,
        )
        .unwrap();
        assert_eq!(manga.cover_relation(), CoverRelation::NotFound);
    }

    #[test]
    fn test_missing_attributes_fall_back_to_defaults() {
        let manga: MdManga = serde_json::from_str(r#"{ "id": "bare" }"#).unwrap();
        let entry = manga.into_catalog_entry();
        assert!(entry.title.is_empty());
        assert_eq!(entry.status, PublicationStatus::Unknown);
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn test_deserialize_chapter_feed() {
        let json = r#"{
            "result": "ok",
            "response": "collection",
            "data": [
                {
                    "id": "ch-1",
                    "type": "chapter",
                    "attributes": {
                        "volume": "1",
                        "chapter": "1",
                        "title": "Romance Dawn",
                        "translatedLanguage": "en",
                        "pages": 53
                    }
                },
                {
                    "id": "ch-2",
                    "type": "chapter",
                    "attributes": {
                        "volume": null,
                        "chapter": null,
                        "title": "",
                        "translatedLanguage": "en"
                    }
                }
            ],
            "limit": 100,
            "offset": 0,
            "total": 2
        }"#;

        let resp: MdCollection<MdChapter> = serde_json::from_str(json).unwrap();
        let chapters: Vec<ChapterSummary> = resp
            .data
            .into_iter()
            .map(MdChapter::into_chapter_summary)
            .collect();

        assert_eq!(chapters[0].chapter.as_deref(), Some("1"));
        assert_eq!(chapters[0].title.as_deref(), Some("Romance Dawn"));
        assert_eq!(chapters[1].chapter, None);
        assert_eq!(chapters[1].title, None);
    }

    #[test]
    fn test_deserialize_at_home() {
        let json = r#"{
            "result": "ok",
            "baseUrl": "https://cmdxd98sb0x3yprd.mangadex.network/",
            "chapter": {
                "hash": "3303dd03ac8d27452cce3f2a882e94b2",
                "data": ["1-f7a76de1.png", "2-23d3bb8c.png"],
                "dataSaver": ["1-27a8f2e4.jpg", "2-6a5e1b9f.jpg"]
            }
        }"#;

        let resp: MdAtHomeResponse = serde_json::from_str(json).unwrap();
        let assignment = resp.into_assignment();
        assert_eq!(
            assignment.base_url,
            "https://cmdxd98sb0x3yprd.mangadex.network"
        );
        assert_eq!(assignment.hash, "3303dd03ac8d27452cce3f2a882e94b2");
        assert_eq!(assignment.data.len(), 2);
        assert_eq!(assignment.data_saver[1], "2-6a5e1b9f.jpg");
    }

    #[test]
    fn test_error_response_message() {
        let json = r#"{
            "result": "error",
            "errors": [{
                "id": "9c3c1a1e",
                "status": 404,
                "title": "not_found_http_exception",
                "detail": "Manga with ID x was not found"
            }]
        }"#;
        let resp: MdErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.message().as_deref(), Some("Manga with ID x was not found"));
    }
}
