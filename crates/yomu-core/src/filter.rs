//! Client-side catalog filters. Pure predicates; changing them never refetches.

use yomu_api::models::{CatalogEntry, PublicationStatus};

use crate::normalize::{category_for_language, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a select value such as `"all"` or `"manhwa"`. Unknown values mean All.
    pub fn parse(s: &str) -> Self {
        Category::parse(s).map_or(Self::All, Self::Only)
    }

    fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PublicationStatus),
}

impl StatusFilter {
    /// Parse a select value such as `"all"` or `"Completed"`, ignoring case.
    /// Unknown values mean All; `"unknown"` itself selects entries with no status.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match PublicationStatus::parse(s) {
            PublicationStatus::Unknown if !s.eq_ignore_ascii_case("unknown") => Self::All,
            status => Self::Only(status),
        }
    }

    fn matches(self, status: PublicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub status: StatusFilter,
}

impl FilterState {
    pub fn new(category: CategoryFilter, status: StatusFilter) -> Self {
        Self { category, status }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.category
            .matches(category_for_language(entry.original_language.as_deref()))
            && self.status.matches(entry.status)
    }

    /// Entries passing the filter, in their original order.
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yomu_api::models::{CoverRelation, LocalizedText};

    fn entry(id: &str, lang: &str, status: PublicationStatus) -> CatalogEntry {
        CatalogEntry {
            id: id.into(),
            title: LocalizedText::from_pairs([("en", id)]),
            description: LocalizedText::new(),
            original_language: Some(lang.into()),
            status,
            year: None,
            tags: Vec::new(),
            cover: CoverRelation::NotFound,
        }
    }

    /// Manga/ongoing, Manga/completed, Manhwa/ongoing, Manhwa/completed, Manhua/ongoing.
    fn fixture() -> Vec<CatalogEntry> {
        vec![
            entry("one-piece", "ja", PublicationStatus::Ongoing),
            entry("monster", "ja", PublicationStatus::Completed),
            entry("tower-of-god", "ko", PublicationStatus::Ongoing),
            entry("solo-leveling", "ko", PublicationStatus::Completed),
            entry("tales-of-demons", "zh", PublicationStatus::Ongoing),
        ]
    }

    fn ids(filter: FilterState, entries: &[CatalogEntry]) -> Vec<&str> {
        filter.apply(entries).iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn all_all_returns_everything_in_order() {
        let entries = fixture();
        assert_eq!(
            ids(FilterState::default(), &entries),
            vec!["one-piece", "monster", "tower-of-god", "solo-leveling", "tales-of-demons"]
        );
    }

    #[test]
    fn every_combination_yields_expected_subset() {
        use CategoryFilter as C;
        use StatusFilter as S;

        let ongoing = S::Only(PublicationStatus::Ongoing);
        let completed = S::Only(PublicationStatus::Completed);
        let manga = C::Only(Category::Manga);
        let manhwa = C::Only(Category::Manhwa);
        let manhua = C::Only(Category::Manhua);

        let cases: Vec<(C, S, Vec<&str>)> = vec![
            (C::All, ongoing, vec!["one-piece", "tower-of-god", "tales-of-demons"]),
            (C::All, completed, vec!["monster", "solo-leveling"]),
            (manga, S::All, vec!["one-piece", "monster"]),
            (manga, ongoing, vec!["one-piece"]),
            (manga, completed, vec!["monster"]),
            (manhwa, S::All, vec!["tower-of-god", "solo-leveling"]),
            (manhwa, ongoing, vec!["tower-of-god"]),
            (manhwa, completed, vec!["solo-leveling"]),
            (manhua, S::All, vec!["tales-of-demons"]),
            (manhua, ongoing, vec!["tales-of-demons"]),
            (manhua, completed, vec![]),
        ];

        let entries = fixture();
        for (category, status, expected) in cases {
            assert_eq!(
                ids(FilterState::new(category, status), &entries),
                expected,
                "category = {category:?}, status = {status:?}"
            );
        }
    }

    #[test]
    fn select_values_parse_case_insensitively() {
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("Ongoing"),
            StatusFilter::Only(PublicationStatus::Ongoing)
        );
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("MANHWA"), CategoryFilter::Only(Category::Manhwa));
    }

    #[test]
    fn unrecognized_select_values_mean_all() {
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(CategoryFilter::parse("bogus"), CategoryFilter::All);

        let entries = fixture();
        assert_eq!(
            FilterState::new(CategoryFilter::All, StatusFilter::parse("bogus"))
                .apply(&entries)
                .len(),
            entries.len()
        );
    }

    #[test]
    fn unknown_status_is_selectable() {
        assert_eq!(
            StatusFilter::parse("Unknown"),
            StatusFilter::Only(PublicationStatus::Unknown)
        );
    }
}
