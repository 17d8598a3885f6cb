//! Pure view-model derivation over the fetched record list.
//!
//! Everything here is synchronous and deterministic: the UI recomputes the
//! derived view every frame from the store contents and the filter state.

use std::collections::HashSet;
use std::fmt;

use crate::model::NftRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Collection,
}

impl SortKey {
    pub fn toggle(self) -> Self {
        match self {
            SortKey::Name => SortKey::Collection,
            SortKey::Collection => SortKey::Name,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Collection => write!(f, "collection"),
        }
    }
}

/// Display-only layout choice; no effect on the derived data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollectionFilter {
    #[default]
    All,
    Named(String),
}

impl CollectionFilter {
    /// A record with no collection never matches a named filter.
    pub fn matches(&self, record: &NftRecord) -> bool {
        match self {
            CollectionFilter::All => true,
            CollectionFilter::Named(name) => record.collection.as_deref() == Some(name.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CollectionFilter::All => "all",
            CollectionFilter::Named(name) => name,
        }
    }
}

/// Filter state owned by the presentation layer. Not persisted.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Raw search input; matched case-insensitively, no trimming applied.
    pub search: String,
    pub collection: CollectionFilter,
    pub sort: SortKey,
    pub view_mode: ViewMode,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            collection: CollectionFilter::All,
            sort: SortKey::Name,
            view_mode: ViewMode::Grid,
        }
    }
}

/// The derived working set handed to the renderer.
#[derive(Debug)]
pub struct ViewModel<'a> {
    /// Filtered and sorted records, in display order.
    pub items: Vec<&'a NftRecord>,
    /// Distinct non-empty collection names, first-seen order.
    pub collections: Vec<String>,
    /// Record count after dedup, before filtering.
    pub total: usize,
    pub filtered: usize,
}

/// Distinct non-empty collection names in first-seen order.
pub fn distinct_collections<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a NftRecord>,
{
    let mut seen = HashSet::new();
    let mut collections = Vec::new();
    for record in records {
        if let Some(name) = record.collection.as_deref() {
            if !name.is_empty() && seen.insert(name) {
                collections.push(name.to_string());
            }
        }
    }
    collections
}

/// Derive the filtered, sorted, deduplicated working set.
pub fn derive_view<'a>(records: &'a [NftRecord], filter: &FilterState) -> ViewModel<'a> {
    // Dedup by id, first occurrence wins.
    let mut seen_ids = HashSet::new();
    let mut deduped: Vec<&NftRecord> = Vec::with_capacity(records.len());
    for record in records {
        if seen_ids.insert(record.id.as_str()) {
            deduped.push(record);
        }
    }

    let collections = distinct_collections(deduped.iter().copied());

    let needle = filter.search.to_lowercase();
    let mut items: Vec<&NftRecord> = deduped
        .iter()
        .copied()
        .filter(|record| matches_search(record, &needle) && filter.collection.matches(record))
        .collect();

    // Vec::sort_by_key is stable: equal keys keep their input order.
    match filter.sort {
        SortKey::Name => items.sort_by_key(|record| record.name.to_lowercase()),
        SortKey::Collection => items.sort_by_key(|record| record.collection_key().to_lowercase()),
    }

    ViewModel {
        total: deduped.len(),
        filtered: items.len(),
        items,
        collections,
    }
}

/// Case-insensitive substring match against name and, when present,
/// description. An empty needle matches everything.
fn matches_search(record: &NftRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(needle)
        || record
            .description
            .as_ref()
            .map(|d| d.to_lowercase().contains(needle))
            .unwrap_or(false)
}

/// Which view the portfolio pane renders, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    NotConnected,
    Loading,
    HasResults,
    NoNfts,
    NoResults,
}

impl ViewState {
    /// Pure function of the current frame's inputs; nothing is remembered
    /// between renders.
    pub fn select(connected: bool, loading: bool, total: usize, filtered: usize) -> Self {
        if !connected {
            ViewState::NotConnected
        } else if loading {
            ViewState::Loading
        } else if filtered > 0 {
            ViewState::HasResults
        } else if total == 0 {
            ViewState::NoNfts
        } else {
            ViewState::NoResults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nft(id: &str, name: &str, collection: Option<&str>) -> NftRecord {
        NftRecord {
            id: id.into(),
            name: name.into(),
            symbol: None,
            description: None,
            image: None,
            collection: collection.map(Into::into),
            uri: None,
            attributes: Vec::new(),
            creators: Vec::new(),
            royalty: None,
        }
    }

    #[test]
    fn search_matches_description_when_name_misses() {
        let mut record = nft("1", "Mystery Box", Some("Boxes"));
        record.description = Some("A golden ape hides inside".into());
        assert!(matches_search(&record, "ape"));
        assert!(!matches_search(&record, "cat"));
    }

    #[test]
    fn search_is_not_trimmed() {
        let record = nft("1", "Ape #1", None);
        // A trailing space is part of the needle and misses.
        assert!(!matches_search(&record, "ape  "));
        assert!(matches_search(&record, "ape #"));
    }

    #[test]
    fn named_filter_never_matches_recordless_collection() {
        let record = nft("1", "Stray", None);
        let filter = CollectionFilter::Named("Apes".into());
        assert!(!filter.matches(&record));
        assert!(CollectionFilter::All.matches(&record));
    }

    #[test]
    fn view_state_priority_order() {
        use ViewState::*;
        assert_eq!(ViewState::select(false, true, 5, 5), NotConnected);
        assert_eq!(ViewState::select(true, true, 5, 5), Loading);
        assert_eq!(ViewState::select(true, false, 5, 3), HasResults);
        assert_eq!(ViewState::select(true, false, 0, 0), NoNfts);
        assert_eq!(ViewState::select(true, false, 5, 0), NoResults);
    }
}
