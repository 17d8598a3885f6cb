//! View-model derivation: filtering, sorting, dedup, collection set.

use solport::model::NftRecord;
use solport::view::{derive_view, CollectionFilter, FilterState, SortKey};

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

fn sample() -> Vec<NftRecord> {
    vec![
        nft("1", "Ape #1", Some("Apes")),
        nft("2", "Ape #2", Some("Apes")),
        nft("3", "Cat #1", Some("Cats")),
    ]
}

fn names(items: &[&NftRecord]) -> Vec<String> {
    items.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn searching_for_ape_across_all_collections() {
    let records = sample();
    let filter = FilterState {
        search: "ape".into(),
        ..FilterState::default()
    };

    let vm = derive_view(&records, &filter);

    assert_eq!(names(&vm.items), ["Ape #1", "Ape #2"]);
    assert_eq!(vm.collections, ["Apes", "Cats"]);
    assert_eq!(vm.total, 3);
    assert_eq!(vm.filtered, 2);
}

#[test]
fn filtering_by_collection_without_a_search_term() {
    let records = sample();
    let filter = FilterState {
        collection: CollectionFilter::Named("Cats".into()),
        ..FilterState::default()
    };

    let vm = derive_view(&records, &filter);

    assert_eq!(names(&vm.items), ["Cat #1"]);
}

#[test]
fn empty_search_keeps_every_record_in_input_order() {
    // Equal names make the stable sort a no-op, so the input order shows
    // through untouched.
    let records = vec![
        nft("z", "Same", None),
        nft("a", "Same", Some("Apes")),
        nft("m", "Same", None),
    ];
    let vm = derive_view(&records, &FilterState::default());

    assert_eq!(vm.filtered, vm.total);
    let ids: Vec<&str> = vm.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["z", "a", "m"]);
}

#[test]
fn the_all_filter_never_excludes_by_collection() {
    let records = vec![
        nft("1", "A", Some("Apes")),
        nft("2", "B", None),
        nft("3", "C", Some("")),
    ];
    let vm = derive_view(&records, &FilterState::default());
    assert_eq!(vm.filtered, 3);
}

#[test]
fn sorting_by_name_is_idempotent() {
    let records = sample();
    let filter = FilterState::default();

    let first = derive_view(&records, &filter);
    let once: Vec<NftRecord> = first.items.iter().map(|r| (*r).clone()).collect();

    let second = derive_view(&once, &filter);
    let twice: Vec<NftRecord> = second.items.iter().map(|r| (*r).clone()).collect();

    assert_eq!(once, twice);
}

#[test]
fn sorting_is_stable_for_equal_keys() {
    let records = vec![
        nft("first", "Twin", Some("B")),
        nft("second", "Twin", Some("A")),
    ];
    let filter = FilterState {
        sort: SortKey::Name,
        ..FilterState::default()
    };

    let vm = derive_view(&records, &filter);
    let ids: Vec<&str> = vm.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["first", "second"]);
}

#[test]
fn sorting_by_collection_treats_missing_as_empty() {
    let records = vec![
        nft("1", "A", Some("Zebras")),
        nft("2", "B", None),
        nft("3", "C", Some("Apes")),
    ];
    let filter = FilterState {
        sort: SortKey::Collection,
        ..FilterState::default()
    };

    let vm = derive_view(&records, &filter);
    let ids: Vec<&str> = vm.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["2", "3", "1"]);
}

#[test]
fn collection_set_is_distinct_and_skips_empty_values() {
    let records = vec![
        nft("1", "A", Some("Apes")),
        nft("2", "B", Some("Cats")),
        nft("3", "C", Some("Apes")),
        nft("4", "D", Some("")),
        nft("5", "E", None),
    ];
    let vm = derive_view(&records, &FilterState::default());
    assert_eq!(vm.collections, ["Apes", "Cats"]);
}

#[test]
fn duplicate_ids_are_deduplicated_first_occurrence_wins() {
    let records = vec![
        nft("dup", "Kept", Some("Apes")),
        nft("dup", "Impostor", Some("Cats")),
        nft("other", "Other", None),
    ];
    let vm = derive_view(&records, &FilterState::default());

    assert_eq!(vm.total, 2);
    assert!(vm.items.iter().any(|r| r.name == "Kept"));
    assert!(!vm.items.iter().any(|r| r.name == "Impostor"));
}

#[test]
fn search_also_matches_the_description() {
    let mut record = nft("1", "Mystery Box", Some("Boxes"));
    record.description = Some("Contains one APE voucher".into());
    let records = vec![record, nft("2", "Cat #1", Some("Cats"))];

    let filter = FilterState {
        search: "ape".into(),
        ..FilterState::default()
    };
    let vm = derive_view(&records, &filter);
    assert_eq!(names(&vm.items), ["Mystery Box"]);
}
