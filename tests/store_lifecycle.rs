//! Fetch lifecycle: validation, settlement, stale-fetch discard, and the
//! balance store's error-to-message mapping.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use solport::api::{ApiError, BalanceOutcome, FetchOutcome, PortfolioService};
use solport::model::NftRecord;
use solport::store::{BalanceStore, NftStore, Notice};

fn nft(id: &str, name: &str) -> NftRecord {
    NftRecord {
        id: id.into(),
        name: name.into(),
        symbol: None,
        description: None,
        image: None,
        collection: None,
        uri: None,
        attributes: Vec::new(),
        creators: Vec::new(),
        royalty: None,
    }
}

/// Scripted stand-in for the backend: pops one outcome per call.
struct ScriptedService {
    nft_outcomes: Mutex<VecDeque<FetchOutcome>>,
    balance_outcomes: Mutex<VecDeque<BalanceOutcome>>,
}

impl ScriptedService {
    fn new(
        nft_outcomes: impl IntoIterator<Item = FetchOutcome>,
        balance_outcomes: impl IntoIterator<Item = BalanceOutcome>,
    ) -> Self {
        Self {
            nft_outcomes: Mutex::new(nft_outcomes.into_iter().collect()),
            balance_outcomes: Mutex::new(balance_outcomes.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PortfolioService for ScriptedService {
    async fn nfts_by_owner(&self, _public_key: &str) -> FetchOutcome {
        self.nft_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FetchOutcome::Empty)
    }

    async fn balance(&self, _public_key: &str) -> BalanceOutcome {
        self.balance_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BalanceOutcome::NotFound)
    }
}

const WALLET: &str = "4Nd1mYvNQv6h8xNK5dQeXK2k7S9fTzvWqWkV7e3mPByA";

#[test]
fn blank_address_is_refused_before_any_request() {
    let mut store = NftStore::new();

    let refused = store.begin_fetch("   ");
    assert_eq!(
        refused.unwrap_err(),
        Notice::Error("Please enter a wallet address".into())
    );
    assert!(!store.loading());
    assert!(store.records().is_empty());
}

#[test]
fn successful_fetch_replaces_records_wholesale() {
    let mut store = NftStore::new();

    let ticket = store.begin_fetch(WALLET).unwrap();
    assert!(store.loading());

    let notice = store.settle(
        ticket.seq(),
        FetchOutcome::Records(vec![nft("1", "Ape #1"), nft("2", "Ape #2")]),
    );
    assert_eq!(notice, None);
    assert!(!store.loading());
    assert_eq!(store.records().len(), 2);

    // The next fetch replaces, not merges.
    let ticket = store.begin_fetch(WALLET).unwrap();
    store.settle(ticket.seq(), FetchOutcome::Records(vec![nft("3", "Cat #1")]));
    let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["3"]);
}

#[test]
fn empty_fetch_clears_records_and_notifies() {
    let mut store = NftStore::new();
    let ticket = store.begin_fetch(WALLET).unwrap();
    store.settle(ticket.seq(), FetchOutcome::Records(vec![nft("1", "Ape #1")]));

    let ticket = store.begin_fetch(WALLET).unwrap();
    let notice = store.settle(ticket.seq(), FetchOutcome::Empty);

    assert_eq!(
        notice,
        Some(Notice::Info("No NFTs found in this wallet".into()))
    );
    assert!(store.records().is_empty());
    assert!(!store.loading());
}

#[test]
fn failed_refresh_keeps_the_last_known_good_records() {
    let mut store = NftStore::new();
    let ticket = store.begin_fetch(WALLET).unwrap();
    store.settle(ticket.seq(), FetchOutcome::Records(vec![nft("1", "Ape #1")]));

    let ticket = store.begin_fetch(WALLET).unwrap();
    let notice = store.settle(
        ticket.seq(),
        FetchOutcome::Failed(ApiError::Rejected(Some("boom".into()))),
    );

    assert_eq!(notice, Some(Notice::Error("boom".into())));
    assert_eq!(store.records().len(), 1);
    assert!(!store.loading());
}

#[test]
fn envelope_failure_without_message_gets_a_generic_fallback() {
    let mut store = NftStore::new();
    let ticket = store.begin_fetch(WALLET).unwrap();
    let notice = store.settle(ticket.seq(), FetchOutcome::Failed(ApiError::Rejected(None)));
    assert_eq!(notice, Some(Notice::Error("Failed to fetch NFTs".into())));
}

#[test]
fn stale_fetch_never_overwrites_a_newer_one() {
    let mut store = NftStore::new();

    let first = store.begin_fetch(WALLET).unwrap();
    let second = store.begin_fetch(WALLET).unwrap();

    // Newer fetch resolves first.
    store.settle(
        second.seq(),
        FetchOutcome::Records(vec![nft("new", "Fresh")]),
    );
    assert!(!store.loading());

    // The superseded fetch resolves late and is dropped silently.
    let notice = store.settle(
        first.seq(),
        FetchOutcome::Records(vec![nft("old", "Stale")]),
    );
    assert_eq!(notice, None);
    let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["new"]);
}

#[test]
fn loading_holds_until_the_newest_fetch_settles() {
    let mut store = NftStore::new();

    let first = store.begin_fetch(WALLET).unwrap();
    let second = store.begin_fetch(WALLET).unwrap();

    // The older fetch settling does not end the newer one's window.
    store.settle(first.seq(), FetchOutcome::Empty);
    assert!(store.loading());
    assert!(store.records().is_empty());

    store.settle(second.seq(), FetchOutcome::Records(vec![nft("1", "Ape #1")]));
    assert!(!store.loading());
}

#[tokio::test]
async fn full_cycle_through_the_service_trait() {
    let service = ScriptedService::new(
        [FetchOutcome::Records(vec![nft("1", "Ape #1")])],
        [BalanceOutcome::Sol(2.5)],
    );
    let mut store = NftStore::new();

    let ticket = store.begin_fetch(WALLET).unwrap();
    let outcome = service.nfts_by_owner(WALLET).await;
    store.settle(ticket.seq(), outcome);

    assert_eq!(store.records().len(), 1);
    assert!(!store.loading());

    let mut balance = BalanceStore::new();
    balance.begin_fetch();
    assert!(balance.loading());
    let notice = balance.settle(service.balance(WALLET).await);
    assert_eq!(notice, None);
    assert_eq!(balance.balance_sol(), Some(2.5));
    assert!(!balance.loading());
}

#[test]
fn balance_failures_map_to_distinguished_messages() {
    let mut store = BalanceStore::new();

    store.begin_fetch();
    let rate = store.settle(BalanceOutcome::Failed(ApiError::RateLimited));
    assert_eq!(
        rate,
        Some(Notice::Error(
            "RPC endpoint rate limit reached. Please try again later.".into()
        ))
    );

    store.begin_fetch();
    let timeout = store.settle(BalanceOutcome::Failed(ApiError::Timeout));
    assert_eq!(
        timeout,
        Some(Notice::Error(
            "Request timeout. Please check your internet connection.".into()
        ))
    );

    store.begin_fetch();
    let rejected = store.settle(BalanceOutcome::Failed(ApiError::Rejected(None)));
    assert_eq!(
        rejected,
        Some(Notice::Error("Failed to fetch balance".into()))
    );

    // Failures zero the displayed balance.
    assert_eq!(store.balance_sol(), Some(0.0));
}

#[test]
fn missing_balance_counts_as_found_nothing() {
    let mut store = BalanceStore::new();
    store.begin_fetch();
    let notice = store.settle(BalanceOutcome::NotFound);
    assert_eq!(notice, Some(Notice::Info("Balance not found".into())));
    assert_eq!(store.balance_sol(), Some(0.0));
    assert_eq!(store.message(), Some("Balance not found"));
}
