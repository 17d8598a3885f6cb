//! Owning stores for the fetched portfolio data.
//!
//! Fetches run as spawned tasks; their outcomes come back over the event
//! channel and are applied here. Each NFT fetch carries a sequence number
//! so that the last fetch the user asked for wins, no matter in which
//! order the responses resolve.

use crate::api::{ApiError, BalanceOutcome, FetchOutcome};
use crate::model::NftRecord;

/// User-facing outcome of a store transition, rendered as a toast.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Handle for one issued fetch. Carries the sequence number the eventual
/// settlement must present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// The authoritative NFT record list plus the fetch lifecycle around it.
#[derive(Debug, Default)]
pub struct NftStore {
    records: Vec<NftRecord>,
    issued: u64,
    settled: u64,
}

impl NftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[NftRecord] {
        &self.records
    }

    /// True strictly between issuing a fetch and the newest fetch settling.
    pub fn loading(&self) -> bool {
        self.settled < self.issued
    }

    /// Start a fetch for `wallet_address`. A blank address is refused
    /// before any request is made and does not flip the loading flag.
    pub fn begin_fetch(&mut self, wallet_address: &str) -> Result<FetchTicket, Notice> {
        if wallet_address.trim().is_empty() {
            return Err(Notice::Error("Please enter a wallet address".into()));
        }
        self.issued += 1;
        log::debug!("[store] fetch #{} issued", self.issued);
        Ok(FetchTicket { seq: self.issued })
    }

    /// Apply a fetch outcome. Outcomes from superseded fetches are dropped
    /// so a slow old response never overwrites a newer one.
    pub fn settle(&mut self, seq: u64, outcome: FetchOutcome) -> Option<Notice> {
        if seq > self.settled {
            self.settled = seq;
        }
        if seq < self.issued {
            log::debug!(
                "[store] dropping stale fetch #{seq} (newest is #{})",
                self.issued
            );
            return None;
        }

        match outcome {
            FetchOutcome::Records(records) => {
                log::info!("[store] fetch #{seq} settled with {} records", records.len());
                self.records = records;
                None
            }
            FetchOutcome::Empty => {
                log::info!("[store] fetch #{seq} settled empty");
                self.records.clear();
                Some(Notice::Info("No NFTs found in this wallet".into()))
            }
            // Last-known-good records are kept across a failed refresh.
            FetchOutcome::Failed(err) => {
                log::warn!("[store] fetch #{seq} failed: {err}");
                Some(Notice::Error(fetch_error_message(err)))
            }
        }
    }
}

fn fetch_error_message(err: ApiError) -> String {
    match err {
        ApiError::Rejected(Some(message)) => message,
        ApiError::Rejected(None) => "Failed to fetch NFTs".into(),
        ApiError::Transport(_) => "Failed to connect to the server".into(),
        ApiError::RateLimited | ApiError::Timeout => err.to_string(),
    }
}

/// SOL balance for the connected wallet, fetched through the same backend.
#[derive(Debug, Default)]
pub struct BalanceStore {
    balance_sol: Option<f64>,
    loading: bool,
    message: Option<String>,
    fetched_at: Option<chrono::DateTime<chrono::Local>>,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_sol(&self) -> Option<f64> {
        self.balance_sol
    }

    /// When the displayed balance was fetched.
    pub fn fetched_at(&self) -> Option<chrono::DateTime<chrono::Local>> {
        self.fetched_at
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.message = None;
    }

    pub fn settle(&mut self, outcome: BalanceOutcome) -> Option<Notice> {
        self.loading = false;
        self.fetched_at = Some(chrono::Local::now());
        match outcome {
            BalanceOutcome::Sol(value) => {
                self.balance_sol = Some(value);
                None
            }
            BalanceOutcome::NotFound => {
                self.balance_sol = Some(0.0);
                self.message = Some("Balance not found".into());
                Some(Notice::Info("Balance not found".into()))
            }
            BalanceOutcome::Failed(err) => {
                self.balance_sol = Some(0.0);
                let message = balance_error_message(err);
                self.message = Some(message.clone());
                Some(Notice::Error(message))
            }
        }
    }
}

fn balance_error_message(err: ApiError) -> String {
    match err {
        ApiError::RateLimited => {
            "RPC endpoint rate limit reached. Please try again later.".into()
        }
        ApiError::Timeout => "Request timeout. Please check your internet connection.".into(),
        ApiError::Rejected(_) => "Failed to fetch balance".into(),
        ApiError::Transport(detail) => format!("Error fetching balance: {detail}. Try again"),
    }
}
