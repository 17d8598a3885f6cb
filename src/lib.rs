//! solport - Solana NFT Portfolio Terminal Viewer
//!
//! Connect a wallet address, fetch the NFTs it owns from the portfolio
//! backend, and browse them in the terminal with search, collection
//! filter, sort, and grid/list display controls. A second pane checks the
//! wallet's SOL balance through the same backend.
//!
//! ## Architecture
//!
//! - [`api`] talks to the backend and settles its loose response envelopes
//!   into strict outcomes at the boundary.
//! - [`store`] owns the fetched data and the fetch lifecycle; NFT fetches
//!   are sequence-numbered so the last one the user asked for wins.
//! - [`view`] derives the filtered/sorted working set and selects which
//!   portfolio view renders; everything in it is pure.
//! - [`app`] + [`ui`] are the ratatui presentation layer, driven by a
//!   frame-budgeted event loop in the binary.

pub mod api;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod debounce;
pub mod model;
pub mod store;
pub mod theme;
pub mod ui;
pub mod view;
pub mod wallet;

// Re-export commonly used types
pub use app::{App, AppEvent, InputMode, Pane};
pub use model::NftRecord;
pub use store::{BalanceStore, NftStore, Notice};
pub use view::{derive_view, FilterState, SortKey, ViewMode, ViewState};
