use std::time::{Duration, Instant};

use crate::api::{BalanceOutcome, FetchOutcome};
use crate::debounce::Debouncer;
use crate::model::NftRecord;
use crate::store::{BalanceStore, NftStore, Notice};
use crate::theme::{ColorScheme, Theme};
use crate::view::{self, CollectionFilter, FilterState, SortKey, ViewModel, ViewMode, ViewState};
use crate::wallet::WalletSession;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search bar.
    Search,
    /// Typing a wallet address to connect.
    Address,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pane {
    Portfolio,
    Balance,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Portfolio => Pane::Balance,
            Pane::Balance => Pane::Portfolio,
        }
    }
}

/// Events delivered to the frame loop from spawned fetch tasks.
#[derive(Debug)]
pub enum AppEvent {
    NftsFetched { seq: u64, outcome: FetchOutcome },
    BalanceFetched(BalanceOutcome),
    Quit,
}

pub struct App {
    quit: bool,
    pane: Pane,

    wallet: WalletSession,
    nfts: NftStore,
    balance: BalanceStore,

    // Applied filter state; `search_input` is the live keystroke buffer
    // that reaches `filter.search` only through the debouncer.
    filter: FilterState,
    search_input: String,
    debouncer: Debouncer,

    address_input: String,
    input_mode: InputMode,

    selected: usize,
    grid_columns: usize, // set by the UI layer each frame

    fps: u32,
    colors: ColorScheme,

    toast: Option<(Notice, Instant)>,

    debug_log: Vec<String>,
    debug_visible: bool,
}

impl App {
    pub fn new(fps: u32, theme: Theme, search_debounce: Duration) -> Self {
        Self {
            quit: false,
            pane: Pane::Portfolio,
            wallet: WalletSession::new(),
            nfts: NftStore::new(),
            balance: BalanceStore::new(),
            filter: FilterState::default(),
            search_input: String::new(),
            debouncer: Debouncer::new(search_debounce),
            address_input: String::new(),
            input_mode: InputMode::Normal,
            selected: 0,
            grid_columns: 1,
            fps,
            colors: theme.colors(),
            toast: None,
            debug_log: Vec::new(),
            debug_visible: false,
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 {
        self.fps
    }
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn pane(&self) -> Pane {
        self.pane
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }
    pub fn wallet(&self) -> &WalletSession {
        &self.wallet
    }
    pub fn balance(&self) -> &BalanceStore {
        &self.balance
    }
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }
    pub fn search_input(&self) -> &str {
        &self.search_input
    }
    pub fn address_input(&self) -> &str {
        &self.address_input
    }
    pub fn selected(&self) -> usize {
        self.selected
    }
    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }
    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// Derive the current working set. Recomputed per frame; cheap for the
    /// portfolio sizes a single wallet holds.
    pub fn view_model(&self) -> ViewModel<'_> {
        view::derive_view(self.nfts.records(), &self.filter)
    }

    /// Which portfolio view renders this frame.
    pub fn view_state(&self) -> ViewState {
        let vm = self.view_model();
        ViewState::select(
            self.wallet.connected(),
            self.nfts.loading(),
            vm.total,
            vm.filtered,
        )
    }

    pub fn nfts_loading(&self) -> bool {
        self.nfts.loading()
    }

    pub fn selected_record(&self) -> Option<&NftRecord> {
        self.view_model().items.get(self.selected).copied()
    }

    // ----- event application -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::NftsFetched { seq, outcome } => {
                if let Some(notice) = self.nfts.settle(seq, outcome) {
                    self.push_notice(notice);
                }
                self.clamp_selection();
            }
            AppEvent::BalanceFetched(outcome) => {
                if let Some(notice) = self.balance.settle(outcome) {
                    self.push_notice(notice);
                }
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    /// Per-frame housekeeping: apply a settled search term.
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.debouncer.poll_at(now) {
            self.log_debug(format!("search settled: {term:?}"));
            self.filter.search = term;
            self.selected = 0;
        }
    }

    // ----- fetch lifecycle -----
    /// Issue an NFT fetch for the connected wallet. Returns the sequence
    /// number and trimmed address for the caller to spawn the request with;
    /// None when validation refused it (a notice has been surfaced).
    pub fn begin_nft_fetch(&mut self) -> Option<(u64, String)> {
        let address = self.wallet.address().unwrap_or("").to_string();
        match self.nfts.begin_fetch(&address) {
            Ok(ticket) => Some((ticket.seq(), address.trim().to_string())),
            Err(notice) => {
                self.push_notice(notice);
                None
            }
        }
    }

    /// Issue a balance fetch. Returns the address to query, or None when no
    /// wallet is connected.
    pub fn begin_balance_fetch(&mut self) -> Option<String> {
        match self.wallet.address() {
            Some(address) => {
                let address = address.to_string();
                self.balance.begin_fetch();
                Some(address)
            }
            None => {
                self.push_notice(Notice::Error("No wallet connected".into()));
                None
            }
        }
    }

    // ----- wallet -----
    pub fn open_address_entry(&mut self) {
        self.input_mode = InputMode::Address;
        self.address_input.clear();
        self.wallet.begin_connect();
    }

    pub fn address_add_char(&mut self, ch: char) {
        self.address_input.push(ch);
    }

    pub fn address_backspace(&mut self) {
        self.address_input.pop();
    }

    pub fn cancel_address_entry(&mut self) {
        self.address_input.clear();
        self.input_mode = InputMode::Normal;
        self.wallet.cancel_connect();
    }

    /// Try to connect with the typed address. On success the caller starts
    /// the automatic NFT fetch; on failure the entry stays open.
    pub fn submit_address(&mut self) -> bool {
        let input = self.address_input.clone();
        if self.connect_wallet(&input) {
            self.address_input.clear();
            self.input_mode = InputMode::Normal;
            true
        } else {
            false
        }
    }

    /// Connect directly with a known address (startup auto-connect).
    pub fn connect_wallet(&mut self, address: &str) -> bool {
        match self.wallet.connect(address) {
            Ok(()) => {
                self.log_debug(format!("wallet connected: {}", address.trim()));
                true
            }
            Err(msg) => {
                self.push_notice(Notice::Error(msg));
                false
            }
        }
    }

    pub fn disconnect_wallet(&mut self) {
        if self.wallet.connected() {
            self.wallet.disconnect();
            self.push_notice(Notice::Info("Wallet disconnected".into()));
        }
    }

    // ----- search -----
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_add_char(&mut self, ch: char, now: Instant) {
        self.search_input.push(ch);
        self.debouncer.input(&self.search_input, now);
    }

    pub fn search_backspace(&mut self, now: Instant) {
        self.search_input.pop();
        self.debouncer.input(&self.search_input, now);
    }

    /// Enter: apply the typed term immediately, skipping the quiet period.
    pub fn apply_search(&mut self) {
        let term = self
            .debouncer
            .flush()
            .unwrap_or_else(|| self.search_input.clone());
        self.filter.search = term;
        self.input_mode = InputMode::Normal;
        self.selected = 0;
    }

    /// Esc: drop both the typed buffer and the applied term.
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.filter.search.clear();
        self.debouncer.cancel();
        self.input_mode = InputMode::Normal;
        self.selected = 0;
    }

    // ----- filter controls -----
    /// Cycle the collection filter: all -> each collection in first-seen
    /// order -> back to all.
    pub fn cycle_collection(&mut self) {
        let collections = view::distinct_collections(self.nfts.records());
        if collections.is_empty() {
            return;
        }
        self.filter.collection = match &self.filter.collection {
            CollectionFilter::All => CollectionFilter::Named(collections[0].clone()),
            CollectionFilter::Named(current) => {
                match collections.iter().position(|c| c == current) {
                    Some(idx) if idx + 1 < collections.len() => {
                        CollectionFilter::Named(collections[idx + 1].clone())
                    }
                    _ => CollectionFilter::All,
                }
            }
        };
        self.selected = 0;
        self.log_debug(format!("collection filter: {}", self.filter.collection.label()));
    }

    pub fn toggle_sort(&mut self) {
        self.filter.sort = self.filter.sort.toggle();
        self.clamp_selection();
    }

    pub fn toggle_view_mode(&mut self) {
        self.filter.view_mode = self.filter.view_mode.toggle();
    }

    pub fn sort_key(&self) -> SortKey {
        self.filter.sort
    }

    pub fn view_mode(&self) -> ViewMode {
        self.filter.view_mode
    }

    // ----- selection -----
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.grid_columns = columns.max(1);
    }

    fn step(&self) -> usize {
        match self.filter.view_mode {
            ViewMode::Grid => self.grid_columns.max(1),
            ViewMode::List => 1,
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.step());
    }

    pub fn select_down(&mut self) {
        let len = self.view_model().filtered;
        if len == 0 {
            return;
        }
        self.selected = (self.selected + self.step()).min(len - 1);
    }

    pub fn select_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_right(&mut self) {
        let len = self.view_model().filtered;
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.view_model().filtered.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.view_model().filtered;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // ----- panes / misc -----
    pub fn next_pane(&mut self) {
        self.pane = self.pane.next();
    }

    /// Copy payload for the selected record: name plus id, with the
    /// metadata URI when the backend sent one.
    pub fn copy_payload(&self) -> Option<String> {
        self.selected_record().map(|record| match &record.uri {
            Some(uri) => format!("{} | {} | {uri}", record.display_name(), record.id),
            None => format!("{} | {}", record.display_name(), record.id),
        })
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    pub fn log_debug(&mut self, msg: String) {
        const MAX_LOG_ENTRIES: usize = 50;
        log::debug!("{msg}");
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.debug_log.push(format!("[{timestamp}] {msg}"));
        if self.debug_log.len() > MAX_LOG_ENTRIES {
            self.debug_log.remove(0);
        }
    }

    // ----- toasts -----
    pub fn push_notice(&mut self, notice: Notice) {
        self.log_debug(format!("notice: {}", notice.text()));
        self.toast = Some((notice, Instant::now()));
    }

    /// The active toast, if it has not expired yet.
    pub fn toast(&self) -> Option<&Notice> {
        const TOAST_DURATION: Duration = Duration::from_secs(3);
        self.toast.as_ref().and_then(|(notice, shown_at)| {
            if shown_at.elapsed() < TOAST_DURATION {
                Some(notice)
            } else {
                None
            }
        })
    }
}
