use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use solport::api::{HttpPortfolio, PortfolioService};
use solport::app::{App, AppEvent, InputMode, Pane};
use solport::store::Notice;
use solport::{clipboard, config, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();
    init_logging()?;

    let cfg = config::load().context("Failed to load configuration")?;
    let service: Arc<dyn PortfolioService> = Arc::new(HttpPortfolio::new(
        cfg.api_url.clone(),
        cfg.request_timeout,
        cfg.balance_retries,
        cfg.retry_delay,
    ));

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(cfg.render_fps, cfg.theme, cfg.search_debounce);

    // Wallet transitioning into connected triggers the first fetch.
    if let Some(address) = cfg.wallet.clone() {
        if app.connect_wallet(&address) {
            spawn_nft_fetch(&mut app, &service, &tx);
        }
    }

    let result = run_loop(&mut app, &mut terminal, rx, &tx, &service).await;

    // cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

/// The TUI owns the terminal, so log lines go to a file instead of stderr.
fn init_logging() -> Result<()> {
    let path = std::env::var("SOLPORT_LOG_FILE").unwrap_or_else(|_| "solport.log".into());
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {path}"))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    tx: &UnboundedSender<AppEvent>,
    service: &Arc<dyn PortfolioService>,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or fetch-task events
        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k, service, tx);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        // apply a settled (debounced) search term
        app.tick(Instant::now());

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn spawn_nft_fetch(
    app: &mut App,
    service: &Arc<dyn PortfolioService>,
    tx: &UnboundedSender<AppEvent>,
) {
    if let Some((seq, address)) = app.begin_nft_fetch() {
        let service = Arc::clone(service);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = service.nfts_by_owner(&address).await;
            let _ = tx.send(AppEvent::NftsFetched { seq, outcome });
        });
    }
}

fn spawn_balance_fetch(
    app: &mut App,
    service: &Arc<dyn PortfolioService>,
    tx: &UnboundedSender<AppEvent>,
) {
    if let Some(address) = app.begin_balance_fetch() {
        let service = Arc::clone(service);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = service.balance(&address).await;
            let _ = tx.send(AppEvent::BalanceFetched(outcome));
        });
    }
}

fn handle_key(
    app: &mut App,
    k: KeyEvent,
    service: &Arc<dyn PortfolioService>,
    tx: &UnboundedSender<AppEvent>,
) {
    // Search entry mode
    if app.input_mode() == InputMode::Search {
        match k.code {
            KeyCode::Char(c) => app.search_add_char(c, Instant::now()),
            KeyCode::Backspace => app.search_backspace(Instant::now()),
            KeyCode::Enter => app.apply_search(),
            KeyCode::Esc => app.clear_search(),
            _ => {}
        }
        return;
    }

    // Wallet address entry mode
    if app.input_mode() == InputMode::Address {
        match k.code {
            KeyCode::Char(c) => app.address_add_char(c),
            KeyCode::Backspace => app.address_backspace(),
            KeyCode::Enter => {
                if app.submit_address() {
                    spawn_nft_fetch(app, service, tx);
                }
            }
            KeyCode::Esc => app.cancel_address_entry(),
            _ => {}
        }
        return;
    }

    // Normal mode
    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }

        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => app.next_pane(),

        (KeyCode::Char('w'), _) => app.open_address_entry(),
        (KeyCode::Char('x'), _) => app.disconnect_wallet(),

        (KeyCode::Char('r'), _) => spawn_nft_fetch(app, service, tx),
        (KeyCode::Char('b'), _) => spawn_balance_fetch(app, service, tx),

        (KeyCode::Char('/'), _) | (KeyCode::Char('f'), _) => {
            if app.pane() == Pane::Portfolio {
                app.start_search();
            }
        }
        (KeyCode::Esc, _) => app.clear_search(),

        (KeyCode::Char('c'), _) => app.cycle_collection(),
        (KeyCode::Char('s'), _) => app.toggle_sort(),
        (KeyCode::Char('v'), _) => app.toggle_view_mode(),

        (KeyCode::Char('d'), KeyModifiers::CONTROL) => app.toggle_debug_panel(),

        (KeyCode::Char('y'), _) => {
            if let Some(payload) = app.copy_payload() {
                if clipboard::copy_to_clipboard(&payload) {
                    app.push_notice(Notice::Info("Copied NFT details".into()));
                } else {
                    app.push_notice(Notice::Error("Copy failed".into()));
                }
            }
        }

        // Selection within the portfolio
        (KeyCode::Up, _) => app.select_up(),
        (KeyCode::Down, _) => app.select_down(),
        (KeyCode::Left, _) => app.select_left(),
        (KeyCode::Right, _) => app.select_right(),
        (KeyCode::Home, _) => app.select_first(),
        (KeyCode::End, _) => app.select_last(),

        _ => {}
    }
}
