use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Pane};
use crate::model::NftRecord;
use crate::view::{ViewMode, ViewState};

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    // Dynamic chrome: the search bar and debug panel only take rows when
    // they have something to show.
    let search_expanded = app.pane() == Pane::Portfolio
        && (app.input_mode() == InputMode::Search
            || !app.search_input().is_empty()
            || !app.filter().search.is_empty());
    let show_debug = app.debug_visible() && !app.debug_log().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(1)); // header
    if search_expanded {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0)); // body
    if show_debug {
        constraints.push(Constraint::Length(5));
    }
    constraints.push(Constraint::Length(1)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app);
    idx += 1;
    if search_expanded {
        search_bar(f, chunks[idx], app);
        idx += 1;
    }
    body(f, chunks[idx], app);
    idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app);
        idx += 1;
    }
    footer(f, chunks[idx], app);

    // Overlays render last
    if app.input_mode() == InputMode::Address {
        draw_address_overlay(f, app);
    }
    if app.toast().is_some() {
        draw_toast_modal(f, app);
    }
}

// ===============================
// Header / Search bar
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let titles = [(Pane::Portfolio, "Portfolio"), (Pane::Balance, "Balance")];
    let mut spans = Vec::new();

    for (i, (pane, title)) in titles.iter().enumerate() {
        if i == 0 {
            spans.push(Span::raw("┌─"));
        } else {
            spans.push(Span::raw("┬─"));
        }
        if *pane == app.pane() {
            spans.push(Span::styled(
                *title,
                Style::default()
                    .fg(app.colors().focus_border)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(*title));
        }
        spans.push(Span::raw("─"));
    }
    spans.push(Span::raw("┐"));

    if let Some(address) = app.wallet().address() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("◉ {}", short_address(address)),
            Style::default().fg(app.colors().badge),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain),
    );
    f.render_widget(paragraph, area);
}

fn search_bar(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.input_mode() == InputMode::Search;
    let text = if focused || !app.search_input().is_empty() {
        app.search_input()
    } else {
        app.filter().search.as_str()
    };
    let hint = "(press / to search NFTs)";
    let shown = if text.is_empty() && !focused { hint } else { text };

    let border_color = if focused {
        app.colors().focus_border
    } else {
        app.colors().unfocused_border
    };

    let paragraph = Paragraph::new(shown)
        .style(Style::default().fg(if focused {
            app.colors().focus_border
        } else {
            app.colors().text
        }))
        .block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let x = area.x + 1 + (text.len().min((area.width.saturating_sub(2)) as usize) as u16);
        let y = area.y + 1;
        f.set_cursor_position((x, y));
    }
}

// ===============================
// Body
// ===============================
fn body(f: &mut Frame, area: Rect, app: &mut App) {
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 12;

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small!\n\nMinimum size: {}×{}\nCurrent size: {}×{}",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        ))
        .alignment(ratatui::layout::Alignment::Center)
        .style(
            Style::default()
                .fg(app.colors().toast_error)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(warning, area);
        return;
    }

    match app.pane() {
        Pane::Portfolio => render_portfolio(f, area, app),
        Pane::Balance => render_balance(f, area, app),
    }
}

fn render_portfolio(f: &mut Frame, area: Rect, app: &mut App) {
    match app.view_state() {
        ViewState::NotConnected => placeholder(
            f,
            area,
            app,
            "Connect your wallet to view your NFTs",
            "press w to enter a wallet address",
        ),
        ViewState::Loading => placeholder(
            f,
            area,
            app,
            "Loading your NFTs...",
            "This may take a few moments",
        ),
        ViewState::NoNfts => placeholder(
            f,
            area,
            app,
            "No NFTs found in this wallet",
            "press r to refresh",
        ),
        ViewState::NoResults => placeholder(
            f,
            area,
            app,
            "No NFTs match your search or filters",
            "press Esc to clear the search",
        ),
        ViewState::HasResults => render_results(f, area, app),
    }
}

fn placeholder(f: &mut Frame, area: Rect, app: &App, title: &str, hint: &str) {
    let lines = vec![
        Line::raw(""),
        Line::styled(
            title.to_string(),
            Style::default()
                .fg(app.colors().text)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(hint.to_string(), Style::default().fg(app.colors().text_dim)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.colors().unfocused_border)),
        );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(5),
            Constraint::Percentage(35),
        ])
        .split(area);
    f.render_widget(paragraph, rows[1]);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    const CELL_W: u16 = 30;
    const CELL_H: u16 = 5;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // counts + active controls
            Constraint::Min(0),    // items
            Constraint::Length(8), // details strip
        ])
        .split(area);

    // Column count feeds grid navigation in the app layer.
    let columns = ((rows[1].width / CELL_W).max(1)) as usize;
    app.set_grid_columns(columns);

    controls_line(f, rows[0], app);

    let vm = app.view_model();
    let selected = app.selected().min(vm.filtered.saturating_sub(1));

    match app.view_mode() {
        ViewMode::Grid => {
            render_grid(f, rows[1], app, &vm.items, selected, CELL_W, CELL_H);
        }
        ViewMode::List => {
            render_list(f, rows[1], app, &vm.items, selected);
        }
    }

    render_details(f, rows[2], app, vm.items.get(selected).copied());
}

fn controls_line(f: &mut Frame, area: Rect, app: &App) {
    let vm = app.view_model();
    let spans = vec![
        Span::styled(
            format!("{} of {} NFTs", vm.filtered, vm.total),
            Style::default().fg(app.colors().text),
        ),
        Span::raw(" │ sort: "),
        Span::styled(
            app.sort_key().to_string(),
            Style::default().fg(app.colors().badge),
        ),
        Span::raw(" │ collection: "),
        Span::styled(
            app.filter().collection.label().to_string(),
            Style::default().fg(app.colors().badge),
        ),
        Span::raw(" │ view: "),
        Span::styled(
            app.view_mode().to_string(),
            Style::default().fg(app.colors().badge),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_grid(
    f: &mut Frame,
    area: Rect,
    app: &App,
    items: &[&NftRecord],
    selected: usize,
    cell_w: u16,
    cell_h: u16,
) {
    let columns = ((area.width / cell_w).max(1)) as usize;
    let visible_rows = ((area.height / cell_h).max(1)) as usize;
    let per_page = columns * visible_rows;

    // Keep the selection on screen by paging, not scrolling.
    let page = selected / per_page;
    let start = page * per_page;

    for (offset, record) in items.iter().copied().skip(start).take(per_page).enumerate() {
        let index = start + offset;
        let row = offset / columns;
        let col = offset % columns;
        let cell = Rect {
            x: area.x + (col as u16) * cell_w,
            y: area.y + (row as u16) * cell_h,
            width: cell_w.min(area.width.saturating_sub((col as u16) * cell_w)),
            height: cell_h.min(area.height.saturating_sub((row as u16) * cell_h)),
        };
        render_card(f, cell, app, record, index == selected);
    }
}

fn render_card(f: &mut Frame, area: Rect, app: &App, record: &NftRecord, selected: bool) {
    let border = if selected {
        Style::default()
            .fg(app.colors().focus_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.colors().unfocused_border)
    };

    let mut lines = Vec::with_capacity(3);
    if let Some(collection) = record.collection.as_deref() {
        lines.push(Line::styled(
            truncate(collection, (area.width.saturating_sub(2)) as usize),
            Style::default().fg(app.colors().badge),
        ));
    }
    if let Some(symbol) = record.symbol.as_deref() {
        lines.push(Line::styled(
            symbol.to_string(),
            Style::default().fg(app.colors().text_dim),
        ));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .title(format!(
                " {} ",
                truncate(record.display_name(), (area.width.saturating_sub(4)) as usize)
            ))
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border),
    );
    f.render_widget(card, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App, items: &[&NftRecord], selected: usize) {
    let list_items: Vec<ListItem> = items
        .iter()
        .map(|record| {
            let mut spans = vec![Span::styled(
                format!("{:<32} ", truncate(record.display_name(), 32)),
                Style::default().fg(app.colors().text),
            )];
            if let Some(collection) = record.collection.as_deref() {
                spans.push(Span::styled(
                    format!("{:<20} ", truncate(collection, 20)),
                    Style::default().fg(app.colors().badge),
                ));
            }
            if let Some(symbol) = record.symbol.as_deref() {
                spans.push(Span::styled(
                    symbol.to_string(),
                    Style::default().fg(app.colors().text_dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(selected));
    }

    let list = List::new(list_items)
        .highlight_style(
            Style::default()
                .bg(app.colors().selection_bg)
                .fg(app.colors().selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.colors().unfocused_border)),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn render_details(f: &mut Frame, area: Rect, app: &App, record: Option<&NftRecord>) {
    let lines = match record {
        None => vec![Line::styled(
            "(nothing selected)",
            Style::default().fg(app.colors().text_dim),
        )],
        Some(record) => {
            let mut lines = Vec::with_capacity(6);

            let mut title = vec![Span::styled(
                record.display_name().to_string(),
                Style::default()
                    .fg(app.colors().text)
                    .add_modifier(Modifier::BOLD),
            )];
            if let Some(symbol) = record.symbol.as_deref() {
                title.push(Span::styled(
                    format!("  ({symbol})"),
                    Style::default().fg(app.colors().text_dim),
                ));
            }
            if let Some(collection) = record.collection.as_deref() {
                title.push(Span::raw("  "));
                title.push(Span::styled(
                    collection.to_string(),
                    Style::default().fg(app.colors().badge),
                ));
            }
            lines.push(Line::from(title));

            if let Some(description) = record.description.as_deref() {
                lines.push(Line::styled(
                    description.to_string(),
                    Style::default().fg(app.colors().text_dim),
                ));
            }

            if let Some(creator) = record.primary_creator() {
                let verified = if creator.verified { " ✓" } else { "" };
                lines.push(Line::from(vec![
                    Span::raw("Creator: "),
                    Span::styled(
                        format!("{}{verified}", short_address(&creator.address)),
                        Style::default().fg(app.colors().text),
                    ),
                    Span::styled(
                        format!("  share {}%", creator.share),
                        Style::default().fg(app.colors().text_dim),
                    ),
                ]));
            }

            if let Some(royalty) = &record.royalty {
                lines.push(Line::raw(format!("Royalty: {}%", royalty.percent())));
            }

            if !record.attributes.is_empty() {
                let attrs = record
                    .attributes
                    .iter()
                    .map(|a| format!("{}: {}", a.trait_type, a.value))
                    .collect::<Vec<_>>()
                    .join(" · ");
                lines.push(Line::styled(
                    attrs,
                    Style::default().fg(app.colors().text_dim),
                ));
            }

            if let Some(uri) = record.uri.as_deref() {
                lines.push(Line::styled(
                    uri.to_string(),
                    Style::default().fg(app.colors().text_dim),
                ));
            }

            lines
        }
    };

    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Details - press y to copy ")
            .borders(Borders::TOP | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.colors().unfocused_border)),
    );
    f.render_widget(details, area);
}

fn render_balance(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::raw("")];

    match app.wallet().address() {
        None => {
            lines.push(Line::styled(
                "No wallet connected",
                Style::default()
                    .fg(app.colors().text)
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                "press w to enter a wallet address",
                Style::default().fg(app.colors().text_dim),
            ));
        }
        Some(address) => {
            lines.push(Line::from(vec![
                Span::raw("Connected: "),
                Span::styled(address.to_string(), Style::default().fg(app.colors().badge)),
            ]));
            lines.push(Line::raw(""));
            if app.balance().loading() {
                lines.push(Line::styled(
                    "Fetching...",
                    Style::default().fg(app.colors().text_dim),
                ));
            } else if let Some(sol) = app.balance().balance_sol() {
                lines.push(Line::from(vec![
                    Span::raw("Balance: "),
                    Span::styled(
                        format!("{sol:.4} SOL"),
                        Style::default()
                            .fg(app.colors().focus_border)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
                if let Some(at) = app.balance().fetched_at() {
                    lines.push(Line::styled(
                        format!("as of {}", at.format("%H:%M:%S")),
                        Style::default().fg(app.colors().text_dim),
                    ));
                }
            } else {
                lines.push(Line::styled(
                    "press b to fetch the balance",
                    Style::default().fg(app.colors().text_dim),
                ));
            }
            if let Some(message) = app.balance().message() {
                lines.push(Line::raw(""));
                lines.push(Line::styled(
                    message.to_string(),
                    Style::default().fg(app.colors().toast_error),
                ));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .title(" Wallet Balance ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.colors().unfocused_border)),
        );
    f.render_widget(paragraph, area);
}

// ===============================
// Footer / Debug
// ===============================
fn footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(app.colors().focus_border));
    let mut spans: Vec<Span> = Vec::with_capacity(24);

    spans.push(key("Tab"));
    spans.push(Span::raw(" pane │ "));
    match app.pane() {
        Pane::Portfolio => {
            spans.push(key("/"));
            spans.push(Span::raw(" search │ "));
            spans.push(key("c"));
            spans.push(Span::raw(" collection │ "));
            spans.push(key("s"));
            spans.push(Span::raw(" sort │ "));
            spans.push(key("v"));
            spans.push(Span::raw(" view │ "));
            spans.push(key("r"));
            spans.push(Span::raw(" refresh │ "));
        }
        Pane::Balance => {
            spans.push(key("b"));
            spans.push(Span::raw(" refresh │ "));
        }
    }
    spans.push(key("w"));
    spans.push(Span::raw(" wallet │ "));
    spans.push(key("q"));
    spans.push(Span::raw(" quit"));

    if app.nfts_loading() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "[LOADING]",
            Style::default()
                .fg(app.colors().badge)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if app.debug_visible() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "[DEBUG]",
            Style::default().fg(app.colors().text_dim),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Plain),
    );
    f.render_widget(paragraph, area);
}

fn debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let log = app.debug_log();
    let lines_to_show = (area.height.saturating_sub(2)) as usize;
    let start = log.len().saturating_sub(lines_to_show);
    let lines: Vec<Line> = log[start..]
        .iter()
        .map(|msg| Line::from(Span::raw(msg.as_str())))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.colors().text_dim))
        .block(
            Block::default()
                .title(" Debug ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.colors().text_dim)),
        );
    f.render_widget(paragraph, area);
}

// ===============================
// Overlays
// ===============================
fn draw_address_overlay(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = ((area.width * 6) / 10).max(50).min(area.width);
    let height = 5;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let overlay = Rect {
        x,
        y,
        width,
        height,
    };

    f.render_widget(Clear, overlay);

    let input = app.address_input();
    let paragraph = Paragraph::new(vec![
        Line::raw(input.to_string()),
        Line::raw(""),
        Line::styled(
            "Enter connect · Esc cancel",
            Style::default().fg(app.colors().text_dim),
        ),
    ])
    .block(
        Block::default()
            .title(" Connect Wallet (base58 address) ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.colors().focus_border))
            .style(Style::default().bg(app.colors().background)),
    );
    f.render_widget(paragraph, overlay);

    if overlay.width > 2 {
        let x = overlay.x + 1 + (input.len().min((overlay.width.saturating_sub(2)) as usize) as u16);
        let y = overlay.y + 1;
        f.set_cursor_position((x, y));
    }
}

fn draw_toast_modal(f: &mut Frame, app: &App) {
    let Some(notice) = app.toast() else {
        return;
    };

    let (color, sigil) = if notice.is_error() {
        (app.colors().toast_error, "✗")
    } else {
        (app.colors().toast_success, "✓")
    };

    let area = f.area();
    let width = ((area.width * 5) / 10).max(30).min(area.width);
    let height = 3;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let overlay = Rect {
        x,
        y,
        width,
        height,
    };

    f.render_widget(Clear, overlay);

    let text = Paragraph::new(format!("{sigil} {}", notice.text()))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(text, overlay);
}

// ===============================
// Helpers
// ===============================
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        address.to_string()
    } else {
        format!("{}…{}", &address[..4], &address[address.len() - 4..])
    }
}
