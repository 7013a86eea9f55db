//! Shared UI components (sidebar, status bar, dialogs).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Dialog, InputMode, NoticeKind};

/// Render the left sidebar: brand, search box, theme and key hints.
pub fn render_sidebar(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let searching = app.input_mode == InputMode::Search;
    let query = app.list.search_query();
    let search_line = if query.is_empty() && !searching {
        Span::styled("Search users...", Style::default().fg(p.muted))
    } else {
        let cursor = if searching { "_" } else { "" };
        Span::styled(format!("{query}{cursor}"), Style::default().fg(p.text))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "User management",
            Style::default().fg(p.title).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![Span::styled("/ ", Style::default().fg(p.highlight_fg)), search_line]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Theme: ", Style::default().fg(p.muted)),
            Span::styled(app.theme.as_str(), Style::default().fg(p.text)),
        ]),
        Line::raw(""),
    ];

    for (label, action) in [
        ("New", KeyAction::NewRecord),
        ("Edit", KeyAction::EditSelection),
        ("Delete", KeyAction::DeleteSelection),
        ("Details", KeyAction::ToggleExpand),
        ("Refresh", KeyAction::Refresh),
        ("Theme", KeyAction::ToggleTheme),
        ("Search", KeyAction::StartSearch),
        ("Quit", KeyAction::Quit),
    ] {
        let keys = app.keymap.keys_for(action).join(", ");
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<8}"), Style::default().fg(p.text)),
            Span::styled(keys, Style::default().fg(p.muted).add_modifier(Modifier::ITALIC)),
        ]));
    }

    let sidebar = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border)),
    );
    f.render_widget(sidebar, area);
}

/// Render the bottom status bar with mode, page and backend.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form if app.saving => "SAVING",
        InputMode::Form => "FORM",
    };
    let msg = format!(
        "mode: {mode}  page {}/{}  rows/page:{}  api: {}",
        app.list.page(),
        app.list.total_pages(),
        app.list.page_size(),
        app.api_url,
    );
    let bar = Paragraph::new(msg).style(
        Style::default()
            .fg(app.palette.status_fg)
            .bg(app.palette.status_bg),
    );
    f.render_widget(bar, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the active confirmation or notice dialog.
pub fn render_dialog(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    match &app.dialog {
        Some(Dialog::ConfirmDelete {
            target,
            yes_selected,
        }) => {
            let rect = centered_rect(46, 8, area);
            let choice = |label: &'static str, selected: bool| {
                if selected {
                    Span::styled(
                        format!("▶ {label}"),
                        Style::default().fg(p.highlight_fg).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(format!("  {label}"), Style::default().fg(p.text))
                }
            };
            let lines = vec![
                Line::from(Span::styled(
                    "This action cannot be undone",
                    Style::default().fg(p.muted),
                )),
                Line::raw(""),
                Line::from(vec![
                    choice("Yes, delete", *yes_selected),
                    Span::raw("    "),
                    choice("Cancel", !*yes_selected),
                ]),
                Line::raw(""),
                Line::from(Span::styled("y / n, or ←/→ and Enter", Style::default().fg(p.muted))),
            ];
            let dialog = Paragraph::new(lines)
                .style(Style::default().bg(p.header_bg))
                .block(
                    Block::default()
                        .title(Dialog::delete_prompt(target))
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(p.error)),
                );
            f.render_widget(Clear, rect);
            f.render_widget(dialog, rect);
        }
        Some(Dialog::Notice {
            kind,
            title,
            message,
            expires_at,
        }) => {
            let accent = match kind {
                NoticeKind::Success => p.success,
                NoticeKind::Error => p.error,
            };
            let min_w = 40u16.min(area.width.saturating_sub(6).max(30));
            let approx_lines = (message.len() as u16 / min_w.saturating_sub(4).max(10)).max(1);
            let height = (approx_lines + 4).min(area.height.saturating_sub(6).max(5)).max(5);
            let rect = centered_rect(min_w, height, area);
            let mut lines = Vec::new();
            if !message.is_empty() {
                lines.push(Line::from(Span::styled(message.clone(), Style::default().fg(p.text))));
            }
            if expires_at.is_none() {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled("Enter: OK", Style::default().fg(p.muted))));
            }
            let dialog = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .style(Style::default().bg(p.header_bg))
                .block(
                    Block::default()
                        .title(Span::styled(
                            title.clone(),
                            Style::default().fg(accent).add_modifier(Modifier::BOLD),
                        ))
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(accent)),
                );
            f.render_widget(Clear, rect);
            f.render_widget(dialog, rect);
        }
        None => {}
    }
}
