use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::AppState;
use crate::model::Record;

/// Render the current page of records, skeleton rows while loading, or the
/// load error in place of the list.
pub fn render_records(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.palette;
    let title = format!("Page {}/{}", app.list.page(), app.list.total_pages());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border));

    if app.list.is_loading() {
        let items: Vec<ListItem> = (0..app.list.page_size())
            .map(|i| skeleton_item(app, i))
            .collect();
        f.render_widget(List::new(items).block(block), area);
        return;
    }

    if let Some(err) = app.list.error() {
        let msg = Paragraph::new(vec![
            Line::from(Span::styled(err.to_string(), Style::default().fg(p.error))),
            Line::raw(""),
            Line::from(Span::styled("Press r to retry.", Style::default().fg(p.muted))),
        ])
        .wrap(Wrap { trim: false })
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let paged = app.list.paged();
    if paged.is_empty() {
        let msg = Paragraph::new("No users found.")
            .style(Style::default().fg(p.muted))
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = paged.iter().map(|r| record_item(app, r)).collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(p.highlight_fg)
            .bg(p.highlight_bg)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default().with_selected(Some(app.list.selected()));
    f.render_stateful_widget(list, area, &mut state);
}

fn record_item<'a>(app: &AppState, r: &'a Record) -> ListItem<'a> {
    let p = &app.palette;
    let expanded = r.id.is_some() && app.list.expanded_id() == r.id;
    let marker = if expanded { "-" } else { "+" };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", r.initial()),
            Style::default().fg(p.header_bg).bg(p.title).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(r.name.as_str(), Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(r.email.as_str(), Style::default().fg(p.muted)),
        Span::styled(format!("  [{marker}]"), Style::default().fg(p.border)),
    ])];
    if expanded {
        lines.push(Line::from(Span::styled(
            "     Details:",
            Style::default().fg(p.title),
        )));
        lines.push(Line::from(Span::styled(
            format!("     Email: {}", r.email),
            Style::default().fg(p.text),
        )));
        lines.push(Line::from(Span::styled(
            format!("     Phone: {}", r.phone),
            Style::default().fg(p.text),
        )));
    }
    ListItem::new(lines)
}

fn skeleton_item(app: &AppState, i: usize) -> ListItem<'static> {
    // Vary bar widths a little so the placeholder doesn't look like a table.
    let name_w = 14 + (i * 7) % 9;
    let meta_w = 20 + (i * 5) % 11;
    let style = Style::default().fg(app.palette.skeleton).bg(app.palette.skeleton);
    ListItem::new(Line::from(vec![
        Span::styled("   ", style),
        Span::raw(" "),
        Span::styled(" ".repeat(name_w), style),
        Span::raw("  "),
        Span::styled(" ".repeat(meta_w), style),
    ]))
}
