pub mod components;
pub mod form;
pub mod records;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)].as_ref())
        .split(root[1]);

    render_header(f, root[0], app);
    components::render_sidebar(f, body[0], app);
    records::render_records(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    if app.form.is_open() {
        form::render_form(f, f.area(), app);
    } else {
        app.form_area = None;
    }
    if app.dialog.is_some() {
        components::render_dialog(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let p = &app.palette;
    let mut spans = vec![
        Span::styled("Users", Style::default().fg(p.title).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("{} results", app.list.result_count()),
            Style::default().fg(p.header_fg),
        ),
    ];
    if app.input_mode == InputMode::Search || !app.list.search_query().is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Search: {}", app.list.search_query()),
            Style::default().fg(p.highlight_fg),
        ));
    }
    if app.list.is_loading() {
        spans.push(Span::styled("  loading...", Style::default().fg(p.muted)));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title("userdesk")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        )
        .style(Style::default().fg(p.header_fg).bg(p.header_bg));
    f.render_widget(header, area);
}
