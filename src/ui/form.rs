use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::app::form::FormField;
use crate::ui::components::centered_rect;

const LABEL_W: usize = 7;

/// Render the record form as a centered modal and remember its area for
/// backdrop clicks.
pub fn render_form(f: &mut Frame, area: Rect, app: &mut AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let rect = centered_rect(width, 14, area);
    app.form_area = Some(rect);

    let p = &app.palette;
    let form = &app.form;
    let saving = app.saving;
    let input_style = if saving {
        Style::default().fg(p.muted)
    } else {
        Style::default().fg(p.text)
    };

    let mut lines = vec![
        Line::from(Span::styled(form.subtitle(), Style::default().fg(p.muted))),
        Line::raw(""),
    ];
    let mut cursor: Option<Position> = None;
    for field in FormField::ALL {
        let focused = field == form.focus();
        let label_style = if focused {
            Style::default().fg(p.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.title)
        };
        let value = form.draft().get(field);
        lines.push(Line::from(vec![
            Span::styled(format!("{:<w$}", field.label(), w = LABEL_W), label_style),
            Span::raw(" "),
            Span::styled(value.to_string(), input_style),
        ]));
        if focused && !saving {
            // inner x + label + space + text width
            let x = rect.x + 1 + LABEL_W as u16 + 1 + value.chars().count() as u16;
            let y = rect.y + 1 + lines.len() as u16 - 1;
            cursor = Some(Position::new(x.min(rect.x + rect.width.saturating_sub(2)), y));
        }
        match form.errors().get(&field) {
            Some(msg) => lines.push(Line::from(Span::styled(
                format!("{:w$} {msg}", "", w = LABEL_W),
                Style::default().fg(p.error),
            ))),
            None => lines.push(Line::raw("")),
        }
    }
    lines.push(Line::from(Span::styled(form.footer_hint(), Style::default().fg(p.muted))));
    let cancel_style = if saving {
        Style::default().fg(p.muted)
    } else {
        Style::default().fg(p.text)
    };
    lines.push(Line::from(vec![
        Span::styled("[Esc] Cancel", cancel_style),
        Span::raw("   "),
        Span::styled(
            format!("[Enter] {}", form.submit_label(saving)),
            Style::default().fg(p.success).add_modifier(Modifier::BOLD),
        ),
    ]));

    let panel = Paragraph::new(lines)
        .style(Style::default().bg(p.header_bg))
        .block(
            Block::default()
                .title(form.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(panel, rect);
    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}
