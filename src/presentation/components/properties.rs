use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// One editable row of the properties pane, prepared by the builder app.
#[derive(Debug, Clone)]
pub struct PropRowView {
    pub name: String,
    pub value: String,
    pub hint: Option<&'static str>,
}

pub struct PropertiesContext<'a> {
    pub title: &'a str,
    pub rows: &'a [PropRowView],
    pub active: usize,
    pub focused: bool,
    /// Live edit buffer for the active row, when a text edit is in flight.
    pub buffer: Option<&'a str>,
}

pub fn render_properties(frame: &mut Frame<'_>, area: Rect, ctx: &PropertiesContext<'_>) {
    let border_style = if ctx.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .title(format!("Properties — {}", ctx.title))
        .borders(Borders::ALL)
        .border_style(border_style);

    if ctx.rows.is_empty() {
        let placeholder = Paragraph::new("Select a field on the canvas to edit it")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let mut cursor: Option<(u16, u16)> = None;
    let mut line_offset = 0usize;
    let items: Vec<ListItem<'_>> = ctx
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let is_active = idx == ctx.active;
            let name_style = if is_active && ctx.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let shown_value = if is_active {
                ctx.buffer.unwrap_or(row.value.as_str())
            } else {
                row.value.as_str()
            };
            let mut lines = vec![Line::from(vec![
                Span::styled(row.name.clone(), name_style),
                Span::raw(": "),
                Span::styled(shown_value.to_string(), Style::default().fg(Color::White)),
            ])];
            if is_active && ctx.focused && ctx.buffer.is_some() {
                let x = area.x
                    + 2
                    + UnicodeWidthStr::width(row.name.as_str()) as u16
                    + 2
                    + UnicodeWidthStr::width(shown_value) as u16;
                let y = area.y + 1 + line_offset as u16;
                cursor = Some((x, y));
            }
            if is_active
                && let Some(hint) = row.hint
            {
                for wrapped in wrap(hint, content_width.max(8)) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", wrapped.into_owned()),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            line_offset += lines.len();
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default();
    state.select(Some(ctx.active.min(ctx.rows.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);

    if let Some((x, y)) = cursor
        && y < area.y + area.height.saturating_sub(1)
    {
        frame.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
    }
}
