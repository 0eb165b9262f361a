use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use textwrap::wrap;

/// One renderable unit of the current step, prepared by the filler app.
#[derive(Debug, Clone)]
pub struct FillFieldView {
    pub label: String,
    /// Rendered control state: a text buffer, option markers, stars, ...
    pub control: String,
    pub help: String,
    pub error: Option<String>,
    /// Content blocks render dimmed and are skipped by focus movement.
    pub is_content: bool,
}

pub struct FillContext<'a> {
    pub form_name: &'a str,
    pub step_title: String,
    pub step_index: usize,
    pub step_count: usize,
    pub completed: Vec<bool>,
    pub fields: &'a [FillFieldView],
    pub active: usize,
}

pub fn render_fill(frame: &mut Frame<'_>, area: Rect, ctx: &FillContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    render_step_header(frame, rows[0], ctx);
    render_step_fields(frame, rows[1], ctx);
}

fn render_step_header(frame: &mut Frame<'_>, area: Rect, ctx: &FillContext<'_>) {
    let mut spans = vec![Span::styled(
        format!("{} ", ctx.form_name),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if ctx.step_count > 1 {
        for idx in 0..ctx.step_count {
            let style = if idx == ctx.step_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if ctx.completed.get(idx).copied().unwrap_or(false) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" ●{}", idx + 1), style));
        }
        spans.push(Span::styled(
            format!("  {}", ctx.step_title),
            Style::default().fg(Color::Cyan),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_step_fields(frame: &mut Frame<'_>, area: Rect, ctx: &FillContext<'_>) {
    if ctx.fields.is_empty() {
        let placeholder = Paragraph::new("This step has no visible fields. Press Ctrl+N to continue.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem<'_>> = ctx
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| ListItem::new(field_lines(field, idx == ctx.active, content_width)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    let mut state = ListState::default();
    state.select(Some(ctx.active.min(ctx.fields.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn field_lines(field: &FillFieldView, is_active: bool, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if field.is_content {
        for wrapped in wrap(&field.label, width.max(8)) {
            lines.push(Line::from(Span::styled(
                wrapped.into_owned(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(" "));
        return lines;
    }

    let label_style = if is_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(field.label.clone(), label_style)));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(field.control.clone(), Style::default().fg(Color::White)),
    ]));
    if let Some(error) = &field.error {
        for wrapped in wrap(error, width.max(8)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped.into_owned()),
                Style::default().fg(Color::Red),
            )));
        }
    } else if is_active && !field.help.is_empty() {
        for wrapped in wrap(&field.help, width.max(8)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped.into_owned()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(" "));
    lines
}
