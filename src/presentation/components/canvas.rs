use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::domain::Field;
use crate::engine::{CardBounds, condition};

use super::layout::inner;

/// Rows one card occupies on the canvas.
pub const CARD_HEIGHT: u16 = 3;

/// Vertical bounds of every card, in screen rows, for the drag engine.
///
/// Bounds are computed for the full list (including cards scrolled out of
/// view) so insertion indices stay stable while dragging near the edges.
pub fn card_bounds(canvas: Rect, field_count: usize, scroll_offset: usize) -> Vec<CardBounds> {
    let content = inner(canvas);
    let origin = content.y as f32 - (scroll_offset as u16 * CARD_HEIGHT) as f32;
    (0..field_count)
        .map(|idx| CardBounds::new(origin + (idx as u16 * CARD_HEIGHT) as f32, CARD_HEIGHT as f32))
        .collect()
}

/// Keep the selected card inside the visible window.
pub fn adjust_scroll_offset(canvas: Rect, selected: usize, scroll_offset: &mut usize) {
    let window = (inner(canvas).height / CARD_HEIGHT) as usize;
    if window == 0 {
        *scroll_offset = 0;
        return;
    }
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + window {
        *scroll_offset = selected + 1 - window;
    }
}

pub struct CanvasContext<'a> {
    pub form_name: &'a str,
    pub fields: &'a [Field],
    pub selected: Option<usize>,
    pub focused: bool,
    /// Insertion slot highlighted during a drag session.
    pub drop_slot: Option<usize>,
    pub scroll_offset: usize,
}

pub fn render_canvas(frame: &mut Frame<'_>, area: Rect, ctx: &CanvasContext<'_>) {
    let border_style = if ctx.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .title(format!("Canvas — {}", ctx.form_name))
        .borders(Borders::ALL)
        .border_style(border_style);

    if ctx.fields.is_empty() {
        let placeholder = Paragraph::new("Drop a field from the palette to get started")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem<'_>> = ctx
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| ListItem::new(card_lines(field, idx, ctx)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(ctx.selected);
    *state.offset_mut() = ctx.scroll_offset;
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_lines(field: &Field, idx: usize, ctx: &CanvasContext<'_>) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(CARD_HEIGHT as usize);

    let marker = if ctx.drop_slot == Some(idx) {
        Span::styled("▼ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("≡ ", Style::default().fg(Color::DarkGray))
    };
    let label_style = if ctx.selected == Some(idx) {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    if field.field_type.is_page_break() {
        lines.push(Line::from(vec![
            marker,
            Span::styled(
                "── page break ──",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
        ]));
    } else {
        lines.push(Line::from(vec![
            marker,
            Span::styled(field.display_label(), label_style),
        ]));
    }

    let mut meta = vec![Span::styled(
        format!("  {}", field.field_type),
        Style::default().fg(Color::DarkGray),
    )];
    if field.show_condition.enabled {
        meta.push(Span::styled(
            " • conditional",
            Style::default().fg(Color::Blue),
        ));
    }
    if let Some(options) = field.config.options() {
        meta.push(Span::styled(
            format!(" • {} options", options.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(meta));
    lines.push(Line::from(condition_line(field, ctx)));
    lines
}

fn condition_line(field: &Field, ctx: &CanvasContext<'_>) -> Span<'static> {
    if !field.show_condition.enabled {
        return Span::raw(" ");
    }
    Span::styled(
        format!("  {}", condition::describe(&field.show_condition, ctx.fields)),
        Style::default().fg(Color::Blue),
    )
}
