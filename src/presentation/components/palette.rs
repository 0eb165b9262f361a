use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::domain::registry::{self, FieldTypeInfo};

/// Rows of the palette list: group headers interleaved with entries.
///
/// The same row model backs rendering and mouse hit-testing, so the indices
/// here are authoritative.
#[derive(Debug, Clone, Copy)]
pub enum PaletteRow {
    GroupHeader(&'static str),
    Entry(&'static FieldTypeInfo),
}

pub fn palette_rows() -> Vec<PaletteRow> {
    let mut rows = Vec::new();
    let mut last_group = None;
    for entry in registry::catalog() {
        if last_group != Some(entry.group) {
            rows.push(PaletteRow::GroupHeader(entry.group.title()));
            last_group = Some(entry.group);
        }
        rows.push(PaletteRow::Entry(entry));
    }
    rows
}

/// Entry indices (into `palette_rows`) that are selectable.
pub fn entry_rows() -> Vec<usize> {
    palette_rows()
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| matches!(row, PaletteRow::Entry(_)).then_some(idx))
        .collect()
}

pub fn render_palette(
    frame: &mut Frame<'_>,
    area: Rect,
    selected_row: usize,
    focused: bool,
    scroll_offset: usize,
) {
    let rows = palette_rows();
    let items: Vec<ListItem<'_>> = rows
        .iter()
        .map(|row| match row {
            PaletteRow::GroupHeader(title) => ListItem::new(Line::from(Span::styled(
                format!("{title}"),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))),
            PaletteRow::Entry(info) => ListItem::new(Line::from(vec![
                Span::styled("  + ", Style::default().fg(Color::DarkGray)),
                Span::styled(info.label, Style::default().fg(Color::White)),
            ])),
        })
        .collect();

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title("Palette")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");

    let mut state = ListState::default();
    state.select(Some(selected_row.min(rows.len().saturating_sub(1))));
    *state.offset_mut() = scroll_offset;
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldType;

    #[test]
    fn rows_cover_every_catalog_entry() {
        let entries = palette_rows()
            .iter()
            .filter(|row| matches!(row, PaletteRow::Entry(_)))
            .count();
        assert_eq!(entries, FieldType::ALL.len());
    }

    #[test]
    fn entry_rows_skip_headers() {
        let rows = palette_rows();
        for idx in entry_rows() {
            assert!(matches!(rows[idx], PaletteRow::Entry(_)));
        }
    }
}
