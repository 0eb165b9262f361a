use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Pane rectangles of the builder screen, shared by drawing and hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderPanes {
    pub palette: Rect,
    pub canvas: Rect,
    pub properties: Rect,
    pub footer: Rect,
}

pub fn split_builder(area: Rect) -> BuilderPanes {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(4)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Min(30),
            Constraint::Length(38),
        ])
        .split(rows[0]);
    BuilderPanes {
        palette: columns[0],
        canvas: columns[1],
        properties: columns[2],
        footer: rows[1],
    }
}

/// Filler screen: one main column plus the footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillerPanes {
    pub body: Rect,
    pub footer: Rect,
}

pub fn split_filler(area: Rect) -> FillerPanes {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(4)])
        .split(area);
    FillerPanes {
        body: rows[0],
        footer: rows[1],
    }
}

/// Shrink a rect by its one-cell border.
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}
