use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

pub struct FooterContext<'a> {
    pub help: Option<&'a str>,
    pub status: &'a str,
    pub dirty: bool,
    pub issue_count: usize,
}

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &FooterContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let actions = ctx.help.unwrap_or(" ");
    let actions_widget = Paragraph::new(format!("Actions: {actions}"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(actions_widget, rows[0]);

    let mut status = ctx.status.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if ctx.issue_count > 0 {
        status.push_str(&format!(" • issues: {}", ctx.issue_count));
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let badge = if ctx.issue_count > 0 {
        Span::styled(
            format!("[! {}]", ctx.issue_count),
            Style::default().fg(Color::Red).bg(Color::Black),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };

    let status_widget = Paragraph::new(Line::from(vec![
        Span::raw("Status: "),
        Span::raw(status),
        Span::raw(" "),
        badge,
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(status_widget, rows[1]);
}
