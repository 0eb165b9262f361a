use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::domain::{
    ConditionOperator, FieldConfig, FieldId, FieldType, Form, LayoutWidth, TextAlignment,
};
use crate::engine::{
    DragController, DragPayload, DropOutcome, EditorSession, insertion_index,
};
use crate::presentation::{
    BuilderPanes, CARD_HEIGHT, CanvasContext, FooterContext, PaletteRow, PropRowView,
    PropertiesContext, adjust_scroll_offset, card_bounds, entry_rows, palette_rows, render_canvas,
    render_footer, render_palette, render_properties, split_builder,
};

use super::{options::UiOptions, status::StatusLine, terminal::TerminalGuard};

const HELP_TEXT: &str = "Tab panes • Enter insert/apply • drag with mouse • Ctrl+↑/↓ move • \
                         Del remove • Ctrl+D duplicate • Ctrl+Z/Y undo/redo • Ctrl+S save • Ctrl+Q quit";

/// Entry point for the terminal form builder.
///
/// Runs the canvas/palette/properties UI over an editing session and returns
/// the edited form when the user saves.
#[derive(Debug)]
pub struct FormBuilder {
    form: Form,
    options: UiOptions,
}

impl FormBuilder {
    pub fn new(form: Form) -> Self {
        Self {
            form,
            options: UiOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<Form> {
        let mut terminal = TerminalGuard::new()?;
        let mut app = BuilderApp::new(self.form, self.options);
        while !app.should_quit {
            terminal.draw(|frame| app.draw(frame))?;
            if !event::poll(app.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        if app.saved {
            Ok(app.editor.into_form())
        } else {
            Err(anyhow!("user exited without saving"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaneFocus {
    Palette,
    Canvas,
    Properties,
}

/// Editable rows of the properties pane. Which rows exist depends on the
/// selected field's type; with no selection the form-level settings show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropRow {
    FormName,
    NotifyEnabled,
    NotifyRecipients,
    ThankYouCustom,
    ThankYouMessage,
    RedirectUrl,
    StyleBackground,
    StyleAccent,
    StyleTextColor,
    StyleFont,
    Label,
    Placeholder,
    HelpText,
    Required,
    Width,
    Options,
    NumericMin,
    NumericMax,
    NumericStep,
    MaxRating,
    FileTypes,
    FileMultiple,
    CurrencySymbol,
    CurrencyCode,
    ContentText,
    HeadingLevel,
    Alignment,
    ImageSrc,
    ImageAlt,
    HtmlMarkup,
    StepTitle,
    CondEnabled,
    CondField,
    CondOperator,
    CondValue,
}

impl PropRow {
    fn is_text(&self) -> bool {
        matches!(
            self,
            PropRow::FormName
                | PropRow::NotifyRecipients
                | PropRow::ThankYouMessage
                | PropRow::RedirectUrl
                | PropRow::StyleBackground
                | PropRow::StyleAccent
                | PropRow::StyleTextColor
                | PropRow::StyleFont
                | PropRow::Label
                | PropRow::Placeholder
                | PropRow::HelpText
                | PropRow::Options
                | PropRow::NumericMin
                | PropRow::NumericMax
                | PropRow::NumericStep
                | PropRow::MaxRating
                | PropRow::FileTypes
                | PropRow::CurrencySymbol
                | PropRow::CurrencyCode
                | PropRow::ContentText
                | PropRow::ImageSrc
                | PropRow::ImageAlt
                | PropRow::HtmlMarkup
                | PropRow::StepTitle
                | PropRow::CondValue
        )
    }
}

struct BuilderApp {
    editor: EditorSession,
    options: UiOptions,
    status: StatusLine,
    focus: PaneFocus,
    palette_row: usize,
    palette_scroll: usize,
    canvas_scroll: usize,
    prop_index: usize,
    prop_buffer: Option<String>,
    drag: DragController,
    pending_drag: Option<DragPayload>,
    panes: BuilderPanes,
    exit_armed: bool,
    should_quit: bool,
    saved: bool,
}

impl BuilderApp {
    fn new(form: Form, options: UiOptions) -> Self {
        let palette_row = entry_rows().first().copied().unwrap_or(0);
        Self {
            editor: EditorSession::open(form),
            options,
            status: StatusLine::new(),
            focus: PaneFocus::Palette,
            palette_row,
            palette_scroll: 0,
            canvas_scroll: 0,
            prop_index: 0,
            prop_buffer: None,
            drag: DragController::new(),
            pending_drag: None,
            panes: BuilderPanes::default(),
            exit_armed: false,
            should_quit: false,
            saved: false,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let panes = split_builder(frame.area());
        self.panes = panes;

        if let Some(selected) = self.selected_index() {
            adjust_scroll_offset(panes.canvas, selected, &mut self.canvas_scroll);
        }

        render_palette(
            frame,
            panes.palette,
            self.palette_row,
            self.focus == PaneFocus::Palette,
            self.palette_scroll,
        );

        let drop_slot = self.drag.over_index();
        render_canvas(
            frame,
            panes.canvas,
            &CanvasContext {
                form_name: &self.editor.form().name,
                fields: self.editor.fields(),
                selected: self.selected_index(),
                focused: self.focus == PaneFocus::Canvas,
                drop_slot,
                scroll_offset: self.canvas_scroll,
            },
        );

        let rows = self.prop_rows();
        let views: Vec<PropRowView> = rows.iter().map(|row| self.row_view(*row)).collect();
        let title = self
            .editor
            .selected_field()
            .map(|field| field.label.clone())
            .unwrap_or_else(|| "Form settings".to_string());
        render_properties(
            frame,
            panes.properties,
            &PropertiesContext {
                title: &title,
                rows: &views,
                active: self.prop_index.min(rows.len().saturating_sub(1)),
                focused: self.focus == PaneFocus::Properties,
                buffer: self.prop_buffer.as_deref(),
            },
        );

        let help = self.options.show_help.then_some(HELP_TEXT);
        render_footer(
            frame,
            panes.footer,
            &FooterContext {
                help,
                status: self.status.message(),
                dirty: self.editor.can_undo(),
                issue_count: 0,
            },
        );
    }

    fn selected_index(&self) -> Option<usize> {
        self.editor
            .selected()
            .and_then(|id| self.editor.form().field_index(id))
    }

    // ---- keyboard ----------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.apply_prop_buffer();
                    self.saved = true;
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                    return;
                }
                KeyCode::Char('z') | KeyCode::Char('Z') => {
                    self.exit_armed = false;
                    if self.editor.undo() {
                        self.reset_props();
                        self.status.undo_applied();
                    } else {
                        self.status.nothing_to_undo();
                    }
                    return;
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.exit_armed = false;
                    if self.editor.redo() {
                        self.reset_props();
                        self.status.redo_applied();
                    } else {
                        self.status.set_raw("Nothing to redo");
                    }
                    return;
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.duplicate_selected();
                    return;
                }
                KeyCode::Up => {
                    self.move_selected(-1);
                    return;
                }
                KeyCode::Down => {
                    self.move_selected(1);
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.apply_prop_buffer();
                self.focus = match self.focus {
                    PaneFocus::Palette => PaneFocus::Canvas,
                    PaneFocus::Canvas => PaneFocus::Properties,
                    PaneFocus::Properties => PaneFocus::Palette,
                };
                self.exit_armed = false;
            }
            KeyCode::BackTab => {
                self.apply_prop_buffer();
                self.focus = match self.focus {
                    PaneFocus::Palette => PaneFocus::Properties,
                    PaneFocus::Canvas => PaneFocus::Palette,
                    PaneFocus::Properties => PaneFocus::Canvas,
                };
                self.exit_armed = false;
            }
            KeyCode::Esc => {
                if self.drag.is_dragging() {
                    self.drag.cancel();
                    self.pending_drag = None;
                    self.status.drop_cancelled();
                } else {
                    self.exit_armed = false;
                    self.status.ready();
                }
            }
            KeyCode::Delete => self.remove_selected(),
            _ => match self.focus {
                PaneFocus::Palette => self.handle_palette_key(key),
                PaneFocus::Canvas => self.handle_canvas_key(key),
                PaneFocus::Properties => self.handle_props_key(key),
            },
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent) {
        let entries = entry_rows();
        let current = entries
            .iter()
            .position(|row| *row == self.palette_row)
            .unwrap_or(0);
        match key.code {
            KeyCode::Up => {
                let next = current.saturating_sub(1);
                self.palette_row = entries[next];
                self.scroll_palette();
            }
            KeyCode::Down => {
                let next = (current + 1).min(entries.len() - 1);
                self.palette_row = entries[next];
                self.scroll_palette();
            }
            KeyCode::Enter => {
                if let Some(field_type) = self.palette_type_at(self.palette_row) {
                    let target = self
                        .selected_index()
                        .map(|idx| idx + 1)
                        .unwrap_or(self.editor.fields().len());
                    self.insert_field(field_type, target);
                }
            }
            _ => {}
        }
    }

    fn handle_canvas_key(&mut self, key: KeyEvent) {
        let count = self.editor.fields().len();
        if count == 0 {
            return;
        }
        match key.code {
            KeyCode::Up => {
                let next = self.selected_index().map_or(0, |idx| idx.saturating_sub(1));
                self.select_index(Some(next));
            }
            KeyCode::Down => {
                let next = self
                    .selected_index()
                    .map_or(0, |idx| (idx + 1).min(count - 1));
                self.select_index(Some(next));
            }
            KeyCode::Enter => {
                if self.editor.selected().is_some() {
                    self.focus = PaneFocus::Properties;
                    self.reset_props();
                }
            }
            KeyCode::Backspace => self.remove_selected(),
            _ => {}
        }
    }

    fn handle_props_key(&mut self, key: KeyEvent) {
        let rows = self.prop_rows();
        if rows.is_empty() {
            return;
        }
        let active = rows[self.prop_index.min(rows.len() - 1)];
        match key.code {
            KeyCode::Up => {
                self.apply_prop_buffer();
                self.prop_index = self.prop_index.saturating_sub(1);
            }
            KeyCode::Down => {
                self.apply_prop_buffer();
                self.prop_index = (self.prop_index + 1).min(rows.len() - 1);
            }
            KeyCode::Enter => self.apply_prop_buffer(),
            KeyCode::Char(' ') if !active.is_text() => self.toggle_row(active),
            KeyCode::Left if !active.is_text() => self.cycle_row(active, -1),
            KeyCode::Right if !active.is_text() => self.cycle_row(active, 1),
            KeyCode::Char(c) if active.is_text() => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                let mut buffer = self
                    .prop_buffer
                    .take()
                    .unwrap_or_else(|| self.row_value(active));
                buffer.push(c);
                self.prop_buffer = Some(buffer);
            }
            KeyCode::Backspace if active.is_text() => {
                let mut buffer = self
                    .prop_buffer
                    .take()
                    .unwrap_or_else(|| self.row_value(active));
                buffer.pop();
                self.prop_buffer = Some(buffer);
            }
            _ => {}
        }
    }

    // ---- mouse / drag ------------------------------------------------------

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.on_mouse_down(mouse.column, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) => self.on_mouse_drag(mouse.row),
            MouseEventKind::Up(MouseButton::Left) => self.on_mouse_up(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn on_mouse_down(&mut self, column: u16, row: u16) {
        self.exit_armed = false;
        if contains(self.panes.palette, column, row) {
            self.apply_prop_buffer();
            self.focus = PaneFocus::Palette;
            let clicked = (row.saturating_sub(self.panes.palette.y + 1)) as usize
                + self.palette_scroll;
            if let Some(field_type) = self.palette_type_at(clicked) {
                self.palette_row = clicked;
                self.pending_drag = Some(DragPayload::NewField { field_type });
            }
        } else if contains(self.panes.canvas, column, row) {
            self.apply_prop_buffer();
            self.focus = PaneFocus::Canvas;
            let card = (row.saturating_sub(self.panes.canvas.y + 1) / CARD_HEIGHT) as usize
                + self.canvas_scroll;
            if card < self.editor.fields().len() {
                let field_id = self.editor.fields()[card].id;
                self.select_index(Some(card));
                self.pending_drag = Some(DragPayload::Reorder { field_id });
            }
        } else if contains(self.panes.properties, column, row) {
            self.apply_prop_buffer();
            self.focus = PaneFocus::Properties;
        }
    }

    fn on_mouse_drag(&mut self, row: u16) {
        if let Some(payload) = self.pending_drag.take() {
            let label = self.drag_label(&payload);
            self.drag.begin(payload);
            self.status.dragging(&label);
        }
        if self.drag.is_dragging() {
            let bounds = card_bounds(
                self.panes.canvas,
                self.editor.fields().len(),
                self.canvas_scroll,
            );
            self.drag.update_pointer(row as f32, &bounds);
        }
    }

    fn on_mouse_up(&mut self, column: u16, row: u16) {
        self.pending_drag = None;
        if !self.drag.is_dragging() {
            return;
        }
        if !contains(self.panes.canvas, column, row) {
            // Released outside any valid target: restore pre-drag state.
            self.drag.cancel();
            self.status.drop_cancelled();
            return;
        }
        let bounds = card_bounds(
            self.panes.canvas,
            self.editor.fields().len(),
            self.canvas_scroll,
        );
        let target = insertion_index(row as f32, &bounds);
        let Some((payload, _)) = self.drag.complete() else {
            return;
        };
        match self.editor.apply_drop(payload, target) {
            Ok(DropOutcome::Inserted(id)) => {
                let label = self
                    .editor
                    .form()
                    .field(id)
                    .map(|field| field.label.clone())
                    .unwrap_or_default();
                self.reset_props();
                self.status.field_added(&label);
            }
            Ok(DropOutcome::Moved { .. }) => {
                let label = self
                    .editor
                    .selected_field()
                    .map(|field| field.label.clone())
                    .unwrap_or_default();
                self.status.field_moved(&label);
            }
            Ok(DropOutcome::NoOp) => self.status.ready(),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    // ---- mutations ---------------------------------------------------------

    fn insert_field(&mut self, field_type: FieldType, target: usize) {
        match self.editor.add_field(field_type, target) {
            Ok(id) => {
                let label = self
                    .editor
                    .form()
                    .field(id)
                    .map(|field| field.label.clone())
                    .unwrap_or_default();
                self.reset_props();
                self.status.field_added(&label);
            }
            Err(err) => self.status.set_raw(err.to_string()),
        }
        self.exit_armed = false;
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.editor.selected() else {
            self.status.set_raw("Select a field to remove");
            return;
        };
        let label = self
            .editor
            .form()
            .field(id)
            .map(|field| field.label.clone())
            .unwrap_or_default();
        if self.editor.remove_field(id).is_ok() {
            self.reset_props();
            self.status.field_removed(&label);
        }
        self.exit_armed = false;
    }

    fn duplicate_selected(&mut self) {
        let Some(id) = self.editor.selected() else {
            self.status.set_raw("Select a field to duplicate");
            return;
        };
        match self.editor.duplicate_field(id) {
            Ok(new_id) => {
                let label = self
                    .editor
                    .form()
                    .field(new_id)
                    .map(|field| field.label.clone())
                    .unwrap_or_default();
                self.reset_props();
                self.status.field_added(&label);
            }
            Err(err) => self.status.set_raw(err.to_string()),
        }
        self.exit_armed = false;
    }

    fn move_selected(&mut self, delta: i32) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let Some(id) = self.editor.selected() else {
            return;
        };
        let target = if delta < 0 {
            idx.saturating_sub(1)
        } else {
            idx + 2
        };
        match self.editor.reorder(id, target) {
            Ok(DropOutcome::Moved { .. }) => {
                let label = self
                    .editor
                    .selected_field()
                    .map(|field| field.label.clone())
                    .unwrap_or_default();
                self.status.field_moved(&label);
            }
            Ok(_) => {}
            Err(err) => self.status.set_raw(err.to_string()),
        }
        self.exit_armed = false;
    }

    fn select_index(&mut self, index: Option<usize>) {
        let id = index.and_then(|idx| self.editor.fields().get(idx).map(|field| field.id));
        self.editor.select(id);
        self.reset_props();
    }

    fn on_exit(&mut self) {
        let dirty = self.editor.can_undo();
        if self.options.confirm_exit && dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
        self.saved = false;
    }

    fn scroll_palette(&mut self) {
        let window = self.panes.palette.height.saturating_sub(2) as usize;
        if window == 0 {
            return;
        }
        if self.palette_row < self.palette_scroll {
            self.palette_scroll = self.palette_row;
        } else if self.palette_row >= self.palette_scroll + window {
            self.palette_scroll = self.palette_row + 1 - window;
        }
    }

    fn palette_type_at(&self, row_index: usize) -> Option<FieldType> {
        match palette_rows().get(row_index) {
            Some(PaletteRow::Entry(info)) => Some(info.field_type),
            _ => None,
        }
    }

    fn drag_label(&self, payload: &DragPayload) -> String {
        match payload {
            DragPayload::NewField { field_type } => {
                crate::domain::registry::default_label(*field_type).to_string()
            }
            DragPayload::Reorder { field_id } => self
                .editor
                .form()
                .field(*field_id)
                .map(|field| field.label.clone())
                .unwrap_or_default(),
        }
    }

    // ---- properties pane ---------------------------------------------------

    fn reset_props(&mut self) {
        self.prop_index = 0;
        self.prop_buffer = None;
    }

    fn prop_rows(&self) -> Vec<PropRow> {
        let Some(field) = self.editor.selected_field() else {
            return vec![
                PropRow::FormName,
                PropRow::NotifyEnabled,
                PropRow::NotifyRecipients,
                PropRow::ThankYouCustom,
                PropRow::ThankYouMessage,
                PropRow::RedirectUrl,
                PropRow::StyleBackground,
                PropRow::StyleAccent,
                PropRow::StyleTextColor,
                PropRow::StyleFont,
            ];
        };
        let mut rows = Vec::new();
        if field.field_type.is_input() {
            rows.push(PropRow::Label);
            rows.push(PropRow::Placeholder);
            rows.push(PropRow::HelpText);
            rows.push(PropRow::Required);
            rows.push(PropRow::Width);
        }
        match &field.config {
            FieldConfig::Choice { .. } => rows.push(PropRow::Options),
            FieldConfig::Numeric { .. } => {
                rows.push(PropRow::NumericMin);
                rows.push(PropRow::NumericMax);
                rows.push(PropRow::NumericStep);
            }
            FieldConfig::Currency { .. } => {
                rows.push(PropRow::CurrencySymbol);
                rows.push(PropRow::CurrencyCode);
                rows.push(PropRow::NumericMin);
                rows.push(PropRow::NumericMax);
            }
            FieldConfig::Rating { .. } => rows.push(PropRow::MaxRating),
            FieldConfig::Heading { .. } => {
                rows.push(PropRow::ContentText);
                rows.push(PropRow::HeadingLevel);
                rows.push(PropRow::Alignment);
            }
            FieldConfig::Paragraph { .. } => {
                rows.push(PropRow::ContentText);
                rows.push(PropRow::Alignment);
            }
            FieldConfig::Image { .. } => {
                rows.push(PropRow::ImageSrc);
                rows.push(PropRow::ImageAlt);
            }
            FieldConfig::Html { .. } => rows.push(PropRow::HtmlMarkup),
            FieldConfig::PageBreak { .. } => rows.push(PropRow::StepTitle),
            FieldConfig::File { .. } => {
                rows.push(PropRow::FileTypes);
                rows.push(PropRow::FileMultiple);
            }
            FieldConfig::Divider | FieldConfig::Plain => {}
        }
        if field.field_type.is_input() {
            rows.push(PropRow::CondEnabled);
            if field.show_condition.enabled {
                rows.push(PropRow::CondField);
                rows.push(PropRow::CondOperator);
                rows.push(PropRow::CondValue);
            }
        }
        rows
    }

    fn row_name(&self, row: PropRow) -> &'static str {
        match row {
            PropRow::FormName => "Form name",
            PropRow::NotifyEnabled => "Email notifications",
            PropRow::NotifyRecipients => "Recipients",
            PropRow::ThankYouCustom => "Custom thank-you",
            PropRow::ThankYouMessage => "Thank-you message",
            PropRow::RedirectUrl => "Redirect URL",
            PropRow::StyleBackground => "Background color",
            PropRow::StyleAccent => "Accent color",
            PropRow::StyleTextColor => "Text color",
            PropRow::StyleFont => "Font family",
            PropRow::Label => "Label",
            PropRow::Placeholder => "Placeholder",
            PropRow::HelpText => "Help text",
            PropRow::Required => "Required",
            PropRow::Width => "Width",
            PropRow::Options => "Options",
            PropRow::NumericMin => "Min",
            PropRow::NumericMax => "Max",
            PropRow::NumericStep => "Step",
            PropRow::MaxRating => "Max rating",
            PropRow::FileTypes => "Accepted types",
            PropRow::FileMultiple => "Allow multiple",
            PropRow::CurrencySymbol => "Currency symbol",
            PropRow::CurrencyCode => "Currency code",
            PropRow::ContentText => "Text",
            PropRow::HeadingLevel => "Heading level",
            PropRow::Alignment => "Alignment",
            PropRow::ImageSrc => "Image URL",
            PropRow::ImageAlt => "Alt text",
            PropRow::HtmlMarkup => "Markup",
            PropRow::StepTitle => "Step title",
            PropRow::CondEnabled => "Conditional visibility",
            PropRow::CondField => "Show when field",
            PropRow::CondOperator => "Operator",
            PropRow::CondValue => "Value",
        }
    }

    fn row_value(&self, row: PropRow) -> String {
        let form = self.editor.form();
        let field = self.editor.selected_field();
        match row {
            PropRow::FormName => form.name.clone(),
            PropRow::NotifyEnabled => toggle_text(form.notifications.enabled),
            PropRow::NotifyRecipients => form.notifications.recipients.join(", "),
            PropRow::ThankYouCustom => toggle_text(form.thank_you.use_custom),
            PropRow::ThankYouMessage => form.thank_you.message.clone(),
            PropRow::RedirectUrl => form.thank_you.redirect_url.clone(),
            PropRow::StyleBackground => form.style.background_color.clone(),
            PropRow::StyleAccent => form.style.accent_color.clone(),
            PropRow::StyleTextColor => form.style.text_color.clone(),
            PropRow::StyleFont => form.style.font_family.clone(),
            _ => {
                let Some(field) = field else {
                    return String::new();
                };
                match (row, &field.config) {
                    (PropRow::Label, _) => field.label.clone(),
                    (PropRow::Placeholder, _) => field.placeholder.clone(),
                    (PropRow::HelpText, _) => field.help_text.clone(),
                    (PropRow::Required, _) => toggle_text(field.required),
                    (PropRow::Width, _) => format!("{:?}", field.layout.width).to_lowercase(),
                    (PropRow::Options, FieldConfig::Choice { options }) => options.join(", "),
                    (PropRow::NumericMin, FieldConfig::Numeric { min, .. })
                    | (PropRow::NumericMin, FieldConfig::Currency { min, .. }) => {
                        min.map(|v| v.to_string()).unwrap_or_default()
                    }
                    (PropRow::NumericMax, FieldConfig::Numeric { max, .. })
                    | (PropRow::NumericMax, FieldConfig::Currency { max, .. }) => {
                        max.map(|v| v.to_string()).unwrap_or_default()
                    }
                    (PropRow::NumericStep, FieldConfig::Numeric { step, .. }) => step.to_string(),
                    (PropRow::MaxRating, FieldConfig::Rating { max_rating }) => {
                        max_rating.to_string()
                    }
                    (PropRow::FileTypes, FieldConfig::File { accepted_types, .. }) => {
                        accepted_types.join(", ")
                    }
                    (PropRow::FileMultiple, FieldConfig::File { allow_multiple, .. }) => {
                        toggle_text(*allow_multiple)
                    }
                    (PropRow::CurrencySymbol, FieldConfig::Currency { symbol, .. }) => {
                        symbol.clone()
                    }
                    (PropRow::CurrencyCode, FieldConfig::Currency { code, .. }) => code.clone(),
                    (PropRow::ContentText, FieldConfig::Heading { text, .. })
                    | (PropRow::ContentText, FieldConfig::Paragraph { text, .. }) => text.clone(),
                    (PropRow::HeadingLevel, FieldConfig::Heading { level, .. }) => {
                        format!("h{level}")
                    }
                    (PropRow::Alignment, FieldConfig::Heading { alignment, .. })
                    | (PropRow::Alignment, FieldConfig::Paragraph { alignment, .. }) => {
                        format!("{alignment:?}").to_lowercase()
                    }
                    (PropRow::ImageSrc, FieldConfig::Image { src, .. }) => src.clone(),
                    (PropRow::ImageAlt, FieldConfig::Image { alt, .. }) => alt.clone(),
                    (PropRow::HtmlMarkup, FieldConfig::Html { markup }) => markup.clone(),
                    (PropRow::StepTitle, FieldConfig::PageBreak { step_title }) => {
                        step_title.clone()
                    }
                    (PropRow::CondEnabled, _) => toggle_text(field.show_condition.enabled),
                    (PropRow::CondField, _) => field
                        .show_condition
                        .field_id
                        .and_then(|id| form.field(id))
                        .map(|target| target.label.clone())
                        .unwrap_or_else(|| "<none>".to_string()),
                    (PropRow::CondOperator, _) => {
                        operator_text(field.show_condition.operator).to_string()
                    }
                    (PropRow::CondValue, _) => field.show_condition.value.clone(),
                    _ => String::new(),
                }
            }
        }
    }

    fn row_view(&self, row: PropRow) -> PropRowView {
        let hint = match row {
            PropRow::Options => Some("Comma separated; at least one option"),
            PropRow::NotifyRecipients => Some("Comma separated email addresses"),
            PropRow::CondField => Some("←/→ to pick another field"),
            PropRow::CondOperator | PropRow::Width | PropRow::Alignment | PropRow::HeadingLevel => {
                Some("←/→ to cycle")
            }
            PropRow::Required | PropRow::CondEnabled | PropRow::NotifyEnabled
            | PropRow::ThankYouCustom | PropRow::FileMultiple => Some("Space to toggle"),
            _ => None,
        };
        PropRowView {
            name: self.row_name(row).to_string(),
            value: self.row_value(row),
            hint,
        }
    }

    /// Push the in-flight text buffer into the model, committing to history.
    fn apply_prop_buffer(&mut self) {
        let Some(buffer) = self.prop_buffer.take() else {
            return;
        };
        let rows = self.prop_rows();
        if rows.is_empty() {
            return;
        }
        let row = rows[self.prop_index.min(rows.len() - 1)];
        let result = self.apply_text_row(row, &buffer);
        if let Err(message) = result {
            self.status.set_raw(message);
        }
    }

    fn apply_text_row(&mut self, row: PropRow, buffer: &str) -> Result<(), String> {
        match row {
            PropRow::FormName => {
                self.editor.rename_form(buffer.trim());
                return Ok(());
            }
            PropRow::NotifyRecipients => {
                let mut settings = self.editor.form().notifications.clone();
                settings.recipients = split_list(buffer);
                self.editor.set_notifications(settings);
                return Ok(());
            }
            PropRow::ThankYouMessage => {
                let mut settings = self.editor.form().thank_you.clone();
                settings.message = buffer.to_string();
                self.editor.set_thank_you(settings);
                return Ok(());
            }
            PropRow::RedirectUrl => {
                let mut settings = self.editor.form().thank_you.clone();
                settings.redirect_url = buffer.trim().to_string();
                self.editor.set_thank_you(settings);
                return Ok(());
            }
            PropRow::StyleBackground | PropRow::StyleAccent | PropRow::StyleTextColor
            | PropRow::StyleFont => {
                let mut style = self.editor.form().style.clone();
                let value = buffer.trim().to_string();
                match row {
                    PropRow::StyleBackground => style.background_color = value,
                    PropRow::StyleAccent => style.accent_color = value,
                    PropRow::StyleTextColor => style.text_color = value,
                    _ => style.font_family = value,
                }
                self.editor.set_style(style);
                return Ok(());
            }
            _ => {}
        }

        let Some(id) = self.editor.selected() else {
            return Ok(());
        };
        let buffer = buffer.to_string();
        self.editor
            .update_field(id, move |field| match row {
                PropRow::Label => field.label = buffer.trim().to_string(),
                PropRow::Placeholder => field.placeholder = buffer.clone(),
                PropRow::HelpText => field.help_text = buffer.clone(),
                PropRow::Options => {
                    if let FieldConfig::Choice { options } = &mut field.config {
                        *options = split_list(&buffer);
                    }
                }
                PropRow::NumericMin | PropRow::NumericMax => {
                    let parsed = buffer.trim().parse::<f64>().ok();
                    match &mut field.config {
                        FieldConfig::Numeric { min, max, .. }
                        | FieldConfig::Currency { min, max, .. } => {
                            if row == PropRow::NumericMin {
                                *min = parsed;
                            } else {
                                *max = parsed;
                            }
                        }
                        _ => {}
                    }
                }
                PropRow::NumericStep => {
                    if let FieldConfig::Numeric { step, .. } = &mut field.config
                        && let Ok(parsed) = buffer.trim().parse::<f64>()
                        && parsed > 0.0
                    {
                        *step = parsed;
                    }
                }
                PropRow::MaxRating => {
                    if let FieldConfig::Rating { max_rating } = &mut field.config
                        && let Ok(parsed) = buffer.trim().parse::<u8>()
                    {
                        *max_rating = parsed;
                    }
                }
                PropRow::FileTypes => {
                    if let FieldConfig::File { accepted_types, .. } = &mut field.config {
                        *accepted_types = split_list(&buffer);
                    }
                }
                PropRow::CurrencySymbol => {
                    if let FieldConfig::Currency { symbol, .. } = &mut field.config {
                        *symbol = buffer.trim().to_string();
                    }
                }
                PropRow::CurrencyCode => {
                    if let FieldConfig::Currency { code, .. } = &mut field.config {
                        *code = buffer.trim().to_uppercase();
                    }
                }
                PropRow::ContentText => match &mut field.config {
                    FieldConfig::Heading { text, .. } | FieldConfig::Paragraph { text, .. } => {
                        *text = buffer.clone();
                    }
                    _ => {}
                },
                PropRow::ImageSrc => {
                    if let FieldConfig::Image { src, .. } = &mut field.config {
                        *src = buffer.trim().to_string();
                    }
                }
                PropRow::ImageAlt => {
                    if let FieldConfig::Image { alt, .. } = &mut field.config {
                        *alt = buffer.clone();
                    }
                }
                PropRow::HtmlMarkup => {
                    if let FieldConfig::Html { markup } = &mut field.config {
                        *markup = buffer.clone();
                    }
                }
                PropRow::StepTitle => {
                    if let FieldConfig::PageBreak { step_title } = &mut field.config {
                        *step_title = buffer.trim().to_string();
                    }
                }
                PropRow::CondValue => field.show_condition.value = buffer.clone(),
                _ => {}
            })
            .map_err(|err| err.to_string())
    }

    fn toggle_row(&mut self, row: PropRow) {
        match row {
            PropRow::NotifyEnabled => {
                let mut settings = self.editor.form().notifications.clone();
                settings.enabled = !settings.enabled;
                self.editor.set_notifications(settings);
            }
            PropRow::ThankYouCustom => {
                let mut settings = self.editor.form().thank_you.clone();
                settings.use_custom = !settings.use_custom;
                self.editor.set_thank_you(settings);
            }
            PropRow::Required => {
                if let Some(id) = self.editor.selected() {
                    let _ = self
                        .editor
                        .update_field(id, |field| field.required = !field.required);
                }
            }
            PropRow::CondEnabled => {
                if let Some(id) = self.editor.selected() {
                    let _ = self.editor.update_field(id, |field| {
                        field.show_condition.enabled = !field.show_condition.enabled;
                    });
                }
            }
            PropRow::FileMultiple => {
                if let Some(id) = self.editor.selected() {
                    let _ = self.editor.update_field(id, |field| {
                        if let FieldConfig::File { allow_multiple, .. } = &mut field.config {
                            *allow_multiple = !*allow_multiple;
                        }
                    });
                }
            }
            _ => {}
        }
    }

    fn cycle_row(&mut self, row: PropRow, delta: i32) {
        let Some(id) = self.editor.selected() else {
            return;
        };
        match row {
            PropRow::Width => {
                let _ = self.editor.update_field(id, move |field| {
                    field.layout.width = cycle_width(field.layout.width, delta);
                });
            }
            PropRow::Alignment => {
                let _ = self.editor.update_field(id, move |field| {
                    let next = |alignment| cycle_alignment(alignment, delta);
                    match &mut field.config {
                        FieldConfig::Heading { alignment, .. }
                        | FieldConfig::Paragraph { alignment, .. } => *alignment = next(*alignment),
                        _ => {}
                    }
                });
            }
            PropRow::HeadingLevel => {
                let _ = self.editor.update_field(id, move |field| {
                    if let FieldConfig::Heading { level, .. } = &mut field.config {
                        let next = (*level as i32 + delta).clamp(1, 6);
                        *level = next as u8;
                    }
                });
            }
            PropRow::CondOperator => {
                let _ = self.editor.update_field(id, move |field| {
                    field.show_condition.operator =
                        cycle_operator(field.show_condition.operator, delta);
                });
            }
            PropRow::CondField => {
                // Cycle through the other answer-bearing fields, plus "none".
                let candidates: Vec<FieldId> = self
                    .editor
                    .condition_candidates(id)
                    .iter()
                    .map(|field| field.id)
                    .collect();
                let _ = self.editor.update_field(id, move |field| {
                    let current = field
                        .show_condition
                        .field_id
                        .and_then(|target| candidates.iter().position(|id| *id == target));
                    let slot_count = candidates.len() as i32 + 1;
                    let current_slot = current.map(|idx| idx as i32 + 1).unwrap_or(0);
                    let next_slot = (current_slot + delta).rem_euclid(slot_count);
                    field.show_condition.field_id = if next_slot == 0 {
                        None
                    } else {
                        candidates.get(next_slot as usize - 1).copied()
                    };
                });
            }
            _ => {}
        }
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

fn toggle_text(value: bool) -> String {
    if value { "on".to_string() } else { "off".to_string() }
}

fn operator_text(operator: ConditionOperator) -> &'static str {
    match operator {
        ConditionOperator::Equals => "equals",
        ConditionOperator::NotEquals => "not equals",
        ConditionOperator::Contains => "contains",
        ConditionOperator::IsEmpty => "is empty",
        ConditionOperator::IsNotEmpty => "is not empty",
    }
}

fn cycle_operator(operator: ConditionOperator, delta: i32) -> ConditionOperator {
    const ORDER: [ConditionOperator; 5] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::Contains,
        ConditionOperator::IsEmpty,
        ConditionOperator::IsNotEmpty,
    ];
    cycle(&ORDER, operator, delta)
}

fn cycle_width(width: LayoutWidth, delta: i32) -> LayoutWidth {
    const ORDER: [LayoutWidth; 4] = [
        LayoutWidth::Full,
        LayoutWidth::Half,
        LayoutWidth::Third,
        LayoutWidth::Quarter,
    ];
    cycle(&ORDER, width, delta)
}

fn cycle_alignment(alignment: TextAlignment, delta: i32) -> TextAlignment {
    const ORDER: [TextAlignment; 3] = [
        TextAlignment::Left,
        TextAlignment::Center,
        TextAlignment::Right,
    ];
    cycle(&ORDER, alignment, delta)
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, delta: i32) -> T {
    let len = order.len() as i32;
    let idx = order.iter().position(|item| *item == current).unwrap_or(0) as i32;
    order[((idx + delta).rem_euclid(len)) as usize]
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
