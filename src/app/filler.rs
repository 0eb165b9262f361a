use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::{Field, FieldConfig, FieldType, Form, Submission};
use crate::engine::{FillFlow, StepOutcome};
use crate::presentation::{
    FillContext, FillFieldView, FooterContext, render_fill, render_footer, split_filler,
};

use super::{options::UiOptions, status::StatusLine, terminal::TerminalGuard};

const HELP_TEXT: &str =
    "Tab/↑↓ fields • type to answer • ←/→ choose • Ctrl+N next • Ctrl+P back • Ctrl+S submit • Ctrl+Q quit";

/// Entry point for filling a published form in the terminal.
///
/// Walks the form step by step and returns the submission once the final
/// validation gate passes.
#[derive(Debug)]
pub struct FormFiller {
    form: Form,
    options: UiOptions,
}

impl FormFiller {
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

    pub fn run(self) -> Result<Submission> {
        let mut terminal = TerminalGuard::new()?;
        let flow = FillFlow::start(self.form).with_policy(self.options.hidden_answers);
        let mut app = FillerApp::new(flow, self.options);
        while !app.should_quit {
            terminal.draw(|frame| app.draw(frame))?;
            if !event::poll(app.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_, _) => {}
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        app.result.ok_or_else(|| anyhow!("form was not submitted"))
    }
}

struct FillerApp {
    flow: FillFlow,
    options: UiOptions,
    status: StatusLine,
    field_index: usize,
    option_cursor: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Submission>,
}

impl FillerApp {
    fn new(flow: FillFlow, options: UiOptions) -> Self {
        Self {
            flow,
            options,
            status: StatusLine::new(),
            field_index: 0,
            option_cursor: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let panes = split_filler(frame.area());
        let visible = self.flow.visible_fields();
        self.field_index = self.field_index.min(visible.len().saturating_sub(1));

        let views: Vec<FillFieldView> = visible
            .iter()
            .enumerate()
            .map(|(idx, field)| self.field_view(field, idx == self.field_index))
            .collect();

        let steps = self.flow.steps();
        let step_title = steps
            .get(self.flow.current_step())
            .map(|step| step.display_title())
            .unwrap_or_default();
        let completed = (0..self.flow.step_count())
            .map(|idx| self.flow.step_completed(idx))
            .collect();

        render_fill(
            frame,
            panes.body,
            &FillContext {
                form_name: &self.flow.form().name,
                step_title,
                step_index: self.flow.current_step(),
                step_count: self.flow.step_count(),
                completed,
                fields: &views,
                active: self.field_index,
            },
        );

        let help = self.options.show_help.then_some(HELP_TEXT);
        render_footer(
            frame,
            panes.footer,
            &FooterContext {
                help,
                status: self.status.message(),
                dirty: !self.flow.answers().is_empty() && !self.flow.is_submitted(),
                issue_count: self.flow.issues().len(),
            },
        );
    }

    fn field_view(&self, field: &Field, is_active: bool) -> FillFieldView {
        if !field.field_type.is_input() {
            let label = match &field.config {
                FieldConfig::Heading { text, .. } => text.clone(),
                FieldConfig::Paragraph { text, .. } => text.clone(),
                FieldConfig::Divider => "────────────".to_string(),
                FieldConfig::Image { alt, .. } => format!("[image: {alt}]"),
                FieldConfig::Html { .. } => "[html block]".to_string(),
                _ => String::new(),
            };
            return FillFieldView {
                label,
                control: String::new(),
                help: String::new(),
                error: None,
                is_content: true,
            };
        }

        let answer = self.flow.answer(field.id).to_string();
        let control = match &field.config {
            FieldConfig::Choice { options } => {
                self.choice_control(field, options, &answer, is_active)
            }
            FieldConfig::Rating { max_rating } => {
                let current: u8 = answer.parse().unwrap_or(0);
                let stars: String = (1..=*max_rating)
                    .map(|star| if star <= current { '★' } else { '☆' })
                    .collect();
                format!("{stars} ({current}/{max_rating})")
            }
            FieldConfig::Numeric { min, max, .. }
                if matches!(field.field_type, FieldType::Slider | FieldType::Range) =>
            {
                format!(
                    "{} ◄─●─► {}  [{}]",
                    min.unwrap_or(0.0),
                    max.unwrap_or(100.0),
                    if answer.is_empty() { "—" } else { answer.as_str() }
                )
            }
            _ => {
                if answer.is_empty() && !field.placeholder.is_empty() {
                    format!("({})", field.placeholder)
                } else {
                    answer.clone()
                }
            }
        };

        FillFieldView {
            label: field.display_label(),
            control,
            help: field.help_text.clone(),
            error: self.flow.issue_for(field.id).map(str::to_string),
            is_content: false,
        }
    }

    fn choice_control(
        &self,
        field: &Field,
        options: &[String],
        answer: &str,
        is_active: bool,
    ) -> String {
        let multi = field.field_type == FieldType::Checkbox;
        let chosen: Vec<&str> = answer.split(", ").filter(|s| !s.is_empty()).collect();
        options
            .iter()
            .enumerate()
            .map(|(idx, option)| {
                let selected = chosen.contains(&option.as_str());
                let mark = match (multi, selected) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(•)",
                    (false, false) => "( )",
                };
                if multi && is_active && idx == self.option_cursor {
                    format!("{mark}‹{option}›")
                } else {
                    format!("{mark} {option}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('s')
                | KeyCode::Char('S') => {
                    self.exit_armed = false;
                    self.advance();
                    return;
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.exit_armed = false;
                    self.flow.back();
                    self.field_index = 0;
                    self.announce_step();
                    return;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::PageDown => self.advance(),
            KeyCode::PageUp => {
                self.flow.back();
                self.field_index = 0;
                self.announce_step();
            }
            KeyCode::Tab | KeyCode::Down => self.focus_move(1),
            KeyCode::BackTab | KeyCode::Up => self.focus_move(-1),
            KeyCode::Esc => {
                self.exit_armed = false;
                self.status.ready();
            }
            _ => self.edit_active(key),
        }
    }

    fn advance(&mut self) {
        match self.flow.next() {
            StepOutcome::Advanced => {
                self.field_index = 0;
                self.option_cursor = 0;
                self.announce_step();
            }
            StepOutcome::Stayed(issues) => {
                if issues > 0 {
                    self.status.issues_remaining(issues);
                }
            }
            StepOutcome::Submitted(submission) => {
                self.status.set_raw("Submitted. Thank you!");
                self.result = Some(submission);
                self.should_quit = true;
            }
        }
    }

    fn announce_step(&mut self) {
        let steps = self.flow.steps();
        let title = steps
            .get(self.flow.current_step())
            .map(|step| step.display_title())
            .unwrap_or_default();
        self.status
            .step_changed(self.flow.current_step() + 1, self.flow.step_count(), &title);
    }

    fn focus_move(&mut self, delta: i32) {
        let visible = self.flow.visible_fields();
        if visible.is_empty() {
            return;
        }
        let mut idx = self.field_index as i32;
        let len = visible.len() as i32;
        for _ in 0..len {
            idx = (idx + delta).rem_euclid(len);
            if visible[idx as usize].field_type.is_input() {
                break;
            }
        }
        self.field_index = idx as usize;
        self.option_cursor = 0;
        self.exit_armed = false;
    }

    fn edit_active(&mut self, key: KeyEvent) {
        let field = {
            let visible = self.flow.visible_fields();
            match visible.get(self.field_index) {
                Some(field) if field.field_type.is_input() => (*field).clone(),
                _ => return,
            }
        };
        let current = self.flow.answer(field.id).to_string();

        match &field.config {
            FieldConfig::Choice { options } => {
                self.edit_choice(&field, options.clone(), &current, key)
            }
            FieldConfig::Rating { max_rating } => {
                let max = *max_rating;
                let current: u8 = current.parse().unwrap_or(0);
                let next = match key.code {
                    KeyCode::Left => current.saturating_sub(1),
                    KeyCode::Right => (current + 1).min(max),
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        (c as u8 - b'0').clamp(0, max)
                    }
                    _ => return,
                };
                if next == 0 {
                    self.flow.set_answer(field.id, "");
                } else {
                    self.flow.set_answer(field.id, next.to_string());
                }
            }
            FieldConfig::Numeric { min, max, step, .. }
                if matches!(field.field_type, FieldType::Slider | FieldType::Range) =>
            {
                let low = min.unwrap_or(0.0);
                let high = max.unwrap_or(100.0);
                let current: f64 = current.parse().unwrap_or(low);
                let next = match key.code {
                    KeyCode::Left => (current - step).max(low),
                    KeyCode::Right => (current + step).min(high),
                    _ => return,
                };
                self.flow.set_answer(field.id, trim_float(next));
            }
            _ => match key.code {
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        return;
                    }
                    let mut buffer = current;
                    buffer.push(c);
                    self.flow.set_answer(field.id, buffer);
                    self.exit_armed = false;
                }
                KeyCode::Backspace => {
                    let mut buffer = current;
                    buffer.pop();
                    self.flow.set_answer(field.id, buffer);
                }
                KeyCode::Delete => self.flow.set_answer(field.id, ""),
                _ => {}
            },
        }
    }

    fn edit_choice(&mut self, field: &Field, options: Vec<String>, current: &str, key: KeyEvent) {
        if options.is_empty() {
            return;
        }
        if field.field_type == FieldType::Checkbox {
            match key.code {
                KeyCode::Left => {
                    self.option_cursor = self.option_cursor.saturating_sub(1);
                }
                KeyCode::Right => {
                    self.option_cursor = (self.option_cursor + 1).min(options.len() - 1);
                }
                KeyCode::Char(' ') => {
                    let mut chosen: Vec<String> = current
                        .split(", ")
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect();
                    let option = options[self.option_cursor].clone();
                    if let Some(pos) = chosen.iter().position(|item| *item == option) {
                        chosen.remove(pos);
                    } else {
                        chosen.push(option);
                    }
                    // Keep the catalog order so answers are stable.
                    chosen.sort_by_key(|item| options.iter().position(|o| o == item));
                    self.flow.set_answer(field.id, chosen.join(", "));
                }
                _ => {}
            }
            return;
        }

        // Select and radio: one choice, arrows cycle.
        let current_idx = options.iter().position(|option| option == current);
        let next = match key.code {
            KeyCode::Left => match current_idx {
                Some(0) | None => options.len() - 1,
                Some(idx) => idx - 1,
            },
            KeyCode::Right => match current_idx {
                None => 0,
                Some(idx) => (idx + 1) % options.len(),
            },
            _ => return,
        };
        self.flow.set_answer(field.id, options[next].clone());
    }

    fn on_exit(&mut self) {
        let dirty = !self.flow.answers().is_empty() && !self.flow.is_submitted();
        if self.options.confirm_exit && dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

fn trim_float(value: f64) -> String {
    if (value.fract()).abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
