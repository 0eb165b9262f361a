use std::fmt::Write as _;

use serde_json::json;

use crate::domain::{Field, FieldConfig, FieldType, Form, TextAlignment};
use crate::engine::steps;

/// Render a published form as one self-contained HTML document.
///
/// The page carries everything it needs: inlined styling, the step layout,
/// per-field condition data and a client script that filters fields, walks
/// steps, validates and intercepts submit. It deliberately does not call any
/// backend; the artifact is a standalone preview-grade publish.
pub fn render_document(form: &Form) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&form.name));
    out.push_str("<style>\n");
    push_styles(&mut out, form);
    out.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(out, "<main class=\"form-shell\">");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(&form.name));

    let partitioned = steps::partition(&form.fields);
    let multi_step = partitioned.len() > 1;

    let _ = writeln!(out, "<form id=\"published-form\" novalidate>");
    if multi_step {
        out.push_str("<ol class=\"step-indicator\">\n");
        for step in &partitioned {
            let _ = writeln!(
                out,
                "<li data-step-label=\"{}\">{}</li>",
                step.index,
                escape_html(&step.display_title())
            );
        }
        out.push_str("</ol>\n");
    }

    for step in &partitioned {
        let _ = writeln!(
            out,
            "<section class=\"form-step\" data-step=\"{}\"{}>",
            step.index,
            if step.index == 0 { "" } else { " hidden" }
        );
        for field in &step.fields {
            push_field(&mut out, field);
        }
        out.push_str("</section>\n");
    }

    out.push_str("<div class=\"form-actions\">\n");
    if multi_step {
        out.push_str("<button type=\"button\" id=\"back\" hidden>Back</button>\n");
        out.push_str("<button type=\"button\" id=\"next\">Next</button>\n");
        out.push_str("<button type=\"submit\" id=\"submit\" hidden>Submit</button>\n");
    } else {
        out.push_str("<button type=\"submit\" id=\"submit\">Submit</button>\n");
    }
    out.push_str("</div>\n</form>\n");

    let thank_you = if form.thank_you.use_custom && !form.thank_you.message.is_empty() {
        form.thank_you.message.clone()
    } else {
        "Thank you! Your response has been recorded.".to_string()
    };
    let _ = writeln!(
        out,
        "<section id=\"thank-you\" hidden><p>{}</p></section>",
        escape_html(&thank_you)
    );
    out.push_str("</main>\n");

    out.push_str("<script>\n");
    push_script(&mut out, form);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

fn push_styles(out: &mut String, form: &Form) {
    let style = &form.style;
    let _ = writeln!(
        out,
        ":root {{ --bg: {}; --accent: {}; --text: {}; }}",
        escape_html(&style.background_color),
        escape_html(&style.accent_color),
        escape_html(&style.text_color)
    );
    let _ = writeln!(
        out,
        "body {{ margin: 0; background: var(--bg); color: var(--text); font-family: {}; }}",
        escape_html(&style.font_family)
    );
    out.push_str(concat!(
        ".form-shell { max-width: 640px; margin: 2rem auto; padding: 2rem; ",
        "background: #fff; border-radius: 12px; box-shadow: 0 2px 12px rgba(0,0,0,.08); }\n",
        ".form-field { margin-bottom: 1.25rem; }\n",
        ".form-field label { display: block; font-weight: 600; margin-bottom: .35rem; }\n",
        ".form-field input, .form-field select, .form-field textarea { width: 100%; ",
        "padding: .5rem .6rem; border: 1px solid #cfd4dc; border-radius: 6px; font: inherit; }\n",
        ".form-field .help { font-size: .85rem; color: #6b7280; margin-top: .25rem; }\n",
        ".form-field .error { font-size: .85rem; color: #b91c1c; margin-top: .25rem; }\n",
        ".form-field.invalid input, .form-field.invalid select, ",
        ".form-field.invalid textarea { border-color: #b91c1c; }\n",
        ".step-indicator { display: flex; gap: .75rem; list-style: none; padding: 0; }\n",
        ".step-indicator li { font-size: .85rem; color: #6b7280; }\n",
        ".step-indicator li.active { color: var(--accent); font-weight: 700; }\n",
        ".form-actions { display: flex; justify-content: space-between; gap: .5rem; }\n",
        ".form-actions button { padding: .55rem 1.4rem; border: 0; border-radius: 6px; ",
        "background: var(--accent); color: #fff; font: inherit; cursor: pointer; }\n",
        ".form-actions button[disabled] { opacity: .6; cursor: wait; }\n",
        "hr.divider { border: 0; border-top: 1px solid #e2e5ea; }\n",
    ));
}

fn push_field(out: &mut String, field: &Field) {
    let condition_attr = condition_attribute(field);
    let width_class = format!("width-{:?}", field.layout.width).to_lowercase();

    if !field.field_type.is_input() {
        let _ = writeln!(
            out,
            "<div class=\"form-field content {width_class}\" data-field-id=\"{}\"{condition_attr}>",
            field.id
        );
        push_content_block(out, field);
        out.push_str("</div>\n");
        return;
    }

    let _ = writeln!(
        out,
        "<div class=\"form-field {width_class}\" data-field-id=\"{}\" data-type=\"{}\"\
         {}{}{condition_attr}>",
        field.id,
        field.field_type,
        if field.required {
            " data-required=\"true\""
        } else {
            ""
        },
        numeric_bounds_attrs(field),
    );
    let _ = writeln!(
        out,
        "<label for=\"field-{}\">{}</label>",
        field.id,
        escape_html(&field.display_label())
    );
    push_control(out, field);
    if !field.help_text.is_empty() {
        let _ = writeln!(out, "<p class=\"help\">{}</p>", escape_html(&field.help_text));
    }
    out.push_str("<p class=\"error\" hidden></p>\n");
    out.push_str("</div>\n");
}

fn push_control(out: &mut String, field: &Field) {
    let id = field.id;
    let name = format!("field-{id}");
    let placeholder = escape_html(&field.placeholder);
    match field.field_type {
        FieldType::Text
        | FieldType::Email
        | FieldType::Tel
        | FieldType::Url
        | FieldType::Password
        | FieldType::Date
        | FieldType::Time
        | FieldType::Week
        | FieldType::Month
        | FieldType::Color => {
            let input_type = match field.field_type {
                FieldType::Text => "text",
                other => other.as_str(),
            };
            let _ = writeln!(
                out,
                "<input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" placeholder=\"{placeholder}\">"
            );
        }
        FieldType::DateTime => {
            let _ = writeln!(
                out,
                "<input id=\"{name}\" name=\"{name}\" type=\"datetime-local\">"
            );
        }
        FieldType::Textarea => {
            let _ = writeln!(
                out,
                "<textarea id=\"{name}\" name=\"{name}\" rows=\"4\" placeholder=\"{placeholder}\"></textarea>"
            );
        }
        FieldType::Number | FieldType::Currency => {
            let mut attrs = String::new();
            if let FieldConfig::Numeric {
                min, max, step, ..
            } = &field.config
            {
                if let Some(min) = min {
                    let _ = write!(attrs, " min=\"{min}\"");
                }
                if let Some(max) = max {
                    let _ = write!(attrs, " max=\"{max}\"");
                }
                let _ = write!(attrs, " step=\"{step}\"");
            }
            if let FieldConfig::Currency { symbol, .. } = &field.config {
                let _ = writeln!(out, "<span class=\"currency-symbol\">{}</span>", escape_html(symbol));
            }
            let _ = writeln!(
                out,
                "<input id=\"{name}\" name=\"{name}\" type=\"number\"{attrs}>"
            );
        }
        FieldType::Slider | FieldType::Range => {
            let mut attrs = String::new();
            if let FieldConfig::Numeric {
                min,
                max,
                step,
                default_value,
            } = &field.config
            {
                let _ = write!(attrs, " min=\"{}\"", min.unwrap_or(0.0));
                let _ = write!(attrs, " max=\"{}\"", max.unwrap_or(100.0));
                let _ = write!(attrs, " step=\"{step}\"");
                if let Some(value) = default_value {
                    let _ = write!(attrs, " value=\"{value}\"");
                }
            }
            let _ = writeln!(
                out,
                "<input id=\"{name}\" name=\"{name}\" type=\"range\"{attrs}>"
            );
        }
        FieldType::Select => {
            let _ = writeln!(out, "<select id=\"{name}\" name=\"{name}\">");
            out.push_str("<option value=\"\">Choose…</option>\n");
            for option in field.config.options().unwrap_or_default() {
                let escaped = escape_html(option);
                let _ = writeln!(out, "<option value=\"{escaped}\">{escaped}</option>");
            }
            out.push_str("</select>\n");
        }
        FieldType::Radio | FieldType::Checkbox => {
            let kind = if field.field_type == FieldType::Radio {
                "radio"
            } else {
                "checkbox"
            };
            for (idx, option) in field.config.options().unwrap_or_default().iter().enumerate() {
                let escaped = escape_html(option);
                let _ = writeln!(
                    out,
                    "<label class=\"option\"><input type=\"{kind}\" name=\"{name}\" \
                     id=\"{name}-{idx}\" value=\"{escaped}\"> {escaped}</label>"
                );
            }
        }
        FieldType::File => {
            let mut attrs = String::new();
            if let FieldConfig::File {
                accepted_types,
                allow_multiple,
            } = &field.config
            {
                if !accepted_types.is_empty() {
                    let _ = write!(attrs, " accept=\"{}\"", escape_html(&accepted_types.join(",")));
                }
                if *allow_multiple {
                    attrs.push_str(" multiple");
                }
            }
            let _ = writeln!(
                out,
                "<input id=\"{name}\" name=\"{name}\" type=\"file\"{attrs}>"
            );
        }
        FieldType::Rating => {
            let max = match &field.config {
                FieldConfig::Rating { max_rating } => *max_rating,
                _ => 5,
            };
            out.push_str("<div class=\"rating\">\n");
            for star in 1..=max {
                let _ = writeln!(
                    out,
                    "<label class=\"option\"><input type=\"radio\" name=\"{name}\" \
                     value=\"{star}\"> {star}★</label>"
                );
            }
            out.push_str("</div>\n");
        }
        FieldType::Heading
        | FieldType::Paragraph
        | FieldType::Divider
        | FieldType::Image
        | FieldType::Html
        | FieldType::PageBreak => unreachable!("content blocks render via push_content_block"),
    }
}

fn push_content_block(out: &mut String, field: &Field) {
    match &field.config {
        FieldConfig::Heading {
            text,
            level,
            alignment,
        } => {
            let level = (*level).clamp(1, 6);
            let _ = writeln!(
                out,
                "<h{level} style=\"text-align:{}\">{}</h{level}>",
                align_css(*alignment),
                escape_html(text)
            );
        }
        FieldConfig::Paragraph { text, alignment } => {
            let _ = writeln!(
                out,
                "<p style=\"text-align:{}\">{}</p>",
                align_css(*alignment),
                escape_html(text)
            );
        }
        FieldConfig::Divider => out.push_str("<hr class=\"divider\">\n"),
        FieldConfig::Image { src, alt } => {
            let _ = writeln!(
                out,
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(alt)
            );
        }
        // Raw blocks are the author's own markup; emitted verbatim.
        FieldConfig::Html { markup } => {
            out.push_str(markup);
            out.push('\n');
        }
        _ => {}
    }
}

fn condition_attribute(field: &Field) -> String {
    let rule = &field.show_condition;
    if !rule.enabled {
        return String::new();
    }
    let Some(field_id) = rule.field_id else {
        return String::new();
    };
    let payload = json!({
        "fieldId": field_id.0,
        "operator": rule.operator,
        "value": rule.value,
    });
    format!(
        " data-condition=\"{}\"",
        escape_html(&payload.to_string())
    )
}

fn numeric_bounds_attrs(field: &Field) -> String {
    let Some((min, max)) = field.config.numeric_bounds() else {
        return String::new();
    };
    let mut attrs = String::new();
    if let Some(min) = min {
        let _ = write!(attrs, " data-min=\"{min}\"");
    }
    if let Some(max) = max {
        let _ = write!(attrs, " data-max=\"{max}\"");
    }
    attrs
}

fn align_css(alignment: TextAlignment) -> &'static str {
    match alignment {
        TextAlignment::Left => "left",
        TextAlignment::Center => "center",
        TextAlignment::Right => "right",
    }
}

fn push_script(out: &mut String, form: &Form) {
    let _ = writeln!(out, "const FORM_ID = {};", json!(form.id.to_string()));
    out.push_str(CLIENT_SCRIPT);
}

/// Client runtime for the standalone page: condition filtering, step
/// navigation, the same validation rules the engine applies, and a submit
/// interceptor that shows the thank-you panel. Submissions are logged only.
const CLIENT_SCRIPT: &str = r#"
(function () {
  'use strict';
  const form = document.getElementById('published-form');
  const stepSections = Array.from(document.querySelectorAll('[data-step]'));
  const indicator = Array.from(document.querySelectorAll('[data-step-label]'));
  const backBtn = document.getElementById('back');
  const nextBtn = document.getElementById('next');
  const submitBtn = document.getElementById('submit');
  const emailPattern = /^[^\s@]+@[^\s@]+\.[^\s@]+$/;
  let current = 0;

  function fieldWraps() {
    return Array.from(form.querySelectorAll('.form-field[data-field-id]'));
  }

  function valueOf(wrap) {
    const id = wrap.dataset.fieldId;
    const checked = wrap.querySelectorAll('input[type=radio]:checked, input[type=checkbox]:checked');
    if (checked.length) {
      return Array.from(checked).map(function (el) { return el.value; }).join(', ');
    }
    const control = wrap.querySelector('input, select, textarea');
    if (!control || control.type === 'radio' || control.type === 'checkbox') { return ''; }
    return control.value || '';
  }

  function answers() {
    const out = {};
    fieldWraps().forEach(function (wrap) {
      const value = valueOf(wrap);
      if (value !== '') { out[wrap.dataset.fieldId] = value; }
    });
    return out;
  }

  function conditionHolds(wrap, state) {
    const raw = wrap.dataset.condition;
    if (!raw) { return true; }
    let rule;
    try { rule = JSON.parse(raw); } catch (err) { return true; }
    // A rule pointing at a field no longer on the form degrades to visible.
    if (!form.querySelector('[data-field-id="' + rule.fieldId + '"]')) { return true; }
    const answer = state[String(rule.fieldId)] || '';
    switch (rule.operator) {
      case 'equals': return answer === rule.value;
      case 'not_equals': return answer !== rule.value;
      case 'contains':
        return answer !== '' && answer.toLowerCase().indexOf(rule.value.toLowerCase()) !== -1;
      case 'is_empty': return answer === '';
      case 'is_not_empty': return answer !== '';
      default: return true;
    }
  }

  function applyConditions() {
    const state = answers();
    fieldWraps().forEach(function (wrap) {
      wrap.hidden = !conditionHolds(wrap, state);
    });
  }

  function setError(wrap, message) {
    const slot = wrap.querySelector('.error');
    if (!slot) { return; }
    if (message) {
      slot.textContent = message;
      slot.hidden = false;
      wrap.classList.add('invalid');
    } else {
      slot.hidden = true;
      wrap.classList.remove('invalid');
    }
  }

  function validate(scope) {
    let issues = 0;
    const wraps = scope
      ? Array.from(scope.querySelectorAll('.form-field[data-field-id]'))
      : fieldWraps();
    wraps.forEach(function (wrap) {
      if (wrap.hidden || !wrap.dataset.type) { setError(wrap, null); return; }
      const label = (wrap.querySelector('label') || {}).textContent || 'This field';
      const value = valueOf(wrap).trim();
      let message = null;
      if (wrap.dataset.required === 'true' && value === '') {
        message = label.replace(' *', '') + ' is required';
      } else if (value !== '' && wrap.dataset.type === 'email' && !emailPattern.test(value)) {
        message = 'Enter a valid email address';
      } else if (value !== '' && ['number', 'currency', 'slider', 'range'].indexOf(wrap.dataset.type) !== -1) {
        const num = Number(value);
        if (Number.isNaN(num)) { message = 'Enter a number'; }
        else if (wrap.dataset.min !== undefined && num < Number(wrap.dataset.min)) {
          message = 'Value is below the minimum';
        } else if (wrap.dataset.max !== undefined && num > Number(wrap.dataset.max)) {
          message = 'Value is above the maximum';
        }
      }
      setError(wrap, message);
      if (message) { issues += 1; }
    });
    return issues === 0;
  }

  function show(step) {
    current = step;
    stepSections.forEach(function (section, idx) { section.hidden = idx !== step; });
    indicator.forEach(function (item, idx) {
      item.classList.toggle('active', idx === step);
    });
    if (backBtn) { backBtn.hidden = step === 0; }
    if (nextBtn) { nextBtn.hidden = step === stepSections.length - 1; }
    if (stepSections.length > 1) {
      submitBtn.hidden = step !== stepSections.length - 1;
    }
    applyConditions();
  }

  if (nextBtn) {
    nextBtn.addEventListener('click', function () {
      if (validate(stepSections[current])) { show(current + 1); }
    });
  }
  if (backBtn) {
    backBtn.addEventListener('click', function () { show(current - 1); });
  }
  form.addEventListener('input', applyConditions);
  form.addEventListener('change', applyConditions);

  form.addEventListener('submit', function (event) {
    event.preventDefault();
    if (!validate(null)) { return; }
    submitBtn.disabled = true;
    submitBtn.textContent = 'Submitting…';
    // Standalone artifact: the payload stays client-side.
    console.log('form submission', { formId: FORM_ID, answers: answers() });
    form.hidden = true;
    document.getElementById('thank-you').hidden = false;
  });

  show(0);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{ConditionOperator, FieldId, ShowCondition};

    fn sample_form() -> Form {
        let mut form = Form::new("Feedback <Survey>");
        let mut name = create_field(FieldType::Text, FieldId(1));
        name.label = "Your name".to_string();
        name.required = true;
        let mut score = create_field(FieldType::Rating, FieldId(2));
        score.label = "Score".to_string();
        let page_break = create_field(FieldType::PageBreak, FieldId(3));
        let mut notes = create_field(FieldType::Textarea, FieldId(4));
        notes.label = "Notes".to_string();
        notes.show_condition = ShowCondition::when(FieldId(2), ConditionOperator::IsNotEmpty, "");
        form.fields = vec![name, score, page_break, notes];
        form
    }

    #[test]
    fn document_is_self_contained() {
        let html = render_document(&sample_form());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<script>"));
        assert!(html.contains("published-form"));
    }

    #[test]
    fn form_name_is_escaped() {
        let html = render_document(&sample_form());
        assert!(html.contains("Feedback &lt;Survey&gt;"));
        assert!(!html.contains("<Survey>"));
    }

    #[test]
    fn steps_and_conditions_are_emitted_as_data_attributes() {
        let html = render_document(&sample_form());
        assert!(html.contains("data-step=\"0\""));
        assert!(html.contains("data-step=\"1\""));
        assert!(html.contains("data-condition="));
        assert!(html.contains("is_not_empty"));
    }

    #[test]
    fn required_fields_carry_the_marker_and_flag() {
        let html = render_document(&sample_form());
        assert!(html.contains("Your name *"));
        assert!(html.contains("data-required=\"true\""));
    }

    #[test]
    fn rating_renders_one_choice_per_star() {
        let html = render_document(&sample_form());
        assert_eq!(html.matches("5★").count(), 1);
        assert!(html.contains("1★"));
    }

    #[test]
    fn single_step_forms_skip_the_indicator() {
        let mut form = Form::new("One pager");
        form.fields = vec![create_field(FieldType::Text, FieldId(1))];
        let html = render_document(&form);
        assert!(!html.contains("step-indicator"));
        assert!(!html.contains("id=\"next\""));
    }
}

/// Minimal HTML escaping for text and attribute positions.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
