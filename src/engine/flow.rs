use tracing::debug;

use crate::domain::{AnswerMap, Field, FieldId, Form, Submission};

use super::steps::{self, FormStep};
use super::validation::{self, FieldIssue};
use super::condition;

/// What happens to answers of fields that a condition just hid.
///
/// `Retain` matches the original observed behavior: stale answers survive and
/// ship in the submission. `Clear` drops an answer the moment its field stops
/// being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HiddenAnswerPolicy {
    #[default]
    Retain,
    Clear,
}

/// Result of a `next` transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Advanced,
    /// Validation failed; still on the same step, with this many issues.
    Stayed(usize),
    Submitted(Submission),
}

/// The public renderer's engine: walks a read-only form snapshot step by step,
/// collecting answers and validating on every forward transition.
///
/// `Submitted` is terminal; exactly one submission is produced and later
/// `next` calls are no-ops.
#[derive(Debug)]
pub struct FillFlow {
    form: Form,
    answers: AnswerMap,
    step: usize,
    completed: Vec<bool>,
    submitted: bool,
    issues: Vec<FieldIssue>,
    policy: HiddenAnswerPolicy,
}

impl FillFlow {
    pub fn start(form: Form) -> Self {
        let step_count = steps::step_count(&form.fields);
        Self {
            form,
            answers: AnswerMap::new(),
            step: 0,
            completed: vec![false; step_count],
            submitted: false,
            issues: Vec::new(),
            policy: HiddenAnswerPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: HiddenAnswerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn step_count(&self) -> usize {
        self.completed.len()
    }

    /// Zero-based index of the step being shown.
    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 == self.step_count()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn step_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn steps(&self) -> Vec<FormStep<'_>> {
        steps::partition(&self.form.fields)
    }

    /// Fields of the current step whose show condition holds right now.
    pub fn visible_fields(&self) -> Vec<&Field> {
        let partitioned = steps::partition(&self.form.fields);
        let Some(step) = partitioned.into_iter().nth(self.step) else {
            return Vec::new();
        };
        step.fields
            .into_iter()
            .filter(|field| {
                condition::evaluate_for(&self.form.fields, &field.show_condition, &self.answers)
            })
            .collect()
    }

    pub fn answer(&self, field_id: FieldId) -> &str {
        self.answers.get(&field_id).map(String::as_str).unwrap_or("")
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn issue_for(&self, field_id: FieldId) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field_id == field_id)
            .map(|issue| issue.message.as_str())
    }

    /// Record an answer and clear any stale issue on that field.
    pub fn set_answer(&mut self, field_id: FieldId, value: impl Into<String>) {
        if self.submitted {
            return;
        }
        self.answers.insert(field_id, value.into());
        self.issues.retain(|issue| issue.field_id != field_id);
        if self.policy == HiddenAnswerPolicy::Clear {
            self.drop_hidden_answers();
        }
    }

    /// Validate the visible fields of this step; advance, or submit from the
    /// last step after re-validating the entire visible field set.
    pub fn next(&mut self) -> StepOutcome {
        if self.submitted {
            return StepOutcome::Stayed(0);
        }
        let step_fields: Vec<FieldId> = {
            let partitioned = steps::partition(&self.form.fields);
            match partitioned.get(self.step) {
                Some(step) => step.fields.iter().map(|field| field.id).collect(),
                None => Vec::new(),
            }
        };
        self.issues = validation::validate_fields(
            &self.form.fields,
            self.form
                .fields
                .iter()
                .filter(|field| step_fields.contains(&field.id)),
            &self.answers,
        );
        if !self.issues.is_empty() {
            return StepOutcome::Stayed(self.issues.len());
        }

        if self.is_last_step() {
            // Final gate: the whole visible field set, across all steps.
            self.issues =
                validation::validate_fields(&self.form.fields, self.form.fields.iter(), &self.answers);
            if !self.issues.is_empty() {
                return StepOutcome::Stayed(self.issues.len());
            }
            self.completed[self.step] = true;
            self.submitted = true;
            let submission = Submission::new(self.form.id, self.answers.clone());
            debug!(form = %self.form.id, answers = submission.answers.len(), "submitted");
            return StepOutcome::Submitted(submission);
        }

        self.completed[self.step] = true;
        self.step += 1;
        StepOutcome::Advanced
    }

    /// Move back one step. Never validates, never clears answers.
    pub fn back(&mut self) {
        if self.submitted || self.step == 0 {
            return;
        }
        self.step -= 1;
        self.issues.clear();
    }

    fn drop_hidden_answers(&mut self) {
        loop {
            let hidden: Vec<FieldId> = self
                .form
                .fields
                .iter()
                .filter(|field| {
                    !condition::evaluate_for(&self.form.fields, &field.show_condition, &self.answers)
                })
                .map(|field| field.id)
                .filter(|id| self.answers.contains_key(id))
                .collect();
            if hidden.is_empty() {
                break;
            }
            // Removing an answer can hide further dependents; iterate to a fixpoint.
            for id in hidden {
                self.answers.shift_remove(&id);
            }
        }
    }
}
