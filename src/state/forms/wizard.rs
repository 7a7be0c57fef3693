//! Multi-step onboarding wizard
//!
//! A wizard owns its form record as a set of [`FormField`]s grouped by step
//! and a step pointer in `1..=STEPS`. Advancing requires every field of the
//! current step to pass its validator; going back is unconditional.

use super::field::{FieldValue, FormField};
use super::validators::{FieldCheck, ValidationContext};
use crate::regions::RegionData;
use crate::state::Role;
use crate::store::Document;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Number of steps in every onboarding wizard
pub const STEPS: usize = 3;

/// Placeholder path shown for an image loaded from a saved profile
const SAVED_IMAGE: &str = "(saved image)";

/// Fields, step pointer and gating flags shared by both wizards
#[derive(Debug, Clone)]
pub struct WizardForm {
    /// 1-based step pointer
    pub(crate) step: usize,
    /// Fields per step; index 0 is step 1
    steps: Vec<Vec<FormField>>,
    /// Focused field within the current step
    pub active_field: usize,
    /// Steps whose gate check failed at least once
    gate_failed: [bool; STEPS],
    /// State the district options were last built for
    district_source: String,
    /// Set while the persistence write is in flight
    pub submitting: bool,
}

impl WizardForm {
    pub fn new(steps: Vec<Vec<FormField>>) -> Self {
        Self {
            step: 1,
            steps,
            active_field: 0,
            gate_failed: [false; STEPS],
            district_source: String::new(),
            submitting: false,
        }
    }

    /// Fields of a 1-based step
    pub fn fields(&self, step: usize) -> &[FormField] {
        step.checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.steps.iter().flatten().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.steps.iter_mut().flatten().find(|f| f.name == name)
    }

    /// Scalar value of a field, empty when absent
    pub fn value(&self, name: &str) -> &str {
        self.field(name).map(FormField::as_text).unwrap_or("")
    }

    /// Selections of a multi-choice field
    pub fn values(&self, name: &str) -> Vec<String> {
        self.field(name)
            .map(FormField::selected_values)
            .unwrap_or_default()
    }

    /// Step a field belongs to
    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|fields| fields.iter().any(|f| f.name == name))
            .map(|i| i + 1)
    }

    pub fn active_field_mut(&mut self) -> Option<&mut FormField> {
        let index = self.step.checked_sub(1)?;
        self.steps.get_mut(index)?.get_mut(self.active_field)
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields(self.step).get(self.active_field)
    }

    pub fn next_field(&mut self) {
        let count = self.fields(self.step).len();
        if count > 0 {
            self.mark_active_touched();
            self.active_field = (self.active_field + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.fields(self.step).len();
        if count > 0 {
            self.mark_active_touched();
            self.active_field = if self.active_field == 0 {
                count - 1
            } else {
                self.active_field - 1
            };
        }
    }

    fn mark_active_touched(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.touched = true;
        }
    }

    pub fn gate_failed(&self, step: usize) -> bool {
        step.checked_sub(1)
            .and_then(|i| self.gate_failed.get(i))
            .copied()
            .unwrap_or(false)
    }

    fn mark_gate_failed(&mut self, step: usize) {
        if let Some(flag) = step.checked_sub(1).and_then(|i| self.gate_failed.get_mut(i)) {
            *flag = true;
        }
    }

    /// Rebuild the district list when the selected state changed.
    /// Any previous district is dropped.
    pub fn sync_districts(&mut self, regions: &RegionData) {
        let state = self.value("state").to_string();
        if state == self.district_source {
            return;
        }
        let districts = regions.districts_of(&state).to_vec();
        if let Some(district) = self.field_mut("district") {
            match district.value {
                FieldValue::Choice { .. } => district.set_options(districts),
                _ => district.clear(),
            }
        }
        self.district_source = state;
    }

    /// Load persisted values into the fields. State is applied first so the
    /// district options exist before the district is selected.
    pub fn hydrate_fields(&mut self, doc: &Document, regions: &RegionData) {
        if let Some(state) = doc.get("state").and_then(Value::as_str) {
            if let Some(field) = self.field_mut("state") {
                field.set_text(state);
            }
        }
        self.sync_districts(regions);

        for field in self.steps.iter_mut().flatten() {
            if field.name == "state" {
                continue;
            }
            let Some(value) = doc.get(&field.name) else {
                continue;
            };
            let is_attachment = matches!(field.value, FieldValue::Attachment { .. });
            match value {
                Value::Array(items) => {
                    let items: Vec<String> = items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect();
                    field.select_values(&items);
                }
                Value::String(encoded) if is_attachment => {
                    if !encoded.is_empty() {
                        field.set_text(SAVED_IMAGE);
                        field.set_data_url(encoded.clone());
                    }
                }
                Value::String(s) => field.set_text(s),
                Value::Number(n) => field.set_text(&n.to_string()),
                _ => {}
            }
        }
    }

    /// Flatten the fields into a record. Keys listed in `numeric` are written
    /// as JSON numbers; attachments contribute their encoded payload. Blank
    /// text and attachments without a payload are left out so a merge write
    /// keeps whatever the store already holds for them.
    pub fn record(&self, numeric: &[&str]) -> Document {
        let mut doc = Document::new();
        for field in self.steps.iter().flatten() {
            let value = match &field.value {
                FieldValue::MultiChoice { .. } => json!(field.selected_values()),
                FieldValue::Attachment { .. } => match field.data_url() {
                    Some(url) if !url.is_empty() => json!(url),
                    _ => continue,
                },
                _ if field.as_text().trim().is_empty() => continue,
                _ if numeric.contains(&field.name.as_str()) => field
                    .as_text()
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                _ => json!(field.as_text().trim()),
            };
            doc.insert(field.name.clone(), value);
        }
        doc
    }
}

/// Gated multi-step form driven by key events
pub trait Wizard {
    /// Role whose profile this wizard produces
    fn role(&self) -> Role;

    fn form(&self) -> &WizardForm;

    fn form_mut(&mut self) -> &mut WizardForm;

    /// Validate one field by name against the current record
    fn check_field(&self, name: &str, ctx: &ValidationContext) -> FieldCheck;

    /// The record as persisted in the role collection
    fn to_record(&self) -> Document;

    fn step_title(&self, step: usize) -> &'static str;

    fn current_step(&self) -> usize {
        self.form().step
    }

    /// Validation context reflecting the wizard's selected state
    fn context<'a>(&self, regions: &'a RegionData, today: NaiveDate) -> ValidationContext<'a> {
        ValidationContext {
            regions,
            state: self.form().value("state").to_string(),
            today,
        }
    }

    /// Result of every validator on a step, in field order
    fn step_checks(&self, step: usize, ctx: &ValidationContext) -> Vec<(String, FieldCheck)> {
        self.form()
            .fields(step)
            .iter()
            .map(|f| (f.name.clone(), self.check_field(&f.name, ctx)))
            .collect()
    }

    fn can_advance(&self, step: usize, ctx: &ValidationContext) -> bool {
        self.step_checks(step, ctx).iter().all(|(_, check)| check.valid)
    }

    /// Advance one step if the current step is valid. Returns whether the
    /// pointer moved; a failed gate reveals the step's errors.
    fn next_step(&mut self, ctx: &ValidationContext) -> bool {
        let step = self.current_step();
        if step >= STEPS {
            return false;
        }
        if !self.can_advance(step, ctx) {
            self.form_mut().mark_gate_failed(step);
            return false;
        }
        let form = self.form_mut();
        form.step = step + 1;
        form.active_field = 0;
        true
    }

    fn prev_step(&mut self) -> bool {
        let form = self.form_mut();
        if form.step <= 1 {
            return false;
        }
        form.step -= 1;
        form.active_field = 0;
        true
    }

    /// Whether the submit action is enabled
    fn can_submit(&self, ctx: &ValidationContext) -> bool {
        !self.form().submitting && self.current_step() == STEPS && self.can_advance(STEPS, ctx)
    }

    /// Gate check for submission; failing reveals the last step's errors
    fn request_submit(&mut self, ctx: &ValidationContext) -> bool {
        if self.can_submit(ctx) {
            return true;
        }
        if self.current_step() == STEPS && !self.form().submitting {
            self.form_mut().mark_gate_failed(STEPS);
        }
        false
    }

    /// Inline message for a field, shown once touched or after a failed gate
    fn visible_error(&self, name: &str, ctx: &ValidationContext) -> Option<String> {
        let form = self.form();
        let field = form.field(name)?;
        let revealed = field.touched || form.step_of(name).is_some_and(|s| form.gate_failed(s));
        if !revealed {
            return None;
        }
        let check = self.check_field(name, ctx);
        (!check.valid).then_some(check.message)
    }

    /// Apply persisted values
    fn hydrate(&mut self, doc: &Document, regions: &RegionData) {
        self.form_mut().hydrate_fields(doc, regions);
    }
}

/// State and district fields: choice lists when reference data is
/// available, free text otherwise
pub(crate) fn region_fields(regions: &RegionData) -> (FormField, FormField) {
    if regions.is_available() {
        (
            FormField::choice("state", "State", &regions.states()),
            FormField::choice("district", "District", &[]),
        )
    } else {
        (
            FormField::text("state", "State"),
            FormField::text("district", "District"),
        )
    }
}
