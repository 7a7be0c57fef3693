//! Form field value objects

use super::validators::{filter_city, filter_decimal, filter_digits, filter_upper};
use std::collections::BTreeSet;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Single selection from a fixed option list
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },
    /// Any number of selections; `cursor` is the highlighted option
    MultiChoice {
        options: Vec<String>,
        selected: BTreeSet<usize>,
        cursor: usize,
    },
    /// Image attached from disk; `data_url` is set once the file was read
    Attachment {
        path: String,
        data_url: Option<String>,
    },
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Keystroke filter applied to text fields after every edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFilter {
    #[default]
    None,
    /// No digits, capitalized words
    City,
    /// ASCII digits up to a length
    Digits(usize),
    Decimal,
    /// Upper-cased up to a length
    Upper(usize),
}

impl InputFilter {
    fn apply(self, value: &str) -> String {
        match self {
            InputFilter::None => value.to_string(),
            InputFilter::City => filter_city(value),
            InputFilter::Digits(max) => filter_digits(value, max),
            InputFilter::Decimal => filter_decimal(value),
            InputFilter::Upper(max) => filter_upper(value, max),
        }
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub filter: InputFilter,
    /// Render the value as bullets
    pub masked: bool,
    /// Set once the user edited or left the field
    pub touched: bool,
}

impl FormField {
    fn with_value(name: &str, label: &str, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value,
            filter: InputFilter::None,
            masked: false,
            touched: false,
        }
    }

    /// Create a new text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::with_value(name, label, FieldValue::Text(String::new()))
    }

    /// Create a single-choice field
    pub fn choice(name: &str, label: &str, options: &[&str]) -> Self {
        Self::with_value(
            name,
            label,
            FieldValue::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected: None,
            },
        )
    }

    /// Create a multi-choice field
    pub fn multi_choice(name: &str, label: &str, options: &[&str]) -> Self {
        Self::with_value(
            name,
            label,
            FieldValue::MultiChoice {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected: BTreeSet::new(),
                cursor: 0,
            },
        )
    }

    /// Create an image attachment field
    pub fn attachment(name: &str, label: &str) -> Self {
        Self::with_value(
            name,
            label,
            FieldValue::Attachment {
                path: String::new(),
                data_url: None,
            },
        )
    }

    pub fn with_filter(mut self, filter: InputFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Scalar value: text, selected option or attachment path
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice { options, selected } => selected
                .and_then(|i| options.get(i))
                .map(String::as_str)
                .unwrap_or(""),
            FieldValue::MultiChoice { .. } => "",
            FieldValue::Attachment { path, .. } => path,
        }
    }

    /// Selected options of a multi-choice field, in option order
    pub fn selected_values(&self) -> Vec<String> {
        match &self.value {
            FieldValue::MultiChoice {
                options, selected, ..
            } => selected
                .iter()
                .filter_map(|&i| options.get(i).cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Encoded attachment payload, if one was read
    pub fn data_url(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Attachment { data_url, .. } => data_url.as_deref(),
            _ => None,
        }
    }

    pub fn is_text_input(&self) -> bool {
        matches!(
            self.value,
            FieldValue::Text(_) | FieldValue::Attachment { .. }
        )
    }

    /// Set the text value, running it through the field's filter
    pub fn set_text(&mut self, value: &str) {
        let filtered = self.filter.apply(value);
        match &mut self.value {
            FieldValue::Text(s) => *s = filtered,
            FieldValue::Attachment { path, data_url } => {
                *path = filtered;
                *data_url = None;
            }
            FieldValue::Choice { .. } | FieldValue::MultiChoice { .. } => self.select_value(value),
        }
    }

    /// Select the option equal to `value`; unknown values clear the selection
    pub fn select_value(&mut self, value: &str) {
        if let FieldValue::Choice { options, selected } = &mut self.value {
            *selected = options.iter().position(|o| o == value);
        }
    }

    /// Select every option contained in `values`
    pub fn select_values(&mut self, values: &[String]) {
        if let FieldValue::MultiChoice {
            options, selected, ..
        } = &mut self.value
        {
            *selected = options
                .iter()
                .enumerate()
                .filter(|(_, o)| values.contains(o))
                .map(|(i, _)| i)
                .collect();
        }
    }

    /// Replace the option list, dropping the current selection
    pub fn set_options(&mut self, new_options: Vec<String>) {
        match &mut self.value {
            FieldValue::Choice { options, selected } => {
                *options = new_options;
                *selected = None;
            }
            FieldValue::MultiChoice {
                options,
                selected,
                cursor,
            } => {
                *options = new_options;
                selected.clear();
                *cursor = 0;
            }
            _ => {}
        }
    }

    /// Store the encoded attachment
    pub fn set_data_url(&mut self, encoded: String) {
        if let FieldValue::Attachment { data_url, .. } = &mut self.value {
            *data_url = Some(encoded);
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.push(c);
                *s = self.filter.apply(s);
            }
            FieldValue::Attachment { path, data_url } => {
                path.push(c);
                *data_url = None;
            }
            FieldValue::Choice { .. } | FieldValue::MultiChoice { .. } => {
                if c == ' ' {
                    self.toggle();
                }
            }
        }
        self.touched = true;
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Attachment { path, data_url } => {
                path.pop();
                *data_url = None;
            }
            FieldValue::Choice { selected, .. } => *selected = None,
            FieldValue::MultiChoice { .. } => {}
        }
        self.touched = true;
    }

    /// Move to the next option (choice) or highlight (multi-choice)
    pub fn next_option(&mut self) {
        match &mut self.value {
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                *selected = Some(selected.map_or(0, |i| (i + 1) % options.len()));
                self.touched = true;
            }
            FieldValue::MultiChoice {
                options, cursor, ..
            } if !options.is_empty() => *cursor = (*cursor + 1) % options.len(),
            _ => {}
        }
    }

    /// Move to the previous option (choice) or highlight (multi-choice)
    pub fn prev_option(&mut self) {
        match &mut self.value {
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                let last = options.len() - 1;
                *selected = Some(match *selected {
                    Some(0) | None => last,
                    Some(i) => i - 1,
                });
                self.touched = true;
            }
            FieldValue::MultiChoice {
                options, cursor, ..
            } if !options.is_empty() => {
                *cursor = if *cursor == 0 {
                    options.len() - 1
                } else {
                    *cursor - 1
                };
            }
            _ => {}
        }
    }

    /// Toggle the highlighted option of a multi-choice field
    pub fn toggle(&mut self) {
        if let FieldValue::MultiChoice {
            options,
            selected,
            cursor,
        } = &mut self.value
        {
            let idx = *cursor;
            if idx < options.len() && !selected.remove(&idx) {
                selected.insert(idx);
            }
            self.touched = true;
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choice { selected, .. } => *selected = None,
            FieldValue::MultiChoice {
                selected, cursor, ..
            } => {
                selected.clear();
                *cursor = 0;
            }
            FieldValue::Attachment { path, data_url } => {
                path.clear();
                *data_url = None;
            }
        }
        self.touched = false;
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.masked => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice { .. } => match self.as_text() {
                "" => "< select >".to_string(),
                v => format!("< {v} >"),
            },
            FieldValue::MultiChoice { .. } => {
                let values = self.selected_values();
                if values.is_empty() {
                    "(none selected)".to_string()
                } else {
                    values.join(", ")
                }
            }
            FieldValue::Attachment { path, data_url } => match data_url {
                Some(_) => format!("{path} (attached)"),
                None => path.clone(),
            },
        }
    }
}
