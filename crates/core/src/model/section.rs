use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::field::FieldValue;

/// Answers collected for one goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    inputs: BTreeMap<String, FieldValue>,
    #[serde(default)]
    notes: String,
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inputs(&self) -> &BTreeMap<String, FieldValue> {
        &self.inputs
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn input(&self, field: &str) -> Option<&FieldValue> {
        self.inputs.get(field)
    }

    /// Returns the text of a single-choice or text input.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.inputs.get(field).and_then(FieldValue::as_text)
    }

    /// Stores a value, or drops the key when the value is empty.
    pub fn set_input(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        if value.is_empty() && !matches!(value, FieldValue::Flag(_)) {
            self.inputs.remove(&field);
        } else {
            self.inputs.insert(field, value);
        }
    }

    pub fn clear_input(&mut self, field: &str) -> Option<FieldValue> {
        self.inputs.remove(field)
    }

    pub fn set_notes(&mut self, notes: impl AsRef<str>) {
        self.notes = notes.as_ref().trim().to_string();
    }

    /// True when no input and no note has been recorded.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.inputs.is_empty() && self.notes.is_empty()
    }

    /// Builder-style helper used by fixtures and the demo seed.
    #[must_use]
    pub fn with_input(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.set_input(field, value);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl AsRef<str>) -> Self {
        self.set_notes(notes);
        self
    }
}
