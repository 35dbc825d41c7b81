use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A recorded answer for one form field.
///
/// Serialized untagged so snapshots read as plain JSON: a string for radio
/// and text fields, a boolean for lone checkboxes, an array for grouped
/// checkboxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Choices(BTreeSet<String>),
}

impl FieldValue {
    /// Builds a text value, trimming surrounding whitespace.
    #[must_use]
    pub fn text(value: impl AsRef<str>) -> Self {
        Self::Text(value.as_ref().trim().to_string())
    }

    /// Builds a multi-select value from any iterator of option values.
    #[must_use]
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Returns the string content for single-choice and text values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the checked options of a multi-select value.
    #[must_use]
    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Choices(values) => Some(values),
            _ => None,
        }
    }

    /// True when the value carries no answer: blank text, an unchecked
    /// flag, or an empty selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flag(checked) => !checked,
            Self::Text(value) => value.trim().is_empty(),
            Self::Choices(values) => values.is_empty(),
        }
    }

    /// Number of checked entries (0 or 1 for flags and text).
    #[must_use]
    pub fn checked_count(&self) -> usize {
        match self {
            Self::Choices(values) => values.len(),
            other => usize::from(!other.is_empty()),
        }
    }

    /// Whether `option` is the selected value or among the checked ones.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        match self {
            Self::Text(value) => value == option,
            Self::Choices(values) => values.contains(option),
            Self::Flag(_) => false,
        }
    }
}

/// Field names ending in `_notes` hold section evidence rather than inputs.
#[must_use]
pub fn is_notes_field(name: &str) -> bool {
    name.ends_with("_notes")
}
