use crate::model::{FieldValue, Section};
use crate::questionnaire::{FieldDescriptor, FieldKind};

/// Names of the required fields a section is missing, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    missing: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    #[must_use]
    pub fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|name| name == field)
    }
}

/// Checks one descriptor against the recorded answers.
#[must_use]
pub fn field_passes(section: &Section, descriptor: &FieldDescriptor) -> bool {
    if descriptor.is_notes() {
        return !section.notes().trim().is_empty();
    }
    let Some(value) = section.input(descriptor.name()) else {
        return false;
    };
    match (descriptor.kind(), value) {
        (FieldKind::SingleChoice, FieldValue::Text(choice)) => descriptor.offers(choice),
        (FieldKind::FreeText, FieldValue::Text(text)) => !text.trim().is_empty(),
        (FieldKind::MultiChoice, FieldValue::Choices(values)) => !values.is_empty(),
        (FieldKind::Toggle, FieldValue::Flag(checked)) => *checked,
        _ => false,
    }
}

/// Validates every given descriptor; optional descriptors are skipped.
pub fn validate_section<'a>(
    section: &Section,
    descriptors: impl IntoIterator<Item = &'a FieldDescriptor>,
) -> ValidationReport {
    let missing = descriptors
        .into_iter()
        .filter(|descriptor| descriptor.is_required())
        .filter(|descriptor| !field_passes(section, descriptor))
        .map(|descriptor| descriptor.name().to_string())
        .collect();
    ValidationReport { missing }
}

/// True iff every required descriptor has a non-empty answer.
pub fn is_section_complete<'a>(
    section: &Section,
    descriptors: impl IntoIterator<Item = &'a FieldDescriptor>,
) -> bool {
    validate_section(section, descriptors).is_complete()
}
