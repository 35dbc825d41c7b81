//! Deterministic sample answers, used to seed demo databases and to
//! prefill the form during manual testing.

use crate::model::FieldValue;
use crate::questionnaire::FieldKind;
use crate::store::{FormStore, StoreError};

/// Answers every field of every section. `variant` shifts the picks so
/// different seeds produce different score profiles.
///
/// Returns the number of fields written.
///
/// # Errors
///
/// Returns `StoreError` if the assessment is already finalized.
pub fn fill_demo_answers(store: &mut FormStore, variant: usize) -> Result<usize, StoreError> {
    let mut plan = Vec::new();
    for section in store.questionnaire().sections() {
        let n = section.goal().number() as usize;
        for field in section.fields() {
            let options = field.options();
            let value = match field.kind() {
                FieldKind::SingleChoice if !options.is_empty() => {
                    let back = (n * 7 + variant * 3) % options.len().min(4);
                    FieldValue::Text(options[options.len() - 1 - back].value.clone())
                }
                FieldKind::MultiChoice => {
                    let take = (n + variant) % (options.len() + 1);
                    FieldValue::choices(options.iter().take(take).map(|o| o.value.clone()))
                }
                FieldKind::Toggle => FieldValue::Flag(true),
                FieldKind::FreeText if field.is_notes() => {
                    FieldValue::text(format!("Sample evidence for SDG {n}."))
                }
                FieldKind::FreeText => FieldValue::text("Baseline 500/month, projected 320/month"),
                FieldKind::SingleChoice => continue,
            };
            plan.push((section.goal(), field.name().to_string(), value));
        }
    }
    let written = plan.len();
    for (goal, field, value) in plan {
        store.record_field(goal, &field, value)?;
    }
    Ok(written)
}
