//! Field layout of the assessment form: which fields each goal section
//! shows, which of them are required, and how sections are grouped into
//! steps.

mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{CANONICAL_GOAL_COUNT, EXTENDED_GOAL_COUNT, GoalId, GoalInfo};

//
// ─── FIELDS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Radio group: exactly one option.
    SingleChoice,
    /// Grouped checkboxes: any subset of the options.
    MultiChoice,
    /// Lone checkbox.
    Toggle,
    /// Text input or textarea.
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One control of a goal section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    label: String,
    kind: FieldKind,
    options: Vec<FieldOption>,
    required: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn single_choice(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FieldOption>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::SingleChoice,
            options,
            required: true,
        }
    }

    #[must_use]
    pub fn multi_choice(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FieldOption>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::MultiChoice,
            options,
            required: false,
        }
    }

    #[must_use]
    pub fn free_text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::FreeText,
            options: Vec::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn toggle(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Toggle,
            options: Vec::new(),
            required: false,
        }
    }

    /// Overrides the default `required` flag of the constructor.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// True iff `value` is one of the listed options. Option-less fields accept any value.
    #[must_use]
    pub fn offers(&self, value: &str) -> bool {
        if self.options.is_empty() {
            return !value.is_empty();
        }
        self.options.iter().any(|option| option.value == value)
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn is_notes(&self) -> bool {
        crate::model::is_notes_field(&self.name)
    }
}

//
// ─── SECTIONS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSchema {
    goal: GoalId,
    title: String,
    prompt: String,
    fields: Vec<FieldDescriptor>,
}

impl SectionSchema {
    #[must_use]
    pub fn new(goal: GoalId, prompt: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        let info = GoalInfo::lookup(goal);
        Self {
            goal,
            title: format!("SDG {}: {}", goal.number(), info.name),
            prompt: prompt.into(),
            fields,
        }
    }

    #[must_use]
    pub fn goal(&self) -> GoalId {
        self.goal
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Required descriptors in display order.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.required)
    }
}

//
// ─── LAYOUT ────────────────────────────────────────────────────────────────────
//

/// How sections are grouped into navigation steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormLayout {
    /// One goal per step.
    #[default]
    SinglePage,
    /// Several goals per page, in the fixed five-page grouping.
    Paged,
}

const PAGES: [&[u32]; 5] = [&[1, 2, 3, 6], &[4, 5, 8, 10], &[7, 9, 11, 12], &[13, 14, 15], &[16, 17]];

/// A navigation step: one or more sections shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub number: u32,
    pub goals: Vec<GoalId>,
}

//
// ─── QUESTIONNAIRE ─────────────────────────────────────────────────────────────
//

/// Ordered set of goal sections with a field-name index.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    sections: Vec<SectionSchema>,
    by_field: HashMap<String, (GoalId, usize)>,
}

impl Questionnaire {
    #[must_use]
    pub fn new(sections: Vec<SectionSchema>) -> Self {
        let by_field = sections
            .iter()
            .flat_map(|section| {
                section
                    .fields
                    .iter()
                    .enumerate()
                    .map(move |(idx, field)| (field.name.clone(), (section.goal, idx)))
            })
            .collect();
        Self { sections, by_field }
    }

    /// Questions for the 17 canonical goals.
    #[must_use]
    pub fn canonical() -> Self {
        Self::new(
            (1..=CANONICAL_GOAL_COUNT)
                .map(|n| catalog::section(GoalId::new(n)))
                .collect(),
        )
    }

    /// Canonical goals plus the experimental 18 to 27 range.
    #[must_use]
    pub fn extended() -> Self {
        Self::new(
            (1..=EXTENDED_GOAL_COUNT)
                .map(|n| catalog::section(GoalId::new(n)))
                .collect(),
        )
    }

    #[must_use]
    pub fn goals(&self) -> Vec<GoalId> {
        self.sections.iter().map(|section| section.goal).collect()
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionSchema] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, goal: GoalId) -> Option<&SectionSchema> {
        self.sections.iter().find(|section| section.goal == goal)
    }

    /// Finds the section and descriptor that own a field name.
    #[must_use]
    pub fn locate(&self, field: &str) -> Option<(GoalId, &FieldDescriptor)> {
        let (goal, idx) = *self.by_field.get(field)?;
        let section = self.section(goal)?;
        section.fields.get(idx).map(|descriptor| (goal, descriptor))
    }

    /// Required descriptors of a section; empty for unknown goals.
    #[must_use]
    pub fn required_fields(&self, goal: GoalId) -> Vec<&FieldDescriptor> {
        self.section(goal)
            .map(|section| section.required_fields().collect())
            .unwrap_or_default()
    }

    /// Groups the sections into navigation steps.
    ///
    /// Goals absent from the fixed paging (the extended range) are appended
    /// as one extra page.
    #[must_use]
    pub fn steps(&self, layout: FormLayout) -> Vec<Step> {
        match layout {
            FormLayout::SinglePage => self
                .sections
                .iter()
                .zip(1..)
                .map(|(section, number)| Step {
                    number,
                    goals: vec![section.goal],
                })
                .collect(),
            FormLayout::Paged => {
                let mut steps: Vec<Step> = Vec::new();
                for page in PAGES {
                    let goals: Vec<GoalId> = page
                        .iter()
                        .map(|n| GoalId::new(*n))
                        .filter(|goal| self.section(*goal).is_some())
                        .collect();
                    if !goals.is_empty() {
                        let number = u32::try_from(steps.len() + 1).unwrap_or(u32::MAX);
                        steps.push(Step { number, goals });
                    }
                }
                let leftover: Vec<GoalId> = self
                    .sections
                    .iter()
                    .map(|section| section.goal)
                    .filter(|goal| !PAGES.iter().any(|page| page.contains(&goal.number())))
                    .collect();
                if !leftover.is_empty() {
                    let number = u32::try_from(steps.len() + 1).unwrap_or(u32::MAX);
                    steps.push(Step {
                        number,
                        goals: leftover,
                    });
                }
                steps
            }
        }
    }
}
