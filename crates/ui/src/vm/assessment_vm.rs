use sdg_core::model::{FieldValue, GoalId, GoalInfo, ProjectId, SubmissionId};
use sdg_core::{EVIDENCE_MAX_LEN, EvidenceMeter, FieldKind, NavigationError};
use services::{AssessmentService, AssessmentSession, SaveStatus, SessionError};

use crate::views::ViewError;
use crate::vm::time_fmt::format_datetime;

/// User actions on the assessment form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssessmentIntent {
    /// A radio option was picked.
    Choose {
        goal: GoalId,
        field: String,
        value: String,
    },
    /// A checkbox changed; `option` is empty for a lone checkbox.
    Toggle {
        goal: GoalId,
        field: String,
        option: String,
        checked: bool,
    },
    /// A text input or textarea changed.
    Text {
        goal: GoalId,
        field: String,
        text: String,
    },
    Next,
    Prev,
    GoTo(usize),
    Submit,
}

impl AssessmentIntent {
    /// Edits are applied synchronously; moves need the services.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            AssessmentIntent::Choose { .. }
                | AssessmentIntent::Toggle { .. }
                | AssessmentIntent::Text { .. }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssessmentOutcome {
    Continue,
    /// Validation stopped the move; the step now shows inline errors.
    Blocked,
    Submitted(SubmissionId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldVm {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub missing: bool,
    pub options: Vec<OptionVm>,
    pub text: String,
    /// State of a lone checkbox.
    pub flag: bool,
    /// Character counter and strength meter; free-text fields only.
    pub meter: Option<EvidenceMeter>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionVm {
    pub goal: GoalId,
    pub title: String,
    pub prompt: String,
    pub color: String,
    pub has_errors: bool,
    pub fields: Vec<FieldVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepLinkVm {
    pub index: usize,
    pub label: String,
    pub current: bool,
    pub complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub index: usize,
    pub count: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub percent: u32,
    pub tone_class: &'static str,
    pub links: Vec<StepLinkVm>,
    pub notice: Option<&'static str>,
    pub sections: Vec<SectionVm>,
    pub submitted: bool,
}

/// Owns the open form for the assessment view.
pub struct AssessmentVm {
    session: AssessmentSession,
}

impl AssessmentVm {
    #[must_use]
    pub fn new(session: AssessmentSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    #[must_use]
    pub fn restored_fields(&self) -> usize {
        self.session.restored_fields()
    }

    /// Applies a field edit.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the store rejects the edit.
    pub fn apply_edit(
        &mut self,
        service: &AssessmentService,
        intent: AssessmentIntent,
    ) -> Result<(), ViewError> {
        let result = match intent {
            AssessmentIntent::Choose { goal, field, value } => {
                service.record(&mut self.session, goal, &field, FieldValue::Text(value))
            }
            AssessmentIntent::Toggle {
                goal,
                field,
                option,
                checked,
            } => {
                let value = if option.is_empty() {
                    FieldValue::Flag(checked)
                } else {
                    let mut current = self
                        .session
                        .assessment()
                        .section(goal)
                        .and_then(|section| section.input(&field))
                        .and_then(FieldValue::as_choices)
                        .cloned()
                        .unwrap_or_default();
                    if checked {
                        current.insert(option);
                    } else {
                        current.remove(&option);
                    }
                    FieldValue::Choices(current)
                };
                service.record(&mut self.session, goal, &field, value)
            }
            AssessmentIntent::Text { goal, field, text } => {
                service.record(&mut self.session, goal, &field, FieldValue::Text(text))
            }
            _ => return Ok(()),
        };
        result.map_err(|err| {
            tracing::warn!(error = %err, "edit rejected");
            ViewError::Unknown
        })
    }

    /// Runs a navigation or submit intent.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for storage failures.
    pub async fn navigate(
        &mut self,
        service: &AssessmentService,
        intent: AssessmentIntent,
    ) -> Result<AssessmentOutcome, ViewError> {
        let result = match intent {
            AssessmentIntent::Next => service.next(&mut self.session).await.map(|_| None),
            AssessmentIntent::Prev => service.prev(&mut self.session).await.map(|_| None),
            AssessmentIntent::GoTo(index) => {
                service.go_to(&mut self.session, index).await.map(|_| None)
            }
            AssessmentIntent::Submit => service
                .submit(&mut self.session)
                .await
                .map(|outcome| Some(outcome.id)),
            _ => return Ok(AssessmentOutcome::Continue),
        };
        match result {
            Ok(Some(id)) => Ok(AssessmentOutcome::Submitted(id)),
            Ok(None) => Ok(AssessmentOutcome::Continue),
            Err(
                SessionError::Navigation(NavigationError::Incomplete { .. })
                | SessionError::Submit(_),
            ) => Ok(AssessmentOutcome::Blocked),
            Err(SessionError::Navigation(
                NavigationError::AtFirstStep | NavigationError::AtLastStep,
            )) => Ok(AssessmentOutcome::Continue),
            Err(SessionError::Submitted) => self
                .session
                .submission()
                .map(AssessmentOutcome::Submitted)
                .ok_or(ViewError::Unknown),
            Err(err) => {
                tracing::warn!(error = %err, "navigation failed");
                Err(ViewError::Unknown)
            }
        }
    }

    #[must_use]
    pub fn step_view(&self) -> StepVm {
        let session = &self.session;
        let completion = session.completion();
        let questionnaire = session.questionnaire();
        let assessment = session.assessment();

        let links = session
            .navigator()
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepLinkVm {
                index,
                label: step_label(&step.goals),
                current: index == session.step_index(),
                complete: step.goals.iter().all(|goal| completion.is_complete(*goal)),
            })
            .collect();

        let sections = session
            .current_sections()
            .iter()
            .filter_map(|goal| {
                let schema = questionnaire.section(*goal)?;
                let section = assessment.section(*goal);
                let fields = schema
                    .fields()
                    .iter()
                    .map(|descriptor| {
                        let value = if descriptor.is_notes() {
                            None
                        } else {
                            section.and_then(|s| s.input(descriptor.name()))
                        };
                        let text = if descriptor.is_notes() {
                            section.map(|s| s.notes().to_string()).unwrap_or_default()
                        } else {
                            value
                                .and_then(FieldValue::as_text)
                                .unwrap_or_default()
                                .to_string()
                        };
                        let options = descriptor
                            .options()
                            .iter()
                            .map(|option| OptionVm {
                                value: option.value.clone(),
                                label: option.label.clone(),
                                checked: value.is_some_and(|v| v.contains(&option.value)),
                            })
                            .collect();
                        FieldVm {
                            name: descriptor.name().to_string(),
                            label: descriptor.label().to_string(),
                            kind: descriptor.kind(),
                            required: descriptor.is_required(),
                            missing: session.has_field_error(*goal, descriptor.name()),
                            options,
                            flag: matches!(value, Some(FieldValue::Flag(true))),
                            meter: (descriptor.kind() == FieldKind::FreeText)
                                .then(|| EvidenceMeter::measure(&text, EVIDENCE_MAX_LEN)),
                            text,
                        }
                    })
                    .collect();
                Some(SectionVm {
                    goal: *goal,
                    title: schema.title().to_string(),
                    prompt: schema.prompt().to_string(),
                    color: GoalInfo::lookup(*goal).color_code,
                    has_errors: session.errors_for(*goal).is_some(),
                    fields,
                })
            })
            .collect();

        StepVm {
            index: session.step_index(),
            count: session.step_count(),
            is_first: session.navigator().is_first(),
            is_last: session.navigator().is_last(),
            percent: completion.percent(),
            tone_class: completion.tone().css_class(),
            links,
            notice: session.notice(),
            sections,
            submitted: session.is_submitted(),
        }
    }
}

/// The line under the form buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveStatusVm {
    pub text: String,
    pub warning: bool,
}

#[must_use]
pub fn map_save_status(status: SaveStatus) -> Option<SaveStatusVm> {
    let text = match status {
        SaveStatus::Idle => return None,
        SaveStatus::Pending => "Saving...".to_string(),
        SaveStatus::Saved { at } => format!("Draft saved {}", format_datetime(at)),
        SaveStatus::LocalUnavailable | SaveStatus::RemoteFailed => {
            status.message().unwrap_or_default().to_string()
        }
    };
    Some(SaveStatusVm {
        text,
        warning: status.is_warning(),
    })
}

fn step_label(goals: &[GoalId]) -> String {
    match goals {
        [only] => only.number().to_string(),
        [first, .., last] => format!("{}-{}", first.number(), last.number()),
        [] => String::new(),
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` if the form cannot be opened.
pub async fn start_assessment(
    service: &AssessmentService,
    project: ProjectId,
) -> Result<AssessmentVm, ViewError> {
    let session = service.start(project, None).await.map_err(|err| {
        tracing::warn!(error = %err, "could not open assessment");
        ViewError::Unknown
    })?;
    Ok(AssessmentVm::new(session))
}
