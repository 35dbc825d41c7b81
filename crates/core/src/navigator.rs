use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{Assessment, GoalId};
use crate::questionnaire::{Questionnaire, Step};
use crate::validation::{ValidationReport, validate_section};

pub const INCOMPLETE_STEP_MESSAGE: &str = "Please complete all required fields before continuing.";
pub const INCOMPLETE_SUBMIT_MESSAGE: &str =
    "Please complete all required fields before submitting.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("navigator needs at least one step")]
    NoSteps,

    #[error("{}", INCOMPLETE_STEP_MESSAGE)]
    Incomplete { failures: Vec<SectionFailure> },

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the last step; submit instead")]
    AtLastStep,

    #[error("step {0} does not exist")]
    UnknownStep(u32),
}

/// Returned when the final validation pass finds incomplete sections.
///
/// The navigator has already moved to the step holding `first`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", INCOMPLETE_SUBMIT_MESSAGE)]
pub struct SubmitError {
    pub first: GoalId,
    pub failures: Vec<SectionFailure>,
}

/// A section that failed validation and the fields it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub goal: GoalId,
    pub report: ValidationReport,
}

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

/// Indices of a successful move, so the caller knows which step to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// Progress bar colour band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTone {
    Danger,
    Warning,
    Info,
    Success,
}

impl ProgressTone {
    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            0..25 => ProgressTone::Danger,
            25..50 => ProgressTone::Warning,
            50..100 => ProgressTone::Info,
            _ => ProgressTone::Success,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            ProgressTone::Danger => "bg-danger",
            ProgressTone::Warning => "bg-warning",
            ProgressTone::Info => "bg-info",
            ProgressTone::Success => "bg-success",
        }
    }
}

/// Completed and visited sections; drives the progress bar and step highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    pub completed: BTreeSet<GoalId>,
    pub visited: BTreeSet<GoalId>,
    pub total: usize,
}

impl CompletionState {
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.completed.len() * 100 + self.total / 2) / self.total;
        u32::try_from(pct).unwrap_or(100)
    }

    #[must_use]
    pub fn tone(&self) -> ProgressTone {
        ProgressTone::from_percent(self.percent())
    }

    #[must_use]
    pub fn is_complete(&self, goal: GoalId) -> bool {
        self.completed.contains(&goal)
    }
}

//
// ─── NAVIGATOR ─────────────────────────────────────────────────────────────────
//

/// Linear state machine over the steps of the form.
///
/// Moving forward requires every section of the current step to validate;
/// moving back never does.
#[derive(Debug, Clone)]
pub struct SectionNavigator {
    steps: Vec<Step>,
    current: usize,
    visited: BTreeSet<GoalId>,
}

impl SectionNavigator {
    /// # Errors
    ///
    /// Returns `NavigationError::NoSteps` when `steps` is empty or every step is empty.
    pub fn new(steps: Vec<Step>) -> Result<Self, NavigationError> {
        let steps: Vec<Step> = steps.into_iter().filter(|s| !s.goals.is_empty()).collect();
        let first = steps.first().ok_or(NavigationError::NoSteps)?;
        let visited = first.goals.iter().copied().collect();
        Ok(Self {
            steps,
            current: 0,
            visited,
        })
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    /// Goals shown on the current step.
    #[must_use]
    pub fn current_sections(&self) -> &[GoalId] {
        &self.current_step().goals
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Index of the step containing `goal`.
    #[must_use]
    pub fn step_of(&self, goal: GoalId) -> Option<usize> {
        self.steps.iter().position(|step| step.goals.contains(&goal))
    }

    /// Validates the current step without moving.
    #[must_use]
    pub fn check_current(
        &self,
        assessment: &Assessment,
        questionnaire: &Questionnaire,
    ) -> Vec<SectionFailure> {
        failures_for(self.current_sections(), assessment, questionnaire)
    }

    /// Advances one step if every section on the current step is complete.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Incomplete` with the failing fields, or
    /// `NavigationError::AtLastStep` when there is nowhere to go.
    pub fn next(
        &mut self,
        assessment: &Assessment,
        questionnaire: &Questionnaire,
    ) -> Result<Transition, NavigationError> {
        let failures = self.check_current(assessment, questionnaire);
        if !failures.is_empty() {
            return Err(NavigationError::Incomplete { failures });
        }
        if self.is_last() {
            return Err(NavigationError::AtLastStep);
        }
        Ok(self.move_to(self.current + 1))
    }

    /// Goes back one step. No validation.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::AtFirstStep` on the first step.
    pub fn prev(&mut self) -> Result<Transition, NavigationError> {
        if self.is_first() {
            return Err(NavigationError::AtFirstStep);
        }
        Ok(self.move_to(self.current - 1))
    }

    /// Jumps directly to a step index. No validation.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::UnknownStep` if the index is out of range.
    pub fn go_to(&mut self, index: usize) -> Result<Transition, NavigationError> {
        if index >= self.steps.len() {
            let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            return Err(NavigationError::UnknownStep(number));
        }
        Ok(self.move_to(index))
    }

    /// Validates every section of every step.
    ///
    /// On failure the navigator moves to the step of the first failing
    /// section, so the form shows where to continue.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` listing every incomplete section.
    pub fn submit(
        &mut self,
        assessment: &Assessment,
        questionnaire: &Questionnaire,
    ) -> Result<(), SubmitError> {
        let all: Vec<GoalId> = self
            .steps
            .iter()
            .flat_map(|step| step.goals.iter().copied())
            .collect();
        let failures = failures_for(&all, assessment, questionnaire);
        let Some(first) = failures.first().map(|failure| failure.goal) else {
            return Ok(());
        };
        if let Some(index) = self.step_of(first) {
            self.move_to(index);
        }
        Err(SubmitError { first, failures })
    }

    /// Sections marked completed (valid) and visited so far.
    #[must_use]
    pub fn completion(
        &self,
        assessment: &Assessment,
        questionnaire: &Questionnaire,
    ) -> CompletionState {
        let goals: Vec<GoalId> = self
            .steps
            .iter()
            .flat_map(|step| step.goals.iter().copied())
            .collect();
        let failing: BTreeSet<GoalId> = failures_for(&goals, assessment, questionnaire)
            .into_iter()
            .map(|failure| failure.goal)
            .collect();
        let completed = goals
            .iter()
            .copied()
            .filter(|goal| !failing.contains(goal))
            .collect();
        CompletionState {
            completed,
            visited: self.visited.clone(),
            total: goals.len(),
        }
    }

    fn move_to(&mut self, index: usize) -> Transition {
        let from = self.current;
        self.current = index;
        self.visited.extend(self.steps[index].goals.iter().copied());
        Transition { from, to: index }
    }
}

fn failures_for(
    goals: &[GoalId],
    assessment: &Assessment,
    questionnaire: &Questionnaire,
) -> Vec<SectionFailure> {
    goals
        .iter()
        .filter_map(|goal| {
            let section = assessment.section(*goal).cloned().unwrap_or_default();
            let report = validate_section(&section, questionnaire.required_fields(*goal));
            (!report.is_complete()).then_some(SectionFailure {
                goal: *goal,
                report,
            })
        })
        .collect()
}
