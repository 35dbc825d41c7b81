use std::time::Duration;

use sdg_core::model::GoalId;
use sdg_core::{FormLayout, Questionnaire, ScoringTable};

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;

/// Which goals the questionnaire covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoalRange {
    #[default]
    Canonical,
    /// Adds the experimental goals 18 to 27.
    Extended,
}

impl GoalRange {
    #[must_use]
    pub fn questionnaire(self) -> Questionnaire {
        match self {
            GoalRange::Canonical => Questionnaire::canonical(),
            GoalRange::Extended => Questionnaire::extended(),
        }
    }

    #[must_use]
    pub fn scoring(self) -> ScoringTable {
        match self {
            GoalRange::Canonical => ScoringTable::canonical(),
            GoalRange::Extended => ScoringTable::extended(),
        }
    }
}

/// Options shared by every assessment the app opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentConfig {
    pub layout: FormLayout,
    pub goals: GoalRange,
    pub autosave_delay: Duration,
    /// Goals whose drafted bonus rule should be switched on.
    pub proposed_bonuses: Vec<GoalId>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            layout: FormLayout::default(),
            goals: GoalRange::default(),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            proposed_bonuses: Vec::new(),
        }
    }
}

impl AssessmentConfig {
    /// Scoring table with the requested proposed bonuses enabled.
    #[must_use]
    pub fn scoring_table(&self) -> ScoringTable {
        let mut table = self.goals.scoring();
        for goal in &self.proposed_bonuses {
            if !table.enable_proposed_bonus(*goal) {
                tracing::warn!(%goal, "no proposed bonus rule for goal");
            }
        }
        table
    }
}
