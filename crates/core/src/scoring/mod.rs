//! Maps questionnaire answers to a bounded 0..=10 score per goal.
//!
//! Every goal is described by a [`GoalRule`] in a [`ScoringTable`]; a single
//! generic routine evaluates all of them.

mod table;

use serde::{Deserialize, Serialize};

use crate::model::{
    Assessment, CANONICAL_GOAL_COUNT, EXTENDED_GOAL_COUNT, GoalId, GoalInfo, Section,
};

pub use table::{BonusCondition, BonusRule, GoalRule, ScorePart};

pub const MAX_GOAL_SCORE: f64 = 10.0;

/// Per-goal result with display metadata attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub number: GoalId,
    pub name: String,
    pub color_code: String,
    pub direct_score: f64,
    pub bonus_score: f64,
    pub total_score: f64,
    pub notes: String,
}

/// Direct, bonus and clamped total for one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionScore {
    pub direct: f64,
    pub bonus: f64,
    pub total: f64,
}

/// Clamps to `[0, 10]` and rounds to one decimal.
#[must_use]
pub fn finalize_score(raw: f64) -> f64 {
    let clamped = if raw.is_finite() {
        raw.clamp(0.0, MAX_GOAL_SCORE)
    } else {
        0.0
    };
    (clamped * 10.0).round() / 10.0
}

/// Ordered goal rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTable {
    rules: Vec<GoalRule>,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ScoringTable {
    #[must_use]
    pub fn new(rules: Vec<GoalRule>) -> Self {
        Self { rules }
    }

    /// Rules for the 17 canonical goals, bonuses on goals 3 and 5 only.
    #[must_use]
    pub fn canonical() -> Self {
        Self::up_to(CANONICAL_GOAL_COUNT)
    }

    /// Canonical rules plus the experimental goals 18 to 27.
    #[must_use]
    pub fn extended() -> Self {
        Self::up_to(EXTENDED_GOAL_COUNT)
    }

    fn up_to(last: u32) -> Self {
        let rules = (1..=last)
            .map(|n| GoalRule {
                goal: GoalId::new(n),
                parts: table::parts_for(n),
                bonus: table::default_bonus(n),
            })
            .collect();
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[GoalRule] {
        &self.rules
    }

    #[must_use]
    pub fn rule(&self, goal: GoalId) -> Option<&GoalRule> {
        self.rules.iter().find(|rule| rule.goal == goal)
    }

    /// Replaces (or removes, with `None`) the bonus rule of one goal.
    ///
    /// Returns `false` if the table has no rule for `goal`.
    pub fn set_bonus(&mut self, goal: GoalId, bonus: Option<BonusRule>) -> bool {
        match self.rules.iter_mut().find(|rule| rule.goal == goal) {
            Some(rule) => {
                rule.bonus = bonus;
                true
            }
            None => false,
        }
    }

    /// Turns on the drafted bonus rule of a goal, if one exists.
    pub fn enable_proposed_bonus(&mut self, goal: GoalId) -> bool {
        match table::proposed_bonus(goal.number()) {
            Some(bonus) => self.set_bonus(goal, Some(bonus)),
            None => false,
        }
    }

    /// Score breakdown for one section. Goals without a rule score 0.
    #[must_use]
    pub fn section_score(&self, goal: GoalId, section: &Section) -> SectionScore {
        let Some(rule) = self.rule(goal) else {
            return SectionScore {
                direct: 0.0,
                bonus: 0.0,
                total: 0.0,
            };
        };
        let direct = rule.direct_score(section);
        let bonus = rule.bonus_score(section);
        SectionScore {
            direct,
            bonus,
            total: finalize_score(direct + bonus),
        }
    }

    /// Final score of one section, in `[0, 10]` with one decimal.
    #[must_use]
    pub fn score_section(&self, goal: GoalId, section: &Section) -> f64 {
        self.section_score(goal, section).total
    }

    /// Scores every goal of the table; sections missing from the assessment
    /// are scored as empty.
    #[must_use]
    pub fn score_assessment(&self, assessment: &Assessment) -> Vec<ScoreEntry> {
        let empty = Section::new();
        self.rules
            .iter()
            .map(|rule| {
                let section = assessment.section(rule.goal).unwrap_or(&empty);
                let score = self.section_score(rule.goal, section);
                let info = GoalInfo::lookup(rule.goal);
                ScoreEntry {
                    number: rule.goal,
                    name: info.name,
                    color_code: info.color_code,
                    direct_score: score.direct,
                    bonus_score: score.bonus,
                    total_score: score.total,
                    notes: section.notes().to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, ProjectId};

    fn section(pairs: &[(&str, FieldValue)]) -> Section {
        pairs.iter().fold(Section::new(), |section, (field, value)| {
            section.with_input(*field, value.clone())
        })
    }

    #[test]
    fn goal_one_moderate_cost_reduction_scores_five() {
        let table = ScoringTable::canonical();
        let section = section(&[("sdg1_cost_reduction", FieldValue::text("cost_reduc_3"))]);
        let score = table.section_score(GoalId::new(1), &section);
        assert_eq!(score.direct, 5.0);
        assert_eq!(score.bonus, 0.0);
        assert_eq!(score.total, 5.0);
    }

    #[test]
    fn goal_three_bonus_is_clamped_to_ten() {
        let table = ScoringTable::canonical();
        let section = section(&[
            ("sdg3_health_summary", FieldValue::text("5")),
            (
                "sdg3_actions",
                FieldValue::choices([
                    "materials",
                    "air_quality",
                    "water_quality",
                    "lighting_quality",
                    "acoustic_comfort",
                    "soil_cleaning",
                ]),
            ),
        ]);
        let score = table.section_score(GoalId::new(3), &section);
        assert_eq!(score.direct, 10.0);
        assert_eq!(score.bonus, 1.0);
        assert_eq!(score.total, 10.0);
    }

    #[test]
    fn goal_three_bonus_needs_six_actions() {
        let table = ScoringTable::canonical();
        let section = section(&[
            ("sdg3_health_summary", FieldValue::text("5")),
            (
                "sdg3_actions",
                FieldValue::choices(["materials", "air_quality", "water_quality"]),
            ),
        ]);
        assert_eq!(table.section_score(GoalId::new(3), &section).bonus, 0.0);
    }

    #[test]
    fn unknown_or_missing_value_scores_zero() {
        let table = ScoringTable::canonical();
        let odd = section(&[("sdg7_renewable_impact", FieldValue::text("other"))]);
        assert_eq!(table.score_section(GoalId::new(7), &odd), 0.0);
        assert_eq!(table.score_section(GoalId::new(7), &Section::new()), 0.0);
    }

    #[test]
    fn split_goals_sum_both_parts() {
        let table = ScoringTable::canonical();
        let s8 = section(&[
            ("sdg8_social_summary", FieldValue::text("3")),
            ("sdg8_technical_summary", FieldValue::text("4")),
        ]);
        assert_eq!(table.score_section(GoalId::new(8), &s8), 7.0);
        let s15 = section(&[
            ("sdg15_ecosystem_summary", FieldValue::text("5")),
            ("sdg15_artificialisation_ratio", FieldValue::text("20")),
        ]);
        assert_eq!(table.score_section(GoalId::new(15), &s15), 9.0);
    }

    #[test]
    fn fractional_levels_keep_one_decimal() {
        let table = ScoringTable::canonical();
        let s6 = section(&[("sdg6_water_summary", FieldValue::text("5"))]);
        assert_eq!(table.score_section(GoalId::new(6), &s6), 8.5);
    }

    #[test]
    fn proposed_bonus_is_off_until_enabled() {
        let mut table = ScoringTable::canonical();
        let s9 = section(&[
            ("sdg9_innovation_summary", FieldValue::text("4")),
            ("sdg9_checks", FieldValue::choices(["renovation"])),
        ]);
        assert_eq!(table.score_section(GoalId::new(9), &s9), 8.0);
        assert!(table.enable_proposed_bonus(GoalId::new(9)));
        // trigger is "5", so a "4" still earns nothing extra
        assert_eq!(table.score_section(GoalId::new(9), &s9), 8.0);

        let s9_all = section(&[
            ("sdg9_innovation_summary", FieldValue::text("4")),
            ("sdg9_checks", FieldValue::choices(["renovation"])),
        ])
        .with_input("sdg9_innovation_summary", FieldValue::text("5"));
        let score = table.section_score(GoalId::new(9), &s9_all);
        assert_eq!((score.direct, score.bonus, score.total), (10.0, 1.0, 10.0));
    }

    #[test]
    fn bonus_can_be_disabled_per_goal() {
        let mut table = ScoringTable::canonical();
        assert!(table.set_bonus(GoalId::new(5), None));
        let s5 = section(&[
            ("sdg5_equality_summary", FieldValue::text("4")),
            (
                "sdg5_actions",
                FieldValue::choices(["equal_pay", "safe_spaces", "childcare", "training", "sanitary"]),
            ),
        ]);
        assert_eq!(table.section_score(GoalId::new(5), &s5).bonus, 0.0);
        assert!(!table.set_bonus(GoalId::new(22), None));
    }

    #[test]
    fn score_assessment_covers_every_goal_with_metadata() {
        let mut assessment = Assessment::new(
            ProjectId::new(1),
            None,
            crate::model::canonical_goals(),
        )
        .unwrap();
        assessment
            .set_input(GoalId::new(1), "sdg1_cost_reduction", FieldValue::text("cost_reduc_3"))
            .unwrap();
        assessment.set_notes(GoalId::new(1), "solar").unwrap();

        let entries = ScoringTable::canonical().score_assessment(&assessment);
        assert_eq!(entries.len(), 17);
        assert_eq!(entries[0].name, "No Poverty");
        assert_eq!(entries[0].color_code, "#E5243B");
        assert_eq!(entries[0].total_score, 5.0);
        assert_eq!(entries[0].notes, "solar");
        assert!(entries[1..].iter().all(|e| e.total_score == 0.0));
    }

    #[test]
    fn extended_table_scores_experimental_goals() {
        let table = ScoringTable::extended();
        assert_eq!(table.rules().len(), 27);
        let s21 = section(&[("sdg21_consumption_summary", FieldValue::text("5"))]);
        assert_eq!(table.score_section(GoalId::new(21), &s21), 8.5);
        assert_eq!(
            ScoringTable::canonical().score_section(GoalId::new(21), &s21),
            0.0
        );
    }

    #[test]
    fn finalize_clamps_and_rounds() {
        assert_eq!(finalize_score(11.0), 10.0);
        assert_eq!(finalize_score(-2.0), 0.0);
        assert_eq!(finalize_score(7.46), 7.5);
        assert_eq!(finalize_score(f64::NAN), 0.0);
    }

    #[test]
    fn scoring_is_deterministic_and_bounded() {
        let table = ScoringTable::extended();
        let questionnaire = crate::questionnaire::Questionnaire::extended();
        for schema in questionnaire.sections() {
            for field in schema.fields() {
                for option in field.options() {
                    let s = Section::new().with_input(field.name(), FieldValue::text(&option.value));
                    let first = table.score_section(schema.goal(), &s);
                    let second = table.score_section(schema.goal(), &s);
                    assert_eq!(first, second);
                    assert!((0.0..=10.0).contains(&first));
                }
            }
        }
    }
}
