use crate::model::{FieldValue, GoalId, Section};

/// Maps the values of one categorical field to points.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePart {
    pub field: &'static str,
    pub levels: &'static [(&'static str, f64)],
}

impl ScorePart {
    /// Points for the recorded value; unknown or missing values score 0.
    #[must_use]
    pub fn points(&self, section: &Section) -> f64 {
        section
            .text(self.field)
            .and_then(|value| {
                self.levels
                    .iter()
                    .find(|(level, _)| *level == value)
                    .map(|(_, points)| *points)
            })
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BonusCondition {
    /// Companion selection has at least this many entries.
    MinChecked(usize),
    /// Companion selection contains any of these values.
    AnyOf(&'static [&'static str]),
}

/// Extra points when the summary claims full coverage and a companion
/// multi-select backs it up.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusRule {
    pub trigger: &'static str,
    pub companion: &'static str,
    pub condition: BonusCondition,
    pub points: f64,
}

impl BonusRule {
    #[must_use]
    pub fn applies(&self, summary: Option<&str>, section: &Section) -> bool {
        if summary != Some(self.trigger) {
            return false;
        }
        let companion = section.input(self.companion);
        match &self.condition {
            BonusCondition::MinChecked(min) => {
                companion.map_or(0, FieldValue::checked_count) >= *min
            }
            BonusCondition::AnyOf(values) => companion
                .is_some_and(|selected| values.iter().any(|value| selected.contains(value))),
        }
    }
}

/// Declarative scoring of one goal.
///
/// The first part is the summary field that bonus triggers are compared
/// against. Goals split in two sub-questions carry two parts capped at 5.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRule {
    pub goal: GoalId,
    pub parts: Vec<ScorePart>,
    pub bonus: Option<BonusRule>,
}

impl GoalRule {
    #[must_use]
    pub fn direct_score(&self, section: &Section) -> f64 {
        self.parts.iter().map(|part| part.points(section)).sum()
    }

    #[must_use]
    pub fn bonus_score(&self, section: &Section) -> f64 {
        let summary = self.parts.first().and_then(|part| section.text(part.field));
        self.bonus
            .as_ref()
            .filter(|bonus| bonus.applies(summary, section))
            .map_or(0.0, |bonus| bonus.points)
    }
}

//
// ─── LEVEL TABLES ──────────────────────────────────────────────────────────────
//

const STEP_TWO: &[(&str, f64)] = &[
    ("0", 0.0),
    ("1", 2.0),
    ("2", 4.0),
    ("3", 6.0),
    ("4", 8.0),
    ("5", 10.0),
];

const HALF_SCALE: &[(&str, f64)] = &[
    ("0", 0.0),
    ("1", 1.0),
    ("2", 2.0),
    ("3", 3.0),
    ("4", 4.0),
    ("5", 5.0),
];

const EXPERIMENTAL_FIVE: &[(&str, f64)] = &[
    ("0", 0.0),
    ("1", 1.5),
    ("2", 3.5),
    ("3", 5.5),
    ("4", 7.5),
    ("5", 10.0),
];

const EXPERIMENTAL_SIX: &[(&str, f64)] = &[
    ("0", 0.0),
    ("1", 1.5),
    ("2", 3.0),
    ("3", 5.0),
    ("4", 7.0),
    ("5", 8.5),
    ("6", 10.0),
];

const MEASURES: &[(&str, f64)] = &[
    ("none", 0.0),
    ("one", 2.0),
    ("two", 4.0),
    ("three", 6.0),
    ("four", 8.0),
    ("five", 10.0),
];

const EXPERIMENTAL_MEASURES: &[(&str, f64)] = &[
    ("none", 0.0),
    ("one", 1.5),
    ("two", 3.5),
    ("three", 5.5),
    ("four", 7.5),
    ("five", 10.0),
];

const ARTIFICIALISATION: &[(&str, f64)] = &[
    ("100", 0.0),
    ("80", 1.0),
    ("60", 2.0),
    ("40", 3.0),
    ("20", 4.0),
    ("0", 5.0),
];

fn part(field: &'static str, levels: &'static [(&'static str, f64)]) -> ScorePart {
    ScorePart { field, levels }
}

fn min_checked(trigger: &'static str, companion: &'static str, min: usize) -> BonusRule {
    BonusRule {
        trigger,
        companion,
        condition: BonusCondition::MinChecked(min),
        points: 1.0,
    }
}

/// Scoring parts for a goal; empty for goals without a rule.
#[allow(clippy::too_many_lines)]
pub(super) fn parts_for(goal: u32) -> Vec<ScorePart> {
    match goal {
        1 => vec![part(
            "sdg1_cost_reduction",
            &[
                ("cost_reduc_2", 3.0),
                ("cost_reduc_3", 5.0),
                ("cost_reduc_4", 7.0),
                ("self_sufficient", 9.0),
                ("energy_producing", 10.0),
            ],
        )],
        2 => vec![part(
            "sdg2_food_integration",
            &[
                ("none", 0.0),
                ("study", 2.0),
                ("conversion", 4.0),
                ("community", 6.0),
                ("private", 8.0),
                ("production", 10.0),
            ],
        )],
        3 => vec![part("sdg3_health_summary", STEP_TWO)],
        4 => vec![part(
            "sdg4_accessibility_summary",
            &[
                ("0", 0.0),
                ("study", 2.0),
                ("1", 3.0),
                ("2", 5.0),
                ("3", 7.0),
                ("4", 10.0),
            ],
        )],
        5 => vec![part("sdg5_equality_summary", STEP_TWO)],
        6 => vec![part(
            "sdg6_water_summary",
            &[
                ("0", 0.0),
                ("1", 1.5),
                ("2", 3.0),
                ("3", 5.0),
                ("4", 7.0),
                ("5", 8.5),
                ("exceptional", 10.0),
            ],
        )],
        7 => vec![part(
            "sdg7_renewable_impact",
            &[
                ("none", 0.0),
                ("reduc_25", 2.0),
                ("reduc_50", 4.0),
                ("reduc_75", 6.0),
                ("neutral", 8.0),
                ("positive", 10.0),
            ],
        )],
        8 => vec![
            part("sdg8_social_summary", HALF_SCALE),
            part("sdg8_technical_summary", HALF_SCALE),
        ],
        9 => vec![part("sdg9_innovation_summary", STEP_TWO)],
        10 => vec![part("sdg10_inclusion_summary", STEP_TWO)],
        11 => vec![part("sdg11_measures", MEASURES)],
        12 => vec![part(
            "sdg12_consumption_summary",
            &[
                ("0", 0.0),
                ("1", 2.0),
                ("2", 4.0),
                ("3", 6.0),
                ("4", 7.0),
                ("5", 8.5),
                ("6", 10.0),
            ],
        )],
        13 => vec![
            part("sdg13_actions_summary", HALF_SCALE),
            part(
                "sdg13_carbon_reduction",
                &[
                    ("none", 0.0),
                    ("minimal", 1.0),
                    ("moderate", 2.0),
                    ("significant", 3.0),
                    ("major", 4.0),
                    ("negative", 5.0),
                ],
            ),
        ],
        14 => vec![part("sdg14_pollution_summary", STEP_TWO)],
        15 => vec![
            part("sdg15_ecosystem_summary", HALF_SCALE),
            part("sdg15_artificialisation_ratio", ARTIFICIALISATION),
        ],
        16 => vec![part("sdg16_peace_summary", STEP_TWO)],
        17 => vec![part(
            "sdg17_partnership_summary",
            &[
                ("0", 0.0),
                ("1", 2.0),
                ("2", 4.0),
                ("3", 6.0),
                ("4", 7.5),
                ("5", 9.0),
                ("6", 10.0),
            ],
        )],
        18 => vec![part("sdg18_innovation_summary", EXPERIMENTAL_FIVE)],
        19 => vec![part("sdg19_inclusion_summary", EXPERIMENTAL_FIVE)],
        20 => vec![part("sdg20_measures", EXPERIMENTAL_MEASURES)],
        21 => vec![part("sdg21_consumption_summary", EXPERIMENTAL_SIX)],
        22 => vec![part("sdg22_innovation_summary", EXPERIMENTAL_FIVE)],
        23 => vec![part("sdg23_pollution_summary", EXPERIMENTAL_FIVE)],
        24 => vec![
            part("sdg24_ecosystem_summary", HALF_SCALE),
            part("sdg24_artificialisation_ratio", ARTIFICIALISATION),
        ],
        25 => vec![part("sdg25_peace_summary", EXPERIMENTAL_FIVE)],
        26 => vec![part("sdg26_partnership_summary", EXPERIMENTAL_SIX)],
        27 => vec![part("sdg27_innovation_summary", EXPERIMENTAL_FIVE)],
        _ => Vec::new(),
    }
}

/// Bonus rules active out of the box.
pub(super) fn default_bonus(goal: u32) -> Option<BonusRule> {
    match goal {
        3 => Some(min_checked("5", "sdg3_actions", 6)),
        5 => Some(min_checked("5", "sdg5_actions", 5)),
        _ => None,
    }
}

/// Drafted bonus rules that are switched off unless enabled per goal.
pub(super) fn proposed_bonus(goal: u32) -> Option<BonusRule> {
    match goal {
        9 => Some(BonusRule {
            trigger: "5",
            companion: "sdg9_checks",
            condition: BonusCondition::AnyOf(&["innovate_process", "renovation"]),
            points: 1.0,
        }),
        10 => Some(min_checked("5", "sdg10_checks", 5)),
        11 => Some(min_checked("five", "sdg11_checks", 5)),
        12 => Some(min_checked("6", "sdg12_checks", 6)),
        14 => Some(min_checked("5", "sdg14_checks", 5)),
        16 => Some(min_checked("5", "sdg16_checks", 5)),
        17 => Some(min_checked("6", "sdg17_checks", 6)),
        other => default_bonus(other),
    }
}
