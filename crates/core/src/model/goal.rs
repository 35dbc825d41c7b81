use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::GoalId;

/// Number of canonical UN Sustainable Development Goals.
pub const CANONICAL_GOAL_COUNT: u32 = 17;

/// Highest goal number of the experimental extended range.
pub const EXTENDED_GOAL_COUNT: u32 = 27;

const FALLBACK_COLOR: &str = "#CCCCCC";

const CATALOG: [(&str, &str); CANONICAL_GOAL_COUNT as usize] = [
    ("No Poverty", "#E5243B"),
    ("Zero Hunger", "#DDA63A"),
    ("Good Health and Well-being", "#4C9F38"),
    ("Quality Education", "#C5192D"),
    ("Gender Equality", "#FF3A21"),
    ("Clean Water and Sanitation", "#26BDE2"),
    ("Affordable and Clean Energy", "#FCC30B"),
    ("Decent Work and Economic Growth", "#A21942"),
    ("Industry, Innovation and Infrastructure", "#FD6925"),
    ("Reduced Inequalities", "#DD1367"),
    ("Sustainable Cities and Communities", "#FD9D24"),
    ("Responsible Consumption and Production", "#BF8B2E"),
    ("Climate Action", "#3F7E44"),
    ("Life Below Water", "#0A97D9"),
    ("Life on Land", "#56C02B"),
    ("Peace, Justice and Strong Institutions", "#00689D"),
    ("Partnerships for the Goals", "#19486A"),
];

/// Display metadata for a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalInfo {
    pub id: GoalId,
    pub name: String,
    pub color_code: String,
}

impl GoalInfo {
    /// Looks up a goal, falling back to `SDG N` and a neutral grey.
    #[must_use]
    pub fn lookup(id: GoalId) -> Self {
        let entry = usize::try_from(id.number())
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| CATALOG.get(idx));
        match entry {
            Some((name, color)) => Self {
                id,
                name: (*name).to_string(),
                color_code: (*color).to_string(),
            },
            None => Self {
                id,
                name: format!("SDG {}", id.number()),
                color_code: FALLBACK_COLOR.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_canonical(&self) -> bool {
        (1..=CANONICAL_GOAL_COUNT).contains(&self.id.number())
    }
}

/// The 17 canonical goals in order.
#[must_use]
pub fn canonical_goals() -> Vec<GoalId> {
    (1..=CANONICAL_GOAL_COUNT).map(GoalId::new).collect()
}

/// Canonical goals followed by the experimental 18 to 27 range.
#[must_use]
pub fn extended_goals() -> Vec<GoalId> {
    (1..=EXTENDED_GOAL_COUNT).map(GoalId::new).collect()
}

//
// ─── CATEGORIES ────────────────────────────────────────────────────────────────
//

/// The five "P" buckets used to aggregate goal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    People,
    Planet,
    Prosperity,
    Peace,
    Partnership,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::People,
        Category::Planet,
        Category::Prosperity,
        Category::Peace,
        Category::Partnership,
    ];

    #[must_use]
    pub fn goals(self) -> &'static [u32] {
        match self {
            Category::People => &[1, 2, 3, 4, 5],
            Category::Planet => &[6, 12, 13, 14, 15],
            Category::Prosperity => &[7, 8, 9, 10, 11],
            Category::Peace => &[16],
            Category::Partnership => &[17],
        }
    }

    #[must_use]
    pub fn of(goal: GoalId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.goals().contains(&goal.number()))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::People => "People",
            Category::Planet => "Planet",
            Category::Prosperity => "Prosperity",
            Category::Peace => "Peace",
            Category::Partnership => "Partnership",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
