//! Aggregations shown on the results dashboard: qualitative labels,
//! category averages, strengths, improvement areas and recommendations.

use serde::Serialize;

use crate::model::{CANONICAL_GOAL_COUNT, Category, GoalId};
use crate::scoring::ScoreEntry;

/// Scores at or above this mark a strength; below it, an improvement area.
pub const STRENGTH_THRESHOLD: f64 = 6.0;

const HIGHLIGHT_LIMIT: usize = 3;

const FALLBACK_RECOMMENDATION: &str =
    "Review the official targets of this goal and look for proven improvement strategies.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            PerformanceLevel::Excellent
        } else if score >= 6.0 {
            PerformanceLevel::Good
        } else if score >= 4.0 {
            PerformanceLevel::Fair
        } else {
            PerformanceLevel::NeedsImprovement
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Fair => "Fair",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
        }
    }

    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "bg-success",
            PerformanceLevel::Good => "bg-primary",
            PerformanceLevel::Fair => "bg-warning",
            PerformanceLevel::NeedsImprovement => "bg-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub goal: GoalId,
    pub name: String,
    pub score: f64,
    pub actions: Vec<&'static str>,
    pub link: String,
}

/// Everything the dashboard needs, derived from a score list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsReport {
    pub entries: Vec<ScoreEntry>,
    pub overall: f64,
    pub categories: Vec<CategoryScore>,
    pub top_category: Option<Category>,
    pub strengths: Vec<ScoreEntry>,
    pub improvements: Vec<ScoreEntry>,
    pub recommendations: Vec<Recommendation>,
    pub evaluated: usize,
}

impl ResultsReport {
    #[must_use]
    pub fn from_scores(entries: Vec<ScoreEntry>) -> Self {
        let overall = round1(average(entries.iter().map(|e| e.total_score)));
        let categories = category_scores(&entries);
        let top_category = categories
            .iter()
            .filter(|c| c.count > 0)
            .fold(None::<&CategoryScore>, |best, c| match best {
                Some(b) if b.average >= c.average => Some(b),
                _ => Some(c),
            })
            .map(|c| c.category);

        let mut by_score: Vec<&ScoreEntry> = entries.iter().collect();
        by_score.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        let strengths = by_score
            .iter()
            .take(HIGHLIGHT_LIMIT)
            .filter(|e| e.total_score >= STRENGTH_THRESHOLD)
            .map(|e| (*e).clone())
            .collect();
        let improvements: Vec<ScoreEntry> = by_score
            .iter()
            .rev()
            .take(HIGHLIGHT_LIMIT)
            .filter(|e| e.total_score < STRENGTH_THRESHOLD)
            .map(|e| (*e).clone())
            .collect();
        // Stable ascending sort: tied goals keep their goal order.
        let mut weakest: Vec<&ScoreEntry> = entries
            .iter()
            .filter(|e| e.total_score < STRENGTH_THRESHOLD)
            .collect();
        weakest.sort_by(|a, b| a.total_score.total_cmp(&b.total_score));
        let recommendations = weakest
            .into_iter()
            .take(HIGHLIGHT_LIMIT)
            .map(recommendation_for)
            .collect();
        let evaluated = entries
            .iter()
            .filter(|e| (1..=CANONICAL_GOAL_COUNT).contains(&e.number.number()))
            .count();

        Self {
            entries,
            overall,
            categories,
            top_category,
            strengths,
            improvements,
            recommendations,
            evaluated,
        }
    }

    #[must_use]
    pub fn overall_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_score(self.overall)
    }

    /// Share of the 17 canonical goals that received a score, in percent.
    #[must_use]
    pub fn evaluated_percent(&self) -> u32 {
        let total = CANONICAL_GOAL_COUNT as usize;
        let pct = (self.evaluated.min(total) * 100 + total / 2) / total;
        u32::try_from(pct).unwrap_or(100)
    }
}

fn category_scores(entries: &[ScoreEntry]) -> Vec<CategoryScore> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let scores: Vec<f64> = entries
                .iter()
                .filter(|e| category.goals().contains(&e.number.number()))
                .map(|e| e.total_score)
                .collect();
            CategoryScore {
                category,
                average: round1(average(scores.iter().copied())),
                count: scores.len(),
            }
        })
        .collect()
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn recommendation_for(entry: &ScoreEntry) -> Recommendation {
    let n = entry.number.number();
    let actions = recommended_actions(n)
        .map(<[&str]>::to_vec)
        .unwrap_or_else(|| vec![FALLBACK_RECOMMENDATION]);
    Recommendation {
        goal: entry.number,
        name: entry.name.clone(),
        score: entry.total_score,
        actions,
        link: format!("https://sdgs.un.org/goals/goal{n}"),
    }
}

#[allow(clippy::too_many_lines)]
fn recommended_actions(goal: u32) -> Option<&'static [&'static str]> {
    let actions: &'static [&'static str] = match goal {
        1 => &[
            "Create local jobs during construction and operation.",
            "Include affordable housing units or low-cost material options.",
            "Provide flexible space that community enterprises can rent.",
        ],
        2 => &[
            "Add food growing areas such as allotments or green roofs.",
            "Favour local, sustainable food suppliers for on-site catering.",
            "Set up composting and food-waste reduction.",
        ],
        3 => &[
            "Select low-emission materials and size ventilation for good air quality.",
            "Give every occupied room daylight and outside views.",
            "Plan spaces that encourage physical activity and rest.",
        ],
        4 => &[
            "Explain the sustainable features on site with signage.",
            "Apply universal design so every user can get in and around.",
            "Provide rooms that can host workshops or training.",
        ],
        5 => &[
            "Provide suitable sanitary facilities for all genders.",
            "Audit public areas for the safety of vulnerable users.",
            "Check that every amenity is equally accessible.",
        ],
        6 => &[
            "Fit low-flow fixtures and efficient appliances.",
            "Harvest rainwater and reuse greywater.",
            "Plant drought-tolerant landscaping.",
        ],
        7 => &[
            "Generate renewable energy on site.",
            "Improve envelope insulation and airtightness.",
            "Specify efficient lighting and HVAC.",
        ],
        8 => &[
            "Source labour and materials locally and ethically.",
            "Design for durability and easy maintenance.",
            "Reserve ground-floor space for local businesses.",
        ],
        9 => &[
            "Design infrastructure to withstand climate hazards.",
            "Trial innovative low-impact materials or techniques.",
            "Leave room for future technical upgrades.",
        ],
        10 => &[
            "Go beyond the minimum accessibility rules.",
            "Design for users of different ages, abilities and cultures.",
            "Keep housing and services within reach of lower incomes.",
        ],
        11 => &[
            "Improve links to public transport, walking and cycling.",
            "Create safe, welcoming public spaces.",
            "Mix uses so daily needs are close by.",
        ],
        12 => &[
            "Prefer recycled content backed by environmental declarations.",
            "Design for disassembly and material reuse.",
            "Run a waste management plan on site and in use.",
        ],
        13 => &[
            "Assess climate risks and plan adaptation.",
            "Choose materials with low embodied carbon.",
            "Use passive design to cut energy demand.",
        ],
        14 => &[
            "Manage stormwater with sustainable drainage.",
            "Prevent water pollution during works and operation.",
            "Protect nearby aquatic habitats.",
        ],
        15 => &[
            "Plant native species and create habitats.",
            "Keep existing trees and ecosystems.",
            "Use certified timber and bio-based materials.",
        ],
        16 => &[
            "Communicate openly and involve stakeholders.",
            "Run an inclusive design process.",
            "Enforce fair labour and ethical procurement.",
        ],
        17 => &[
            "Work with local communities and sustainability experts.",
            "Publish performance data and lessons learned.",
            "Look for partners that can raise outcomes.",
        ],
        _ => return None,
    };
    Some(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalInfo;

    fn entry(n: u32, score: f64) -> ScoreEntry {
        let info = GoalInfo::lookup(GoalId::new(n));
        ScoreEntry {
            number: info.id,
            name: info.name,
            color_code: info.color_code,
            direct_score: score,
            bonus_score: 0.0,
            total_score: score,
            notes: String::new(),
        }
    }

    fn sample() -> Vec<ScoreEntry> {
        let scores = [
            9.0, 2.0, 8.0, 5.0, 7.0, 3.0, 10.0, 6.0, 4.0, 1.0, 6.5, 5.5, 8.5, 0.0, 7.5, 3.5, 6.0,
        ];
        scores
            .iter()
            .zip(1..)
            .map(|(score, n)| entry(n, *score))
            .collect()
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(PerformanceLevel::from_score(8.0).label(), "Excellent");
        assert_eq!(PerformanceLevel::from_score(7.9).label(), "Good");
        assert_eq!(PerformanceLevel::from_score(4.0).label(), "Fair");
        assert_eq!(PerformanceLevel::from_score(3.9).label(), "Needs Improvement");
    }

    #[test]
    fn category_averages() {
        let report = ResultsReport::from_scores(sample());
        let people = &report.categories[0];
        assert_eq!(people.category, Category::People);
        assert_eq!(people.count, 5);
        assert_eq!(people.average, 6.2);
        let peace = report
            .categories
            .iter()
            .find(|c| c.category == Category::Peace)
            .unwrap();
        assert_eq!(peace.average, 3.5);
        assert_eq!(report.top_category, Some(Category::People));
    }

    #[test]
    fn empty_categories_average_zero_and_never_win() {
        let report = ResultsReport::from_scores(vec![entry(16, 2.0)]);
        let people = &report.categories[0];
        assert_eq!((people.average, people.count), (0.0, 0));
        assert_eq!(report.top_category, Some(Category::Peace));
    }

    #[test]
    fn strengths_and_improvements() {
        let report = ResultsReport::from_scores(sample());
        let strengths: Vec<u32> = report.strengths.iter().map(|e| e.number.number()).collect();
        assert_eq!(strengths, vec![7, 1, 13]);
        let improvements: Vec<u32> = report
            .improvements
            .iter()
            .map(|e| e.number.number())
            .collect();
        assert_eq!(improvements, vec![14, 10, 2]);
    }

    #[test]
    fn strengths_require_good_scores() {
        let report = ResultsReport::from_scores(vec![entry(1, 5.0), entry(2, 7.0)]);
        assert_eq!(report.strengths.len(), 1);
        assert_eq!(report.improvements.len(), 1);
    }

    #[test]
    fn recommendations_target_lowest_goals() {
        let report = ResultsReport::from_scores(sample());
        assert_eq!(report.recommendations.len(), 3);
        let first = &report.recommendations[0];
        assert_eq!(first.goal, GoalId::new(14));
        assert_eq!(first.link, "https://sdgs.un.org/goals/goal14");
        assert_eq!(first.actions.len(), 3);
    }

    #[test]
    fn tied_recommendations_keep_goal_order() {
        let entries = vec![entry(2, 2.0), entry(4, 2.0), entry(6, 2.0), entry(9, 2.0), entry(12, 1.0)];
        let report = ResultsReport::from_scores(entries);
        let goals: Vec<u32> = report
            .recommendations
            .iter()
            .map(|r| r.goal.number())
            .collect();
        assert_eq!(goals, vec![12, 2, 4]);
    }

    #[test]
    fn experimental_goals_get_generic_recommendation() {
        let report = ResultsReport::from_scores(vec![entry(20, 1.0)]);
        assert_eq!(report.recommendations[0].actions, vec![FALLBACK_RECOMMENDATION]);
        assert_eq!(report.evaluated, 0);
    }

    #[test]
    fn overall_and_evaluated_share() {
        let report = ResultsReport::from_scores(sample());
        assert_eq!(report.evaluated, 17);
        assert_eq!(report.evaluated_percent(), 100);
        assert_eq!(report.overall, 5.4);
        assert_eq!(report.overall_level(), PerformanceLevel::Fair);
    }
}
