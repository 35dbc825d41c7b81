use sdg_core::model::{GoalId, SubmissionId};
use sdg_core::{PerformanceLevel, ScoreEntry};
use services::{SubmissionListItem, SubmissionReport};

use crate::vm::chart_vm::{BarChartVm, ChartError, RadarChartVm, bar_chart, radar_chart};
use crate::vm::time_fmt::format_datetime;

/// One breakdown row: score bar plus qualitative label.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRowVm {
    pub goal: GoalId,
    pub name: String,
    pub color: String,
    pub score: f64,
    pub score_str: String,
    /// Width of the score bar, 0 to 100.
    pub width_pct: u32,
    pub level: &'static str,
    pub badge_class: &'static str,
    pub notes: String,
}

impl From<&ScoreEntry> for ScoreRowVm {
    fn from(entry: &ScoreEntry) -> Self {
        let level = PerformanceLevel::from_score(entry.total_score);
        Self {
            goal: entry.number,
            name: entry.name.clone(),
            color: entry.color_code.clone(),
            score: entry.total_score,
            score_str: format!("{:.1}", entry.total_score),
            width_pct: percent_of_ten(entry.total_score),
            level: level.label(),
            badge_class: level.badge_class(),
            notes: entry.notes.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryVm {
    pub label: &'static str,
    pub average_str: String,
    pub width_pct: u32,
    pub goals: usize,
    pub top: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationVm {
    pub title: String,
    pub score_str: String,
    pub actions: Vec<&'static str>,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsVm {
    pub id: SubmissionId,
    pub submitted_at_str: String,
    pub overall_str: String,
    pub overall_level: &'static str,
    pub overall_badge: &'static str,
    pub evaluated_pct: u32,
    pub rows: Vec<ScoreRowVm>,
    pub categories: Vec<CategoryVm>,
    pub strengths: Vec<ScoreRowVm>,
    pub improvements: Vec<ScoreRowVm>,
    pub recommendations: Vec<RecommendationVm>,
    /// Chart geometry is computed per chart so one failure leaves the other
    /// visible.
    pub radar: Result<RadarChartVm, ChartError>,
    pub bars: Result<BarChartVm, ChartError>,
}

#[must_use]
pub fn map_results(report: &SubmissionReport) -> ResultsVm {
    let data = &report.report;
    let level = data.overall_level();
    let categories = data
        .categories
        .iter()
        .map(|category| CategoryVm {
            label: category.category.label(),
            average_str: format!("{:.1}", category.average),
            width_pct: percent_of_ten(category.average),
            goals: category.count,
            top: data.top_category == Some(category.category),
        })
        .collect();
    let recommendations = data
        .recommendations
        .iter()
        .map(|rec| RecommendationVm {
            title: format!("SDG {}: {}", rec.goal.number(), rec.name),
            score_str: format!("{:.1}", rec.score),
            actions: rec.actions.clone(),
            link: rec.link.clone(),
        })
        .collect();

    ResultsVm {
        id: report.id,
        submitted_at_str: format_datetime(report.submitted_at),
        overall_str: format!("{:.1}", data.overall),
        overall_level: level.label(),
        overall_badge: level.badge_class(),
        evaluated_pct: data.evaluated_percent(),
        rows: data.entries.iter().map(ScoreRowVm::from).collect(),
        categories,
        strengths: data.strengths.iter().map(ScoreRowVm::from).collect(),
        improvements: data.improvements.iter().map(ScoreRowVm::from).collect(),
        recommendations,
        radar: radar_chart(&data.entries),
        bars: bar_chart(&data.entries),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionCardVm {
    pub id: SubmissionId,
    pub submitted_at_str: String,
    pub overall_str: String,
    pub level: &'static str,
    pub badge_class: &'static str,
}

impl From<&SubmissionListItem> for SubmissionCardVm {
    fn from(item: &SubmissionListItem) -> Self {
        Self {
            id: item.id,
            submitted_at_str: format_datetime(item.submitted_at),
            overall_str: format!("{:.1}", item.overall),
            level: item.level.label(),
            badge_class: item.level.badge_class(),
        }
    }
}

#[must_use]
pub fn map_submission_cards(items: &[SubmissionListItem]) -> Vec<SubmissionCardVm> {
    items.iter().map(SubmissionCardVm::from).collect()
}

fn percent_of_ten(score: f64) -> u32 {
    // Scores are clamped to 0..=10 upstream; the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (score.clamp(0.0, 10.0) * 10.0).round() as u32;
    pct
}
