use dioxus::prelude::*;
use dioxus_router::Link;

use sdg_core::model::SubmissionId;
use services::ResultsError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    BarChartVm, CategoryVm, ChartError, RadarChartVm, RecommendationVm, ResultsVm, ScoreRowVm,
    map_results,
};

#[component]
pub fn ResultsView(submission_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let results = ctx.results();
    let project_id = ctx.project_id().value();
    let id = SubmissionId::new(submission_id);

    let resource = use_resource(move || {
        let results = results.clone();
        async move {
            let report = results.report(id).await.map_err(|err| match err {
                ResultsError::NotFound(_) => ViewError::NotFound,
                _ => ViewError::Unknown,
            })?;
            Ok(map_results(&report))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page results",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { to: Route::Home {}, "Back to overview" }
                },
                ViewState::Ready(data) => rsx! {
                    Dashboard { data, project_id }
                },
            }
        }
    }
}

#[component]
fn Dashboard(data: ResultsVm, project_id: u64) -> Element {
    rsx! {
        header { class: "results-header",
            h2 { "Assessment results" }
            p { class: "muted", "Submitted {data.submitted_at_str}" }
            div { class: "overall",
                span { class: "overall-score", "{data.overall_str}" }
                span { class: "overall-max", " / 10 " }
                span { class: "badge {data.overall_badge}", "{data.overall_level}" }
            }
            p { class: "muted", "{data.evaluated_pct}% of the goals evaluated" }
        }

        div { class: "charts",
            ChartPanel { title: "Profile",
                RadarChart { chart: data.radar.clone() }
            }
            ChartPanel { title: "Scores by goal",
                BarChart { chart: data.bars.clone() }
            }
        }

        section { class: "breakdown",
            h3 { "Breakdown" }
            for row in data.rows.clone() {
                ScoreRow { key: "{row.goal}", row }
            }
        }

        section { class: "categories",
            h3 { "By category" }
            for category in data.categories.clone() {
                CategoryRow { key: "{category.label}", category }
            }
        }

        div { class: "highlights",
            section { class: "strengths",
                h3 { "Strengths" }
                if data.strengths.is_empty() {
                    p { class: "muted", "No goal scored 6 or above yet." }
                }
                for row in data.strengths.clone() {
                    ScoreRow { key: "{row.goal}", row }
                }
            }
            section { class: "improvements",
                h3 { "Areas for improvement" }
                if data.improvements.is_empty() {
                    p { class: "muted", "Every goal scored 6 or above." }
                }
                for row in data.improvements.clone() {
                    ScoreRow { key: "{row.goal}", row }
                }
            }
        }

        section { class: "recommendations",
            h3 { "Recommendations" }
            for rec in data.recommendations.clone() {
                RecommendationCard { key: "{rec.title}", rec }
            }
        }

        div { class: "form-actions",
            Link { class: "btn btn-secondary", to: Route::Home {}, "Back to overview" }
            Link { class: "btn btn-primary", to: Route::Assessment { project_id }, "New assessment" }
        }
    }
}

/// A chart that cannot be drawn swaps itself for a placeholder; the panel
/// around it stays.
#[component]
fn ChartPanel(title: &'static str, children: Element) -> Element {
    rsx! {
        section { class: "chart-panel",
            h3 { "{title}" }
            {children}
        }
    }
}

#[component]
fn ChartPlaceholder(message: String) -> Element {
    rsx! {
        div { class: "chart-placeholder", role: "status", "{message}" }
    }
}

#[component]
fn RadarChart(chart: Result<RadarChartVm, ChartError>) -> Element {
    let chart = match chart {
        Ok(chart) => chart,
        Err(err) => {
            tracing::debug!(error = %err, "radar chart skipped");
            return rsx! {
                ChartPlaceholder { message: format!("Chart unavailable: {err}.") }
            };
        }
    };
    let center = chart.center;

    rsx! {
        svg {
            class: "radar-chart",
            view_box: "0 0 {chart.size} {chart.size}",
            for (idx, ring) in chart.rings.iter().enumerate() {
                polygon { key: "{idx}", class: "radar-ring", points: "{ring}" }
            }
            for axis in chart.axes.clone() {
                g { key: "{axis.label}",
                    line {
                        class: "radar-axis",
                        x1: "{center}",
                        y1: "{center}",
                        x2: "{axis.x2}",
                        y2: "{axis.y2}",
                    }
                    text {
                        class: "radar-label",
                        x: "{axis.label_x}",
                        y: "{axis.label_y}",
                        text_anchor: "{axis.anchor}",
                        "{axis.label}"
                    }
                }
            }
            polygon { class: "radar-area", points: "{chart.polygon}" }
        }
    }
}

#[component]
fn BarChart(chart: Result<BarChartVm, ChartError>) -> Element {
    let chart = match chart {
        Ok(chart) => chart,
        Err(err) => {
            tracing::debug!(error = %err, "bar chart skipped");
            return rsx! {
                ChartPlaceholder { message: format!("Chart unavailable: {err}.") }
            };
        }
    };
    let label_y = chart.baseline + 16.0;

    rsx! {
        svg {
            class: "bar-chart",
            view_box: "0 0 {chart.width} {chart.height}",
            for tick in chart.grid.clone() {
                g { key: "{tick.label}",
                    line { class: "bar-grid", x1: "26", y1: "{tick.y}", x2: "{chart.width}", y2: "{tick.y}" }
                    text { class: "bar-axis-label", x: "22", y: "{tick.y}", text_anchor: "end", "{tick.label}" }
                }
            }
            for bar in chart.bars.clone() {
                g { key: "{bar.label}",
                    rect {
                        x: "{bar.x}",
                        y: "{bar.y}",
                        width: "{bar.width}",
                        height: "{bar.height}",
                        fill: "{bar.color}",
                        title { "SDG {bar.label}: {bar.value_str}" }
                    }
                    text { class: "bar-label", x: "{bar.label_x}", y: "{label_y}", text_anchor: "middle", "{bar.label}" }
                }
            }
        }
    }
}

#[component]
fn ScoreRow(row: ScoreRowVm) -> Element {
    rsx! {
        div { class: "score-row",
            span { class: "goal-chip", style: "background-color: {row.color}", "{row.goal.number()}" }
            span { class: "goal-name", "{row.name}" }
            div { class: "progress",
                div {
                    class: "progress-bar",
                    style: "width: {row.width_pct}%; background-color: {row.color}",
                }
            }
            span { class: "goal-score", "{row.score_str}" }
            span { class: "badge {row.badge_class}", "{row.level}" }
        }
    }
}

#[component]
fn CategoryRow(category: CategoryVm) -> Element {
    let class = if category.top {
        "category-row top"
    } else {
        "category-row"
    };
    rsx! {
        div { class,
            span { class: "category-name", "{category.label}" }
            div { class: "progress",
                div { class: "progress-bar", style: "width: {category.width_pct}%" }
            }
            span { class: "category-score", "{category.average_str}" }
            span { class: "muted", " ({category.goals} goals)" }
        }
    }
}

#[component]
fn RecommendationCard(rec: RecommendationVm) -> Element {
    rsx! {
        article { class: "recommendation",
            h4 { "{rec.title}" }
            p { class: "muted", "Current score: {rec.score_str}" }
            ul {
                for action in rec.actions.iter() {
                    li { "{action}" }
                }
            }
            a { href: "{rec.link}", target: "_blank", "Official goal targets" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_core::model::{GoalId, GoalInfo};
    use sdg_core::ScoreEntry;

    use crate::vm::{bar_chart, radar_chart};

    fn two_goals() -> Vec<ScoreEntry> {
        [(1, 5.0), (7, 8.0)]
            .into_iter()
            .map(|(goal, score)| {
                let info = GoalInfo::lookup(GoalId::new(goal));
                ScoreEntry {
                    number: info.id,
                    name: info.name,
                    color_code: info.color_code,
                    direct_score: score,
                    bonus_score: 0.0,
                    total_score: score,
                    notes: String::new(),
                }
            })
            .collect()
    }

    #[test]
    fn failed_radar_leaves_the_bar_chart_standing() {
        let entries = two_goals();
        let radar = radar_chart(&entries);
        let bars = bar_chart(&entries);
        assert!(radar.is_err());

        let html = dioxus_ssr::render_element(rsx! {
            div { class: "charts",
                ChartPanel { title: "Profile",
                    RadarChart { chart: radar }
                }
                ChartPanel { title: "Scores by goal",
                    BarChart { chart: bars }
                }
            }
        });
        assert!(
            html.contains("Chart unavailable: a radar chart needs at least 3 goals, got 2."),
            "missing radar placeholder in {html}"
        );
        assert!(!html.contains("radar-chart"), "radar drawn anyway in {html}");
        assert!(html.contains("bar-chart"), "bar chart missing in {html}");
        assert!(html.contains("Scores by goal"), "panel title missing in {html}");
    }
}
