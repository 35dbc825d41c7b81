//! SVG geometry for the results charts.
//!
//! Both charts share a 0 to 10 value scale. Coordinates are in the chart's
//! own `viewBox` units so the views only interpolate strings.

use std::f64::consts::{FRAC_PI_2, TAU};

use sdg_core::ScoreEntry;
use sdg_core::model::GoalId;
use thiserror::Error;

pub const CHART_MAX: f64 = 10.0;
pub const RADAR_SIZE: f64 = 320.0;
const RADAR_RADIUS: f64 = 120.0;
const RADAR_LABEL_GAP: f64 = 18.0;
const RADAR_RINGS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

pub const BAR_HEIGHT: f64 = 220.0;
const BAR_SLOT: f64 = 36.0;
const BAR_WIDTH: f64 = 24.0;
const BAR_TOP: f64 = 10.0;
const BAR_BOTTOM: f64 = 30.0;
const BAR_LEFT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("no scores to chart")]
    Empty,
    #[error("a radar chart needs at least 3 goals, got {0}")]
    TooFewAxes(usize),
    #[error("score of {0} is not a number")]
    InvalidScore(GoalId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadarAxisVm {
    pub label: String,
    pub x2: f64,
    pub y2: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub anchor: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadarChartVm {
    pub size: f64,
    pub center: f64,
    pub axes: Vec<RadarAxisVm>,
    /// One `points` attribute per grid ring, innermost first.
    pub rings: Vec<String>,
    pub polygon: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarVm {
    pub label: String,
    pub value_str: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label_x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLineVm {
    pub y: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChartVm {
    pub width: f64,
    pub height: f64,
    pub baseline: f64,
    pub grid: Vec<GridLineVm>,
    pub bars: Vec<BarVm>,
}

/// One axis per goal, starting at 12 o'clock and going clockwise.
///
/// # Errors
///
/// Returns `ChartError` for fewer than three goals or non-finite scores.
pub fn radar_chart(entries: &[ScoreEntry]) -> Result<RadarChartVm, ChartError> {
    if entries.is_empty() {
        return Err(ChartError::Empty);
    }
    if entries.len() < 3 {
        return Err(ChartError::TooFewAxes(entries.len()));
    }
    let values = checked_scores(entries)?;
    let center = RADAR_SIZE / 2.0;
    let count = entries.len();
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / count as f64;
    let angle = |idx: usize| {
        #[allow(clippy::cast_precision_loss)]
        let idx = idx as f64;
        idx * step - FRAC_PI_2
    };
    let point = |idx: usize, radius: f64| {
        let a = angle(idx);
        (center + radius * a.cos(), center + radius * a.sin())
    };

    let axes = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (x2, y2) = point(idx, RADAR_RADIUS);
            let (label_x, label_y) = point(idx, RADAR_RADIUS + RADAR_LABEL_GAP);
            let anchor = if (label_x - center).abs() < 1.0 {
                "middle"
            } else if label_x > center {
                "start"
            } else {
                "end"
            };
            RadarAxisVm {
                label: format!("SDG {}", entry.number.number()),
                x2: round2(x2),
                y2: round2(y2),
                label_x: round2(label_x),
                label_y: round2(label_y),
                anchor,
            }
        })
        .collect();

    let rings = RADAR_RINGS
        .iter()
        .map(|ring| {
            points_attr((0..count).map(|idx| point(idx, RADAR_RADIUS * ring / CHART_MAX)))
        })
        .collect();
    let polygon = points_attr(
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| point(idx, RADAR_RADIUS * value / CHART_MAX)),
    );

    Ok(RadarChartVm {
        size: RADAR_SIZE,
        center,
        axes,
        rings,
        polygon,
    })
}

/// One bar per goal, coloured with the goal's palette entry.
///
/// # Errors
///
/// Returns `ChartError` for an empty list or non-finite scores.
pub fn bar_chart(entries: &[ScoreEntry]) -> Result<BarChartVm, ChartError> {
    if entries.is_empty() {
        return Err(ChartError::Empty);
    }
    let values = checked_scores(entries)?;
    let plot = BAR_HEIGHT - BAR_TOP - BAR_BOTTOM;
    let baseline = BAR_HEIGHT - BAR_BOTTOM;
    #[allow(clippy::cast_precision_loss)]
    let width = BAR_LEFT + BAR_SLOT * entries.len() as f64;

    let grid = (0..=5)
        .map(|tick| {
            let value = f64::from(tick) * 2.0;
            GridLineVm {
                y: round2(baseline - plot * value / CHART_MAX),
                label: format!("{value:.0}"),
            }
        })
        .collect();

    let bars = entries
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (entry, value))| {
            #[allow(clippy::cast_precision_loss)]
            let slot_x = BAR_LEFT + BAR_SLOT * idx as f64;
            let height = plot * value / CHART_MAX;
            BarVm {
                label: entry.number.number().to_string(),
                value_str: format!("{value:.1}"),
                color: entry.color_code.clone(),
                x: round2(slot_x + (BAR_SLOT - BAR_WIDTH) / 2.0),
                y: round2(baseline - height),
                width: BAR_WIDTH,
                height: round2(height),
                label_x: round2(slot_x + BAR_SLOT / 2.0),
            }
        })
        .collect();

    Ok(BarChartVm {
        width,
        height: BAR_HEIGHT,
        baseline,
        grid,
        bars,
    })
}

fn checked_scores(entries: &[ScoreEntry]) -> Result<Vec<f64>, ChartError> {
    entries
        .iter()
        .map(|entry| {
            if entry.total_score.is_finite() {
                Ok(entry.total_score.clamp(0.0, CHART_MAX))
            } else {
                Err(ChartError::InvalidScore(entry.number))
            }
        })
        .collect()
}

fn points_attr(points: impl Iterator<Item = (f64, f64)>) -> String {
    points
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_core::model::GoalInfo;

    fn entries(scores: &[f64]) -> Vec<ScoreEntry> {
        scores
            .iter()
            .enumerate()
            .map(|(idx, score)| {
                let info = GoalInfo::lookup(GoalId::new(u32::try_from(idx).unwrap() + 1));
                ScoreEntry {
                    number: info.id,
                    name: info.name,
                    color_code: info.color_code,
                    direct_score: *score,
                    bonus_score: 0.0,
                    total_score: *score,
                    notes: String::new(),
                }
            })
            .collect()
    }

    #[test]
    fn radar_starts_at_twelve_o_clock() {
        let chart = radar_chart(&entries(&[10.0, 5.0, 0.0, 5.0])).unwrap();
        let top = &chart.axes[0];
        assert_eq!(top.x2, 160.0);
        assert_eq!(top.y2, 40.0);
        assert_eq!(top.anchor, "middle");
        assert_eq!(chart.axes[1].anchor, "start");
        assert_eq!(chart.axes[3].anchor, "end");
        assert_eq!(chart.rings.len(), 5);
        assert!(chart.polygon.starts_with("160.00,40.00 220.00,160.00 160.00,160.00"));
    }

    #[test]
    fn radar_needs_three_axes() {
        assert_eq!(radar_chart(&[]), Err(ChartError::Empty));
        assert_eq!(
            radar_chart(&entries(&[1.0, 2.0])),
            Err(ChartError::TooFewAxes(2))
        );
    }

    #[test]
    fn bars_scale_to_the_plot_height() {
        let chart = bar_chart(&entries(&[10.0, 5.0, 0.0])).unwrap();
        assert_eq!(chart.baseline, 190.0);
        assert_eq!(chart.bars[0].height, 180.0);
        assert_eq!(chart.bars[0].y, 10.0);
        assert_eq!(chart.bars[1].height, 90.0);
        assert_eq!(chart.bars[2].height, 0.0);
        assert_eq!(chart.bars[1].label, "2");
        assert_eq!(chart.grid.len(), 6);
        assert_eq!(chart.grid[5].y, 10.0);
    }

    #[test]
    fn non_finite_scores_fail_only_that_chart() {
        let mut list = entries(&[3.0, 4.0, 5.0]);
        list[1].total_score = f64::NAN;
        assert_eq!(
            bar_chart(&list),
            Err(ChartError::InvalidScore(GoalId::new(2)))
        );
    }
}
