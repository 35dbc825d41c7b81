mod assessment_vm;
mod chart_vm;
mod results_vm;
mod time_fmt;

pub use assessment_vm::{
    AssessmentIntent, AssessmentOutcome, AssessmentVm, FieldVm, OptionVm, SaveStatusVm, SectionVm,
    StepLinkVm, StepVm, map_save_status, start_assessment,
};
pub use chart_vm::{
    BarChartVm, BarVm, ChartError, GridLineVm, RadarAxisVm, RadarChartVm, bar_chart, radar_chart,
};
pub use results_vm::{
    CategoryVm, RecommendationVm, ResultsVm, ScoreRowVm, SubmissionCardVm, map_results,
    map_submission_cards,
};
pub use time_fmt::format_datetime;
