//! Result grading: score bands, per-subject grades and sitting aggregation

mod grade;
mod scale;
mod score;
mod aggregate;
pub mod loader;

pub use grade::{Grade, OverallGrade};
pub use scale::{GradeBand, GradingScale, OverallBand, OverallScale, ScaleId, MAX_GPA};
pub use score::{grade_for, ScoreInput, SplitScore, SubjectGrade, SINGLE_SCORE_MAX};
pub use aggregate::{aggregate, aggregate_with, format_gpa, ResultAggregate, SubjectResult};
pub use loader::{load_scale, load_scale_from_dir, load_scale_from_reader, DEFAULT_SCALES_PATH};
