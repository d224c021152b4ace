//! Aggregation of graded subjects into a sitting summary

use super::{grade_for, Grade, GradingScale, OverallGrade, OverallScale, ScoreInput, MAX_GPA};
use crate::error::GradingError;
use serde::{Deserialize, Serialize};

/// One graded subject of a sitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    pub subject: String,

    /// Marks obtained (MCQ + CQ for a split)
    pub total_score: i64,

    /// MCQ part, when the subject was marked as a split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcq_score: Option<i32>,

    /// CQ part, when the subject was marked as a split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cq_score: Option<i32>,

    pub grade: Grade,
    pub gpa: f64,
}

impl SubjectResult {
    /// Grade `input` under `scale` and attach the subject name
    pub fn graded(subject: impl Into<String>, input: &ScoreInput, scale: &GradingScale) -> Result<Self, GradingError> {
        let graded = grade_for(input, scale)?;
        Ok(Self {
            subject: subject.into(),
            total_score: graded.total_score,
            mcq_score: input.mcq_score(),
            cq_score: input.cq_score(),
            grade: graded.grade,
            gpa: graded.gpa,
        })
    }
}

/// Summary of all subjects in one sitting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAggregate {
    pub subject_count: usize,
    pub total_marks: i64,
    pub total_mcq_marks: i64,
    pub total_cq_marks: i64,

    /// Unrounded mean of subject GPAs; round only for display
    #[serde(rename = "averageGPA")]
    pub average_gpa: f64,

    pub overall_grade: OverallGrade,
}

impl ResultAggregate {
    pub fn is_fail(&self) -> bool {
        self.overall_grade.is_fail()
    }

    pub fn display_gpa(&self) -> String {
        format_gpa(self.average_gpa)
    }
}

/// Two-decimal rendering used on result sheets
pub fn format_gpa(gpa: f64) -> String {
    format!("{:.2}", gpa)
}

/// Aggregate a sitting using the standard overall-grade bands
pub fn aggregate(results: &[SubjectResult]) -> Result<ResultAggregate, GradingError> {
    aggregate_with(results, &OverallScale::standard())
}

/// Aggregate a sitting with explicit overall-grade bands
///
/// Any F forces `FAIL` before the GPA bands are consulted. Sums are taken
/// over integer marks and sorted GPAs, so the input order never changes the
/// output.
pub fn aggregate_with(results: &[SubjectResult], overall: &OverallScale) -> Result<ResultAggregate, GradingError> {
    if results.is_empty() {
        return Err(GradingError::EmptyResultSet);
    }

    let mut gpas = Vec::with_capacity(results.len());
    for result in results {
        if !result.gpa.is_finite() || result.gpa < 0.0 || result.gpa > MAX_GPA {
            return Err(GradingError::InvalidScore(format!(
                "subject '{}' has GPA {} outside 0..={}",
                result.subject, result.gpa, MAX_GPA
            )));
        }
        gpas.push(result.gpa);
    }
    gpas.sort_by(|a, b| a.total_cmp(b));

    let total_marks = results.iter().map(|r| r.total_score).sum();
    let total_mcq_marks = results.iter().filter_map(|r| r.mcq_score).map(i64::from).sum();
    let total_cq_marks = results.iter().filter_map(|r| r.cq_score).map(i64::from).sum();
    let average_gpa = gpas.iter().sum::<f64>() / gpas.len() as f64;

    let overall_grade = if results.iter().any(|r| r.grade.is_fail()) {
        OverallGrade::Fail
    } else {
        OverallGrade::Graded(overall.grade_for(average_gpa))
    };

    Ok(ResultAggregate {
        subject_count: results.len(),
        total_marks,
        total_mcq_marks,
        total_cq_marks,
        average_gpa,
        overall_grade,
    })
}
