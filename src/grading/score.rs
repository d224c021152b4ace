//! Subject score inputs and per-subject grading

use super::{Grade, GradingScale};
use crate::error::GradingError;
use serde::{Deserialize, Serialize};

/// Maximum mark of a single-score subject
pub const SINGLE_SCORE_MAX: i32 = 100;

/// MCQ/CQ split marks of one subject, with the totals the caller marked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitScore {
    pub mcq_score: i32,
    pub mcq_total: i32,
    pub cq_score: i32,
    pub cq_total: i32,
}

impl SplitScore {
    pub fn new(mcq_score: i32, mcq_total: i32, cq_score: i32, cq_total: i32) -> Self {
        Self {
            mcq_score,
            mcq_total,
            cq_score,
            cq_total,
        }
    }
}

/// Raw assessment of one subject: a single 0-100 score or an MCQ/CQ split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Split(SplitScore),
    Single { score: i32 },
}

impl ScoreInput {
    pub fn single(score: i32) -> Self {
        ScoreInput::Single { score }
    }

    pub fn split(mcq_score: i32, mcq_total: i32, cq_score: i32, cq_total: i32) -> Self {
        ScoreInput::Split(SplitScore::new(mcq_score, mcq_total, cq_score, cq_total))
    }

    /// Reject anything outside [0, total] instead of clamping
    pub fn validate(&self) -> Result<(), GradingError> {
        match self {
            ScoreInput::Single { score } => {
                if !(0..=SINGLE_SCORE_MAX).contains(score) {
                    return Err(GradingError::InvalidScore(format!(
                        "score {} is outside 0..={}",
                        score, SINGLE_SCORE_MAX
                    )));
                }
            }
            ScoreInput::Split(split) => {
                check_part("MCQ", split.mcq_score, split.mcq_total)?;
                check_part("CQ", split.cq_score, split.cq_total)?;
                if self.available() == 0 {
                    return Err(GradingError::InvalidScore(
                        "MCQ and CQ totals are both zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Marks obtained (MCQ + CQ for a split)
    pub fn obtained(&self) -> i64 {
        match self {
            ScoreInput::Single { score } => i64::from(*score),
            ScoreInput::Split(split) => i64::from(split.mcq_score) + i64::from(split.cq_score),
        }
    }

    /// Marks available (100 for a single score)
    pub fn available(&self) -> i64 {
        match self {
            ScoreInput::Single { .. } => i64::from(SINGLE_SCORE_MAX),
            ScoreInput::Split(split) => i64::from(split.mcq_total) + i64::from(split.cq_total),
        }
    }

    /// Validated percentage in [0, 100]
    pub fn percentage(&self) -> Result<f64, GradingError> {
        self.validate()?;
        Ok(self.obtained() as f64 * 100.0 / self.available() as f64)
    }

    pub fn mcq_score(&self) -> Option<i32> {
        match self {
            ScoreInput::Split(split) => Some(split.mcq_score),
            ScoreInput::Single { .. } => None,
        }
    }

    pub fn cq_score(&self) -> Option<i32> {
        match self {
            ScoreInput::Split(split) => Some(split.cq_score),
            ScoreInput::Single { .. } => None,
        }
    }
}

fn check_part(part: &str, score: i32, total: i32) -> Result<(), GradingError> {
    if total < 0 {
        return Err(GradingError::InvalidScore(format!(
            "{} total {} is negative",
            part, total
        )));
    }
    if score < 0 || score > total {
        return Err(GradingError::InvalidScore(format!(
            "{} score {} is outside 0..={}",
            part, score, total
        )));
    }
    Ok(())
}

/// Grade and grade point earned by one subject
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrade {
    pub grade: Grade,
    pub gpa: f64,
    /// Marks obtained (MCQ + CQ for a split)
    pub total_score: i64,
    pub percentage: f64,
}

/// Grade a single score or MCQ/CQ split under `scale`
pub fn grade_for(input: &ScoreInput, scale: &GradingScale) -> Result<SubjectGrade, GradingError> {
    let percentage = input.percentage()?;
    let band = scale.band_for(percentage);

    Ok(SubjectGrade {
        grade: band.grade,
        gpa: band.gpa,
        total_score: input.obtained(),
        percentage,
    })
}
