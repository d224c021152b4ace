//! Typed result submissions, one field set per exam type

use super::exam::{DEFAULT_CQ_TOTAL, DEFAULT_MCQ_TOTAL};
use super::{Curriculum, ExamType, Semester};
use crate::error::SubmissionError;
use crate::grading::{aggregate, GradingScale, ResultAggregate, ScoreInput, SubjectResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_mcq_total() -> i32 { DEFAULT_MCQ_TOTAL }
fn default_cq_total() -> i32 { DEFAULT_CQ_TOTAL }

/// Marks of one subject in an MCQ-only sitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqMark {
    pub subject: String,
    pub mcq_score: i32,
    #[serde(default = "default_mcq_total")]
    pub mcq_total: i32,
}

/// Marks of one subject in a CQ-only sitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CqMark {
    pub subject: String,
    pub cq_score: i32,
    #[serde(default = "default_cq_total")]
    pub cq_total: i32,
}

/// Marks of one subject in a combined sitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedMark {
    pub subject: String,
    pub mcq_score: i32,
    #[serde(default = "default_mcq_total")]
    pub mcq_total: i32,
    pub cq_score: i32,
    #[serde(default = "default_cq_total")]
    pub cq_total: i32,
}

/// Subject marks tagged by exam type
///
/// JSON shape: `{"examType": "combined", "subjects": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "examType", content = "subjects", rename_all = "lowercase")]
pub enum SubmissionMarks {
    Mcq(Vec<McqMark>),
    Cq(Vec<CqMark>),
    Combined(Vec<CombinedMark>),
}

impl SubmissionMarks {
    pub fn exam_type(&self) -> ExamType {
        match self {
            SubmissionMarks::Mcq(_) => ExamType::Mcq,
            SubmissionMarks::Cq(_) => ExamType::Cq,
            SubmissionMarks::Combined(_) => ExamType::Combined,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SubmissionMarks::Mcq(marks) => marks.len(),
            SubmissionMarks::Cq(marks) => marks.len(),
            SubmissionMarks::Combined(marks) => marks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subject names with their marks as split scores, in submission order
    pub fn subject_scores(&self) -> Vec<(&str, ScoreInput)> {
        match self {
            SubmissionMarks::Mcq(marks) => marks
                .iter()
                .map(|m| (m.subject.as_str(), ScoreInput::split(m.mcq_score, m.mcq_total, 0, 0)))
                .collect(),
            SubmissionMarks::Cq(marks) => marks
                .iter()
                .map(|m| (m.subject.as_str(), ScoreInput::split(0, 0, m.cq_score, m.cq_total)))
                .collect(),
            SubmissionMarks::Combined(marks) => marks
                .iter()
                .map(|m| {
                    (
                        m.subject.as_str(),
                        ScoreInput::split(m.mcq_score, m.mcq_total, m.cq_score, m.cq_total),
                    )
                })
                .collect(),
        }
    }
}

/// Marks submitted for one (student, semester, exam type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub student_id: String,
    pub class_name: String,
    pub semester: Semester,
    pub marks: SubmissionMarks,
}

impl ResultSubmission {
    pub fn exam_type(&self) -> ExamType {
        self.marks.exam_type()
    }

    /// Grade every subject and aggregate the sitting
    pub fn grade(&self, scale: &GradingScale) -> Result<GradedResult, SubmissionError> {
        self.grade_checked(scale, None)
    }

    /// Grade, additionally rejecting subjects the class does not take
    pub fn grade_checked(
        &self,
        scale: &GradingScale,
        curriculum: Option<&Curriculum>,
    ) -> Result<GradedResult, SubmissionError> {
        let mut seen = HashSet::new();
        let mut marks = Vec::with_capacity(self.marks.len());

        for (subject, score) in self.marks.subject_scores() {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(SubmissionError::BlankSubject);
            }
            if !seen.insert(subject.to_ascii_lowercase()) {
                return Err(SubmissionError::DuplicateSubject(subject.to_string()));
            }
            if let Some(curriculum) = curriculum {
                curriculum.check_subject(&self.class_name, subject)?;
            }

            let result = SubjectResult::graded(subject, &score, scale).map_err(|source| {
                SubmissionError::Subject {
                    subject: subject.to_string(),
                    source,
                }
            })?;
            marks.push(result);
        }

        let summary = aggregate(&marks)?;

        Ok(GradedResult {
            student_id: self.student_id.clone(),
            class_name: self.class_name.clone(),
            semester: self.semester,
            exam_type: self.exam_type(),
            marks,
            summary,
        })
    }
}

/// Graded submission: per-subject grades plus the sitting summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedResult {
    pub student_id: String,
    pub class_name: String,
    pub semester: Semester,
    pub exam_type: ExamType,
    pub marks: Vec<SubjectResult>,
    #[serde(flatten)]
    pub summary: ResultAggregate,
}

/// Grade many submissions in parallel, preserving input order
pub fn grade_batch(
    submissions: &[ResultSubmission],
    scale: &GradingScale,
) -> Vec<Result<GradedResult, SubmissionError>> {
    submissions.par_iter().map(|s| s.grade(scale)).collect()
}
