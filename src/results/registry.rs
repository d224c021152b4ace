//! Registry of graded results, one per (student, semester, exam type)

use super::{Curriculum, ExamType, GradedResult, ResultSubmission, Semester};
use crate::error::SubmissionError;
use crate::grading::GradingScale;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identity of a result: a student may sit each exam type once per semester
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultKey {
    pub student_id: String,
    pub semester: Semester,
    pub exam_type: ExamType,
}

impl ResultKey {
    pub fn new(student_id: impl Into<String>, semester: Semester, exam_type: ExamType) -> Self {
        Self {
            student_id: student_id.into(),
            semester,
            exam_type,
        }
    }

    pub fn of(submission: &ResultSubmission) -> Self {
        Self::new(submission.student_id.clone(), submission.semester, submission.exam_type())
    }
}

/// Graded results keyed by [`ResultKey`]
///
/// Results are immutable once stored: a second submission for the same key
/// is rejected and the stored result is left as it was.
#[derive(Debug, Clone)]
pub struct ResultRegistry {
    scale: GradingScale,
    curriculum: Option<Curriculum>,
    results: BTreeMap<ResultKey, GradedResult>,
}

impl ResultRegistry {
    pub fn new(scale: GradingScale) -> Self {
        Self {
            scale,
            curriculum: None,
            results: BTreeMap::new(),
        }
    }

    /// Reject subjects outside each class's curriculum
    pub fn with_curriculum(mut self, curriculum: Curriculum) -> Self {
        self.curriculum = Some(curriculum);
        self
    }

    pub fn scale(&self) -> &GradingScale {
        &self.scale
    }

    /// Grade and store a submission
    pub fn submit(&mut self, submission: &ResultSubmission) -> Result<&GradedResult, SubmissionError> {
        let key = ResultKey::of(submission);
        if self.results.contains_key(&key) {
            warn!(
                "rejected duplicate {} submission for student {} ({} semester)",
                key.exam_type, key.student_id, key.semester
            );
            return Err(SubmissionError::DuplicateSubmission {
                student_id: key.student_id,
                semester: key.semester,
                exam_type: key.exam_type,
            });
        }

        let graded = submission.grade_checked(&self.scale, self.curriculum.as_ref())?;
        info!(
            "recorded {} result for student {} ({} semester): {} / GPA {:.2}",
            key.exam_type, key.student_id, key.semester, graded.summary.overall_grade, graded.summary.average_gpa
        );

        Ok(self.results.entry(key).or_insert(graded))
    }

    pub fn is_submitted(&self, student_id: &str, semester: Semester, exam_type: ExamType) -> bool {
        self.results
            .contains_key(&ResultKey::new(student_id, semester, exam_type))
    }

    /// Exam types the student can still sit this semester
    pub fn available_exam_types(&self, student_id: &str, semester: Semester) -> Vec<ExamType> {
        ExamType::ALL
            .iter()
            .copied()
            .filter(|exam_type| !self.is_submitted(student_id, semester, *exam_type))
            .collect()
    }

    pub fn get(&self, key: &ResultKey) -> Option<&GradedResult> {
        self.results.get(key)
    }

    /// All results of one student, ordered by semester then exam type
    pub fn results_for(&self, student_id: &str) -> Vec<&GradedResult> {
        self.results
            .iter()
            .filter(|(key, _)| key.student_id == student_id)
            .map(|(_, result)| result)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResultKey, &GradedResult)> {
        self.results.iter()
    }
}
