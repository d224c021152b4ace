//! Error types shared across grading, submissions and payments

use crate::results::{ExamType, Semester};
use thiserror::Error;

/// Errors raised while grading a score or aggregating a sitting
#[derive(Debug, Clone, Error)]
pub enum GradingError {
    /// Score outside [0, total] or a malformed MCQ/CQ split
    #[error("invalid score: {0}")]
    InvalidScore(String),

    #[error("cannot aggregate a result with no subjects")]
    EmptyResultSet,

    #[error("unknown grading scale '{0}'")]
    UnknownScale(String),

    #[error("unknown letter grade '{0}'")]
    UnknownGrade(String),

    /// Band table that is empty, overlapping or does not reach score 0
    #[error("invalid grading scale '{name}': {reason}")]
    InvalidScale { name: String, reason: String },
}

/// Errors raised while validating or registering a result submission
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("unknown exam type '{0}'")]
    UnknownExamType(String),

    #[error("unknown semester '{0}'")]
    UnknownSemester(String),

    #[error(
        "{} result for {semester} semester already submitted for student {student_id}",
        .exam_type.label()
    )]
    DuplicateSubmission {
        student_id: String,
        semester: Semester,
        exam_type: ExamType,
    },

    #[error("subject '{0}' appears more than once in the submission")]
    DuplicateSubject(String),

    #[error("submission contains a subject with a blank name")]
    BlankSubject,

    #[error("subject '{subject}' is not taught in class {class_name}")]
    UnknownSubject { subject: String, class_name: String },

    #[error("subject '{subject}': {source}")]
    Subject {
        subject: String,
        #[source]
        source: GradingError,
    },

    #[error(transparent)]
    Grading(#[from] GradingError),
}

/// Errors raised by payment recording
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    #[error("payment amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),

    #[error("payment cycle must be between 1 and {max} days, got {days}")]
    InvalidCycleLength { days: u32, max: u32 },

    #[error("payment due date is out of range")]
    DateOutOfRange,
}

/// Errors raised while loading scale tables, rosters or payment sheets from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },

    #[error(transparent)]
    Grading(#[from] GradingError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}
