//! School Results - grading and fee-cycle engine for school management back-ends
//!
//! This library provides:
//! - Subject grading under configurable grading scales (single score or MCQ/CQ split)
//! - Result aggregation (total marks, average GPA, overall verdict)
//! - Typed result submissions per exam type with duplicate rejection
//! - Fee payment cycle arithmetic (due date, days left, overdue flag, rollover)

pub mod config;
pub mod error;
pub mod grading;
pub mod payment;
pub mod results;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{GradingError, LoadError, PaymentError, SubmissionError};
pub use grading::{aggregate, grade_for, Grade, GradingScale, OverallGrade, ResultAggregate, ScaleId, ScoreInput, SplitScore, SubjectResult};
pub use payment::{compute_status, record_payment, PaymentConfig, PaymentState, PaymentStatus};
pub use results::{ExamType, GradedResult, ResultRegistry, ResultSubmission, Semester};
