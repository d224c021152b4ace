//! Result submissions: exam types, typed marks, curriculum checks and the registry

mod exam;
mod submission;
mod curriculum;
mod registry;
pub mod loader;

pub use exam::{ExamType, Semester, DEFAULT_CQ_TOTAL, DEFAULT_MCQ_TOTAL};
pub use submission::{grade_batch, CombinedMark, CqMark, GradedResult, McqMark, ResultSubmission, SubmissionMarks};
pub use curriculum::Curriculum;
pub use registry::{ResultKey, ResultRegistry};
pub use loader::{load_submissions, load_submissions_from_reader, DEFAULT_ROSTER_PATH};
