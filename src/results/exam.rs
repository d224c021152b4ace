//! Exam types and semesters that key a result submission

use crate::error::SubmissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical MCQ total per subject
pub const DEFAULT_MCQ_TOTAL: i32 = 30;
/// Canonical CQ total per subject
pub const DEFAULT_CQ_TOTAL: i32 = 70;

/// Kind of exam sitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    /// Multiple-choice only
    Mcq,
    /// Constructed-question only
    Cq,
    /// Both parts scored and summed
    Combined,
}

impl ExamType {
    pub const ALL: [ExamType; 3] = [ExamType::Mcq, ExamType::Cq, ExamType::Combined];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Mcq => "mcq",
            ExamType::Cq => "cq",
            ExamType::Combined => "combined",
        }
    }

    /// Upper-case label used on result sheets and messages
    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Mcq => "MCQ",
            ExamType::Cq => "CQ",
            ExamType::Combined => "COMBINED",
        }
    }

    /// Default (mcq_total, cq_total) per subject for this exam type
    pub fn canonical_totals(&self) -> (i32, i32) {
        match self {
            ExamType::Mcq => (DEFAULT_MCQ_TOTAL, 0),
            ExamType::Cq => (0, DEFAULT_CQ_TOTAL),
            ExamType::Combined => (DEFAULT_MCQ_TOTAL, DEFAULT_CQ_TOTAL),
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = SubmissionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mcq" => Ok(ExamType::Mcq),
            "cq" => Ok(ExamType::Cq),
            "combined" => Ok(ExamType::Combined),
            other => Err(SubmissionError::UnknownExamType(other.to_string())),
        }
    }
}

/// Academic term scoping one submission per student per exam type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::First, Semester::Second, Semester::Third];

    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::First => "1st",
            Semester::Second => "2nd",
            Semester::Third => "3rd",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = SubmissionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1st" | "1" | "first" => Ok(Semester::First),
            "2nd" | "2" | "second" => Ok(Semester::Second),
            "3rd" | "3" | "third" => Ok(Semester::Third),
            other => Err(SubmissionError::UnknownSemester(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_totals() {
        assert_eq!(ExamType::Mcq.canonical_totals(), (30, 0));
        assert_eq!(ExamType::Cq.canonical_totals(), (0, 70));
        assert_eq!(ExamType::Combined.canonical_totals(), (30, 70));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("CQ".parse::<ExamType>().unwrap(), ExamType::Cq);
        assert_eq!("2nd".parse::<Semester>().unwrap(), Semester::Second);
        assert_eq!("third".parse::<Semester>().unwrap(), Semester::Third);
        assert!(matches!("written".parse::<ExamType>(), Err(SubmissionError::UnknownExamType(_))));
        assert!(matches!("4th".parse::<Semester>(), Err(SubmissionError::UnknownSemester(_))));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Semester::First).unwrap(), "\"1st\"");
        assert_eq!(serde_json::to_string(&ExamType::Combined).unwrap(), "\"combined\"");
    }
}
