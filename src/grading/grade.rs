//! Letter grades and the overall verdict of a sitting

use crate::error::GradingError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Letter grade of a subject or of a whole sitting
///
/// Variants are declared from worst to best so that `Ord` ranks grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::F => "F",
            Grade::D => "D",
            Grade::C => "C",
            Grade::CPlus => "C+",
            Grade::B => "B",
            Grade::BPlus => "B+",
            Grade::AMinus => "A-",
            Grade::A => "A",
            Grade::APlus => "A+",
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Grade::F)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "F" => Ok(Grade::F),
            "D" => Ok(Grade::D),
            "C" => Ok(Grade::C),
            "C+" => Ok(Grade::CPlus),
            "B" => Ok(Grade::B),
            "B+" => Ok(Grade::BPlus),
            "A-" => Ok(Grade::AMinus),
            "A" => Ok(Grade::A),
            "A+" => Ok(Grade::APlus),
            other => Err(GradingError::UnknownGrade(other.to_string())),
        }
    }
}

/// Overall verdict of a sitting
///
/// Serializes as the letter grade, or `"FAIL"` when any subject failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallGrade {
    /// Every subject passed; grade comes from the average GPA
    Graded(Grade),
    /// At least one subject was graded F
    Fail,
}

impl OverallGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallGrade::Graded(grade) => grade.as_str(),
            OverallGrade::Fail => "FAIL",
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, OverallGrade::Fail)
    }

    pub fn grade(&self) -> Option<Grade> {
        match self {
            OverallGrade::Graded(grade) => Some(*grade),
            OverallGrade::Fail => None,
        }
    }
}

impl fmt::Display for OverallGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OverallGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
