//! Grading scales: score bands for subjects and GPA bands for the overall verdict

use super::Grade;
use crate::error::GradingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest grade point a band may carry
pub const MAX_GPA: f64 = 5.0;

/// Identifier of a built-in grading scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleId {
    /// Scale A: single 0-100 score
    Simple,
    /// Scale B: MCQ + CQ combined percentage
    Combined,
}

impl ScaleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleId::Simple => "simple",
            ScaleId::Combined => "combined",
        }
    }

    /// File name of the scale table under the scales directory
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for ScaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleId {
    type Err = GradingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" | "a" => Ok(ScaleId::Simple),
            "combined" | "b" => Ok(ScaleId::Combined),
            other => Err(GradingError::UnknownScale(other.to_string())),
        }
    }
}

/// One band of a grading scale: every percentage at or above `min_score`
/// (and below the next band up) earns `grade` and `gpa`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: Grade,
    pub min_score: u32,
    pub gpa: f64,
}

impl GradeBand {
    pub const fn new(grade: Grade, min_score: u32, gpa: f64) -> Self {
        Self { grade, min_score, gpa }
    }
}

/// Ordered, contiguous set of score bands covering 0..=100
#[derive(Debug, Clone, PartialEq)]
pub struct GradingScale {
    name: String,
    /// Sorted by `min_score`, highest first; never empty, last band starts at 0
    bands: Vec<GradeBand>,
}

impl GradingScale {
    /// Build a scale from bands in any order, validating the band table
    pub fn new(name: impl Into<String>, mut bands: Vec<GradeBand>) -> Result<Self, GradingError> {
        let name = name.into();
        let invalid = |reason: String| GradingError::InvalidScale {
            name: name.clone(),
            reason,
        };

        if bands.is_empty() {
            return Err(invalid("scale has no bands".to_string()));
        }

        bands.sort_by(|a, b| b.min_score.cmp(&a.min_score));

        for band in &bands {
            if band.min_score > 100 {
                return Err(invalid(format!("band {} starts above 100", band.grade)));
            }
            if !band.gpa.is_finite() || band.gpa < 0.0 || band.gpa > MAX_GPA {
                return Err(invalid(format!("band {} has GPA {} outside 0..={}", band.grade, band.gpa, MAX_GPA)));
            }
        }

        for pair in bands.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if upper.min_score == lower.min_score {
                return Err(invalid(format!(
                    "bands {} and {} both start at {}",
                    upper.grade, lower.grade, upper.min_score
                )));
            }
            if upper.gpa < lower.gpa || upper.grade < lower.grade {
                return Err(invalid(format!(
                    "band {} ranks below band {} under it",
                    upper.grade, lower.grade
                )));
            }
        }

        let floor = bands[bands.len() - 1];
        if floor.min_score != 0 {
            return Err(invalid(format!("lowest band {} must start at 0", floor.grade)));
        }
        if floor.grade != Grade::F || floor.gpa != 0.0 {
            return Err(invalid("score 0 must map to F with GPA 0.0".to_string()));
        }

        Ok(Self { name, bands })
    }

    /// Scale A: single 0-100 score
    pub fn simple() -> Self {
        Self {
            name: ScaleId::Simple.as_str().to_string(),
            bands: vec![
                GradeBand::new(Grade::APlus, 90, 5.0),
                GradeBand::new(Grade::A, 85, 4.5),
                GradeBand::new(Grade::AMinus, 80, 4.0),
                GradeBand::new(Grade::BPlus, 75, 3.5),
                GradeBand::new(Grade::B, 70, 3.0),
                GradeBand::new(Grade::CPlus, 65, 2.5),
                GradeBand::new(Grade::C, 60, 2.0),
                GradeBand::new(Grade::D, 50, 1.0),
                GradeBand::new(Grade::F, 0, 0.0),
            ],
        }
    }

    /// Scale B: MCQ + CQ combined percentage
    pub fn combined() -> Self {
        Self {
            name: ScaleId::Combined.as_str().to_string(),
            bands: vec![
                GradeBand::new(Grade::APlus, 80, 5.0),
                GradeBand::new(Grade::A, 70, 4.5),
                GradeBand::new(Grade::AMinus, 60, 4.0),
                GradeBand::new(Grade::B, 50, 3.0),
                GradeBand::new(Grade::C, 40, 2.0),
                GradeBand::new(Grade::D, 33, 1.0),
                GradeBand::new(Grade::F, 0, 0.0),
            ],
        }
    }

    /// Built-in table for a scale identifier
    pub fn builtin(id: ScaleId) -> Self {
        match id {
            ScaleId::Simple => Self::simple(),
            ScaleId::Combined => Self::combined(),
        }
    }

    /// Look up a built-in scale by name
    pub fn by_name(name: &str) -> Result<Self, GradingError> {
        Ok(Self::builtin(name.parse()?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// Highest band whose lower bound is at or below `percentage`
    ///
    /// Callers validate the percentage first; anything below every band
    /// falls into the floor band.
    pub fn band_for(&self, percentage: f64) -> &GradeBand {
        self.bands
            .iter()
            .find(|band| percentage >= f64::from(band.min_score))
            .unwrap_or(&self.bands[self.bands.len() - 1])
    }
}

impl Default for GradingScale {
    fn default() -> Self {
        Self::simple()
    }
}

/// Band of the overall-grade table keyed on average GPA
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallBand {
    pub grade: Grade,
    pub min_gpa: f64,
}

/// Maps an average GPA to the overall letter grade of a sitting
#[derive(Debug, Clone, PartialEq)]
pub struct OverallScale {
    /// Highest threshold first
    bands: Vec<OverallBand>,
}

impl OverallScale {
    pub fn standard() -> Self {
        let band = |grade, min_gpa| OverallBand { grade, min_gpa };
        Self {
            bands: vec![
                band(Grade::APlus, 4.5),
                band(Grade::A, 4.0),
                band(Grade::BPlus, 3.5),
                band(Grade::B, 3.0),
                band(Grade::CPlus, 2.5),
                band(Grade::C, 2.0),
                band(Grade::D, 1.0),
            ],
        }
    }

    pub fn bands(&self) -> &[OverallBand] {
        &self.bands
    }

    /// Overall grade for an unrounded average GPA; F below every threshold
    pub fn grade_for(&self, average_gpa: f64) -> Grade {
        self.bands
            .iter()
            .find(|band| average_gpa >= band.min_gpa)
            .map(|band| band.grade)
            .unwrap_or(Grade::F)
    }
}

impl Default for OverallScale {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scales_validate() {
        for id in [ScaleId::Simple, ScaleId::Combined] {
            let scale = GradingScale::builtin(id);
            let rebuilt = GradingScale::new(scale.name(), scale.bands().to_vec());
            assert!(rebuilt.is_ok(), "{} failed validation: {:?}", id, rebuilt.err());
        }
    }

    #[test]
    fn test_new_sorts_bands() {
        let scale = GradingScale::new(
            "pass-fail",
            vec![GradeBand::new(Grade::F, 0, 0.0), GradeBand::new(Grade::A, 50, 4.5)],
        )
        .unwrap();

        assert_eq!(scale.bands()[0].grade, Grade::A);
        assert_eq!(scale.band_for(50.0).grade, Grade::A);
        assert_eq!(scale.band_for(49.9).grade, Grade::F);
    }

    #[test]
    fn test_rejects_scale_without_floor() {
        let result = GradingScale::new("gap", vec![GradeBand::new(Grade::A, 40, 4.5)]);
        assert!(matches!(result, Err(GradingError::InvalidScale { .. })));
    }

    #[test]
    fn test_rejects_overlapping_bands() {
        let result = GradingScale::new(
            "overlap",
            vec![
                GradeBand::new(Grade::A, 60, 4.5),
                GradeBand::new(Grade::B, 60, 3.0),
                GradeBand::new(Grade::F, 0, 0.0),
            ],
        );
        assert!(matches!(result, Err(GradingError::InvalidScale { .. })));
    }

    #[test]
    fn test_rejects_inverted_gpa() {
        let result = GradingScale::new(
            "inverted",
            vec![
                GradeBand::new(Grade::A, 80, 3.0),
                GradeBand::new(Grade::B, 60, 4.0),
                GradeBand::new(Grade::F, 0, 0.0),
            ],
        );
        assert!(matches!(result, Err(GradingError::InvalidScale { .. })));
    }

    #[test]
    fn test_scale_names() {
        assert_eq!("Combined".parse::<ScaleId>().unwrap(), ScaleId::Combined);
        assert_eq!("a".parse::<ScaleId>().unwrap(), ScaleId::Simple);
        assert!(matches!(GradingScale::by_name("weighted"), Err(GradingError::UnknownScale(_))));
    }

    #[test]
    fn test_overall_bands() {
        let overall = OverallScale::standard();
        assert_eq!(overall.grade_for(5.0), Grade::APlus);
        assert_eq!(overall.grade_for(4.5), Grade::APlus);
        assert_eq!(overall.grade_for(4.49), Grade::A);
        assert_eq!(overall.grade_for(3.5), Grade::BPlus);
        assert_eq!(overall.grade_for(2.75), Grade::CPlus);
        assert_eq!(overall.grade_for(1.0), Grade::D);
        assert_eq!(overall.grade_for(0.99), Grade::F);
    }
}
