//! Load result submissions from a marks roster CSV
//!
//! One row per (student, semester, exam type, subject):
//! `student_id,class_name,semester,exam_type,subject,mcq_score,mcq_total,cq_score,cq_total`
//! Totals may be left blank to use the exam type's canonical totals.

use super::{CombinedMark, CqMark, ExamType, McqMark, ResultSubmission, Semester, SubmissionMarks};
use crate::error::LoadError;
use csv::Reader;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Default location of the sample marks roster
pub const DEFAULT_ROSTER_PATH: &str = "data/roster.csv";

/// Raw CSV row of a marks roster
#[derive(Debug, Deserialize)]
struct RosterRow {
    student_id: String,
    class_name: String,
    semester: String,
    exam_type: String,
    subject: String,
    mcq_score: Option<i32>,
    mcq_total: Option<i32>,
    cq_score: Option<i32>,
    cq_total: Option<i32>,
}

/// Rows of one sitting, in file order
struct SittingRows {
    student_id: String,
    class_name: String,
    semester: Semester,
    exam_type: ExamType,
    rows: Vec<(usize, RosterRow)>,
}

impl SittingRows {
    fn into_submission(self) -> Result<ResultSubmission, LoadError> {
        let (default_mcq_total, default_cq_total) = self.exam_type.canonical_totals();

        let marks = match self.exam_type {
            ExamType::Mcq => SubmissionMarks::Mcq(
                self.rows
                    .into_iter()
                    .map(|(line, row)| -> Result<McqMark, LoadError> {
                        Ok(McqMark {
                            mcq_score: required(row.mcq_score, line, "mcq_score")?,
                            mcq_total: row.mcq_total.unwrap_or(default_mcq_total),
                            subject: row.subject,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            ExamType::Cq => SubmissionMarks::Cq(
                self.rows
                    .into_iter()
                    .map(|(line, row)| -> Result<CqMark, LoadError> {
                        Ok(CqMark {
                            cq_score: required(row.cq_score, line, "cq_score")?,
                            cq_total: row.cq_total.unwrap_or(default_cq_total),
                            subject: row.subject,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            ExamType::Combined => SubmissionMarks::Combined(
                self.rows
                    .into_iter()
                    .map(|(line, row)| -> Result<CombinedMark, LoadError> {
                        Ok(CombinedMark {
                            mcq_score: required(row.mcq_score, line, "mcq_score")?,
                            mcq_total: row.mcq_total.unwrap_or(default_mcq_total),
                            cq_score: required(row.cq_score, line, "cq_score")?,
                            cq_total: row.cq_total.unwrap_or(default_cq_total),
                            subject: row.subject,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(ResultSubmission {
            student_id: self.student_id,
            class_name: self.class_name,
            semester: self.semester,
            marks,
        })
    }
}

fn required(value: Option<i32>, line: usize, column: &str) -> Result<i32, LoadError> {
    value.ok_or_else(|| LoadError::Row {
        row: line,
        message: format!("{} is required for this exam type", column),
    })
}

/// Load submissions from any reader, grouping rows into sittings in first-seen order
pub fn load_submissions_from_reader<R: Read>(reader: R) -> Result<Vec<ResultSubmission>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut sittings: Vec<SittingRows> = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let line = index + 1;
        let row: RosterRow = result?;
        let semester: Semester = row.semester.parse()?;
        let exam_type: ExamType = row.exam_type.parse()?;

        let existing = sittings.iter_mut().find(|s| {
            s.student_id == row.student_id && s.semester == semester && s.exam_type == exam_type
        });

        match existing {
            Some(sitting) => {
                if sitting.class_name != row.class_name {
                    return Err(LoadError::Row {
                        row: line,
                        message: format!(
                            "student {} listed in class {} and class {}",
                            row.student_id, sitting.class_name, row.class_name
                        ),
                    });
                }
                sitting.rows.push((line, row));
            }
            None => sittings.push(SittingRows {
                student_id: row.student_id.clone(),
                class_name: row.class_name.clone(),
                semester,
                exam_type,
                rows: vec![(line, row)],
            }),
        }
    }

    sittings.into_iter().map(SittingRows::into_submission).collect()
}

/// Load submissions from a roster CSV file
pub fn load_submissions<P: AsRef<Path>>(path: P) -> Result<Vec<ResultSubmission>, LoadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    load_submissions_from_reader(file)
}
