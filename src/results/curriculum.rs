//! Class curriculum: which subjects each class sits

use crate::error::SubmissionError;
use std::collections::BTreeMap;

/// Subjects taught per class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    classes: BTreeMap<String, Vec<String>>,
}

impl Curriculum {
    /// Empty curriculum; no class is checked
    pub fn empty() -> Self {
        Self {
            classes: BTreeMap::new(),
        }
    }

    /// Standard subject lists for classes 1-12
    pub fn standard() -> Self {
        let table: [(&str, &[&str]); 12] = [
            ("1", &["English", "Math", "Science", "Social Studies", "Art"]),
            ("2", &["English", "Math", "Science", "Social Studies", "Art", "Music"]),
            ("3", &["English", "Math", "Science", "Social Studies", "Art", "Music", "Computer"]),
            ("4", &["English", "Math", "Science", "Social Studies", "Computer", "Physical Education"]),
            ("5", &["English", "Math", "Science", "Social Studies", "Computer", "Physical Education", "Language"]),
            ("6", &["English", "Math", "Science", "History", "Geography", "Computer", "Physical Education"]),
            ("7", &["English", "Math", "Physics", "Chemistry", "Biology", "History", "Geography", "Computer"]),
            ("8", &["English", "Math", "Physics", "Chemistry", "Biology", "History", "Geography", "Computer", "Civics"]),
            ("9", &["English", "Math", "Physics", "Chemistry", "Biology", "History", "Geography", "Computer", "Economics"]),
            ("10", &["English", "Math", "Physics", "Chemistry", "Biology", "History", "Geography", "Computer", "Economics", "Accountancy"]),
            ("11", &["English", "Physics", "Chemistry", "Math/Biology", "Computer", "Economics", "Accountancy", "Business Studies"]),
            ("12", &["English", "Physics", "Chemistry", "Math/Biology", "Computer", "Economics", "Accountancy", "Business Studies"]),
        ];

        table
            .iter()
            .fold(Self::empty(), |curriculum, (class, subjects)| curriculum.with_class(*class, *subjects))
    }

    /// Add or replace the subject list of a class
    pub fn with_class<S: AsRef<str>>(mut self, class_name: &str, subjects: &[S]) -> Self {
        self.classes.insert(
            class_name.trim().to_string(),
            subjects.iter().map(|s| s.as_ref().to_string()).collect(),
        );
        self
    }

    pub fn subjects_for(&self, class_name: &str) -> Option<&[String]> {
        self.classes.get(class_name.trim()).map(Vec::as_slice)
    }

    /// Reject a subject outside the class's list; classes not in the table pass
    pub fn check_subject(&self, class_name: &str, subject: &str) -> Result<(), SubmissionError> {
        match self.subjects_for(class_name) {
            Some(subjects) if !subjects.iter().any(|s| s.eq_ignore_ascii_case(subject.trim())) => {
                Err(SubmissionError::UnknownSubject {
                    subject: subject.to_string(),
                    class_name: class_name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_classes() {
        let curriculum = Curriculum::standard();
        assert_eq!(curriculum.subjects_for("1").unwrap().len(), 5);
        assert_eq!(curriculum.subjects_for("10").unwrap().len(), 10);
        assert!(curriculum.subjects_for("13").is_none());
    }

    #[test]
    fn test_check_subject() {
        let curriculum = Curriculum::standard();
        assert!(curriculum.check_subject("9", "economics").is_ok());
        assert!(matches!(
            curriculum.check_subject("1", "Physics"),
            Err(SubmissionError::UnknownSubject { .. })
        ));
        // Unlisted classes are not checked
        assert!(curriculum.check_subject("kg", "Drawing").is_ok());
    }

    #[test]
    fn test_override_class() {
        let curriculum = Curriculum::standard().with_class("1", &["Bangla"]);
        assert!(curriculum.check_subject("1", "Bangla").is_ok());
        assert!(curriculum.check_subject("1", "English").is_err());
    }
}
