//! Subjects, students and the edits a teacher makes to them.

use serde::{Deserialize, Serialize};

use crate::engine::{PronounSet, PronounTable, StyleRules, expand, normalize};

/// A student on a class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    /// Gender as recorded on the class list.
    pub gender: String,
    pub pronouns: PronounSet,
    /// The student's report body.
    #[serde(default)]
    pub comment: String,
}

impl Student {
    /// Create a student with pronouns picked from the table and no comment.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: impl Into<String>,
        pronouns: &PronounTable,
    ) -> Self {
        let gender = gender.into();
        let pronouns = pronouns.for_gender(&gender).clone();
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            pronouns,
            comment: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Expand a template for this student.
    pub fn expand(&self, template: &str) -> String {
        expand(template, &self.first_name, &self.pronouns)
    }
}

/// A class: its students plus the comment templates shared between them.
///
/// Each subject is saved as one file, named after the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_name: String,
    /// Opening template used at the start of every report.
    #[serde(default)]
    pub intro_comment: String,
    /// Reusable, already normalized comment templates.
    #[serde(default)]
    pub comment_bank: Vec<String>,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// What the report editor shows for one student: templates expanded with
/// the student's name and pronouns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPreview {
    pub name: String,
    pub intro: String,
    pub bank: Vec<String>,
    pub comment: String,
}

impl Subject {
    /// An empty subject with no templates.
    pub fn new(subject_name: impl Into<String>, students: Vec<Student>) -> Self {
        Self {
            subject_name: subject_name.into(),
            intro_comment: String::new(),
            comment_bank: Vec::new(),
            students,
        }
    }

    pub fn student(&self, index: usize) -> Result<&Student, SubjectError> {
        self.students
            .get(index)
            .ok_or(SubjectError::StudentOutOfRange {
                index,
                len: self.students.len(),
            })
    }

    fn student_mut(&mut self, index: usize) -> Result<&mut Student, SubjectError> {
        let len = self.students.len();
        self.students
            .get_mut(index)
            .ok_or(SubjectError::StudentOutOfRange { index, len })
    }

    pub fn bank_comment(&self, index: usize) -> Result<&str, SubjectError> {
        self.comment_bank
            .get(index)
            .map(String::as_str)
            .ok_or(SubjectError::BankOutOfRange {
                index,
                len: self.comment_bank.len(),
            })
    }

    /// Replace the intro template, normalizing it first.
    pub fn set_intro_comment(&mut self, text: &str, rules: &StyleRules) {
        self.intro_comment = normalize(text.trim(), rules);
    }

    /// Normalize a template and append it to the comment bank.
    pub fn add_bank_comment(&mut self, text: &str, rules: &StyleRules) -> usize {
        self.comment_bank.push(normalize(text.trim(), rules));
        self.comment_bank.len() - 1
    }

    /// Normalize a template and put it in place of an existing bank entry.
    pub fn update_bank_comment(
        &mut self,
        index: usize,
        text: &str,
        rules: &StyleRules,
    ) -> Result<(), SubjectError> {
        let len = self.comment_bank.len();
        let entry = self
            .comment_bank
            .get_mut(index)
            .ok_or(SubjectError::BankOutOfRange { index, len })?;
        *entry = normalize(text.trim(), rules);
        Ok(())
    }

    /// Remove a bank entry, returning it.
    pub fn remove_bank_comment(&mut self, index: usize) -> Result<String, SubjectError> {
        if index >= self.comment_bank.len() {
            return Err(SubjectError::BankOutOfRange {
                index,
                len: self.comment_bank.len(),
            });
        }
        Ok(self.comment_bank.remove(index))
    }

    /// Take the intro and comment bank from another subject, replacing ours.
    pub fn copy_comments_from(&mut self, other: &Subject) {
        self.intro_comment = other.intro_comment.clone();
        self.comment_bank = other.comment_bank.clone();
    }

    /// Store a student's comment: placeholders are expanded for that student
    /// and the result normalized.
    pub fn set_student_comment(
        &mut self,
        index: usize,
        text: &str,
        rules: &StyleRules,
    ) -> Result<&str, SubjectError> {
        let student = self.student_mut(index)?;
        let expanded = student.expand(text);
        student.comment = normalize(&expanded, rules);
        Ok(&student.comment)
    }

    /// A bank entry expanded for one student.
    pub fn expanded_bank_comment(
        &self,
        student_index: usize,
        bank_index: usize,
    ) -> Result<String, SubjectError> {
        let student = self.student(student_index)?;
        let template = self.bank_comment(bank_index)?;
        Ok(student.expand(template))
    }

    /// The editor view for one student.
    pub fn preview_for(&self, index: usize) -> Result<StudentPreview, SubjectError> {
        let student = self.student(index)?;
        Ok(StudentPreview {
            name: student.full_name(),
            intro: student.expand(&self.intro_comment),
            bank: self
                .comment_bank
                .iter()
                .map(|template| student.expand(template))
                .collect(),
            comment: student.comment.clone(),
        })
    }
}

/// Append text to a draft comment, adding a separating space unless the
/// draft is empty or already ends with one.
pub fn append_to_draft(draft: &mut String, text: &str) {
    if !draft.is_empty() && !draft.ends_with(' ') {
        draft.push(' ');
    }
    draft.push_str(text);
}

/// Errors raised by edits that refer to a student or bank entry by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    StudentOutOfRange { index: usize, len: usize },
    BankOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for SubjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectError::StudentOutOfRange { index, len } => write!(
                f,
                "no student #{} (the class has {} students)",
                index + 1,
                len
            ),
            SubjectError::BankOutOfRange { index, len } => write!(
                f,
                "no comment #{} (the comment bank has {} entries)",
                index + 1,
                len
            ),
        }
    }
}

impl std::error::Error for SubjectError {}
