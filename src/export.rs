//! Plain-text export of a subject's finished reports.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::model::Subject;
use crate::store::{StoreError, SubjectStore};

/// Width of the `=` and `-` rules around headings.
pub const RULE_WIDTH: usize = 80;

/// Render every student's report: the intro expanded for the student,
/// followed by their stored comment.
///
/// Blank lines separate the title block and each student; there is no
/// trailing newline.
pub fn render_report(subject: &Subject) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let divider = "-".repeat(RULE_WIDTH);

    let mut output = vec![
        banner.clone(),
        format!("Report Comments for: {}", subject.subject_name),
        banner,
        "\n".to_string(),
    ];

    for student in &subject.students {
        output.push(divider.clone());
        output.push(student.full_name());
        output.push(divider.clone());
        output.push(format!(
            "{} {}",
            student.expand(&subject.intro_comment),
            student.comment
        ));
        output.push("\n".to_string());
    }

    output.join("\n")
}

/// Load a saved subject and write its reports to a file.
pub fn export_reports(
    store: &SubjectStore,
    name: &str,
    path: &Path,
) -> Result<(), ExportError> {
    let subject = store.load(name).map_err(ExportError::Store)?;
    fs::write(path, render_report(&subject))
        .map_err(|e| ExportError::Io(path.to_path_buf(), e))?;
    info!(
        "Exported {} reports for {} to {}",
        subject.students.len(),
        subject.subject_name,
        path.display()
    );
    Ok(())
}

/// Errors that can occur when exporting reports.
#[derive(Debug)]
pub enum ExportError {
    /// The subject could not be loaded.
    Store(StoreError),
    /// The export file could not be written.
    Io(PathBuf, io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Store(err) => write!(f, "export failed: {}", err),
            ExportError::Io(path, err) => {
                write!(f, "failed to write {}: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Store(err) => Some(err),
            ExportError::Io(_, err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PronounTable, StyleRules};
    use crate::model::Student;

    fn subject() -> Subject {
        let table = PronounTable::default();
        let rules = StyleRules::default();
        let mut subject = Subject::new(
            "Art",
            vec![
                Student::new("Ava", "Ng", "Female", &table),
                Student::new("Ben", "Cho", "Male", &table),
            ],
        );
        subject.set_intro_comment("<name> enjoyed art this term.", &rules);
        subject
            .set_student_comment(0, "<sp> painted well.", &rules)
            .unwrap();
        subject
            .set_student_comment(1, "<sp> sculpted well.", &rules)
            .unwrap();
        subject
    }

    #[test]
    fn test_render_report_layout() {
        let banner = "=".repeat(80);
        let divider = "-".repeat(80);
        let expected = [
            banner.as_str(),
            "Report Comments for: Art",
            banner.as_str(),
            "\n",
            divider.as_str(),
            "Ava Ng",
            divider.as_str(),
            "Ava enjoyed art this term. She painted well.",
            "\n",
            divider.as_str(),
            "Ben Cho",
            divider.as_str(),
            "Ben enjoyed art this term. He sculpted well.",
            "\n",
        ]
        .join("\n");
        assert_eq!(render_report(&subject()), expected);
    }

    #[test]
    fn test_render_report_no_students() {
        let subject = Subject::new("Empty", Vec::new());
        let report = render_report(&subject);
        assert!(report.starts_with(&"=".repeat(80)));
        assert!(report.contains("Report Comments for: Empty"));
        assert!(!report.contains('-'));
    }

    #[test]
    fn test_render_report_empty_intro() {
        let table = PronounTable::default();
        let mut subject =
            Subject::new("Art", vec![Student::new("Ava", "Ng", "Female", &table)]);
        subject.students[0].comment = "Great work.".to_string();
        assert!(render_report(&subject).contains("\n Great work.\n"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path());
        let subject = subject();
        store.save(&subject).unwrap();

        let out = dir.path().join("reports.txt");
        export_reports(&store, "Art", &out).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), render_report(&subject));
    }

    #[test]
    fn test_export_missing_subject() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path());
        let err =
            export_reports(&store, "Nope", &dir.path().join("out.txt")).unwrap_err();
        assert!(matches!(err, ExportError::Store(StoreError::NotFound(_))));
        assert!(!dir.path().join("out.txt").exists());
    }
}
