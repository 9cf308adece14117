//! Class list import from CSV.
//!
//! Each row holds a first name, last name and gender; extra columns are
//! ignored. Fields may be quoted, with `""` standing for a literal quote.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::engine::PronounTable;
use crate::model::{Student, Subject};
use crate::store::{StoreError, SubjectStore, sanitize_subject_name};

/// Parse a class list into students with pronouns picked from the table and
/// empty comments. Blank lines are skipped.
pub fn parse_class_list(
    input: &str,
    pronouns: &PronounTable,
) -> Result<Vec<Student>, ImportError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    parse_records(input)?
        .into_iter()
        .map(|(line, fields)| match fields.as_slice() {
            [first, last, gender, ..] => Ok(Student::new(
                first.trim(),
                last.trim(),
                gender.trim(),
                pronouns,
            )),
            _ => Err(ImportError::MissingFields {
                line,
                found: fields.len(),
            }),
        })
        .collect()
}

/// Import a class list as a new, empty subject and save it.
///
/// The subject name is sanitized the same way saved file names are. An
/// existing subject with the same name is never replaced.
pub fn import_class_list(
    path: &Path,
    subject_name: &str,
    pronouns: &PronounTable,
    store: &SubjectStore,
) -> Result<Subject, ImportError> {
    let name = sanitize_subject_name(subject_name);
    if name.is_empty() {
        return Err(ImportError::Store(StoreError::InvalidName(
            subject_name.to_string(),
        )));
    }

    let content =
        fs::read_to_string(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
    let students = parse_class_list(&content, pronouns)?;
    debug!("Read {} students from {}", students.len(), path.display());

    let subject = Subject::new(name, students);
    store.create(&subject).map_err(ImportError::Store)?;
    info!(
        "Imported {} students into {}",
        subject.students.len(),
        subject.subject_name
    );
    Ok(subject)
}

/// Split CSV text into records, each tagged with the line it starts on.
fn parse_records(input: &str) -> Result<Vec<(usize, Vec<String>)>, ImportError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                record.push(std::mem::take(&mut field));
                finish_record(&mut records, std::mem::take(&mut record), record_line);
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: record_line });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        finish_record(&mut records, record, record_line);
    }
    Ok(records)
}

fn finish_record(records: &mut Vec<(usize, Vec<String>)>, record: Vec<String>, line: usize) {
    let blank = record.iter().all(|field| field.trim().is_empty());
    if !blank {
        records.push((line, record));
    }
}

/// Errors that can occur when importing a class list.
#[derive(Debug)]
pub enum ImportError {
    /// I/O error reading the CSV file.
    Io(PathBuf, io::Error),
    /// A row had fewer than three fields.
    MissingFields { line: usize, found: usize },
    /// A quoted field was still open at the end of the file.
    UnterminatedQuote { line: usize },
    /// The subject could not be saved.
    Store(StoreError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(path, err) => write!(f, "failed to read {}: {}", path.display(), err),
            ImportError::MissingFields { line, found } => write!(
                f,
                "line {}: expected first name, last name and gender, found {} field(s)",
                line, found
            ),
            ImportError::UnterminatedQuote { line } => {
                write!(f, "line {}: quoted field is never closed", line)
            }
            ImportError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(_, err) => Some(err),
            ImportError::Store(err) => Some(err),
            ImportError::MissingFields { .. } | ImportError::UnterminatedQuote { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PronounSet;

    #[test]
    fn test_parse_simple_rows() {
        let students =
            parse_class_list("Ava,Ng,Female\nBen,Cho,Male\n", &PronounTable::default()).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].first_name, "Ava");
        assert_eq!(students[0].pronouns, PronounSet::female());
        assert_eq!(students[1].last_name, "Cho");
        assert_eq!(students[1].gender, "Male");
        assert_eq!(students[1].pronouns, PronounSet::male());
        assert!(students.iter().all(|s| s.comment.is_empty()));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let students =
            parse_class_list(" Ava , Ng ,  Male \r\n", &PronounTable::default()).unwrap();
        assert_eq!(students[0].first_name, "Ava");
        assert_eq!(students[0].last_name, "Ng");
        assert_eq!(students[0].gender, "Male");
        assert_eq!(students[0].pronouns, PronounSet::male());
    }

    #[test]
    fn test_gender_match_is_case_sensitive() {
        let students = parse_class_list("Ava,Ng,male", &PronounTable::default()).unwrap();
        assert_eq!(students[0].pronouns, PronounSet::female());
    }

    #[test]
    fn test_quoted_fields() {
        let input = "\"Mary, Jane\",\"O\"\"Neil\",Female,extra\n";
        let students = parse_class_list(input, &PronounTable::default()).unwrap();
        assert_eq!(students[0].first_name, "Mary, Jane");
        assert_eq!(students[0].last_name, "O\"Neil");
    }

    #[test]
    fn test_quoted_newline_keeps_line_numbers() {
        let input = "\"A\nB\",C,Male\nD,E\n";
        let err = parse_class_list(input, &PronounTable::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingFields { line: 3, found: 2 }));
    }

    #[test]
    fn test_blank_lines_and_bom() {
        let input = "\u{feff}Ava,Ng,Female\n\n  \nBen,Cho,Male";
        let students = parse_class_list(input, &PronounTable::default()).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].first_name, "Ava");
        assert_eq!(students[1].first_name, "Ben");
    }

    #[test]
    fn test_short_row() {
        let err = parse_class_list("Ava,Ng,Female\nBen\n", &PronounTable::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: expected first name, last name and gender, found 1 field(s)"
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_class_list("Ava,Ng,Female\n\"Ben,Cho,Male\n", &PronounTable::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn test_empty_input() {
        let students = parse_class_list("", &PronounTable::default()).unwrap();
        assert!(students.is_empty());
    }

    #[test]
    fn test_import_creates_subject() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("class.csv");
        fs::write(&csv, "Ava,Ng,Female\nBen,Cho,Male\n").unwrap();
        let store = SubjectStore::new(dir.path().join("data"));

        let subject =
            import_class_list(&csv, " Year 9 History! ", &PronounTable::default(), &store)
                .unwrap();
        assert_eq!(subject.subject_name, "Year-9-History");
        assert!(subject.intro_comment.is_empty());
        assert!(subject.comment_bank.is_empty());
        assert_eq!(store.load("Year-9-History").unwrap(), subject);
    }

    #[test]
    fn test_import_refuses_existing_subject() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("class.csv");
        fs::write(&csv, "Ava,Ng,Female\n").unwrap();
        let store = SubjectStore::new(dir.path());
        import_class_list(&csv, "Art", &PronounTable::default(), &store).unwrap();
        let err = import_class_list(&csv, "Art", &PronounTable::default(), &store).unwrap_err();
        assert!(matches!(err, ImportError::Store(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path());
        let err = import_class_list(
            &dir.path().join("missing.csv"),
            "Art",
            &PronounTable::default(),
            &store,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Io(_, _)));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_import_unusable_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubjectStore::new(dir.path());
        let err =
            import_class_list(Path::new("x.csv"), "!!!", &PronounTable::default(), &store)
                .unwrap_err();
        assert!(matches!(err, ImportError::Store(StoreError::InvalidName(_))));
    }
}
