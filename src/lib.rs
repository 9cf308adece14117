//! Could Try Harder builds per-student report comments from a bank of
//! reusable templates.
//!
//! Templates use placeholders such as `<name>` and `<sp>` that are filled in
//! with each student's name and pronouns. Free text is tidied by an ordered
//! table of regex style rules, and both steps finish by capitalizing the
//! start of every sentence.
//!
//! # Example
//!
//! ```
//! use could_try_harder::{PronounSet, StyleRules, expand, normalize};
//!
//! let rules = StyleRules::default();
//! let template = normalize("<name> worked hard in semester one.", &rules);
//! assert_eq!(template, "<name> worked hard in Semester 1.");
//!
//! let comment = expand(&template, "Sam", &PronounSet::female());
//! assert_eq!(comment, "Sam worked hard in Semester 1.");
//! ```

pub mod config;
pub mod engine;
pub mod export;
pub mod import;
pub mod model;
pub mod store;

pub use config::{Config, ConfigError};
pub use engine::{
    Engine, InvalidPronounSet, PronounSet, PronounTable, PronounTableError,
    RuleCompilationError, StyleRule, StyleRules, capitalize_sentences, expand, normalize,
};
pub use export::{ExportError, export_reports, render_report};
pub use import::{ImportError, import_class_list, parse_class_list};
pub use model::{Student, StudentPreview, Subject, SubjectError, append_to_draft};
pub use store::{StoreError, SubjectStore, sanitize_subject_name};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_without_placeholders_matches_capitalizer() {
        let text = "this is fine. no tokens here";
        assert_eq!(
            expand(text, "Sam", &PronounSet::male()),
            capitalize_sentences(text)
        );
    }

    #[test]
    fn test_normalized_template_expands_per_student() {
        let rules = StyleRules::default();
        let template = normalize("<sp> enjoyed year seven german.", &rules);
        assert_eq!(template, "<sp> enjoyed Year 7 German.");
        assert_eq!(
            expand(&template, "Tom", &PronounSet::male()),
            "He enjoyed Year 7 German."
        );
    }
}
