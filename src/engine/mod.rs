//! The comment engine: placeholder expansion, style normalization and the
//! sentence capitalizer both of them share.

pub mod pronouns;
pub mod sentence;
pub mod style;
pub mod template;

pub use pronouns::{
    DEFAULT_PRONOUNS, InvalidPronounSet, PronounSet, PronounTable, PronounTableError,
};
pub use sentence::{capitalize_sentences, split_sentences};
pub use style::{RuleCompilationError, StyleRule, StyleRules, default_rules, normalize};
pub use template::{PLACEHOLDER_HELP, expand};

/// Compiled style rules and the pronoun table, built once from
/// configuration and shared by every edit.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    rules: StyleRules,
    pronouns: PronounTable,
}

impl Engine {
    pub fn new(rules: StyleRules, pronouns: PronounTable) -> Self {
        Self { rules, pronouns }
    }

    pub fn rules(&self) -> &StyleRules {
        &self.rules
    }

    pub fn pronouns(&self) -> &PronounTable {
        &self.pronouns
    }

    /// Normalize free text with this engine's rules.
    pub fn normalize(&self, text: &str) -> String {
        normalize(text, &self.rules)
    }

    /// Expand a template for someone with the given name and recorded gender.
    pub fn expand_for_gender(&self, text: &str, name: &str, gender: &str) -> String {
        expand(text, name, self.pronouns.for_gender(gender))
    }
}
