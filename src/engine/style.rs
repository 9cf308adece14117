// SPDX-FileCopyrightText: 2025 Hong Minhee <https://hongminhee.org/>
// SPDX-License-Identifier: GPL-3.0-or-later
//! Regex style rules applied to comments before they are stored.
//!
//! Rules run one after another over the whole text, each seeing the output
//! of the one before it. Order is significant: the generic `semester` rule
//! lowercases every occurrence and the `Semester 1`/`Semester 2` rules that
//! follow it capitalize the specific cases again.

use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::sentence::capitalize_sentences;

/// The built-in rule table, in application order.
const DEFAULT_STYLE_RULES: &[(&str, &str)] = &[
    // Class 1-6
    ("(class|year) *(1|one)", "Class 1"),
    ("(class|year) *(2|two)", "Class 2"),
    ("(class|year) *(3|three)", "Class 3"),
    ("(class|year) *(4|four)", "Class 4"),
    ("(class|year) *(5|five)", "Class 5"),
    ("(class|year) *(6|six)", "Class 6"),
    // Year 7-12
    ("(class|year) *(7|seven)", "Year 7"),
    ("(class|year) *(8|eight)", "Year 8"),
    ("(class|year) *(9|nine)", "Year 9"),
    ("(class|year) *(10|ten)", "Year 10"),
    ("(class|year) *(11|eleven)", "Year 11"),
    ("(class|year) *(12|twelve)", "Year 12"),
    // Languages
    ("japanese", "Japanese"),
    ("german", "German"),
    // Semester is lowercase, except when numbered
    ("semester", "semester"),
    ("(semester) *(1|one)", "Semester 1"),
    ("(semester) *(2|two)", "Semester 2"),
    // Term 1-4
    ("(term) *(1|one)", "Term 1"),
    ("(term) *(2|two)", "Term 2"),
    ("(term) *(3|three)", "Term 3"),
    ("(term) *(4|four)", "Term 4"),
    // Misc.
    ("bookwork", "book work"),
    ("classwork", "class work"),
    (r"\bexam(s?)\b", "examination${1}"),
];

/// A single rewrite rule: a case-insensitive pattern and its replacement.
///
/// The replacement may refer to capture groups with `$1` or `${name}`; use
/// `$$` for a literal dollar sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub pattern: String,
    pub replacement: String,
}

impl StyleRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// The built-in rule table as configuration values.
pub fn default_rules() -> Vec<StyleRule> {
    DEFAULT_STYLE_RULES
        .iter()
        .map(|&(pattern, replacement)| StyleRule::new(pattern, replacement))
        .collect()
}

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    replacement: String,
}

/// An ordered, compiled rule table.
#[derive(Debug, Clone)]
pub struct StyleRules {
    rules: Vec<CompiledRule>,
}

impl StyleRules {
    /// Compile every rule, failing on the first invalid pattern.
    pub fn compile(rules: &[StyleRule]) -> Result<Self, RuleCompilationError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| CompiledRule {
                        regex,
                        replacement: rule.replacement.clone(),
                    })
                    .map_err(|source| RuleCompilationError {
                        index,
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Patterns in application order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.regex.as_str())
    }

    /// Run every rule over the text in order, without recapitalizing.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        let mut changed = 0;
        for rule in &self.rules {
            let replaced = rule.regex.replace_all(&result, rule.replacement.as_str());
            if replaced != result {
                changed += 1;
                result = replaced.into_owned();
            }
        }
        debug!("{} of {} style rules changed the text", changed, self.rules.len());
        result
    }
}

impl Default for StyleRules {
    fn default() -> Self {
        Self::compile(&default_rules()).expect("built-in style rules are valid")
    }
}

/// Apply the style rules in order, then repair sentence capitalization.
///
/// # Example
///
/// ```
/// use could_try_harder::{StyleRules, normalize};
///
/// let rules = StyleRules::default();
/// assert_eq!(normalize("class nine history", &rules), "Year 9 history");
/// ```
pub fn normalize(text: &str, rules: &StyleRules) -> String {
    capitalize_sentences(&rules.apply(text))
}

/// A style rule whose pattern is not a valid regular expression.
#[derive(Debug)]
pub struct RuleCompilationError {
    /// Position of the rule in its table, starting at 0.
    pub index: usize,
    pub pattern: String,
    pub source: regex::Error,
}

impl std::fmt::Display for RuleCompilationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid style rule #{} ({:?}): {}",
            self.index + 1,
            self.pattern,
            self.source
        )
    }
}

impl std::error::Error for RuleCompilationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
