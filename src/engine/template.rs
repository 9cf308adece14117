//! Placeholder substitution for comment templates.

use super::pronouns::PronounSet;
use super::sentence::capitalize_sentences;

/// Replaced with the student's first name.
pub const NAME_TOKEN: &str = "<name>";

/// Pronoun tokens, in the same order as the forms of a [`PronounSet`].
pub const PRONOUN_TOKENS: [&str; 5] = ["<sp>", "<op>", "<pa>", "<pp>", "<rp>"];

/// Help text describing every placeholder.
pub const PLACEHOLDER_HELP: &str = "\
Placeholders:
<name> = student name
<sp> = subjective pronoun, e.g. he, she or they
<op> = objective pronoun, e.g. him, her or them
<pa> = possessive adjective, e.g. his, her or their project
<pp> = possessive pronoun, e.g. the project was his, hers or theirs
<rp> = reflexive pronoun, e.g. himself, herself or themself";

/// Fill in a comment template for one student and repair sentence
/// capitalization afterwards.
///
/// Every occurrence of each token is replaced. Other bracketed text is left
/// alone, and there is no way to escape a token.
///
/// # Example
///
/// ```
/// use could_try_harder::{PronounSet, expand};
///
/// let text = expand("<name> tried <pa> best.", "Sam", &PronounSet::female());
/// assert_eq!(text, "Sam tried her best.");
/// ```
pub fn expand(text: &str, name: &str, pronouns: &PronounSet) -> String {
    capitalize_sentences(&substitute(text, name, pronouns))
}

/// Replace the tokens without touching capitalization.
pub fn substitute(text: &str, name: &str, pronouns: &PronounSet) -> String {
    let mut result = text.replace(NAME_TOKEN, name);
    for (token, form) in PRONOUN_TOKENS.iter().zip(pronouns.forms()) {
        result = result.replace(*token, form);
    }
    result
}
