//! Sentence splitting and sentence-initial capitalization.

/// Words that end in a period without ending the sentence. Compared
/// case-insensitively, without the trailing period.
const ABBREVIATIONS: &[&str] = &[
    "approx", "assoc", "cf", "dept", "dr", "etc", "inc", "jr", "ltd", "mr", "mrs", "ms", "mx",
    "prof", "sr", "st", "vs",
];

/// Uppercase the first character of every sentence.
///
/// The rest of each sentence is left exactly as written, so proper nouns and
/// deliberate capitals survive. Sentences are rejoined with a single space,
/// which drops any other whitespace that separated them. Empty or
/// whitespace-only input gives an empty string.
pub fn capitalize_sentences(text: &str) -> String {
    split_sentences(text)
        .into_iter()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into trimmed sentences.
///
/// A sentence ends at a run of `.`, `!` or `?` (together with any closing
/// quotes or brackets that follow it) when the run is followed by whitespace
/// or the end of the text. A period after a known or dotted abbreviation
/// (`Mr.`, `etc.`, `e.g.`) does not end a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !is_terminator(ch) {
            continue;
        }

        let mut end = i + ch.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if is_terminator(next) || is_closing(next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if !at_boundary {
            continue;
        }
        if ch == '.' && ends_with_abbreviation(&text[start..i]) {
            continue;
        }

        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, sentence: &'a str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{2019}' | '\u{201D}')
}

/// Check whether the last word before a period is an abbreviation.
fn ends_with_abbreviation(before: &str) -> bool {
    let Some(word) = before.split_whitespace().next_back() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }
    // Dotted forms such as "e.g", "i.e" or "a.m" (the final period is the
    // one being examined).
    lower.contains('.')
        && lower.split('.').all(|part| {
            !part.is_empty() && part.chars().count() <= 2 && part.chars().all(char::is_alphabetic)
        })
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut result = first.to_uppercase().to_string();
            result.push_str(chars.as_str());
            result
        }
    }
}
