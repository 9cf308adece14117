// SPDX-FileCopyrightText: 2025 Hong Minhee <https://hongminhee.org/>
// SPDX-License-Identifier: GPL-3.0-or-later
//! Pronoun sets and the gender lookup used to pick one for each student.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

/// Number of forms in a pronoun set.
pub const PRONOUN_FORMS: usize = 5;

/// Name of the set used when a student's gender has no mapping.
pub const DEFAULT_PRONOUNS: &str = "female";

/// The five pronoun forms substituted into comment templates, in order:
/// subjective, objective, possessive adjective, possessive pronoun and
/// reflexive.
///
/// Stored as a plain JSON array so saved subjects stay readable by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PronounSet {
    forms: [String; PRONOUN_FORMS],
}

impl PronounSet {
    /// Build a pronoun set from exactly five non-empty forms.
    pub fn new<I, S>(forms: I) -> Result<Self, InvalidPronounSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let forms: Vec<String> = forms.into_iter().map(Into::into).collect();
        Self::try_from(forms)
    }

    /// `he, him, his, his, himself`
    pub fn male() -> Self {
        Self::builtin(["he", "him", "his", "his", "himself"])
    }

    /// `she, her, her, hers, herself`
    pub fn female() -> Self {
        Self::builtin(["she", "her", "her", "hers", "herself"])
    }

    fn builtin(forms: [&str; PRONOUN_FORMS]) -> Self {
        Self {
            forms: forms.map(String::from),
        }
    }

    pub fn subjective(&self) -> &str {
        &self.forms[0]
    }

    pub fn objective(&self) -> &str {
        &self.forms[1]
    }

    pub fn possessive_adjective(&self) -> &str {
        &self.forms[2]
    }

    pub fn possessive_pronoun(&self) -> &str {
        &self.forms[3]
    }

    pub fn reflexive(&self) -> &str {
        &self.forms[4]
    }

    /// All five forms in placeholder order.
    pub fn forms(&self) -> &[String; PRONOUN_FORMS] {
        &self.forms
    }
}

impl TryFrom<Vec<String>> for PronounSet {
    type Error = InvalidPronounSet;

    fn try_from(forms: Vec<String>) -> Result<Self, Self::Error> {
        if let Some(position) = forms.iter().position(|form| form.trim().is_empty()) {
            return Err(InvalidPronounSet::EmptyForm(position));
        }
        let found = forms.len();
        let forms: [String; PRONOUN_FORMS] = forms
            .try_into()
            .map_err(|_| InvalidPronounSet::WrongCount(found))?;
        Ok(Self { forms })
    }
}

impl From<PronounSet> for Vec<String> {
    fn from(set: PronounSet) -> Self {
        set.forms.into()
    }
}

/// Errors raised when pronoun data does not have the required shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPronounSet {
    /// The set did not contain exactly five forms.
    WrongCount(usize),
    /// The form at this position was empty.
    EmptyForm(usize),
}

impl std::fmt::Display for InvalidPronounSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidPronounSet::WrongCount(found) => write!(
                f,
                "invalid pronoun set: expected {} forms, found {}",
                PRONOUN_FORMS, found
            ),
            InvalidPronounSet::EmptyForm(position) => {
                write!(f, "invalid pronoun set: form {} is empty", position + 1)
            }
        }
    }
}

impl std::error::Error for InvalidPronounSet {}

/// Named pronoun sets plus the mapping from a student's recorded gender to
/// one of them.
///
/// Genders are matched exactly after trimming, so `Male` and `male` are
/// different keys. Anything unmapped gets the default set.
#[derive(Debug, Clone, PartialEq)]
pub struct PronounTable {
    sets: BTreeMap<String, PronounSet>,
    genders: BTreeMap<String, String>,
    default_name: String,
    default_set: PronounSet,
}

impl PronounTable {
    /// Build a table, checking that the default and every gender mapping
    /// name a known set.
    pub fn new(
        sets: BTreeMap<String, PronounSet>,
        genders: BTreeMap<String, String>,
        default_name: impl Into<String>,
    ) -> Result<Self, PronounTableError> {
        let default_name = default_name.into();
        let default_set = sets
            .get(&default_name)
            .cloned()
            .ok_or_else(|| PronounTableError::UnknownDefault(default_name.clone()))?;
        for (gender, set_name) in &genders {
            if !sets.contains_key(set_name) {
                return Err(PronounTableError::UnknownSet {
                    gender: gender.clone(),
                    set: set_name.clone(),
                });
            }
        }
        Ok(Self {
            sets,
            genders,
            default_name,
            default_set,
        })
    }

    /// Look up a set by name.
    pub fn get(&self, name: &str) -> Option<&PronounSet> {
        self.sets.get(name)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn default_set(&self) -> &PronounSet {
        &self.default_set
    }

    /// Pick the pronoun set for a recorded gender, falling back to the
    /// default set.
    pub fn for_gender(&self, gender: &str) -> &PronounSet {
        let gender = gender.trim();
        match self.genders.get(gender).and_then(|name| self.sets.get(name)) {
            Some(set) => set,
            None => {
                if !gender.is_empty() {
                    warn!(
                        "No pronoun mapping for gender {:?}; using {:?}",
                        gender, self.default_name
                    );
                }
                &self.default_set
            }
        }
    }
}

impl Default for PronounTable {
    fn default() -> Self {
        let sets = builtin_sets();
        let genders = builtin_genders();
        Self {
            sets,
            genders,
            default_name: DEFAULT_PRONOUNS.to_string(),
            default_set: PronounSet::female(),
        }
    }
}

/// The `male` and `female` sets.
pub fn builtin_sets() -> BTreeMap<String, PronounSet> {
    BTreeMap::from([
        ("male".to_string(), PronounSet::male()),
        ("female".to_string(), PronounSet::female()),
    ])
}

/// `Male -> male` and `Female -> female`.
pub fn builtin_genders() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Male".to_string(), "male".to_string()),
        ("Female".to_string(), "female".to_string()),
    ])
}

/// Errors raised when a pronoun table refers to sets it does not define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PronounTableError {
    /// The default set name is not defined.
    UnknownDefault(String),
    /// A gender maps to an undefined set.
    UnknownSet { gender: String, set: String },
}

impl std::fmt::Display for PronounTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PronounTableError::UnknownDefault(name) => {
                write!(f, "default pronoun set '{}' is not defined", name)
            }
            PronounTableError::UnknownSet { gender, set } => write!(
                f,
                "gender '{}' maps to pronoun set '{}', which is not defined",
                gender, set
            ),
        }
    }
}

impl std::error::Error for PronounTableError {}
