//! Rewriting of display names that collide within one store.
//!
//! Rows sharing a (store, name) pair are numbered in input order; the first
//! keeps its name and every later one is rewritten according to the
//! configured [`NameCollisionPolicy`].

use crate::pipeline::model::MergedRow;
use crate::pipeline::PipelineError;
use crate::table::Value;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

/// How colliding names within a store are made distinct.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCollisionPolicy {
    /// Leave duplicate names unchanged
    None,
    /// Append one space per earlier occurrence. Downstream systems that
    /// trim names will collapse these again.
    SpacePad,
    /// Flip the accent of one vowel, adding periods once every vowel has
    /// been used
    #[default]
    #[serde(rename = "accent")]
    AccentSubstitute,
}

impl NameCollisionPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SpacePad => "space-pad",
            Self::AccentSubstitute => "accent",
        }
    }

    /// Returns the rewritten name for the `occurrence`-th (0-based) row
    /// carrying `name`, or `None` when the name stays as it is.
    pub fn rename(&self, name: &str, occurrence: usize) -> Option<String> {
        if occurrence == 0 {
            return None;
        }
        match self {
            Self::None => None,
            Self::SpacePad => Some(space_pad(name, occurrence)),
            Self::AccentSubstitute => Some(accent_substitute(name, occurrence)),
        }
    }
}

impl Display for NameCollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameCollisionPolicy {
    type Err = PipelineError;

    /// Accepts (case-insensitive):
    /// - None: "none", "off"
    /// - SpacePad: "space", "spaces", "space-pad", "space-padding"
    /// - AccentSubstitute: "accent", "accent-substitute", "accent-substitution"
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "NONE" | "OFF" => Ok(Self::None),
            "SPACE" | "SPACES" | "SPACE-PAD" | "SPACE-PADDING" => Ok(Self::SpacePad),
            "ACCENT" | "ACCENT-SUBSTITUTE" | "ACCENT-SUBSTITUTION" => Ok(Self::AccentSubstitute),
            _ => Err(PipelineError::UnknownPolicy(name.to_owned())),
        }
    }
}

/// A row whose display name was rewritten.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenamedRow {
    pub store_id: String,
    pub external_id: String,
    pub name_english: String,
    pub occurrence: usize,
}

/// Numbers every row by the occurrence of its name within its store and
/// rewrites the names of later occurrences. A rewrite never reuses a name
/// already present in the store, original or rewritten. Returns the
/// rewritten rows in input order.
pub fn disambiguate(rows: &mut [MergedRow], policy: NameCollisionPolicy) -> Vec<RenamedRow> {
    let mut taken = HashMap::<String, HashSet<String>>::new();
    for row in rows.iter() {
        taken
            .entry(row.store_id.to_owned())
            .or_default()
            .insert(row.name_english.to_text());
    }

    let mut occurrences = HashMap::<(String, String), usize>::new();
    let mut renamed = Vec::new();
    for row in rows.iter_mut() {
        let name = row.name_english.to_text();
        let counter = occurrences
            .entry((row.store_id.to_owned(), name.to_owned()))
            .or_insert(0);
        row.name_occurrence = *counter;
        *counter += 1;

        let store_names = taken.entry(row.store_id.to_owned()).or_default();
        if let Some(new_name) = free_name(policy, &name, row.name_occurrence, store_names) {
            store_names.insert(new_name.to_owned());
            row.name_english = Value::Text(new_name.to_owned());
            renamed.push(RenamedRow {
                store_id: row.store_id.to_owned(),
                external_id: row.product_id.to_owned(),
                name_english: new_name,
                occurrence: row.name_occurrence,
            });
        }
    }
    renamed
}

/// First rewrite of `name`, starting at `occurrence`, that is not in `taken`.
/// Each policy yields a distinct string per occurrence, so this terminates.
fn free_name(
    policy: NameCollisionPolicy,
    name: &str,
    occurrence: usize,
    taken: &HashSet<String>,
) -> Option<String> {
    let mut attempt = occurrence;
    loop {
        let candidate = policy.rename(name, attempt)?;
        if !taken.contains(&candidate) {
            return Some(candidate);
        }
        attempt += 1;
    }
}

/// Appends `occurrence` spaces.
pub fn space_pad(name: &str, occurrence: usize) -> String {
    format!("{}{}", name, " ".repeat(occurrence))
}

/// Accent counterpart of an eligible vowel.
fn accent(character: char) -> Option<char> {
    let counterpart = match character {
        'a' => 'à',
        'A' => 'À',
        'à' => 'a',
        'e' => 'é',
        'E' => 'É',
        'é' | 'è' => 'e',
        'i' => 'ï',
        'I' => 'Ï',
        'o' => 'ô',
        'O' => 'Ô',
        'u' => 'ù',
        'U' => 'Ù',
        _ => return None,
    };
    Some(counterpart)
}

/// Flips the accent of one eligible vowel, walking back from the last one
/// as `occurrence` grows. Each completed walk over the vowels adds one
/// trailing period, so no two occurrences produce the same string. A name
/// without eligible vowels gets one period per occurrence.
pub fn accent_substitute(name: &str, occurrence: usize) -> String {
    if occurrence == 0 {
        return name.to_owned();
    }
    let mut characters: Vec<char> = name.chars().collect();
    let vowels: Vec<usize> = characters
        .iter()
        .enumerate()
        .filter(|(_, character)| accent(**character).is_some())
        .map(|(index, _)| index)
        .collect();
    if vowels.is_empty() {
        return format!("{}{}", name, ".".repeat(occurrence));
    }

    let count = vowels.len();
    let target = vowels[count - 1 - occurrence % count];
    if let Some(counterpart) = accent(characters[target]) {
        characters[target] = counterpart;
    }
    let cycles = (occurrence - 1) / count;
    characters.into_iter().collect::<String>() + &".".repeat(cycles)
}
