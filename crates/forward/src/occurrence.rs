//! Flag occurrences and the consumable scan over them.

use serde::{Deserialize, Serialize};

/// Where a flag mention came from. Occurrences are assembled with config
/// defaults first and command-line flags after, so "latest wins" means an
/// explicit flag beats a configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSource {
    Cli,
    Config,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            FlagValue::Str(s) => match s.as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(s) => Some(s),
            FlagValue::Bool(_) => None,
        }
    }
}

/// One mention of a logical flag. Multiple occurrences of the same logical
/// flag (aliases included) can coexist; the resolver enumerates and
/// consumes them explicitly so unresolved mentions stay detectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagOccurrence {
    pub key: String,
    pub value: FlagValue,
    pub source: FlagSource,
}

impl FlagOccurrence {
    pub fn boolean(key: impl Into<String>, value: bool, source: FlagSource) -> Self {
        Self {
            key: key.into(),
            value: FlagValue::Bool(value),
            source,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>, source: FlagSource) -> Self {
        Self {
            key: key.into(),
            value: FlagValue::Str(value.into()),
            source,
        }
    }
}

/// The resolver's output: argv-style extra arguments plus warnings about
/// precedence decisions that discarded a user-supplied flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForwardResolution {
    pub extra_args: Vec<String>,
    pub warnings: Vec<String>,
}

/// An explicit scan state over an ordered occurrence list: the occurrences
/// plus the set of indices already consumed by a resolver branch.
///
/// There is no hidden global state; resolving the same occurrence set twice
/// without consuming in between yields identical results.
#[derive(Debug, Clone, Default)]
pub struct FlagScan {
    occurrences: Vec<FlagOccurrence>,
    consumed: Vec<bool>,
}

impl FlagScan {
    pub fn new(occurrences: Vec<FlagOccurrence>) -> Self {
        let consumed = vec![false; occurrences.len()];
        Self { occurrences, consumed }
    }

    /// Every unconsumed occurrence matching any of the given logical keys,
    /// in arrival order, paired with its index.
    pub fn all(&self, keys: &[&str]) -> Vec<(usize, &FlagOccurrence)> {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|(i, occ)| !self.consumed[*i] && keys.contains(&occ.key.as_str()))
            .collect()
    }

    /// The most recent unconsumed occurrence for any of the keys.
    pub fn latest(&self, keys: &[&str]) -> Option<&FlagOccurrence> {
        self.all(keys).last().map(|(_, occ)| *occ)
    }

    /// The most recent occurrence's string value, if it has one.
    pub fn latest_string(&self, keys: &[&str]) -> Option<String> {
        self.all(keys)
            .iter()
            .rev()
            .find_map(|(_, occ)| occ.value.as_str().map(String::from))
    }

    pub fn has(&self, key: &str) -> bool {
        !self.all(&[key]).is_empty()
    }

    /// Mark specific occurrences as handled so later generic passthrough
    /// logic does not re-emit them.
    pub fn consume(&mut self, indices: &[usize]) {
        for &i in indices {
            if let Some(slot) = self.consumed.get_mut(i) {
                *slot = true;
            }
        }
    }

    /// Consume every occurrence of the given keys. Returns how many were
    /// consumed.
    pub fn consume_keys(&mut self, keys: &[&str]) -> usize {
        let indices: Vec<usize> = self.all(keys).iter().map(|(i, _)| *i).collect();
        self.consume(&indices);
        indices.len()
    }

    /// Consume all string occurrences of the keys, in arrival order.
    pub fn consume_all_strings(&mut self, keys: &[&str]) -> Vec<String> {
        let matches: Vec<(usize, String)> = self
            .all(keys)
            .iter()
            .filter_map(|(i, occ)| occ.value.as_str().map(|s| (*i, s.to_string())))
            .collect();
        let indices: Vec<usize> = matches.iter().map(|(i, _)| *i).collect();
        self.consume(&indices);
        matches.into_iter().map(|(_, s)| s).collect()
    }

    /// Consume all string occurrences of the keys and split each on commas,
    /// for repeatable flags like extra directories or tool allowlists.
    pub fn consume_all_csv_strings(&mut self, keys: &[&str]) -> Vec<String> {
        self.consume_all_strings(keys)
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Consume every occurrence of the keys; true when the latest one is a
    /// truthy boolean (or has no parseable value but is present at all).
    pub fn consume_any_boolean(&mut self, keys: &[&str]) -> bool {
        let latest_truthy = self
            .latest(keys)
            .map(|occ| occ.value.as_bool().unwrap_or(true));
        self.consume_keys(keys);
        latest_truthy.unwrap_or(false)
    }

    /// Occurrences no resolver branch handled. Not an error: the host's
    /// generic passthrough layer deals with them.
    pub fn unconsumed(&self) -> Vec<&FlagOccurrence> {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed[*i])
            .map(|(_, occ)| occ)
            .collect()
    }
}
