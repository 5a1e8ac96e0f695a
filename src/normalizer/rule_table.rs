//! Ordered literal substitution tables.
//!
//! Every table-driven stage (expansion, patch, symbols, numerals, hesitations,
//! cleanup) is a [`RuleTable`]. Entries are applied in insertion order, so a
//! later pattern may match text produced by an earlier replacement.

use serde::{Deserialize, Serialize};

use crate::normalizer::SentenceStage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct RuleTable {
    rules: Vec<(String, String)>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Patterns are lower-cased; re-inserting an existing
    /// pattern updates its replacement but keeps its original position.
    pub fn insert(&mut self, pattern: impl AsRef<str>, replacement: impl Into<String>) {
        let pattern = pattern.as_ref().to_lowercase();
        let replacement = replacement.into();
        match self.rules.iter_mut().find(|(p, _)| *p == pattern) {
            Some(existing) => existing.1 = replacement,
            None => self.rules.push((pattern, replacement)),
        }
    }

    pub fn with_rule(mut self, pattern: impl AsRef<str>, replacement: impl Into<String>) -> Self {
        self.insert(pattern, replacement);
        self
    }

    /// Replace every occurrence of every pattern, table order first.
    pub fn apply(&self, sentence: &str) -> String {
        let mut output = sentence.to_string();
        for (pattern, replacement) in &self.rules {
            // An empty pattern would match between every character.
            if pattern.is_empty() || !output.contains(pattern.as_str()) {
                continue;
            }
            output = output.replace(pattern.as_str(), replacement);
        }
        output
    }

    /// Rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<(String, String)>> for RuleTable {
    fn from(rules: Vec<(String, String)>) -> Self {
        let mut table = RuleTable::new();
        for (pattern, replacement) in rules {
            table.insert(pattern, replacement);
        }
        table
    }
}

impl From<RuleTable> for Vec<(String, String)> {
    fn from(table: RuleTable) -> Self {
        table.rules
    }
}

impl<P: AsRef<str>, R: Into<String>> FromIterator<(P, R)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        let mut table = RuleTable::new();
        for (pattern, replacement) in iter {
            table.insert(pattern, replacement);
        }
        table
    }
}

/// A rule table bound to a pipeline slot.
pub struct TableStage {
    name: &'static str,
    table: RuleTable,
}

impl TableStage {
    pub fn new(name: &'static str, table: RuleTable) -> Self {
        Self { name, table }
    }
}

impl SentenceStage for TableStage {
    fn apply(&self, sentence: &str) -> String {
        self.table.apply(sentence)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
