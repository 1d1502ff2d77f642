//! Hedge phrase matching ("maybe", "I think") shared by detection and scoring.

use crate::error::AliceCoreError;
use regex::Regex;

/// Matches configured hedge phrases on word boundaries, case-insensitively.
#[derive(Debug, Clone)]
pub struct HedgeMatcher {
    leading: Option<Regex>,
    anywhere: Option<Regex>,
}

impl HedgeMatcher {
    pub fn new(words: &[String]) -> Result<Self, AliceCoreError> {
        let mut phrases: Vec<String> = words
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        if phrases.is_empty() {
            return Ok(Self {
                leading: None,
                anywhere: None,
            });
        }
        // Longest first so "i think" wins over a shorter prefix.
        phrases.sort_by(|left, right| right.len().cmp(&left.len()).then(left.cmp(right)));
        phrases.dedup();
        let alternatives = phrases
            .iter()
            .map(|phrase| regex::escape(phrase).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let leading = compile(&format!(r"(?i)^(?:{alternatives})\b[\s,]*(?:that\s+)?"))?;
        let anywhere = compile(&format!(r"(?i)\b(?:{alternatives})\b"))?;
        Ok(Self {
            leading: Some(leading),
            anywhere: Some(anywhere),
        })
    }

    /// Drop hedges from the front of a clause, repeatedly.
    pub fn strip_leading<'a>(&self, clause: &'a str) -> &'a str {
        let Some(leading) = &self.leading else {
            return clause;
        };
        let mut rest = clause.trim_start();
        while let Some(found) = leading.find(rest) {
            if found.end() == 0 {
                break;
            }
            rest = rest[found.end()..].trim_start();
        }
        rest
    }

    /// Number of hedge phrases anywhere in the text.
    pub fn count(&self, text: &str) -> usize {
        self.anywhere
            .as_ref()
            .map_or(0, |anywhere| anywhere.find_iter(text).count())
    }
}

fn compile(pattern: &str) -> Result<Regex, AliceCoreError> {
    Regex::new(pattern).map_err(|err| AliceCoreError::Pattern(err.to_string()))
}
