//! Rule-based fact detection over single utterances.
//!
//! An utterance is split into clauses (sentence terminators followed by
//! whitespace, and `and`/`but` introducing a new subject). Leading filler
//! and hedges are stripped, questions are skipped, and each remaining clause
//! is offered to the configured rules in order. The first rule that matches
//! a clause produces its candidate.

use crate::error::AliceCoreError;
use crate::hedge::HedgeMatcher;
use alice_rs_config::{ExtractionConfig, FactRuleKind};
use alice_rs_memory::{Category, text};
use log::debug;
use regex::{Captures, Regex};
use std::collections::HashMap;

const DETERMINER: &str = r"(?:my|the|our|your|his|her|their|this|that)";
const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const DATE: &str = r"(?:\d{4}[/.-]\d{1,2}[/.-]\d{1,2}|\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}|<MONTH>\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?|\d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?<MONTH>(?:,?\s+\d{4})?)";
const WHEN: &str = r"(?:<DATE>|(?:(?:next|this|on)\s+)?(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|weekend|tomorrow|today|tonight|noon|midnight)|(?:next|this)\s+(?:week|month|year)|\d{1,2}(?::\d{2})?\s*(?:am|pm)|\d{1,2}:\d{2})\b";
const PREPOSITION: &str = r"(?:in\s+front\s+of|on\s+top\s+of|next\s+to|inside|underneath|behind|beside|between|under|above|below|near|in|on|at|by)";

const DATE_PATTERNS: &[(&str, Option<&str>)] = &[(
    r"(?i)^(?P<subject>(?:[\w.']+\s+){0,4}?(?:birthday|anniversary|wedding|graduation|deadline|due\s+date))\b.*?\b(?P<value><DATE>)",
    None,
)];

const SCHEDULE_PATTERNS: &[(&str, Option<&str>)] = &[(
    r"(?i)^(?P<subject>(?:<DET>\s+)?[\w.' -]+?)\s+(?:is|are|was|will\s+be|has\s+been\s+moved\s+to|was\s+moved\s+to|got\s+moved\s+to|moved\s+to)\s+(?:(?:scheduled|planned|set|booked)\s+)?(?:(?:for|on|at)\s+)?(?P<value>\b<WHEN>.*)$",
    None,
)];

const LOCATION_PATTERNS: &[(&str, Option<&str>)] = &[
    (
        r"(?i)^(?P<subject>(?:<DET>\s+)?[\w.' -]+?)\s+(?:is|are|was|were)\s+(?:(?:right|still|now|currently|usually|always)\s+)?(?:(?:located|kept|stored|placed|parked|hidden|sitting|lying)\s+)?(?P<prep><PREP>)\s+(?P<value>.+)$",
        None,
    ),
    (
        r"(?i)^(?:i\s+)?(?:(?:have|had|just)\s+)?(?:put|left|placed|parked|hid|stored|keep|kept|stashed|dropped)\s+(?P<subject>(?:<DET>\s+)?[\w.' -]+?)\s+(?P<prep><PREP>)\s+(?P<value>.+)$",
        None,
    ),
];

const PERSONAL_PATTERNS: &[(&str, Option<&str>)] = &[
    (
        r"(?i)^my\s+(?P<subject>[\w.' -]+?)\s+(?:is|are)\s+(?P<value>.+)$",
        None,
    ),
    (r"(?i)^i\s+work\s+as\s+(?:an?\s+)?(?P<value>.+)$", Some("occupation")),
    (
        r"(?i)^i\s+(?:work|am\s+working)\s+(?:at|for)\s+(?P<value>.+)$",
        Some("workplace"),
    ),
    (r"(?i)^i\s+live\s+(?:in|at|on)\s+(?P<value>.+)$", Some("home")),
    (
        r"(?i)^(?:i\s+am|i'm)\s+(?P<value>\d{1,3})\s+years?\s+old\b",
        Some("age"),
    ),
    (
        r"(?i)^(?:i\s+am|i'm)\s+allergic\s+to\s+(?P<value>.+)$",
        Some("allergies"),
    ),
    (r"(?i)^(?:call\s+me|i\s+am\s+called)\s+(?P<value>.+)$", Some("name")),
];

const PREFERENCE_PATTERNS: &[(&str, Option<&str>)] = &[(
    r"(?i)^i\s+(?:really\s+|absolutely\s+|just\s+)?(?P<verb>love|like|enjoy|prefer|hate|dislike|don't\s+like|do\s+not\s+like|can't\s+stand)\s+(?P<value>.+)$",
    None,
)];

const REMINDER_PATTERNS: &[(&str, Option<&str>)] = &[(
    r"(?i)^(?:please\s+)?(?:remind\s+me\s+to|remember\s+to|don't\s+(?:let\s+me\s+)?forget\s+to|do\s+not\s+forget\s+to|i\s+need\s+to|i\s+have\s+to|i\s+must)\s+(?P<value>.+)$",
    None,
)];

const LEADING_FILLER: &str = r"(?i)^(?:(?:please\s+)?(?:remember|note|keep\s+in\s+mind)\s+that|just\s+so\s+you\s+know|by\s+the\s+way|fyi|btw|actually|also|oh|well|so|and|but|okay|ok|hey|alright)\b[\s,:]*";
const CONJUNCTION: &str = r"(?i)(?:,\s*|\s+)(?:and|but)\s+(?P<next>(?:my|the|our|your|his|her|their|i)\s)|,\s*(?P<comma_next>(?:my|our|your|his|her|their)\s)";
const CONTRAST: &str = r"(?i),\s*(?:but\s+)?not\b.*$";
const NEGATION: &str = r"(?i)\b(?:not|never|no\s+longer)\b|n't\b";

const INTERROGATIVES: &[&str] = &[
    "where", "what", "when", "who", "whom", "whose", "why", "how", "which",
];

/// Subjects that never make a useful key on their own.
const VAGUE_SUBJECTS: &[&str] = &[
    "everything", "he", "here", "i", "it", "mine", "nothing", "one", "she", "something",
    "there", "they", "this", "that", "today", "tomorrow", "tonight", "we", "what", "which",
    "who", "you",
];

const MAX_KEY_WORDS: usize = 6;

/// Closed set of fact rules, each tied to one family of patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactRule {
    Date,
    Schedule,
    Location,
    Personal,
    Preference,
    Reminder,
}

impl FactRule {
    pub fn from_kind(kind: FactRuleKind) -> Self {
        match kind {
            FactRuleKind::Date => FactRule::Date,
            FactRuleKind::Schedule => FactRule::Schedule,
            FactRuleKind::Location => FactRule::Location,
            FactRuleKind::Personal => FactRule::Personal,
            FactRuleKind::Preference => FactRule::Preference,
            FactRuleKind::Reminder => FactRule::Reminder,
        }
    }

    pub fn kind(self) -> FactRuleKind {
        match self {
            FactRule::Date => FactRuleKind::Date,
            FactRule::Schedule => FactRuleKind::Schedule,
            FactRule::Location => FactRuleKind::Location,
            FactRule::Personal => FactRuleKind::Personal,
            FactRule::Preference => FactRuleKind::Preference,
            FactRule::Reminder => FactRuleKind::Reminder,
        }
    }

    /// Category stored for facts this rule produces.
    pub fn category(self) -> Category {
        match self {
            FactRule::Date => Category::Date,
            FactRule::Schedule => Category::Schedule,
            FactRule::Location => Category::Location,
            FactRule::Personal | FactRule::Preference => Category::Personal,
            FactRule::Reminder => Category::Other,
        }
    }

    fn patterns(self) -> &'static [(&'static str, Option<&'static str>)] {
        match self {
            FactRule::Date => DATE_PATTERNS,
            FactRule::Schedule => SCHEDULE_PATTERNS,
            FactRule::Location => LOCATION_PATTERNS,
            FactRule::Personal => PERSONAL_PATTERNS,
            FactRule::Preference => PREFERENCE_PATTERNS,
            FactRule::Reminder => REMINDER_PATTERNS,
        }
    }

    /// Whether a negated clause can still carry this kind of fact
    /// ("I don't like ...", "don't forget to ...").
    fn allows_negation(self) -> bool {
        matches!(self, FactRule::Preference | FactRule::Reminder)
    }

    /// Build the raw subject and value from a match.
    fn extract(self, caps: &Captures<'_>, fixed_key: Option<&str>) -> Option<(String, String)> {
        let value = clean_value(caps.name("value")?.as_str())?;
        match self {
            FactRule::Location => {
                let subject = caps.name("subject")?.as_str().to_string();
                let prep = collapse_whitespace(&caps.name("prep")?.as_str().to_lowercase());
                let value = match prep.as_str() {
                    "in" | "on" | "at" => strip_article(&value).to_string(),
                    _ => format!("{prep} {value}"),
                };
                Some((subject, value))
            }
            FactRule::Preference => {
                let verb = collapse_whitespace(&caps.name("verb")?.as_str().to_lowercase());
                let phrase = match verb.as_str() {
                    "love" => "loves",
                    "like" => "likes",
                    "enjoy" => "enjoys",
                    "prefer" => "prefers",
                    "hate" => "hates",
                    "can't stand" => "can't stand",
                    _ => "dislikes",
                };
                Some((format!("{value} preference"), format!("{phrase} {value}")))
            }
            FactRule::Reminder => {
                let terms: Vec<String> = text::content_terms(&value, 1).into_iter().take(3).collect();
                if terms.is_empty() {
                    return None;
                }
                Some((format!("reminder {}", terms.join(" ")), value))
            }
            FactRule::Date | FactRule::Schedule | FactRule::Personal => {
                let subject = match fixed_key {
                    Some(key) => key.to_string(),
                    None => caps.name("subject")?.as_str().to_string(),
                };
                Some((subject, value))
            }
        }
    }
}

/// An unscored extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFact {
    /// Subject phrase as written, e.g. `My car keys`.
    pub raw_key: String,
    /// Normalized store key, e.g. `car_keys`.
    pub key: String,
    pub raw_value: String,
    pub category_hint: Category,
    /// Rule that produced the candidate.
    pub rule: FactRule,
    /// Clause the fact came from, hedges included.
    pub evidence: String,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: FactRule,
    patterns: Vec<(Regex, Option<&'static str>)>,
}

impl CompiledRule {
    fn compile(rule: FactRule) -> Result<Self, AliceCoreError> {
        let patterns = rule
            .patterns()
            .iter()
            .map(|(template, fixed_key)| Ok((compile(&expand(template))?, *fixed_key)))
            .collect::<Result<Vec<_>, AliceCoreError>>()?;
        Ok(Self { rule, patterns })
    }

    fn apply(&self, clause: &str) -> Option<(String, String)> {
        self.patterns.iter().find_map(|(regex, fixed_key)| {
            regex
                .captures(clause)
                .and_then(|caps| self.rule.extract(&caps, *fixed_key))
        })
    }
}

struct Clause {
    text: String,
    question: bool,
}

/// Detects candidate facts in single utterances. Never fails once built.
#[derive(Debug, Clone)]
pub struct FactDetector {
    rules: Vec<CompiledRule>,
    hedges: HedgeMatcher,
    filler: Regex,
    conjunction: Regex,
    /// Trailing `, not X` correction.
    contrast: Regex,
    negation: Regex,
}

impl FactDetector {
    /// Compile the rules in priority order.
    pub fn new(rules: &[FactRuleKind], hedge_words: &[String]) -> Result<Self, AliceCoreError> {
        let mut compiled: Vec<CompiledRule> = Vec::with_capacity(rules.len());
        for kind in rules {
            let rule = FactRule::from_kind(*kind);
            if compiled.iter().any(|existing| existing.rule == rule) {
                continue;
            }
            compiled.push(CompiledRule::compile(rule)?);
        }
        Ok(Self {
            rules: compiled,
            hedges: HedgeMatcher::new(hedge_words)?,
            filler: compile(LEADING_FILLER)?,
            conjunction: compile(CONJUNCTION)?,
            contrast: compile(CONTRAST)?,
            negation: compile(NEGATION)?,
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, AliceCoreError> {
        Self::new(&config.rules, &config.hedge_words)
    }

    /// Rules in priority order.
    pub fn rules(&self) -> Vec<FactRule> {
        self.rules.iter().map(|compiled| compiled.rule).collect()
    }

    /// Candidate facts in the utterance, in order of appearance.
    ///
    /// When two clauses yield the same key (plural spellings included), the
    /// higher-priority rule wins; for the same rule the later clause (a
    /// restatement) wins.
    pub fn detect(&self, utterance: &str) -> Vec<CandidateFact> {
        let mut candidates: Vec<CandidateFact> = Vec::new();
        let mut by_key: HashMap<String, (usize, usize)> = HashMap::new();

        for clause in self.clauses(utterance) {
            if clause.question {
                continue;
            }
            let Some((priority, candidate)) = self.match_clause(&clause.text) else {
                continue;
            };
            let folded = text::fold_key(&candidate.key);
            match by_key.get(&folded).copied() {
                Some((existing_priority, idx)) if priority <= existing_priority => {
                    by_key.insert(folded, (priority, idx));
                    candidates[idx] = candidate;
                }
                Some(_) => {}
                None => {
                    by_key.insert(folded, (priority, candidates.len()));
                    candidates.push(candidate);
                }
            }
        }
        debug!(
            "detected candidate facts (count={}, utterance_len={})",
            candidates.len(),
            utterance.len()
        );
        candidates
    }

    fn match_clause(&self, evidence: &str) -> Option<(usize, CandidateFact)> {
        let mut stripped = self.strip_preamble(evidence);
        if stripped.is_empty() || is_interrogative(stripped) {
            return None;
        }
        if let Some(found) = self.contrast.find(stripped) {
            stripped = stripped[..found.start()].trim_end();
        }
        let negated = self.negation.is_match(stripped);
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, compiled)| !negated || compiled.rule.allows_negation())
            .find_map(|(priority, compiled)| {
                let (raw_key, raw_value) = compiled.apply(stripped)?;
                let key = usable_key(&raw_key)?;
                Some((
                    priority,
                    CandidateFact {
                        raw_key: raw_key.trim().to_string(),
                        key,
                        raw_value,
                        category_hint: compiled.rule.category(),
                        rule: compiled.rule,
                        evidence: evidence.to_string(),
                    },
                ))
            })
    }

    /// Remove filler ("remember that", "btw") and hedges from the front.
    fn strip_preamble<'a>(&self, clause: &'a str) -> &'a str {
        let mut rest = clause.trim();
        loop {
            let before = rest.len();
            if let Some(found) = self.filler.find(rest)
                && found.end() > 0
            {
                rest = rest[found.end()..].trim_start();
            }
            rest = self.hedges.strip_leading(rest);
            if rest.len() == before {
                return rest;
            }
        }
    }

    fn clauses(&self, utterance: &str) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for sentence in split_sentences(utterance) {
            let question = sentence.ends_with('?');
            let body = sentence.trim_end_matches(['.', '!', '?', ';']).trim();
            let mut start = 0;
            for caps in self.conjunction.captures_iter(body) {
                let next = caps.name("next").or_else(|| caps.name("comma_next"));
                let (Some(whole), Some(next)) = (caps.get(0), next) else {
                    continue;
                };
                // "Actually, my keys ..." is one clause.
                if caps.name("comma_next").is_some()
                    && self.strip_preamble(&body[start..whole.start()]).is_empty()
                {
                    continue;
                }
                push_clause(&mut clauses, &body[start..whole.start()], question);
                start = next.start();
            }
            push_clause(&mut clauses, &body[start..], question);
        }
        clauses
    }
}

fn push_clause(clauses: &mut Vec<Clause>, text: &str, question: bool) {
    let text = text.trim().trim_end_matches([',', ';', ':']).trim();
    if !text.is_empty() {
        clauses.push(Clause {
            text: text.to_string(),
            question,
        });
    }
}

/// Split on `.`, `!`, `?`, `;` followed by whitespace or end of text, and on
/// newlines. Abbreviations like `Mr.A` stay intact.
fn split_sentences(utterance: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = utterance.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let end = idx + ch.len_utf8();
        let boundary = match ch {
            '\n' => true,
            '.' | '!' | '?' | ';' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let sentence = utterance[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }
    let tail = utterance[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn is_interrogative(clause: &str) -> bool {
    clause
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase())
        .is_some_and(|word| INTERROGATIVES.contains(&word.as_str()))
}

/// Normalize a subject and reject vague or overlong ones.
fn usable_key(raw_key: &str) -> Option<String> {
    let key = text::normalize_key(raw_key)?;
    if VAGUE_SUBJECTS.contains(&key.as_str()) || key.split('_').count() > MAX_KEY_WORDS {
        return None;
    }
    Some(key)
}

/// Trim whitespace and trailing punctuation; `None` when nothing is left.
fn clean_value(value: &str) -> Option<String> {
    let cleaned = value
        .trim()
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .trim();
    (!cleaned.is_empty()).then(|| collapse_whitespace(cleaned))
}

fn strip_article(value: &str) -> &str {
    for article in ["the ", "a ", "an "] {
        if value.len() > article.len()
            && value.is_char_boundary(article.len())
            && value[..article.len()].eq_ignore_ascii_case(article)
        {
            return value[article.len()..].trim_start();
        }
    }
    value
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn expand(template: &str) -> String {
    template
        .replace("<WHEN>", WHEN)
        .replace("<DATE>", DATE)
        .replace("<MONTH>", MONTH)
        .replace("<DET>", DETERMINER)
        .replace("<PREP>", PREPOSITION)
}

fn compile(pattern: &str) -> Result<Regex, AliceCoreError> {
    Regex::new(pattern).map_err(|err| AliceCoreError::Pattern(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{FactDetector, FactRule, split_sentences};
    use alice_rs_config::{ExtractionConfig, FactRuleKind};
    use alice_rs_memory::Category;
    use pretty_assertions::assert_eq;

    fn detector() -> FactDetector {
        FactDetector::from_config(&ExtractionConfig::default()).expect("detector")
    }

    fn single(utterance: &str) -> (String, String, Category) {
        let candidates = detector().detect(utterance);
        assert_eq!(candidates.len(), 1, "candidates for {utterance:?}: {candidates:?}");
        let candidate = &candidates[0];
        (
            candidate.key.clone(),
            candidate.raw_value.clone(),
            candidate.category_hint,
        )
    }

    #[test]
    fn location_statement() {
        assert_eq!(
            single("My car keys are on the kitchen counter"),
            (
                "car_keys".to_string(),
                "kitchen counter".to_string(),
                Category::Location
            )
        );
    }

    #[test]
    fn location_with_placement_verb_and_preposition() {
        assert_eq!(
            single("I left my wallet under the sofa."),
            (
                "wallet".to_string(),
                "under the sofa".to_string(),
                Category::Location
            )
        );
        assert_eq!(
            single("The spare key is hidden in a flower pot"),
            (
                "spare_key".to_string(),
                "flower pot".to_string(),
                Category::Location
            )
        );
    }

    #[test]
    fn date_with_abbreviated_name() {
        assert_eq!(
            single("Mr.A birthday is coming in 4 days (2001/06/19)"),
            (
                "mr_a_birthday".to_string(),
                "2001/06/19".to_string(),
                Category::Date
            )
        );
    }

    #[test]
    fn date_with_month_name() {
        assert_eq!(
            single("Mom's birthday is on March 3rd"),
            (
                "mom_birthday".to_string(),
                "March 3rd".to_string(),
                Category::Date
            )
        );
    }

    #[test]
    fn schedule_statement() {
        assert_eq!(
            single("My dentist appointment is on Monday at 3pm."),
            (
                "dentist_appointment".to_string(),
                "Monday at 3pm".to_string(),
                Category::Schedule
            )
        );
    }

    #[test]
    fn personal_statements() {
        assert_eq!(
            single("My favorite color is blue"),
            (
                "favorite_color".to_string(),
                "blue".to_string(),
                Category::Personal
            )
        );
        assert_eq!(
            single("I work as a nurse"),
            (
                "occupation".to_string(),
                "nurse".to_string(),
                Category::Personal
            )
        );
    }

    #[test]
    fn preference_and_reminder() {
        let candidates = detector().detect("I really love green tea. Remind me to call the plumber.");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].key, "green_tea_preference");
        assert_eq!(candidates[0].raw_value, "loves green tea");
        assert_eq!(candidates[0].category_hint, Category::Personal);
        assert_eq!(candidates[1].rule, FactRule::Reminder);
        assert_eq!(candidates[1].key, "reminder_call_plumber");
        assert_eq!(candidates[1].category_hint, Category::Other);
    }

    #[test]
    fn negated_preference_is_a_dislike() {
        assert_eq!(
            single("I don't like cilantro"),
            (
                "cilantro_preference".to_string(),
                "dislikes cilantro".to_string(),
                Category::Personal
            )
        );
    }

    #[test]
    fn conjunction_yields_independent_facts() {
        let candidates =
            detector().detect("My keys are in the drawer and my wallet is on the table");
        let keys: Vec<&str> = candidates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["keys", "wallet"]);
        assert_eq!(candidates[1].raw_value, "table");
    }

    #[test]
    fn comma_before_new_subject_splits_clauses() {
        let candidates =
            detector().detect("My keys are in the drawer, my wallet is on the table");
        let facts: Vec<(&str, &str)> = candidates
            .iter()
            .map(|c| (c.key.as_str(), c.raw_value.as_str()))
            .collect();
        assert_eq!(facts, vec![("keys", "drawer"), ("wallet", "table")]);
    }

    #[test]
    fn leading_hedge_before_comma_stays_in_clause() {
        let candidates = detector().detect("Maybe, my keys are in the car");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, "keys");
        assert_eq!(candidates[0].evidence, "Maybe, my keys are in the car");
    }

    #[test]
    fn trailing_correction_is_not_a_negation() {
        assert_eq!(
            single("My keys are in the kitchen, not the car"),
            (
                "keys".to_string(),
                "kitchen".to_string(),
                Category::Location
            )
        );
        assert!(detector().detect("My keys are not in the drawer").is_empty());
    }

    #[test]
    fn plural_spellings_in_one_utterance_dedupe() {
        let candidates = detector().detect("My car key is in the bag. My car keys are in the drawer");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].raw_value, "drawer");
    }

    #[test]
    fn hedged_statement_still_matches_and_keeps_evidence() {
        let candidates = detector().detect("I think my glasses are on the nightstand");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, "glasses");
        assert_eq!(candidates[0].evidence, "I think my glasses are on the nightstand");
    }

    #[test]
    fn remember_that_prefix_is_ignored() {
        assert_eq!(
            single("Remember that my passport is in the safe"),
            (
                "passport".to_string(),
                "safe".to_string(),
                Category::Location
            )
        );
    }

    #[test]
    fn questions_and_chatter_yield_nothing() {
        let detector = detector();
        for utterance in [
            "Where did I put my car keys?",
            "Where are my keys",
            "Hello there!",
            "It is in the drawer",
            "",
            "   ",
            "?!.",
            "My keys are not in the drawer",
            "ok",
        ] {
            assert_eq!(detector.detect(utterance), Vec::new(), "{utterance:?}");
        }
    }

    #[test]
    fn restatement_in_same_utterance_keeps_latest() {
        let candidates =
            detector().detect("My keys are on the desk. Actually, my keys are in the car.");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].raw_value, "car");
    }

    #[test]
    fn rule_order_comes_from_configuration() {
        let detector =
            FactDetector::new(&[FactRuleKind::Personal], &[]).expect("personal only");
        let candidates = detector.detect("My car keys are on the kitchen counter");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rule, FactRule::Personal);
        assert_eq!(candidates[0].raw_value, "on the kitchen counter");

        let empty = FactDetector::new(&[], &[]).expect("no rules");
        assert!(empty.detect("My car keys are on the kitchen counter").is_empty());
    }

    #[test]
    fn sentence_split_keeps_abbreviations() {
        assert_eq!(
            split_sentences("Mr.A is here. See you soon!"),
            vec!["Mr.A is here.", "See you soon!"]
        );
    }
}
