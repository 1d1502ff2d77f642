//! Lexical relevance recall over the memory store.

use crate::model::MemoryRecord;
use crate::store::MemoryStore;
use crate::text;
use alice_rs_protocol::ConversationInsights;
use chrono::{DateTime, Utc};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Tunables for relevance scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecallOptions {
    /// Default result limit.
    pub top_k: usize,
    /// Results scoring below this are dropped.
    pub min_score: f32,
    /// Age at which a record's recency factor halves.
    pub half_life_hours: f64,
    /// Floor for the recency factor.
    pub min_decay: f32,
    /// Multiplier bonus for records touching a dominant topic.
    pub topic_boost: f32,
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_score: 0.15,
            half_life_hours: 720.0,
            min_decay: 0.1,
            topic_boost: 0.1,
        }
    }
}

/// A single recall query.
#[derive(Debug, Clone)]
pub struct RecallRequest<'a> {
    pub query: &'a str,
    pub top_k: usize,
    pub insights: Option<&'a ConversationInsights>,
    /// Keys never returned, e.g. facts stored from the same utterance.
    pub exclude: &'a [String],
    /// Reference time for recency decay.
    pub now: DateTime<Utc>,
}

impl<'a> RecallRequest<'a> {
    pub fn new(query: &'a str, top_k: usize) -> Self {
        Self {
            query,
            top_k,
            insights: None,
            exclude: &[],
            now: Utc::now(),
        }
    }

    pub fn with_insights(mut self, insights: &'a ConversationInsights) -> Self {
        self.insights = Some(insights);
        self
    }

    pub fn excluding(mut self, keys: &'a [String]) -> Self {
        self.exclude = keys;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// A recalled record with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMemory {
    pub record: MemoryRecord,
    pub score: f32,
}

/// Ranks stored memories against a query utterance.
///
/// relevance = overlap * confidence * decay * topic bonus, where overlap is
/// the share of query terms found in the record's key and value.
#[derive(Debug, Clone)]
pub struct RelevanceRetriever {
    store: Arc<MemoryStore>,
    options: RecallOptions,
}

impl RelevanceRetriever {
    pub fn new(store: Arc<MemoryStore>, options: RecallOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &RecallOptions {
        &self.options
    }

    /// Most relevant records first, at most `top_k`.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<MemoryRecord> {
        self.recall(&RecallRequest::new(query, top_k))
            .into_iter()
            .map(|scored| scored.record)
            .collect()
    }

    /// Score and rank records for a request.
    pub fn recall(&self, request: &RecallRequest<'_>) -> Vec<ScoredMemory> {
        if request.top_k == 0 {
            return Vec::new();
        }
        let query_terms = text::term_set(request.query);
        if query_terms.is_empty() {
            return Vec::new();
        }
        let topics: BTreeSet<String> = request
            .insights
            .map(|insights| {
                insights
                    .dominant_topics
                    .iter()
                    .map(|topic| text::stem(topic))
                    .collect()
            })
            .unwrap_or_default();

        let mut scored: Vec<ScoredMemory> = self
            .store
            .scan()
            .into_iter()
            .filter(|record| !request.exclude.contains(&record.key))
            .filter_map(|record| {
                let score = self.score(&record, &query_terms, &topics, request.now);
                (score > 0.0 && score >= self.options.min_score)
                    .then_some(ScoredMemory { record, score })
            })
            .collect();
        scored.sort_by(rank_order);
        scored.truncate(request.top_k);
        debug!(
            "recalled memories (query_terms={}, returned={})",
            query_terms.len(),
            scored.len()
        );
        scored
    }

    fn score(
        &self,
        record: &MemoryRecord,
        query_terms: &BTreeSet<String>,
        topics: &BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> f32 {
        let record_terms = text::term_set(&format!("{} {}", record.subject(), record.value));
        let shared = query_terms.intersection(&record_terms).count();
        if shared == 0 {
            return 0.0;
        }
        let overlap = shared as f32 / query_terms.len() as f32;
        let boost = if record_terms.iter().any(|term| topics.contains(term)) {
            1.0 + self.options.topic_boost
        } else {
            1.0
        };
        overlap * record.confidence * self.decay(record.updated_at, now) * boost
    }

    /// Half-life recency factor, floored at `min_decay`.
    fn decay(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
        let age_hours = ((now - updated_at).num_milliseconds().max(0) as f64) / 3_600_000.0;
        let factor = 0.5_f64.powf(age_hours / self.options.half_life_hours) as f32;
        factor.max(self.options.min_decay)
    }
}

/// Score descending, then newer `updated_at`, then key.
fn rank_order(left: &ScoredMemory, right: &ScoredMemory) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| right.record.updated_at.cmp(&left.record.updated_at))
        .then_with(|| left.record.key.cmp(&right.record.key))
}

#[cfg(test)]
mod tests {
    use super::{RecallOptions, RecallRequest, RelevanceRetriever};
    use crate::{
        Category, MemoryCompactionPolicy, MemoryError, MemoryProvider, MemoryRecord, MemoryStore,
    };
    use alice_rs_protocol::ConversationInsights;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct NullProvider;

    impl MemoryProvider for NullProvider {
        fn load_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
            Ok(Vec::new())
        }

        fn save(&self, _record: &MemoryRecord) -> Result<(), MemoryError> {
            Ok(())
        }

        fn delete(&self, _key: &str) -> Result<(), MemoryError> {
            Ok(())
        }
    }

    fn retriever(records: Vec<MemoryRecord>) -> RelevanceRetriever {
        let store = MemoryStore::open(Arc::new(NullProvider), MemoryCompactionPolicy::default())
            .expect("store");
        for record in records {
            store.upsert(record).expect("upsert");
        }
        RelevanceRetriever::new(Arc::new(store), RecallOptions::default())
    }

    fn epoch() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("time")
    }

    fn location(key: &str, value: &str, confidence: f32) -> MemoryRecord {
        MemoryRecord::new(key, value, Category::Location, confidence).at(epoch())
    }

    #[test]
    fn finds_record_by_subject_terms() {
        let retriever = retriever(vec![
            location("car_keys", "kitchen counter", 0.9),
            location("wallet", "bedroom drawer", 0.9),
        ]);
        let results =
            retriever.recall(&RecallRequest::new("Where did I put my car keys?", 3).at(epoch()));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.key, "car_keys");
        assert!((results[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn unrelated_or_empty_query_returns_nothing() {
        let retriever = retriever(vec![location("car_keys", "kitchen counter", 0.9)]);
        assert!(retriever.retrieve("How is the weather?", 3).is_empty());
        assert!(retriever.retrieve("where is it?", 3).is_empty());
        assert!(retriever.retrieve("car keys", 0).is_empty());
    }

    #[test]
    fn results_are_bounded_and_sorted() {
        let retriever = retriever(vec![
            location("car_keys", "kitchen counter", 0.9),
            location("house_keys", "hook by the door", 0.8),
            location("spare_keys", "garage", 0.6),
            location("bike_keys", "car glovebox", 0.95),
        ]);
        let results = retriever.recall(&RecallRequest::new("keys car", 2).at(epoch()));
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].record.key, "bike_keys");
        assert_eq!(results[1].record.key, "car_keys");
    }

    #[test]
    fn old_records_decay_below_fresh_ones() {
        let fresh = location("car_keys", "kitchen counter", 0.9);
        let stale = MemoryRecord::new("car_documents", "glovebox", Category::Location, 0.9)
            .at(epoch() - Duration::hours(720));
        let retriever = retriever(vec![fresh, stale]);
        let results = retriever.recall(&RecallRequest::new("car", 3).at(epoch()));
        assert_eq!(results[0].record.key, "car_keys");
        assert!((results[1].score - 0.45).abs() < 1e-4);
    }

    #[test]
    fn decay_is_floored() {
        let ancient = MemoryRecord::new("passport", "safe", Category::Location, 1.0)
            .at(epoch() - Duration::days(3650));
        let options = RecallOptions {
            min_score: 0.0,
            ..RecallOptions::default()
        };
        let store = MemoryStore::open(Arc::new(NullProvider), MemoryCompactionPolicy::default())
            .expect("store");
        store.upsert(ancient).expect("upsert");
        let retriever = RelevanceRetriever::new(Arc::new(store), options);
        let results = retriever.recall(&RecallRequest::new("passport", 1).at(epoch()));
        assert!((results[0].score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn ties_prefer_recent_updates() {
        let older = location("red_umbrella", "hall closet", 0.9);
        let newer = MemoryRecord::new("blue_umbrella", "car trunk", Category::Location, 0.9)
            .at(epoch() + Duration::seconds(1));
        let retriever = retriever(vec![older, newer]);
        let later = epoch() + Duration::seconds(1);
        let results = retriever.recall(&RecallRequest::new("umbrella", 3).at(later));
        assert_eq!(results[0].record.key, "blue_umbrella");
    }

    #[test]
    fn dominant_topics_boost_and_exclusions_apply() {
        let retriever = retriever(vec![
            location("car_keys", "kitchen counter", 0.9),
            location("gym_bag", "car trunk", 0.9),
        ]);
        let insights = ConversationInsights {
            dominant_topics: vec!["kitchen".to_string()],
            ..ConversationInsights::default()
        };
        let results = retriever.recall(
            &RecallRequest::new("car", 3)
                .with_insights(&insights)
                .at(epoch()),
        );
        assert_eq!(results[0].record.key, "car_keys");
        assert!((results[0].score - 0.99).abs() < 1e-5);

        let exclude = vec!["car_keys".to_string()];
        let results = retriever.recall(&RecallRequest::new("car", 3).excluding(&exclude).at(epoch()));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.key, "gym_bag");
    }
}
