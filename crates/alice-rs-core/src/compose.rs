//! Rendering memories into model context and into the final reply.

use alice_rs_memory::{Category, MemoryRecord};
use alice_rs_protocol::{ConversationInsights, MemoryFact};

/// One `Memory: <key> is <value>` line per record.
pub fn memory_lines(records: &[MemoryRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| format!("Memory: {} is {}", record.key, record.value))
        .collect()
}

/// Base persona followed by the relevant memories, if any.
pub fn system_prompt(base: &str, records: &[MemoryRecord]) -> String {
    if records.is_empty() {
        return base.to_string();
    }
    format!(
        "{base}\n\nRelevant memories:\n{}",
        memory_lines(records).join("\n")
    )
}

pub fn facts(records: &[MemoryRecord]) -> Vec<MemoryFact> {
    records
        .iter()
        .map(|record| MemoryFact::new(&record.key, &record.value))
        .collect()
}

/// Append the memories the reply did not mention, plus tips for the
/// themes the user is talking about.
pub fn enhance_reply(
    reply: &str,
    used: &[MemoryRecord],
    insights: &ConversationInsights,
) -> String {
    let mut enhanced = reply.trim().to_string();
    let lowered = enhanced.to_lowercase();
    let missing: Vec<&MemoryRecord> = used
        .iter()
        .filter(|record| !lowered.contains(&record.value.to_lowercase()))
        .collect();
    if !missing.is_empty() {
        enhanced.push_str("\n\nBased on what I remember:");
        for record in missing {
            enhanced.push_str(&format!("\n- {}: {}", record.subject(), record.value));
        }
    }

    let has = |categories: &[Category]| {
        used.iter()
            .any(|record| categories.contains(&record.category))
    };
    if insights.has_theme("location") && has(&[Category::Location]) {
        enhanced.push_str("\n\nTip: tell me whenever you move it and I'll keep track.");
    }
    if insights.has_theme("schedule") && has(&[Category::Schedule, Category::Date]) {
        enhanced.push_str("\n\nTip: ask me about upcoming dates any time.");
    }
    enhanced
}
