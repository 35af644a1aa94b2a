//! Conversation history for one routed request
//!
//! An append-only record: entries are never mutated or removed once
//! recorded, so the loop's behavior is a pure function of this sequence
//! and the turn counter. Created per request, discarded (or handed to the
//! caller) when the request finishes.

use crate::core::{Decision, DecisionAction, HistoryEntry};

/// Append-only record of a single request's full exchange
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Start a history with the user's query as the first entry
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::UserQuery { text: query.into() }],
        }
    }

    /// Record a decision from the engine
    pub fn record_decision(&mut self, decision: Decision) {
        self.entries.push(HistoryEntry::Decision(decision));
    }

    /// Record an agent's reply to a prior dispatch
    pub fn record_agent_result(&mut self, agent: impl Into<String>, text: impl Into<String>) {
        self.entries.push(HistoryEntry::agent_result(agent, text));
    }

    /// Record a failed dispatch (or a failed decision) so the engine can
    /// reason about it on the next turn
    pub fn record_agent_error(&mut self, agent: impl Into<String>, text: impl Into<String>) {
        self.entries.push(HistoryEntry::agent_error(agent, text));
    }

    /// All entries, in order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The original user query
    pub fn user_query(&self) -> &str {
        match &self.entries[0] {
            HistoryEntry::UserQuery { text } => text,
            // new() guarantees the first entry is the query
            _ => "",
        }
    }

    /// The content of the most recent call_agent decision, used as the
    /// best-available answer when the turn bound is exhausted
    pub fn last_dispatch_content(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|entry| match entry {
            HistoryEntry::Decision(d) if d.action == DecisionAction::CallAgent => {
                Some(d.content.as_str())
            }
            _ => None,
        })
    }

    /// Number of entries recorded so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A history always holds at least the user query
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the history for the caller-facing reply
    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Decision;

    #[test]
    fn test_history_starts_with_query() {
        let history = History::new("get id 5");
        assert_eq!(history.len(), 1);
        assert_eq!(history.user_query(), "get id 5");
    }

    #[test]
    fn test_entries_accumulate_in_order() {
        let mut history = History::new("get id 5");
        history.record_decision(Decision::call_agent("lookup", "customer_data", "Get 5"));
        history.record_agent_result("customer_data", "id=5,name=Charlie");
        history.record_decision(Decision::final_answer("done", "Charlie"));

        assert_eq!(history.len(), 4);
        assert!(matches!(
            history.entries()[0],
            HistoryEntry::UserQuery { .. }
        ));
        assert!(matches!(history.entries()[3], HistoryEntry::Decision(_)));
    }

    #[test]
    fn test_last_dispatch_content() {
        let mut history = History::new("query");
        assert!(history.last_dispatch_content().is_none());

        history.record_decision(Decision::call_agent("t", "customer_data", "first"));
        history.record_agent_result("customer_data", "r1");
        history.record_decision(Decision::call_agent("t", "support_agent", "second"));

        assert_eq!(history.last_dispatch_content(), Some("second"));

        // A final answer is not a dispatch
        history.record_decision(Decision::final_answer("t", "answer"));
        assert_eq!(history.last_dispatch_content(), Some("second"));
    }

    #[test]
    fn test_error_results_are_marked() {
        let mut history = History::new("query");
        history.record_agent_error("customer_data", "Error calling agent: timed out");

        match &history.entries()[1] {
            HistoryEntry::AgentResult { is_error, text, .. } => {
                assert!(is_error);
                assert!(text.contains("timed out"));
            }
            _ => panic!("expected agent result"),
        }
    }
}
