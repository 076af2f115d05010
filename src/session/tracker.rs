use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A single UI event recorded for a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRecord {
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded interaction history for one user.
#[derive(Debug, Clone)]
pub struct SessionState {
    interactions: VecDeque<InteractionRecord>,
    started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            interactions: VecDeque::new(),
            started_at,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Interactions in recording order, oldest first.
    pub fn interactions(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.interactions.iter()
    }

    fn push(&mut self, record: InteractionRecord, limit: usize) {
        self.interactions.push_back(record);
        while self.interactions.len() > limit {
            self.interactions.pop_front();
        }
    }

    /// The last `n` interactions, most recent first.
    pub fn recent(&self, n: usize) -> Vec<InteractionRecord> {
        self.interactions.iter().rev().take(n).cloned().collect()
    }

    /// Label with the highest count. Ties go to the label seen first.
    pub fn most_frequent_action(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for record in &self.interactions {
            match counts.iter_mut().find(|(label, _)| *label == record.action) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.action.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn duration_at(&self, now: DateTime<Utc>) -> SessionDuration {
        let secs = (now - self.started_at).num_seconds().max(0) as u64;
        SessionDuration {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Elapsed session time split into whole minutes and remainder seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDuration {
    pub minutes: u64,
    pub seconds: u64,
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// Per-user interaction history, shared by every handler that touches a session.
///
/// Entries are created on first `record` and only ever reset, never removed.
pub struct SessionTracker {
    sessions: Mutex<HashMap<u64, SessionState>>,
    limit: usize,
}

impl SessionTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            limit: limit.max(1),
        }
    }

    pub fn record(&self, user_id: u64, action: &str, details: &str) {
        let record = InteractionRecord {
            action: action.to_string(),
            details: details.to_string(),
            timestamp: Utc::now(),
        };
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(user_id)
            .or_default()
            .push(record, self.limit);
    }

    /// Snapshot of the user's session. Unknown users get a fresh, untracked state.
    pub fn get(&self, user_id: u64) -> SessionState {
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Clears the history. The new start is strictly later than the old one,
    /// even when the clock has not advanced.
    pub fn reset(&self, user_id: u64) {
        let mut sessions = self.sessions.lock().unwrap();
        let mut start = Utc::now();
        if let Some(previous) = sessions.get(&user_id) {
            start = start.max(previous.started_at + chrono::Duration::microseconds(1));
        }
        sessions.insert(user_id, SessionState::starting_at(start));
    }

    pub fn recent_actions(&self, user_id: u64, n: usize) -> Vec<InteractionRecord> {
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|s| s.recent(n))
            .unwrap_or_default()
    }

    pub fn most_frequent_action(&self, user_id: u64) -> Option<String> {
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .and_then(|s| s.most_frequent_action().map(str::to_string))
    }

    pub fn session_duration(&self, user_id: u64) -> SessionDuration {
        let now = Utc::now();
        self.sessions
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|s| s.duration_at(now))
            .unwrap_or(SessionDuration {
                minutes: 0,
                seconds: 0,
            })
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
