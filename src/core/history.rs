//! Commit history tracking.
//!
//! Every commit a binding performs is recorded as an immutable
//! [`CommitRecord`]. The history itself is a value: `record` returns a new
//! history rather than mutating the old one.

use super::configuration::StatePath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use statebind::core::{CommitRecord, StatePath};
/// use chrono::Utc;
///
/// let record = CommitRecord {
///     from: StatePath::parse("Off.A"),
///     to: StatePath::parse("Off.B"),
///     event: "UNBLOCK".to_string(),
///     actions: vec!["cancelUnblockTimer".to_string()],
///     timestamp: Utc::now(),
///     revision: 2,
/// };
/// assert_eq!(record.to.to_string(), "Off.B");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Active path before the commit
    pub from: StatePath,
    /// Active path after the commit
    pub to: StatePath,
    /// Name of the event that triggered the commit
    pub event: String,
    /// Names of the actions reduced in this commit, in order
    pub actions: Vec<String>,
    /// When the commit happened
    pub timestamp: DateTime<Utc>,
    /// Binding revision after the commit
    pub revision: u64,
}

/// Ordered history of commits, optionally bounded.
///
/// When a capacity is set, the oldest records are dropped once it is
/// exceeded.
///
/// # Example
///
/// ```rust
/// use statebind::core::{CommitHistory, CommitRecord, StatePath};
/// use chrono::Utc;
///
/// let record = |from: &str, to: &str, revision| CommitRecord {
///     from: StatePath::parse(from),
///     to: StatePath::parse(to),
///     event: "FLICK".to_string(),
///     actions: Vec::new(),
///     timestamp: Utc::now(),
///     revision,
/// };
///
/// let history = CommitHistory::new()
///     .record(record("Off.B", "On.C", 1))
///     .record(record("On.C", "Off.A", 2));
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[2].to_string(), "Off.A");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitHistory {
    records: Vec<CommitRecord>,
    capacity: Option<usize>,
}

impl CommitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Record a commit, returning a new history.
    ///
    /// The existing history is not modified.
    pub fn record(&self, record: CommitRecord) -> Self {
        let mut next = self.clone();
        next.push(record);
        next
    }

    /// Record a commit in place, dropping the oldest records past capacity.
    pub fn push(&mut self, record: CommitRecord) {
        self.records.push(record);
        if let Some(capacity) = self.capacity {
            let excess = self.records.len().saturating_sub(capacity);
            self.records.drain(..excess);
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Get the path of configurations traversed.
    ///
    /// The `from` of the first record, then the `to` of each record.
    pub fn get_path(&self) -> Vec<&StatePath> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last recorded commits.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&CommitRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
