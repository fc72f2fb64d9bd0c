//! History entries and the newest-first log

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tslite_client::{ClassificationRequest, ClassificationResult};

/// One successful classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Record time, epoch milliseconds
    pub timestamp: i64,
    /// The request as it was sent
    pub request: ClassificationRequest,
    /// The normalized response
    pub response: ClassificationResult,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    #[must_use]
    pub fn new(request: ClassificationRequest, response: ClassificationResult) -> Self {
        Self::at(Utc::now().timestamp_millis(), request, response)
    }

    /// Create an entry with an explicit timestamp
    #[must_use]
    pub fn at(timestamp: i64, request: ClassificationRequest, response: ClassificationResult) -> Self {
        Self {
            timestamp,
            request,
            response,
        }
    }

    /// Record time as a UTC datetime, if representable
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// ISO-8601 timestamp with millisecond precision
    ///
    /// Out-of-range timestamps are rendered as the raw number.
    #[must_use]
    pub fn iso_timestamp(&self) -> String {
        self.recorded_at()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Bounded history, newest entry first
///
/// Serialized as a plain JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Prepend an entry and evict from the tail down to `capacity`
    ///
    /// Returns the number of evicted entries.
    pub fn push_front(&mut self, entry: HistoryEntry, capacity: usize) -> usize {
        self.entries.insert(0, entry);
        self.truncate(capacity)
    }

    /// Drop the oldest entries beyond `capacity`, returning how many were dropped
    pub fn truncate(&mut self, capacity: usize) -> usize {
        let evicted = self.entries.len().saturating_sub(capacity);
        self.entries.truncate(capacity);
        evicted
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate newest first
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: i64) -> HistoryEntry {
        HistoryEntry::at(
            ts,
            ClassificationRequest::new(format!("item {ts}")),
            ClassificationResult::default(),
        )
    }

    #[test]
    fn test_iso_timestamp() {
        assert_eq!(entry(0).iso_timestamp(), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            entry(1_700_000_000_123).iso_timestamp(),
            "2023-11-14T22:13:20.123Z"
        );
        assert_eq!(entry(i64::MAX).iso_timestamp(), i64::MAX.to_string());
    }

    #[test]
    fn test_push_front_evicts_oldest() {
        let mut log = HistoryLog::new();
        assert_eq!(log.push_front(entry(1), 2), 0);
        assert_eq!(log.push_front(entry(2), 2), 0);
        assert_eq!(log.push_front(entry(3), 2), 1);

        let stamps: Vec<i64> = log.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![3, 2]);
    }

    #[test]
    fn test_log_serializes_as_array() {
        let mut log = HistoryLog::new();
        log.push_front(entry(5), 10);
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["timestamp"], 5);
        assert_eq!(json[0]["request"]["productDescription"], "item 5");
    }
}
