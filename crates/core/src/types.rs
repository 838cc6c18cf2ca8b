/// Tracking-platform integer identifiers (projects, workflows, states, stories).
pub type EntityId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
