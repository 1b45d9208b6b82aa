/// Contact-registry person identifiers.
pub type PersonId = i64;

/// All calendar dates are local to the prison.
pub type Date = chrono::NaiveDate;

/// Slot start/end times as published by the visit scheduler.
pub type Timestamp = chrono::NaiveDateTime;
