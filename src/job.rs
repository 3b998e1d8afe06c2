//! Job types - units of scheduled capture work
//!
//! A job is tracked by name, start time, duration and a status drawn from
//! a closed set of four values:
//! - `NotStarted`: registered, waiting for its window
//! - `Running`: capture in progress
//! - `Completed`: finished normally (terminal)
//! - `Failed`: aborted or could not start (terminal)

use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Database-assigned job identifier.
///
/// Only the store hands these out; an id never changes once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl JobId {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(JobId)
            .map_err(|_| Error::InvalidJob(format!("Not a job id: {}", s)))
    }
}

/// Job lifecycle status.
///
/// The persisted strings are exactly the values admitted by the
/// `jobs.job_status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "NOT STARTED")]
    NotStarted,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED")]
    Failed,
}

impl JobStatus {
    /// Get the persisted string representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::NotStarted => "NOT STARTED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Get all statuses
    pub fn all() -> &'static [JobStatus] {
        &[
            JobStatus::NotStarted,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ]
    }

    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a job in this status may move to `next`.
    ///
    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (JobStatus::NotStarted, JobStatus::Running)
                | (JobStatus::NotStarted, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "NOT STARTED" | "NOTSTARTED" | "PENDING" => Ok(JobStatus::NotStarted),
            "RUNNING" => Ok(JobStatus::Running),
            "COMPLETED" | "DONE" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    /// Start of the capture window (persisted as Unix seconds)
    pub start: DateTime<Utc>,
    /// Length of the capture window in minutes
    pub duration_minutes: i64,
    pub status: JobStatus,
}

impl Job {
    /// End of the capture window, `None` if it lies past the representable range
    pub fn end(&self) -> Option<DateTime<Utc>> {
        window_end(self.start, self.duration_minutes)
    }

    /// True when `at` falls in `[start, end)`
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && self.end().is_none_or(|end| at < end)
    }
}

fn window_end(start: DateTime<Utc>, duration_minutes: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_minutes(duration_minutes).and_then(|d| start.checked_add_signed(d))
}

/// Insert payload for a job; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub name: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: JobStatus,
}

impl NewJob {
    /// Create a new job in the `NotStarted` status
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            name: name.into(),
            start,
            duration_minutes,
            status: JobStatus::NotStarted,
        }
    }

    /// Create a job covering `[start, end)`, rounding the span down to whole minutes
    pub fn spanning(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidJob(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self::new(name, start, (end - start).num_minutes()))
    }

    /// Reject durations that are negative or end past the representable range
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes < 0 {
            return Err(Error::InvalidJob(format!("negative duration: {}", self.duration_minutes)));
        }
        if window_end(self.start, self.duration_minutes).is_none() {
            return Err(Error::InvalidJob(format!(
                "duration of {} minutes from {} is out of range",
                self.duration_minutes,
                self.start.to_rfc3339()
            )));
        }
        Ok(())
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }
}

/// A job with the number of instruments and fields bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job: Job,
    pub instrument_count: usize,
    pub field_count: usize,
}

/// Convert Unix seconds into a UTC timestamp
pub fn timestamp_from_unix(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| Error::InvalidJob(format!("Timestamp out of range: {}", secs)))
}

/// Parse a point in time given as Unix seconds or RFC 3339
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return timestamp_from_unix(secs);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidJob(format!("Invalid timestamp '{}': {}", s, e)))
}
