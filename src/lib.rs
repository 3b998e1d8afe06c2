//! # Tickjobs - Tick Capture Job Registry
//!
//! SQLite-backed registry of scheduled tick capture jobs.
//!
//! Tickjobs provides:
//! - A closed `JobStatus` lifecycle (NOT STARTED → RUNNING → COMPLETED | FAILED)
//! - Instrument and field associations, optionally bound to a job
//! - Schema-level enforcement of NOT NULL, CHECK, UNIQUE and FOREIGN KEY rules
//! - A typed store API and the `tickjobs` command-line interface

pub mod job;
pub mod association;
pub mod storage;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use job::{Job, JobId, JobStatus, JobSummary, NewJob};
pub use association::{Association, Field, Instrument};
pub use storage::JobStore;

/// Result type alias for Tickjobs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which schema constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    NotNull,
    Check,
    Unique,
    ForeignKey,
    PrimaryKey,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::NotNull => "NOT NULL",
            ConstraintKind::Check => "CHECK",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
        }
    }

    /// Classify a SQLite extended result code
    fn from_extended_code(code: std::os::raw::c_int) -> Option<Self> {
        use rusqlite::ffi;
        match code {
            ffi::SQLITE_CONSTRAINT_NOTNULL => Some(ConstraintKind::NotNull),
            ffi::SQLITE_CONSTRAINT_CHECK => Some(ConstraintKind::Check),
            ffi::SQLITE_CONSTRAINT_UNIQUE => Some(ConstraintKind::Unique),
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(ConstraintKind::PrimaryKey),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error types for Tickjobs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(rusqlite::Error),

    #[error("Invalid job status: {0}")]
    InvalidStatus(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The violated constraint, if this is a constraint error
    pub fn constraint(&self) -> Option<ConstraintKind> {
        match self {
            Error::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_constraint(&self, kind: ConstraintKind) -> bool {
        self.constraint() == Some(kind)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                if let Some(kind) = ConstraintKind::from_extended_code(failure.extended_code) {
                    return Error::Constraint {
                        kind,
                        message: message.clone().unwrap_or_else(|| failure.to_string()),
                    };
                }
            }
        }
        Error::Storage(err)
    }
}
