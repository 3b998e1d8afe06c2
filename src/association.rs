//! Association types - names optionally bound to a job
//!
//! Instruments and fields share one shape: a free-text name plus an
//! optional job. The pair `(name, job)` is unique per table, with the
//! unassociated case (`job == None`) counting as one slot per name.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

/// A table of `(name, job)` associations.
///
/// Implemented by [`Instrument`] and [`Field`] so the store can share one
/// code path for both tables.
pub trait Association {
    /// Table holding this association
    const TABLE: &'static str;
    /// Column holding the name
    const NAME_COLUMN: &'static str;
    /// Human label used in logs and output
    const LABEL: &'static str;

    fn new(name: impl Into<String>, job: Option<JobId>) -> Self;
    fn name(&self) -> &str;
    fn job(&self) -> Option<JobId>;
}

/// An instrument (security identifier) captured by a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub job: Option<JobId>,
}

/// A market data field captured by a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub job: Option<JobId>,
}

impl Association for Instrument {
    const TABLE: &'static str = "instruments";
    const NAME_COLUMN: &'static str = "instrument_name";
    const LABEL: &'static str = "instrument";

    fn new(name: impl Into<String>, job: Option<JobId>) -> Self {
        Self { name: name.into(), job }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn job(&self) -> Option<JobId> {
        self.job
    }
}

impl Association for Field {
    const TABLE: &'static str = "fields";
    const NAME_COLUMN: &'static str = "field_name";
    const LABEL: &'static str = "field";

    fn new(name: impl Into<String>, job: Option<JobId>) -> Self {
        Self { name: name.into(), job }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn job(&self) -> Option<JobId> {
        self.job
    }
}

impl Instrument {
    /// Instrument bound to a job
    pub fn for_job(name: impl Into<String>, job: JobId) -> Self {
        <Self as Association>::new(name, Some(job))
    }

    /// Instrument with no job association
    pub fn unassociated(name: impl Into<String>) -> Self {
        <Self as Association>::new(name, None)
    }
}

impl Field {
    /// Field bound to a job
    pub fn for_job(name: impl Into<String>, job: JobId) -> Self {
        <Self as Association>::new(name, Some(job))
    }

    /// Field with no job association
    pub fn unassociated(name: impl Into<String>) -> Self {
        <Self as Association>::new(name, None)
    }
}
