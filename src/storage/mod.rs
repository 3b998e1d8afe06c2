//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - jobs(job_id, job_name, job_startdatetime, duration, job_status)
//! - instruments(instrument_name, job_id)
//! - fields(field_name, job_id)

pub mod schema;
pub mod sqlite;

pub use sqlite::{JobStore, DbStats, Removal};
