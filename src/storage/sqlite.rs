//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use serde::Serialize;
use chrono::{DateTime, Utc};
use crate::{Result, Error};
use crate::association::{Association, Field, Instrument};
use crate::job::{self, Job, JobId, JobStatus, JobSummary, NewJob};
use super::schema;

const JOB_COLUMNS: &str = "job_id, job_name, job_startdatetime, duration, job_status";

/// SQLite-backed job registry
pub struct JobStore {
    conn: Connection,
}

impl JobStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::info!("Opened job store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Enable foreign keys and create the schema
    fn initialize_schema(&self) -> Result<()> {
        // Foreign key enforcement is per connection and off by default
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Job Operations ==========

    /// Insert a job and return its new id
    pub fn insert_job(&self, job: &NewJob) -> Result<JobId> {
        insert_job_on(&self.conn, job)
    }

    /// Get a job by id
    pub fn get_job(&self, id: JobId) -> Result<Option<Job>> {
        self.conn
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
                [id.get()],
                row_to_job,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All jobs, oldest first
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY job_id"))?;
        let jobs = stmt
            .query_map([], row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    /// The most recently registered jobs with their association counts, newest first
    pub fn recent_jobs(&self, limit: usize) -> Result<Vec<JobSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT jobs.job_id, jobs.job_name, jobs.job_startdatetime, jobs.duration, jobs.job_status,
                   (SELECT COUNT(*) FROM instruments WHERE instruments.job_id = jobs.job_id),
                   (SELECT COUNT(*) FROM fields WHERE fields.job_id = jobs.job_id)
            FROM jobs
            ORDER BY jobs.job_id DESC
            LIMIT ?1
            "#,
        )?;

        let summaries = stmt
            .query_map([i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                let instrument_count: i64 = row.get(5)?;
                let field_count: i64 = row.get(6)?;
                Ok(JobSummary {
                    job: row_to_job(row)?,
                    instrument_count: instrument_count as usize,
                    field_count: field_count as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(summaries)
    }

    /// Jobs that have not finished and whose window `[start, start + duration)` contains `at`
    pub fn active_jobs(&self, at: DateTime<Utc>) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE job_startdatetime <= ?1
              AND job_startdatetime + duration * 60 > ?1
              AND job_status IN (?2, ?3)
            ORDER BY job_startdatetime, job_id
            "#
        ))?;

        let jobs = stmt
            .query_map(
                params![
                    at.timestamp(),
                    JobStatus::NotStarted.as_str(),
                    JobStatus::Running.as_str(),
                ],
                row_to_job,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(jobs)
    }

    /// Move a job to a new status, enforcing the lifecycle
    pub fn update_job_status(&self, id: JobId, status: JobStatus) -> Result<Job> {
        let mut job = self.get_job(id)?.ok_or(Error::JobNotFound(id))?;

        if !job.status.can_transition_to(status) {
            tracing::warn!("Rejected status change for job {}: {} -> {}", id, job.status, status);
            return Err(Error::InvalidTransition { from: job.status, to: status });
        }
        if job.status == status {
            return Ok(job);
        }

        self.conn.execute(
            "UPDATE jobs SET job_status = ?1 WHERE job_id = ?2",
            params![status.as_str(), id.get()],
        )?;
        tracing::debug!("Job {} status {} -> {}", id, job.status, status);

        job.status = status;
        Ok(job)
    }

    /// Delete a job together with its instrument and field associations.
    ///
    /// The schema restricts deleting a referenced job, so the associations
    /// go first, all inside one transaction.
    pub fn delete_job(&mut self, id: JobId) -> Result<Removal> {
        let tx = self.conn.transaction()?;
        let instruments = tx.execute("DELETE FROM instruments WHERE job_id = ?1", [id.get()])?;
        let fields = tx.execute("DELETE FROM fields WHERE job_id = ?1", [id.get()])?;
        let jobs = tx.execute("DELETE FROM jobs WHERE job_id = ?1", [id.get()])?;
        if jobs == 0 {
            return Err(Error::JobNotFound(id));
        }
        tx.commit()?;

        tracing::info!("Deleted job {} ({} instruments, {} fields)", id, instruments, fields);
        Ok(Removal { job: id, instruments, fields })
    }

    // ========== Association Operations ==========

    /// Insert a single instrument association
    pub fn insert_instrument(&self, instrument: &Instrument) -> Result<()> {
        insert_association_on(&self.conn, instrument)
    }

    /// Insert a single field association
    pub fn insert_field(&self, field: &Field) -> Result<()> {
        insert_association_on(&self.conn, field)
    }

    /// Insert instrument names for one job; all or nothing
    pub fn insert_instruments<S: AsRef<str>>(&mut self, names: &[S], job: Option<JobId>) -> Result<usize> {
        self.insert_associations::<Instrument, S>(names, job)
    }

    /// Insert field names for one job; all or nothing
    pub fn insert_fields<S: AsRef<str>>(&mut self, names: &[S], job: Option<JobId>) -> Result<usize> {
        self.insert_associations::<Field, S>(names, job)
    }

    fn insert_associations<A: Association, S: AsRef<str>>(&mut self, names: &[S], job: Option<JobId>) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let inserted = insert_names_on::<A, S>(&tx, names, job)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// Instrument names bound to `job`, or the unassociated ones for `None`
    pub fn instruments_for(&self, job: Option<JobId>) -> Result<Vec<String>> {
        self.names_for::<Instrument>(job)
    }

    /// Field names bound to `job`, or the unassociated ones for `None`
    pub fn fields_for(&self, job: Option<JobId>) -> Result<Vec<String>> {
        self.names_for::<Field>(job)
    }

    fn names_for<A: Association>(&self, job: Option<JobId>) -> Result<Vec<String>> {
        // `IS` matches NULL as well as values
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} WHERE job_id IS ?1 ORDER BY rowid",
            A::NAME_COLUMN,
            A::TABLE
        ))?;
        let names = stmt
            .query_map([job.map(|j| j.get())], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    // ========== Bulk Operations ==========

    /// Register a job with its instruments and fields in one transaction
    pub fn register_job<S: AsRef<str>>(&mut self, job: &NewJob, instruments: &[S], fields: &[S]) -> Result<JobId> {
        let tx = self.conn.transaction()?;
        let id = insert_job_on(&tx, job)?;
        let instrument_count = insert_names_on::<Instrument, S>(&tx, instruments, Some(id))?;
        let field_count = insert_names_on::<Field, S>(&tx, fields, Some(id))?;
        tx.commit()?;

        tracing::info!(
            "Registered job {} '{}' with {} instruments and {} fields",
            id, job.name, instrument_count, field_count
        );
        Ok(id)
    }

    /// Count all jobs
    pub fn count_jobs(&self) -> Result<usize> {
        self.count("jobs")
    }

    /// Count all instrument rows
    pub fn count_instruments(&self) -> Result<usize> {
        self.count(Instrument::TABLE)
    }

    /// Count all field rows
    pub fn count_fields(&self) -> Result<usize> {
        self.count(Field::TABLE)
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let mut stmt = self.conn.prepare("SELECT job_status, COUNT(*) FROM jobs GROUP BY job_status")?;
        let counted = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut by_status: Vec<(JobStatus, usize)> = JobStatus::all().iter().map(|s| (*s, 0)).collect();
        for (status, count) in counted {
            let status: JobStatus = status.parse()?;
            if let Some(slot) = by_status.iter_mut().find(|slot| slot.0 == status) {
                slot.1 = count as usize;
            }
        }

        Ok(DbStats {
            jobs: self.count_jobs()?,
            instruments: self.count_instruments()?,
            fields: self.count_fields()?,
            by_status,
        })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn insert_job_on(conn: &Connection, job: &NewJob) -> Result<JobId> {
    job.validate()?;
    conn.execute(
        r#"
        INSERT INTO jobs (job_name, job_startdatetime, duration, job_status)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            job.name,
            job.start.timestamp(),
            job.duration_minutes,
            job.status.as_str(),
        ],
    )?;
    let id = JobId(conn.last_insert_rowid());
    tracing::debug!("Inserted job {} '{}'", id, job.name);
    Ok(id)
}

fn insert_association_on<A: Association>(conn: &Connection, association: &A) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO {} ({}, job_id) VALUES (?1, ?2)", A::TABLE, A::NAME_COLUMN),
        params![association.name(), association.job().map(|j| j.get())],
    )?;
    tracing::debug!("Inserted {} '{}' (job {:?})", A::LABEL, association.name(), association.job());
    Ok(())
}

/// Insert trimmed, non-blank names; returns how many rows were written
fn insert_names_on<A: Association, S: AsRef<str>>(conn: &Connection, names: &[S], job: Option<JobId>) -> Result<usize> {
    let mut inserted = 0;
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        insert_association_on(conn, &A::new(name, job))?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Helper to convert a row to a Job
fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
    let start_secs: i64 = row.get(2)?;
    let status_str: String = row.get(4)?;

    let start = job::timestamp_from_unix(start_secs).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    let status: JobStatus = status_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Job {
        id: JobId(row.get(0)?),
        name: row.get(1)?,
        start,
        duration_minutes: row.get(3)?,
        status,
    })
}

/// Rows removed by [`JobStore::delete_job`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub job: JobId,
    pub instruments: usize,
    pub fields: usize,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub jobs: usize,
    pub instruments: usize,
    pub fields: usize,
    pub by_status: Vec<(JobStatus, usize)>,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Jobs: {}", self.jobs)?;
        for (status, count) in &self.by_status {
            writeln!(f, "    {}: {}", status, count)?;
        }
        writeln!(f, "  Instruments: {}", self.instruments)?;
        write!(f, "  Fields: {}", self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstraintKind;

    fn at(secs: i64) -> DateTime<Utc> {
        job::timestamp_from_unix(secs).unwrap()
    }

    fn calibration_run() -> NewJob {
        NewJob::new("calibration-run", at(1_700_000_000), 3600)
    }

    fn raw(store: &JobStore, sql: &str) -> Result<usize> {
        store.connection().execute(sql, []).map_err(Error::from)
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = JobStore::open_in_memory().unwrap();
        store.initialize_schema().unwrap();
        assert_eq!(store.count_jobs().unwrap(), 0);
    }

    #[test]
    fn test_register_example() {
        let store = JobStore::open_in_memory().unwrap();

        let id = store.insert_job(&calibration_run()).unwrap();
        assert_eq!(id, JobId(1));

        store.insert_instrument(&Instrument::for_job("spectrometer-A", id)).unwrap();
        let err = store
            .insert_instrument(&Instrument::for_job("spectrometer-A", id))
            .unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");

        let job = store.get_job(id).unwrap().unwrap();
        assert_eq!(job.name, "calibration-run");
        assert_eq!(job.start.timestamp(), 1_700_000_000);
        assert_eq!(job.duration_minutes, 3600);
        assert_eq!(job.status, JobStatus::NotStarted);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let store = JobStore::open_in_memory().unwrap();
        let a = store.insert_job(&calibration_run()).unwrap();
        let b = store.insert_job(&calibration_run()).unwrap();
        assert!(b > a);
        assert!(store.get_job(JobId(999)).unwrap().is_none());
    }

    #[test]
    fn test_status_check_constraint() {
        let store = JobStore::open_in_memory().unwrap();
        let err = raw(
            &store,
            "INSERT INTO jobs (job_name, job_startdatetime, duration, job_status) VALUES ('x', 1, 1, 'PAUSED')",
        )
        .unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Check), "got {err:?}");

        let err = raw(
            &store,
            "INSERT INTO jobs (job_name, job_startdatetime, duration, job_status) VALUES ('x', 1, 1, 'running')",
        )
        .unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Check), "got {err:?}");
        assert_eq!(store.count_jobs().unwrap(), 0);
    }

    #[test]
    fn test_not_null_columns() {
        let store = JobStore::open_in_memory().unwrap();
        let missing = [
            "INSERT INTO jobs (job_startdatetime, duration, job_status) VALUES (1, 1, 'RUNNING')",
            "INSERT INTO jobs (job_name, duration, job_status) VALUES ('x', 1, 'RUNNING')",
            "INSERT INTO jobs (job_name, job_startdatetime, job_status) VALUES ('x', 1, 'RUNNING')",
            "INSERT INTO jobs (job_name, job_startdatetime, duration) VALUES ('x', 1, 1)",
            "INSERT INTO instruments (job_id) VALUES (NULL)",
            "INSERT INTO fields (job_id) VALUES (NULL)",
        ];
        for sql in missing {
            let err = raw(&store, sql).unwrap_err();
            assert!(err.is_constraint(ConstraintKind::NotNull), "{sql}: got {err:?}");
        }
    }

    #[test]
    fn test_foreign_key_on_associations() {
        let store = JobStore::open_in_memory().unwrap();

        let err = store.insert_instrument(&Instrument::for_job("NKY Index", JobId(42))).unwrap_err();
        assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");

        let err = store.insert_field(&Field::for_job("BID", JobId(42))).unwrap_err();
        assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");

        assert_eq!(store.count_instruments().unwrap(), 0);
        assert_eq!(store.count_fields().unwrap(), 0);
    }

    #[test]
    fn test_unassociated_names_are_unique() {
        let store = JobStore::open_in_memory().unwrap();

        store.insert_instrument(&Instrument::unassociated("USDJPY Curncy")).unwrap();
        let err = store.insert_instrument(&Instrument::unassociated("USDJPY Curncy")).unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");

        store.insert_field(&Field::unassociated("ASK")).unwrap();
        let err = store.insert_field(&Field::unassociated("ASK")).unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");

        // The same name may still be bound to a job
        let id = store.insert_job(&calibration_run()).unwrap();
        store.insert_instrument(&Instrument::for_job("USDJPY Curncy", id)).unwrap();
        assert_eq!(store.instruments_for(None).unwrap(), vec!["USDJPY Curncy"]);
        assert_eq!(store.instruments_for(Some(id)).unwrap(), vec!["USDJPY Curncy"]);
    }

    #[test]
    fn test_same_name_across_jobs() {
        let store = JobStore::open_in_memory().unwrap();
        let a = store.insert_job(&calibration_run()).unwrap();
        let b = store.insert_job(&calibration_run()).unwrap();

        store.insert_field(&Field::for_job("LAST_PRICE", a)).unwrap();
        store.insert_field(&Field::for_job("LAST_PRICE", b)).unwrap();
        assert_eq!(store.count_fields().unwrap(), 2);
    }

    #[test]
    fn test_batch_insert_is_all_or_nothing() {
        let mut store = JobStore::open_in_memory().unwrap();
        let id = store.insert_job(&calibration_run()).unwrap();

        let err = store
            .insert_instruments(&["NKY Index", "6758 JT Equity", " NKY Index "], Some(id))
            .unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");
        assert_eq!(store.count_instruments().unwrap(), 0);

        let inserted = store
            .insert_instruments(&[" NKY Index ", "", "6758 JT Equity"], Some(id))
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(
            store.instruments_for(Some(id)).unwrap(),
            vec!["NKY Index", "6758 JT Equity"]
        );
    }

    #[test]
    fn test_register_job_rolls_back() {
        let mut store = JobStore::open_in_memory().unwrap();

        let err = store
            .register_job(&calibration_run(), &["NKY Index"], &["BID", "BID"])
            .unwrap_err();
        assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");
        assert_eq!(store.count_jobs().unwrap(), 0);
        assert_eq!(store.count_instruments().unwrap(), 0);

        let id = store
            .register_job(
                &calibration_run(),
                &["NKY Index", "USDJPY Curncy"],
                &["MKTDATA_EVENT_TYPE", "BID", "ASK"],
            )
            .unwrap();
        assert_eq!(store.instruments_for(Some(id)).unwrap().len(), 2);
        assert_eq!(store.fields_for(Some(id)).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_job_removes_associations() {
        let mut store = JobStore::open_in_memory().unwrap();
        let id = store
            .register_job(&calibration_run(), &["NKY Index"], &["BID", "ASK"])
            .unwrap();
        store.insert_instrument(&Instrument::unassociated("NKY Index")).unwrap();

        let removal = store.delete_job(id).unwrap();
        assert_eq!(removal, Removal { job: id, instruments: 1, fields: 2 });
        assert!(store.get_job(id).unwrap().is_none());
        assert_eq!(store.count_fields().unwrap(), 0);
        assert_eq!(store.instruments_for(None).unwrap(), vec!["NKY Index"]);

        assert!(matches!(store.delete_job(id), Err(Error::JobNotFound(j)) if j == id));
    }

    #[test]
    fn test_raw_delete_of_referenced_job_is_restricted() {
        let store = JobStore::open_in_memory().unwrap();
        let id = store.insert_job(&calibration_run()).unwrap();
        store.insert_field(&Field::for_job("BID", id)).unwrap();

        let err = raw(&store, &format!("DELETE FROM jobs WHERE job_id = {}", id)).unwrap_err();
        assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");
        assert!(store.get_job(id).unwrap().is_some());
    }

    #[test]
    fn test_status_lifecycle() {
        let store = JobStore::open_in_memory().unwrap();
        let id = store.insert_job(&calibration_run()).unwrap();

        let err = store.update_job_status(id, JobStatus::Completed).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition { from: JobStatus::NotStarted, to: JobStatus::Completed }
        ));

        assert_eq!(store.update_job_status(id, JobStatus::Running).unwrap().status, JobStatus::Running);
        assert_eq!(store.update_job_status(id, JobStatus::Running).unwrap().status, JobStatus::Running);
        assert_eq!(store.update_job_status(id, JobStatus::Completed).unwrap().status, JobStatus::Completed);
        assert!(store.update_job_status(id, JobStatus::Failed).is_err());
        assert_eq!(store.get_job(id).unwrap().unwrap().status, JobStatus::Completed);

        assert!(matches!(
            store.update_job_status(JobId(77), JobStatus::Running),
            Err(Error::JobNotFound(JobId(77)))
        ));
    }

    #[test]
    fn test_active_jobs_window() {
        let store = JobStore::open_in_memory().unwrap();
        let early = store.insert_job(&NewJob::new("early", at(1_000), 10)).unwrap();
        let late = store.insert_job(&NewJob::new("late", at(1_300), 10)).unwrap();
        let done = store
            .insert_job(&NewJob::new("done", at(1_000), 60).with_status(JobStatus::Completed))
            .unwrap();

        let ids = |t: i64| -> Vec<JobId> {
            store.active_jobs(at(t)).unwrap().into_iter().map(|j| j.id).collect()
        };
        assert!(ids(999).is_empty());
        assert_eq!(ids(1_000), vec![early]);
        assert_eq!(ids(1_300), vec![early, late]);
        assert_eq!(ids(1_600), vec![late]);
        assert!(ids(1_900).is_empty());
        assert!(!ids(1_000).contains(&done));
    }

    #[test]
    fn test_recent_jobs_with_counts() {
        let mut store = JobStore::open_in_memory().unwrap();
        let first = store.register_job(&calibration_run(), &["A", "B"], &["BID"]).unwrap();
        let second = store.register_job(&calibration_run(), &["A"], &[]).unwrap();
        let third = store.insert_job(&calibration_run()).unwrap();

        let recent = store.recent_jobs(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].job.id, third);
        assert_eq!(recent[1].job.id, second);
        assert_eq!((recent[1].instrument_count, recent[1].field_count), (1, 0));

        let all = store.recent_jobs(usize::MAX).unwrap();
        assert_eq!(all.len(), 3);
        let oldest = all.last().unwrap();
        assert_eq!(oldest.job.id, first);
        assert_eq!((oldest.instrument_count, oldest.field_count), (2, 1));

        let listed: Vec<JobId> = store.list_jobs().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(listed, vec![first, second, third]);
    }

    #[test]
    fn test_stats() {
        let mut store = JobStore::open_in_memory().unwrap();
        let id = store.register_job(&calibration_run(), &["A"], &["BID", "ASK"]).unwrap();
        store.insert_job(&calibration_run()).unwrap();
        store.update_job_status(id, JobStatus::Running).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!((stats.jobs, stats.instruments, stats.fields), (2, 1, 2));
        assert!(stats.by_status.contains(&(JobStatus::Running, 1)));
        assert!(stats.by_status.contains(&(JobStatus::NotStarted, 1)));
        assert!(stats.by_status.contains(&(JobStatus::Failed, 0)));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickjobs.db");

        let id = {
            let store = JobStore::open(&path).unwrap();
            store.insert_job(&calibration_run()).unwrap()
        };
        let store = JobStore::open(&path).unwrap();
        assert_eq!(store.get_job(id).unwrap().unwrap().name, "calibration-run");
    }

    #[test]
    fn test_out_of_range_duration_is_rejected() {
        let mut store = JobStore::open_in_memory().unwrap();

        let huge = NewJob::new("huge", at(1_700_000_000), 200_000_000_000);
        assert!(matches!(store.insert_job(&huge), Err(Error::InvalidJob(_))));
        let negative = NewJob::new("negative", at(1_700_000_000), -1);
        assert!(matches!(store.insert_job(&negative), Err(Error::InvalidJob(_))));

        let err = store.register_job(&huge, &["NKY Index"], &["BID"]).unwrap_err();
        assert!(matches!(err, Error::InvalidJob(_)));
        assert_eq!(store.count_jobs().unwrap(), 0);
        assert_eq!(store.count_instruments().unwrap(), 0);
        assert_eq!(store.count_fields().unwrap(), 0);
    }
}
