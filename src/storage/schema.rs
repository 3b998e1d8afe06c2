//! Database schema definitions

/// SQL to create the jobs table
pub const CREATE_JOBS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    job_id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_name TEXT NOT NULL,
    job_startdatetime INTEGER NOT NULL,
    duration INTEGER NOT NULL,
    job_status TEXT NOT NULL CHECK (job_status IN ('NOT STARTED', 'RUNNING', 'COMPLETED', 'FAILED'))
)
"#;

/// SQL to create the instruments table
pub const CREATE_INSTRUMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS instruments (
    instrument_name TEXT NOT NULL,
    job_id INTEGER REFERENCES jobs(job_id),
    UNIQUE(instrument_name, job_id)
)
"#;

/// SQL to create the fields table
pub const CREATE_FIELDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS fields (
    field_name TEXT NOT NULL,
    job_id INTEGER REFERENCES jobs(job_id),
    UNIQUE(field_name, job_id)
)
"#;

/// SQL to create indexes.
///
/// UNIQUE treats NULLs as distinct, so the partial indexes are what keep
/// an unassociated name from appearing twice.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_instruments_unassociated ON instruments(instrument_name) WHERE job_id IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_fields_unassociated ON fields(field_name) WHERE job_id IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_instruments_job ON instruments(job_id)",
    "CREATE INDEX IF NOT EXISTS idx_fields_job ON fields(job_id)",
    "CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(job_status)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_JOBS_TABLE,
        CREATE_INSTRUMENTS_TABLE,
        CREATE_FIELDS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
