use crate::job::JobSummary;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Two-column metric/value table
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
pub struct JobRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Start (UTC)")]
    pub start: String,
    #[tabled(rename = "Minutes")]
    pub duration: i64,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Instruments")]
    pub instruments: usize,
    #[tabled(rename = "Fields")]
    pub fields: usize,
}

impl From<&JobSummary> for JobRow {
    fn from(summary: &JobSummary) -> Self {
        Self {
            id: summary.job.id.get(),
            name: summary.job.name.clone(),
            start: summary.job.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration: summary.job.duration_minutes,
            status: summary.job.status.to_string(),
            instruments: summary.instrument_count,
            fields: summary.field_count,
        }
    }
}

impl JobRow {
    /// Render job summaries as a rounded table
    pub fn render(summaries: &[JobSummary]) -> String {
        let rows: Vec<JobRow> = summaries.iter().map(JobRow::from).collect();
        Table::new(rows).with(Style::rounded()).to_string()
    }
}
