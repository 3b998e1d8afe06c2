use crate::{OutputMode, emit_success};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tickjobs::config::{self, TickjobsConfig};
use tickjobs::job::{parse_timestamp, Job};
use tickjobs::ui::{self, Icons, JobRow, TableBuilder};
use tickjobs::{output, Error, JobId, JobStatus, JobStore, NewJob};

/// Settings shared by every subcommand
pub struct Context {
    pub output_mode: OutputMode,
    pub config_path: PathBuf,
    pub config: TickjobsConfig,
    pub database: PathBuf,
    pub project_root: PathBuf,
}

impl Context {
    fn open_store(&self) -> anyhow::Result<JobStore> {
        config::ensure_db_dir(&self.database)?;
        Ok(JobStore::open(&self.database)?)
    }

    fn chatty(&self) -> bool {
        self.output_mode.is_human() && !output::is_quiet()
    }
}

pub struct AddArgs {
    pub name: String,
    pub start: String,
    pub duration: Option<i64>,
    pub end: Option<String>,
    pub instruments: Vec<String>,
    pub fields: Vec<String>,
}

pub fn run_init(ctx: &Context, force: bool) -> anyhow::Result<()> {
    let config = TickjobsConfig {
        database: Some(ctx.database.display().to_string()),
        ..ctx.config.clone()
    };
    config::write_config(&ctx.config_path, &config, force)?;
    ctx.open_store()?;

    if ctx.database == config::default_database_path_in(&ctx.project_root) {
        config::ensure_gitignore(&ctx.project_root)?;
    }

    if ctx.output_mode.is_human() {
        ui::success("Initialized tickjobs");
        ui::info("Config", &ctx.config_path.display().to_string());
        ui::info("Database", &ctx.database.display().to_string());
    } else {
        emit_success(ctx.output_mode, "init", serde_json::json!({
            "config": ctx.config_path,
            "database": ctx.database,
        }))?;
    }
    Ok(())
}

pub fn run_add(ctx: &Context, args: AddArgs) -> anyhow::Result<()> {
    let start = parse_timestamp(&args.start)?;
    let job = match (args.duration, args.end.as_deref()) {
        (Some(minutes), _) => NewJob::new(args.name, start, minutes),
        (None, Some(end)) => NewJob::spanning(args.name, start, parse_timestamp(end)?)?,
        (None, None) => anyhow::bail!("either --duration or --end is required"),
    };

    let mut store = ctx.open_store()?;
    let id = store.register_job(&job, &args.instruments, &args.fields)?;
    let instruments = store.instruments_for(Some(id))?;
    let fields = store.fields_for(Some(id))?;

    if ctx.output_mode.is_human() {
        ui::success(&format!("Registered job {} '{}'", id, job.name));
        ui::summary_row("Start:", &job.start.to_rfc3339());
        ui::summary_row("Duration:", &format!("{} min", job.duration_minutes));
        ui::summary_row("Instruments:", &instruments.len().to_string());
        ui::summary_row("Fields:", &fields.len().to_string());
    } else {
        emit_success(ctx.output_mode, "add", serde_json::json!({
            "job_id": id,
            "instruments": instruments,
            "fields": fields,
        }))?;
    }
    Ok(())
}

pub fn run_list(ctx: &Context, limit: Option<usize>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let limit = ctx.config.recent_limit(limit);
    let recent = store.recent_jobs(limit)?;

    if ctx.output_mode.is_human() {
        if recent.is_empty() {
            println!("{} No jobs registered.", Icons::EMPTY);
        } else {
            if ctx.chatty() {
                ui::header(&format!("Latest {} jobs", recent.len()));
            }
            println!("{}", JobRow::render(&recent));
        }
    } else {
        emit_success(ctx.output_mode, "list", serde_json::to_value(&recent)?)?;
    }
    Ok(())
}

pub fn run_show(ctx: &Context, job_id: i64) -> anyhow::Result<()> {
    let id = JobId(job_id);
    let store = ctx.open_store()?;
    let job = store.get_job(id)?.ok_or(Error::JobNotFound(id))?;
    let instruments = store.instruments_for(Some(id))?;
    let fields = store.fields_for(Some(id))?;

    if ctx.output_mode.is_human() {
        print_job(&job);
        ui::section("Instruments");
        print_names(&instruments);
        ui::section("Fields");
        print_names(&fields);
    } else {
        emit_success(ctx.output_mode, "show", serde_json::json!({
            "job": job,
            "instruments": instruments,
            "fields": fields,
        }))?;
    }
    Ok(())
}

pub fn run_active(ctx: &Context, at: Option<&str>) -> anyhow::Result<()> {
    let at = match at {
        Some(s) => parse_timestamp(s)?,
        None => Utc::now(),
    };
    let store = ctx.open_store()?;
    let jobs = store.active_jobs(at)?;

    if ctx.output_mode.is_human() {
        if ctx.chatty() {
            ui::header(&format!("Jobs active at {}", at.to_rfc3339()));
        }
        if jobs.is_empty() {
            println!("{} No active jobs.", Icons::EMPTY);
        }
        for job in &jobs {
            println!(
                "{} [{}] {} {} ({} → {})",
                Icons::HOURGLASS,
                job.id,
                job.name.bold(),
                ui::status_badge(job.status),
                job.start.format("%H:%M:%S"),
                end_label(job, |end| end.format("%H:%M:%S").to_string()),
            );
        }
    } else {
        emit_success(ctx.output_mode, "active", serde_json::json!({
            "at": at,
            "jobs": jobs,
        }))?;
    }
    Ok(())
}

pub fn run_status(ctx: &Context, job_id: i64, status: &str) -> anyhow::Result<()> {
    let status: JobStatus = status.parse()?;
    let store = ctx.open_store()?;
    let job = store.update_job_status(JobId(job_id), status)?;

    if ctx.output_mode.is_human() {
        ui::success(&format!("Job {} is now {}", job.id, job.status));
    } else {
        emit_success(ctx.output_mode, "status", serde_json::to_value(&job)?)?;
    }
    Ok(())
}

pub fn run_delete(ctx: &Context, job_id: i64) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let removal = store.delete_job(JobId(job_id))?;

    if ctx.output_mode.is_human() {
        println!(
            "{} Deleted job {} ({} instruments, {} fields)",
            Icons::DEL,
            removal.job,
            removal.instruments,
            removal.fields
        );
    } else {
        emit_success(ctx.output_mode, "delete", serde_json::to_value(removal)?)?;
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if ctx.output_mode.is_human() {
        if ctx.chatty() {
            println!("{} Tickjobs Statistics ({})", Icons::STATS, ctx.database.display());
        }
        let mut table = TableBuilder::new();
        table.add_row("Jobs", &stats.jobs.to_string());
        for (status, count) in &stats.by_status {
            table.add_row(&format!("  {}", status), &count.to_string());
        }
        table.add_row("Instruments", &stats.instruments.to_string());
        table.add_row("Fields", &stats.fields.to_string());
        println!("{}", table.build());
    } else {
        let by_status: serde_json::Map<String, serde_json::Value> = stats
            .by_status
            .iter()
            .map(|(status, count)| (status.to_string(), serde_json::json!(count)))
            .collect();
        emit_success(ctx.output_mode, "stats", serde_json::json!({
            "database": ctx.database,
            "jobs": stats.jobs,
            "instruments": stats.instruments,
            "fields": stats.fields,
            "by_status": by_status,
        }))?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        println!(
            "{} {}",
            "Tickjobs".bold().style(ui::theme().info.clone()),
            format!("Version {}", env!("CARGO_PKG_VERSION")).bold()
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

fn print_job(job: &Job) {
    ui::header(&format!("Job {}: {}", job.id, job.name));
    ui::info("Status", &ui::status_badge(job.status));
    ui::info("Start", &job.start.to_rfc3339());
    ui::info("End", &end_label(job, |end| end.to_rfc3339()));
    ui::info("Duration", &format!("{} min", job.duration_minutes));
}

fn end_label(job: &Job, render: impl Fn(DateTime<Utc>) -> String) -> String {
    job.end().map(render).unwrap_or_else(|| "open-ended".to_string())
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("  {}", ui::muted("(none)"));
    }
    for name in names {
        println!("  {} {}", Icons::LINK, name);
    }
}
