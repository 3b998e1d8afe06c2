use crate::job::JobStatus;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for human output; one per status badge plus the line decorations
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub info: Style,
    pub label: Style,
    pub muted: Style,
    pub running: Style,
}

impl Theme {
    /// Colored on an interactive stdout unless `NO_COLOR` is set
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            info: Style::new().magenta(),
            label: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            running: Style::new().yellow().bold(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            info: Style::new(),
            label: Style::new(),
            muted: Style::new(),
            running: Style::new(),
        }
    }

    /// Style for a job status badge
    pub fn status(&self, status: JobStatus) -> Style {
        match status {
            JobStatus::NotStarted => self.muted.clone(),
            JobStatus::Running => self.running.clone(),
            JobStatus::Completed => self.success.clone(),
            JobStatus::Failed => self.error.clone(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
