use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier the worker assigns to a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job board a result was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
    InfoJobs,
    Indeed,
    LinkedIn,
}

impl JobSource {
    pub fn label(self) -> &'static str {
        match self {
            JobSource::InfoJobs => "InfoJobs",
            JobSource::Indeed => "Indeed",
            JobSource::LinkedIn => "LinkedIn",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            JobSource::InfoJobs => "🔵",
            JobSource::Indeed => "ℹ️",
            JobSource::LinkedIn => "💼",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One listing returned by a completed job. `link` identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
    pub link: String,
    pub source: JobSource,
}

impl JobResult {
    /// Salary worth showing; the scrapers use `"N/A"` when they found none.
    pub fn display_salary(&self) -> Option<&str> {
        self.salary
            .as_deref()
            .map(str::trim)
            .filter(|salary| !salary.is_empty() && *salary != "N/A")
    }
}

/// Status label reported by `GET /jobs/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Pending,
    Running,
    WaitingInput,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl WorkerStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerStatus::Completed | WorkerStatus::Failed)
    }
}

/// Body of a status poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: WorkerStatus,
    #[serde(default)]
    pub results: Vec<JobResult>,
}

impl StatusReport {
    pub fn new(status: WorkerStatus) -> Self {
        Self {
            status,
            results: Vec::new(),
        }
    }
}
