use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

/// One issue raised against a generated file, either by the QA agent or by
/// the static validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaFinding {
    pub file: String,
    pub issue: String,
    pub severity: Severity,
}

/// Aggregated QA output for a project. The report surfaces issues; it
/// never blocks the project from reaching `qa_done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    pub project_id: Uuid,
    pub test_files: Vec<String>,
    pub findings: Vec<QaFinding>,
    pub generated_at: i64,
}

impl QaReport {
    pub fn new(project_id: Uuid, test_files: Vec<String>, findings: Vec<QaFinding>) -> Self {
        Self {
            project_id,
            test_files,
            findings,
            generated_at: Utc::now().timestamp(),
        }
    }
}
