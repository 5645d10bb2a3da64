//! Import diagnostics
//!
//! An [`ImportReport`] collects two ordered sequences while an import runs:
//! informational log lines and issues. Every entry is mirrored to `tracing`
//! so embedders get the same information in their own log pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Severity of an import issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueLevel {
    Info,
    Warning,
    Severe,
    Critical,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueLevel::Info => "INFO",
            IssueLevel::Warning => "WARNING",
            IssueLevel::Severe => "SEVERE",
            IssueLevel::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// A message with a severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub level: IssueLevel,
}

impl Issue {
    pub fn new(message: impl Into<String>, level: IssueLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, IssueLevel::Warning)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Log lines and issues accumulated during one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    log: Vec<String>,
    issues: Vec<Issue>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an informational line
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "cim_graph_import::report", "{line}");
        self.log.push(line);
    }

    /// Append an issue
    pub fn log_issue(&mut self, issue: Issue) {
        match issue.level {
            IssueLevel::Info => info!(target: "cim_graph_import::report", "{}", issue.message),
            IssueLevel::Warning => warn!(target: "cim_graph_import::report", "{}", issue.message),
            IssueLevel::Severe | IssueLevel::Critical => {
                error!(target: "cim_graph_import::report", "{}", issue.message)
            }
        }
        self.issues.push(issue);
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues at the given level
    pub fn issues_at(&self, level: IssueLevel) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.level == level)
    }

    pub fn warning_count(&self) -> usize {
        self.issues_at(IssueLevel::Warning).count()
    }

    /// Render the report as JSON for hosts that display it elsewhere
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
