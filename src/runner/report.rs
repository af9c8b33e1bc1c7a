//! Run results and the JSON report file

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::{Error, Result};
use crate::plan::TestPlan;

/// Outcome of a single test case
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestResult {
    pub id: String,
    pub name: String,
    pub method: String,
    /// URL after placeholder substitution
    pub url: String,
    pub passed: bool,
    pub message: String,
    /// Absent when the request never completed
    pub response_status: Option<u16>,
    pub duration_ms: f64,
}

/// Running counters for a plan execution
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Percentage of passed tests, 0 when nothing ran
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Summary block as written to the report
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

impl From<RunSummary> for ReportSummary {
    fn from(summary: RunSummary) -> Self {
        Self {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            pass_rate: summary.pass_rate(),
        }
    }
}

/// The JSON report written after a run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestReport {
    pub project_name: Option<String>,
    pub test_type: Option<String>,
    pub base_url: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub results: Vec<TestResult>,
}

impl TestReport {
    pub fn new(plan: &TestPlan, timestamp: String, summary: RunSummary, results: Vec<TestResult>) -> Self {
        Self {
            project_name: plan.project_name.clone(),
            test_type: plan.test_type.clone(),
            base_url: plan.base_url().to_string(),
            timestamp,
            summary: summary.into(),
            results,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::file_write(path, e))?;
        tracing::info!(path = %path.display(), "Saved test report");
        Ok(())
    }
}

/// Round a duration to two decimal places of a millisecond
pub fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
