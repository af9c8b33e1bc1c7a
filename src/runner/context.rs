//! Per-run state shared by fixtures, test cases and cleanup

use crate::common::Result;
use crate::plan::{ApiKey, Headers, TestPlan};

use super::http::{merge_headers, HttpClient};
use super::placeholders::FixtureTable;
use super::report::{RunSummary, TestResult};

/// Everything a run reads and writes, owned by the run loop
#[derive(Debug)]
pub struct RunContext {
    pub(crate) client: HttpClient,
    base_url: String,
    api_key: Option<ApiKey>,
    /// Captured fixture data; written during setup only
    pub fixtures: FixtureTable,
    /// Results in execution order
    pub results: Vec<TestResult>,
    pub summary: RunSummary,
}

impl RunContext {
    pub fn new(plan: &TestPlan) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: plan.base_url().to_string(),
            api_key: plan.api_key().cloned(),
            fixtures: FixtureTable::new(),
            results: Vec::new(),
            summary: RunSummary::default(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Auth header merged with request-specific headers
    pub fn headers(&self, overrides: Option<&Headers>) -> Vec<(String, String)> {
        merge_headers(self.api_key.as_ref(), overrides)
    }

    /// Append a result and update the counters
    pub fn record(&mut self, result: TestResult) {
        self.summary.record(result.passed);
        self.results.push(result);
    }

    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            summary: self.summary,
            results: self.results,
            fixtures: self.fixtures,
        }
    }
}

/// What a finished run hands back to the caller
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub results: Vec<TestResult>,
    pub fixtures: FixtureTable,
}
