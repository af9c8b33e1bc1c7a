//! Local test plan runner
//!
//! Executes a JSON test plan as sequential HTTP requests: fixture setup,
//! every test case in requirement order, then fixture cleanup. Results are
//! printed as they arrive and collected into a JSON report.

mod console;
mod context;
mod executor;
mod fixtures;
mod http;
mod placeholders;
mod report;
mod validate;

pub use console::print_report_saved;
pub use context::{RunContext, RunOutcome};
pub use executor::{execute_test, run_plan};
pub use http::{merge_headers, HttpClient, HttpMethod, HttpResponse, REQUEST_TIMEOUT_SECS};
pub use placeholders::{resolve, resolve_cleanup_path, resolve_str, FixtureTable};
pub use report::{ReportSummary, RunSummary, TestReport, TestResult};
pub use validate::{validate, Validation, PASS_MESSAGE};
