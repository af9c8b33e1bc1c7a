//! Test case execution: build, send, validate, record

use std::path::Path;

use crate::common::{Error, Result};
use crate::plan::{TestCase, TestPlan};

use super::console;
use super::context::{RunContext, RunOutcome};
use super::fixtures;
use super::http::HttpMethod;
use super::placeholders::{resolve, resolve_str};
use super::report::{round_ms, TestResult};
use super::validate::validate;

/// Execute a whole plan: fixtures, every test case in order, cleanup
///
/// Only a failure to set up the HTTP client is returned as an error; request
/// and validation failures end up in the results.
pub async fn run_plan(plan: &TestPlan, plan_path: &Path) -> Result<RunOutcome> {
    let mut ctx = RunContext::new(plan)?;
    console::print_plan_header(plan, plan_path);

    if let Some(fixture_defs) = plan.fixtures() {
        fixtures::setup(&mut ctx, fixture_defs).await;
    }

    for req in &plan.requirements {
        console::print_requirement(req);
        for case in &req.test_cases {
            let result = execute_test(&ctx, case).await;
            console::print_result(&result);
            ctx.record(result);
        }
    }

    if let Some(fixture_defs) = plan.fixtures() {
        fixtures::cleanup(&ctx, &fixture_defs.cleanup).await;
    }

    console::print_summary(&ctx.summary, &ctx.results);
    Ok(ctx.into_outcome())
}

/// Run one test case against the captured fixtures
pub async fn execute_test(ctx: &RunContext, case: &TestCase) -> TestResult {
    let method = case.method();
    let path = resolve_str(case.path(), &ctx.fixtures);
    let body = case.body.as_ref().map(|body| resolve(body, &ctx.fixtures));
    let headers = ctx.headers(case.headers.as_ref());
    let url = ctx.url(&path);

    let mut result = TestResult {
        id: case.id().to_string(),
        name: case.name().to_string(),
        method: method.clone(),
        url,
        passed: false,
        message: String::new(),
        response_status: None,
        duration_ms: 0.0,
    };

    let response = match HttpMethod::parse(&method) {
        Some(http_method) => {
            ctx.client
                .send(http_method, &result.url, &headers, body.as_ref())
                .await
        }
        None => Err(Error::UnsupportedMethod(method)),
    };

    match response {
        Ok(response) => {
            result.response_status = Some(response.status);
            result.duration_ms = round_ms(response.elapsed.as_secs_f64() * 1000.0);
            let validation = validate(case, &response);
            result.passed = validation.passed;
            result.message = validation.message;
        }
        Err(e) => {
            tracing::debug!(test = %result.id, error = %e, "Request failed");
            result.message = e.to_string();
        }
    }

    result
}
