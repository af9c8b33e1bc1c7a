//! Fixture setup before the run and cleanup after it
//!
//! Neither phase can fail the run: problems are printed and the run moves
//! on. A fixture whose setup failed simply leaves its placeholders
//! unresolved.

use serde_json::json;

use crate::plan::{CleanupStep, Fixtures};

use super::console;
use super::context::RunContext;
use super::http::HttpMethod;
use super::placeholders::resolve_cleanup_path;

/// Create every fixture and capture its response body
pub async fn setup(ctx: &mut RunContext, fixtures: &Fixtures) {
    if fixtures.setups.is_empty() {
        return;
    }
    console::fixtures_header();

    for (name, fixture) in &fixtures.setups {
        let method = fixture.method();
        let Some(http_method) =
            HttpMethod::parse(&method).filter(|m| matches!(m, HttpMethod::Post | HttpMethod::Put))
        else {
            tracing::warn!(fixture = %name, %method, "Skipping fixture with unsupported method");
            console::fixture_skipped(name, &method);
            continue;
        };

        let url = ctx.url(fixture.path());
        let headers = ctx.headers(fixture.headers.as_ref());

        match ctx
            .client
            .send(http_method, &url, &headers, fixture.body.as_ref())
            .await
        {
            Ok(response) if matches!(response.status, 200 | 201) => {
                let data = response
                    .json()
                    .unwrap_or_else(|| json!({"status": "created"}));
                ctx.fixtures.insert(name.clone(), data);
                console::fixture_created(name);
            }
            Ok(response) => {
                tracing::warn!(fixture = %name, status = response.status, "Fixture setup rejected");
                console::fixture_failed(name, response.status);
            }
            Err(e) => {
                tracing::warn!(fixture = %name, error = %e, "Fixture setup failed");
                console::fixture_error(name, &e);
            }
        }
    }

    console::section_end();
}

/// Issue every cleanup request once, filling `{fixture.id}` in its path
pub async fn cleanup(ctx: &RunContext, steps: &[CleanupStep]) {
    if steps.is_empty() {
        return;
    }
    console::cleanup_header();

    for step in steps {
        let path = resolve_cleanup_path(step.path(), &ctx.fixtures);
        let method = step.method();
        let Some(http_method) = HttpMethod::parse(&method) else {
            tracing::warn!(%path, %method, "Skipping cleanup with unsupported method");
            console::cleanup_skipped(&path, &method);
            continue;
        };

        let url = ctx.url(&path);
        let headers = ctx.headers(step.headers.as_ref());

        match ctx.client.send(http_method, &url, &headers, None).await {
            Ok(response) if matches!(response.status, 200 | 204) => console::cleanup_done(&path),
            Ok(response) => {
                tracing::warn!(%path, status = response.status, "Cleanup rejected");
                console::cleanup_failed(&path, response.status);
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "Cleanup failed");
                console::cleanup_error(&path, &e);
            }
        }
    }

    console::section_end();
}
