//! End-to-end integration tests for testplan
//!
//! These tests verify the complete workflows by:
//! 1. Serving canned responses from a local stub HTTP server
//! 2. Running test plans against it through the library and the binary
//! 3. Converting plans to Postman collections through the binary

use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use testplan::runner::{run_plan, TestReport};
use testplan::TestPlan;

// ============== Stub server ==============

/// A request as seen by the stub server
#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    /// Lowercased header names
    headers: Vec<(String, String)>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == &name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// Canned response returned by the stub
struct StubResponse {
    status: u16,
    body: String,
    headers: Vec<(&'static str, &'static str)>,
}

impl StubResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type", "application/json")],
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type", "text/plain")],
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync>;

/// Minimal HTTP/1.1 server answering one request per connection
struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = serve_connection(stream, handler, recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    handler: Handler,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let request = RecordedRequest {
        method,
        path,
        headers,
        body,
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);

    let mut out = format!(
        "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(&response.body);

    stream.write_all(out.as_bytes()).await?;
    stream.shutdown().await
}

/// Base URL of a port nothing listens on
async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn plan_from(value: Value) -> TestPlan {
    serde_json::from_value(value).unwrap()
}

// ============== Binary helpers ==============

/// Test context with a scratch directory and an empty config file
struct TestContext {
    temp_dir: tempfile::TempDir,
    config_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "").expect("Failed to write config");
        Self {
            temp_dir,
            config_path,
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a JSON file relative to the scratch directory
    fn write_json(&self, rel: &str, value: &Value) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    fn read_json(&self, rel: &str) -> Value {
        let content = fs::read_to_string(self.path().join(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"));
        serde_json::from_str(&content).unwrap()
    }

    /// Run the testplan binary inside the scratch directory
    fn run(&self, args: &[&str]) -> CliOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_testplan"))
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run testplan");

        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}

/// Output from a testplan invocation
#[derive(Debug)]
struct CliOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

fn sample_plan(base_url: &str) -> Value {
    json!({
        "project_name": "Petstore",
        "test_type": "backend",
        "base_url": base_url,
        "requirements": [
            {
                "id": "REQ-1",
                "name": "List pets",
                "description": "Pets can be listed",
                "test_cases": [
                    {
                        "id": "TC-1",
                        "name": "List all pets",
                        "method": "GET",
                        "path": "/pets",
                        "expected_status": 200,
                        "expected_response": {"type": "array"}
                    }
                ]
            }
        ]
    })
}

// ============== Runner tests ==============

#[tokio::test]
async fn test_single_get_passes_against_stub() {
    let server = StubServer::start(|req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/pets") => StubResponse::json(200, json!([])),
        _ => StubResponse::text(404, "not found"),
    })
    .await;

    let plan = plan_from(sample_plan(&server.base_url()));
    let outcome = run_plan(&plan, Path::new("plan.json")).await.unwrap();

    assert_eq!(outcome.summary.total, 1);
    assert_eq!(outcome.summary.passed, 1);
    assert_eq!(outcome.summary.failed, 0);
    assert!(outcome.results[0].passed, "{}", outcome.results[0].message);
    assert_eq!(outcome.results[0].url, format!("{}/pets", server.base_url()));

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("test_report.json");
    TestReport::new(&plan, "T".into(), outcome.summary, outcome.results)
        .save(&report_path)
        .unwrap();

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["project_name"], "Petstore");
    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["summary"]["pass_rate"], 100.0);
    assert_eq!(report["results"][0]["response_status"], 200);
    assert_eq!(report["results"][0]["passed"], true);
}

#[tokio::test]
async fn test_fixtures_placeholders_and_cleanup() {
    let server = StubServer::start(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/pet") => StubResponse::json(200, json!({"id": 42, "name": "doggie"})),
        ("PUT", "/user") => StubResponse::text(201, "created"),
        ("POST", "/store/order") => StubResponse::json(500, json!({"message": "boom"})),
        ("GET", "/pet/42") => StubResponse::json(200, json!({"id": 42, "name": "doggie"})),
        ("POST", "/pet/42/tags") => StubResponse::json(201, json!({"ok": true})),
        ("DELETE", "/pet/42") => StubResponse::text(204, ""),
        _ => StubResponse::text(404, "not found"),
    })
    .await;

    let plan = plan_from(json!({
        "project_name": "Petstore",
        "base_url": server.base_url(),
        "authentication": {"api_key": {"header": "api_key", "value": "special-key"}},
        "fixtures": {
            "pet": {"method": "POST", "path": "/pet", "body": {"name": "doggie"}},
            "user": {"method": "put", "path": "/user", "headers": {"api_key": "fixture-key"}},
            "order": {"path": "/store/order", "body": {"quantity": 1}},
            "lookup": {"method": "GET", "path": "/pet/1"},
            "cleanup": [
                {"path": "/pet/{pet.id}"},
                {"method": "DELETE", "path": "/store/order/{order.id}"}
            ]
        },
        "requirements": [{
            "id": "REQ-1",
            "name": "Pets",
            "test_cases": [
                {
                    "id": "TC-1",
                    "name": "Get created pet",
                    "path": "/pet/{pet.id}",
                    "expected_status": 200,
                    "expected_response": {"contains": ["id", "name"]}
                },
                {
                    "id": "TC-2",
                    "name": "Tag pet",
                    "method": "post",
                    "path": "/pet/{pet.id}/tags",
                    "headers": {"api_key": "local"},
                    "body": {"petId": "{pet.id}", "orderId": "{order.id}", "tags": ["{pet.name}"]},
                    "expected_status": 201
                }
            ]
        }]
    }));

    let outcome = run_plan(&plan, Path::new("plan.json")).await.unwrap();
    assert_eq!(outcome.summary.passed, 2, "{:?}", outcome.results);

    assert_eq!(outcome.fixtures.get("pet"), Some(&json!({"id": 42, "name": "doggie"})));
    assert_eq!(outcome.fixtures.get("user"), Some(&json!({"status": "created"})));
    assert!(outcome.fixtures.get("order").is_none());
    assert!(outcome.fixtures.get("lookup").is_none());

    let requests = server.requests();
    let seen: Vec<_> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        seen,
        [
            "POST /pet",
            "PUT /user",
            "POST /store/order",
            "GET /pet/42",
            "POST /pet/42/tags",
            "DELETE /pet/42",
            "DELETE /store/order/%7Border.id%7D",
        ]
    );

    // Auth header everywhere, explicit headers win
    assert_eq!(requests[0].header("api_key"), Some("special-key"));
    assert_eq!(requests[1].header("api_key"), Some("fixture-key"));
    assert_eq!(requests[3].header("api_key"), Some("special-key"));
    assert_eq!(requests[4].header("api_key"), Some("local"));

    assert_eq!(requests[0].json(), json!({"name": "doggie"}));
    assert_eq!(
        requests[4].json(),
        json!({"petId": "42", "orderId": "{order.id}", "tags": ["doggie"]})
    );
    assert!(requests[3].body.is_empty());
}

#[tokio::test]
async fn test_failures_are_recorded_and_run_continues() {
    let server = StubServer::start(|req| match req.path.as_str() {
        "/pet/1" => StubResponse::json(200, json!({"id": 1})).with_header("X-Rate-Limit", "10"),
        "/pet/2" => StubResponse::text(404, "Pet not found"),
        _ => StubResponse::text(200, "plain"),
    })
    .await;

    let plan = plan_from(json!({
        "base_url": server.base_url(),
        "requirements": [
            {"id": "REQ-1", "name": "Lookups", "test_cases": [
                {
                    "id": "TC-1", "path": "/pet/2",
                    "expected_status": 200,
                    "expected_response": {"contains": ["id"], "type": "object"}
                },
                {
                    "id": "TC-2", "method": "PATCH", "path": "/pet/1"
                }
            ]},
            {"id": "REQ-2", "name": "Headers", "test_cases": [
                {
                    "id": "TC-3", "path": "/pet/1",
                    "expected_status": 200,
                    "expected_response": {"contains_keys": ["id"]},
                    "expected_headers": {"X-Rate-Limit": "integer"}
                },
                {
                    "id": "TC-4", "path": "/other",
                    "expected_headers": {"X-Expires-After": "date-time"}
                }
            ]}
        ]
    }));

    let outcome = run_plan(&plan, Path::new("plan.json")).await.unwrap();
    let ids: Vec<_> = outcome.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["TC-1", "TC-2", "TC-3", "TC-4"]);

    let r1 = &outcome.results[0];
    assert!(!r1.passed);
    assert_eq!(r1.response_status, Some(404));
    assert_eq!(
        r1.message,
        "Status code mismatch: expected 200, got 404; Response type mismatch: expected object, got string"
    );

    let r2 = &outcome.results[1];
    assert_eq!(r2.message, "Error: Unsupported HTTP method: PATCH");
    assert_eq!(r2.response_status, None);

    assert!(outcome.results[2].passed, "{}", outcome.results[2].message);

    let r4 = &outcome.results[3];
    assert!(!r4.passed);
    assert_eq!(r4.message, "Response missing expected header: X-Expires-After");

    assert_eq!(outcome.summary.total, 4);
    assert_eq!(outcome.summary.failed, 3);
    assert_eq!(outcome.summary.exit_code(), 1);

    // The unsupported method never reached the server
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_connection_refused_is_a_failed_result() {
    let base_url = refused_base_url().await;
    let plan = plan_from(json!({
        "base_url": base_url,
        "fixtures": {
            "pet": {"path": "/pet", "body": {"name": "x"}},
            "cleanup": [{"path": "/pet/{pet.id}"}]
        },
        "requirements": [{"id": "REQ-1", "test_cases": [
            {"id": "TC-1", "path": "/pet/{pet.id}", "expected_status": 200},
            {"id": "TC-2", "path": "/pets", "expected_status": 200}
        ]}]
    }));

    let outcome = run_plan(&plan, Path::new("plan.json")).await.unwrap();
    assert_eq!(outcome.summary.failed, 2);
    for result in &outcome.results {
        assert_eq!(result.message, "Connection error - is the server running?");
        assert_eq!(result.response_status, None);
    }
    assert_eq!(outcome.results[0].url, format!("{base_url}/pet/{{pet.id}}"));
    assert!(outcome.fixtures.is_empty());
}

// ============== CLI tests ==============

#[test]
fn test_cli_convert_writes_collection() {
    let ctx = TestContext::new();
    let plan_path = ctx.write_json("tests/pet/pet_crud.json", &sample_plan("http://localhost:3000"));

    let output = ctx.run(&["convert", plan_path.to_str().unwrap(), "out.json"]);
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Postman collection saved to: out.json"));
    assert!(output.stdout.contains("Total Requests: 1"));

    let collection = ctx.read_json("out.json");
    assert_eq!(collection["info"]["name"], "Petstore");
    assert_eq!(
        collection["info"]["schema"],
        "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
    );
    assert_eq!(collection["item"][0]["name"], "REQ-1 - List pets");
    let request = &collection["item"][0]["item"][0];
    assert_eq!(request["request"]["url"]["raw"], "http://localhost:3000/pets");
    assert_eq!(request["request"]["url"]["host"], json!(["localhost", "3000"]));
    assert_eq!(request["request"]["url"]["path"], json!([]));
    assert!(request["request"].get("body").is_none());
    assert_eq!(request["response"], json!([]));
}

#[test]
fn test_cli_convert_default_output_name() {
    let ctx = TestContext::new();
    ctx.write_json("pet_crud.json", &sample_plan("http://localhost:3000"));

    let output = ctx.run(&["convert", "pet_crud.json"]);
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(ctx
        .path()
        .join("postman_collections/postman_pet_crud.json")
        .exists());
}

#[test]
fn test_cli_missing_and_malformed_plans_are_fatal() {
    let ctx = TestContext::new();

    let output = ctx.run(&["convert", "missing.json"]);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Test plan file not found: missing.json"));

    fs::write(ctx.path().join("bad.json"), "{\n  \"requirements\": [\n").unwrap();
    let output = ctx.run(&["run", "bad.json"]);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Invalid JSON in test plan"), "{}", output.stderr);
    assert!(output.stderr.contains("line 3"), "{}", output.stderr);
    assert!(!ctx.path().join("test_report.json").exists());
}

#[test]
fn test_cli_convert_all_groups_by_category() {
    let ctx = TestContext::new();
    let base = "http://localhost:3000";
    ctx.write_json("tests/user/users.json", &sample_plan(base));
    ctx.write_json("tests/pet/pets.json", &sample_plan(base));
    ctx.write_json("tests/misc/health.json", &sample_plan(base));

    let output = ctx.run(&["convert-all"]);
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Individual Collections: 3"));

    for name in ["postman_users.json", "postman_pets.json", "postman_health.json"] {
        assert!(ctx.path().join("postman_collections").join(name).exists(), "{name}");
    }

    let combined = ctx.read_json("postman_collections/Petstore_API_Complete.json");
    assert_eq!(combined["info"]["name"], "Petstore API - Complete Test Suite");
    let categories: Vec<_> = combined["item"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(categories, ["Pet Operations", "User Operations", "Other"]);
    assert_eq!(combined["item"][0]["description"], "All pet operations endpoints");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_run_writes_report_and_exit_code() {
    let server = StubServer::start(|req| match req.path.as_str() {
        "/pets" => StubResponse::json(200, json!([{"id": 1}])),
        _ => StubResponse::text(500, "error"),
    })
    .await;

    let ctx = TestContext::new();
    let mut plan = sample_plan(&server.base_url());
    ctx.write_json("passing.json", &plan);
    plan["requirements"][0]["test_cases"][0]["path"] = json!("/broken");
    ctx.write_json("failing.json", &plan);

    let ctx = Arc::new(ctx);
    let runner = ctx.clone();
    let (passing, failing) = tokio::task::spawn_blocking(move || {
        let passing = runner.run(&["run", "passing.json", "--report", "pass_report.json"]);
        let failing = runner.run(&["run", "failing.json"]);
        (passing, failing)
    })
    .await
    .unwrap();

    assert_eq!(passing.code, Some(0), "stdout: {}", passing.stdout);
    assert!(passing.stdout.contains("[PASS] [TC-1] List all pets"));
    assert!(passing.stdout.contains("Report saved to: pass_report.json"));
    let report = ctx.read_json("pass_report.json");
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["results"][0]["response_status"], 200);

    assert_eq!(failing.code, Some(1), "stdout: {}", failing.stdout);
    assert!(failing.stdout.contains("[FAIL] [TC-1] List all pets"));
    let report = ctx.read_json("test_report.json");
    assert_eq!(report["summary"]["failed"], 1);
    assert_eq!(report["results"][0]["response_status"], 500);
    assert!(report["timestamp"].as_str().unwrap().contains('T'));
}
