//! End-to-end tests for the review-smoke binary
//!
//! These tests:
//! 1. Start an httpmock server standing in for the review platform
//! 2. Run the compiled binary against it
//! 3. Check the stdout report and the exit code

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

/// Test context with an isolated config directory
struct TestContext {
    /// Temporary directory for this test
    temp_dir: PathBuf,
}

impl TestContext {
    fn new(test_name: &str) -> Self {
        let temp_dir = env::temp_dir().join("review-smoke-tests").join(test_name);

        // Clean up any previous test artifacts
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).expect("Failed to create temp dir");

        Self { temp_dir }
    }

    /// Run the binary with the given arguments
    fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_review-smoke"));
        cmd.args(args)
            .env_remove("NEXT_PUBLIC_BASE_URL")
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", &self.temp_dir)
            .env("NO_COLOR", "1");
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to run review-smoke")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_line(report: &str, status: &str, name: &str) {
    let expected = format!("{} | {}", status, name);
    assert!(
        report.lines().any(|line| line.ends_with(&expected)),
        "missing '{}' in report:\n{}",
        expected,
        report
    );
}

/// Mock every endpoint the suites touch with a well-behaved response
fn healthy_service(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/signup")
            .body_contains("john@example.com");
        then.status(400).json_body(json!({"error": "User already exists"}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/signup")
            .json_body(json!({"email": "test@example.com"}));
        then.status(400).json_body(json!({"error": "Missing required fields"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/auth/signup").body("invalid json");
        then.status(400).json_body(json!({"error": "Invalid JSON"}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/signup")
            .body_contains("\"role\"");
        then.status(201).json_body(json!({"id": "user-1"}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/businesses");
        then.status(200).json_body(json!([
            {"name": "Acme Corporation", "slug": "acme-corporation", "averageRating": 4.4},
            {"name": "Globex", "slug": "globex", "averageRating": 3.9}
        ]));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/api/businesses");
        then.status(405);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/businesses/acme-corporation");
        then.status(200)
            .json_body(json!({"name": "Acme Corporation", "averageRating": 4.4}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/reviews");
        then.status(200).json_body(json!([{"id": "r1", "rating": 5}]));
    });

    for path in [
        "/api/admin/stats",
        "/api/admin/users",
        "/api/admin/claims",
        "/api/dashboard/business",
        "/api/dashboard/business/export",
    ] {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(401).json_body(json!({"error": "Unauthorized"}));
        });
    }
    server.mock(|when, then| {
        when.method(POST).path("/api/reviews");
        then.status(401).json_body(json!({"error": "Unauthorized"}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/countries");
        then.status(200)
            .json_body(json!({"defaultCountry": "UK", "countries": ["UK", "USA"]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/categories");
        then.status(200)
            .json_body(json!({"categories": [{"slug": "bank", "name": "Bank"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/search");
        then.status(200).json_body(json!({"companies": [], "categories": []}));
    });
}

#[test]
fn test_full_run_against_healthy_service() {
    let ctx = TestContext::new("full_run_healthy");
    let server = MockServer::start();
    healthy_service(&server);

    let output = ctx.run(&["--base-url", &server.base_url()]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "report:\n{}", report);
    assert!(report.contains(&format!("API Base: {}/api", server.base_url())));
    assert!(report.contains("Backend API Testing Complete"));

    assert_line(&report, "PASS", "User Signup - Valid Data");
    assert_line(&report, "PASS", "Duplicate Email Validation");
    assert_line(&report, "PASS", "Missing Password Validation");
    assert_line(&report, "PASS", "List Businesses");
    assert_line(&report, "PASS", "Get Business by Slug");
    assert_line(&report, "PASS", "Get Non-existent Business");
    assert_line(&report, "PASS", "Admin Stats - No Auth");
    assert_line(&report, "PASS", "Business Dashboard - No Auth");
    assert_line(&report, "PASS", "List Countries");
    assert_line(&report, "PASS", "Invalid Endpoint");
    assert_line(&report, "PASS", "Invalid Method");
    assert_line(&report, "PASS", "Invalid JSON Handling");
    // the mock is stateless, so the repeated signup is accepted twice
    assert_line(&report, "FAIL", "Duplicate Signup Round Trip");
}

#[test]
fn test_suites_run_in_canonical_order() {
    let ctx = TestContext::new("canonical_order");
    let server = MockServer::start();
    healthy_service(&server);

    let output = ctx.run(&[
        "--base-url",
        &server.base_url(),
        "--suite",
        "validation",
        "--suite",
        "admin",
    ]);
    let report = stdout(&output);

    let admin = report.find("=== Testing Admin APIs ===").expect("admin section");
    let validation = report
        .find("=== Testing Data Validation ===")
        .expect("validation section");
    assert!(admin < validation);
    assert!(!report.contains("=== Testing Business APIs ==="));
}

#[test]
fn test_strict_mode_passes_when_selected_suites_pass() {
    let ctx = TestContext::new("strict_pass");
    let server = MockServer::start();
    healthy_service(&server);

    let output = ctx.run(&[
        "--base-url",
        &server.base_url(),
        "--strict",
        "-s",
        "businesses",
        "-s",
        "reviews",
        "-s",
        "admin",
        "-s",
        "dashboard",
        "-s",
        "catalog",
        "-s",
        "error-handling",
        "-s",
        "validation",
    ]);
    assert_eq!(output.status.code(), Some(0), "report:\n{}", stdout(&output));
    assert!(!stdout(&output).contains("FAIL |"));
}

#[test]
fn test_assertion_failures_exit_zero_unless_strict() {
    let ctx = TestContext::new("failures_exit_code");
    // no mocks: every endpoint answers 404
    let server = MockServer::start();

    let output = ctx.run(&["--base-url", &server.base_url(), "-s", "admin"]);
    assert_eq!(output.status.code(), Some(0));
    assert_line(&stdout(&output), "FAIL", "Admin Stats - No Auth");
    assert!(stdout(&output).contains("Expected 401, got 404"));

    let output = ctx.run(&["--base-url", &server.base_url(), "-s", "admin", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unreachable_service_is_reported_not_fatal() {
    let ctx = TestContext::new("unreachable");
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = format!("http://127.0.0.1:{}", port);

    let output = ctx.run(&["--base-url", &base_url, "-s", "signup", "-s", "validation"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "report:\n{}", report);
    assert!(report.contains("Status: None, Error: No response"));
    assert!(report.contains("Exception:"));
    assert_line(&report, "FAIL", "Invalid JSON Handling");
}

#[test]
fn test_base_url_from_environment() {
    let ctx = TestContext::new("env_base_url");
    let server = MockServer::start();
    healthy_service(&server);

    let output = ctx.run_with_env(
        &["-s", "dashboard"],
        &[("NEXT_PUBLIC_BASE_URL", server.base_url().as_str())],
    );
    let report = stdout(&output);
    assert!(report.contains(&format!("Base URL: {}", server.base_url())));
    assert_line(&report, "PASS", "Dashboard Export - No Auth");
}

#[test]
fn test_config_file_is_used() {
    let ctx = TestContext::new("config_file");
    let server = MockServer::start();
    healthy_service(&server);

    let config_path = ctx.temp_dir.join("smoke.toml");
    fs::write(
        &config_path,
        format!("[api]\nbase_url = \"{}\"\ntimeout_secs = 10\n", server.base_url()),
    )
    .unwrap();

    let output = ctx.run(&["--config", config_path.to_str().unwrap(), "-s", "catalog"]);
    let report = stdout(&output);
    assert_line(&report, "PASS", "List Countries");
    assert_line(&report, "PASS", "List Categories");
    assert_line(&report, "PASS", "Global Search");
}

#[test]
fn test_invalid_configuration_exits_one() {
    let ctx = TestContext::new("invalid_config");
    let output = ctx.run(&["--base-url", "ftp://example.test"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Testing failed with exception"));
}
