//! Test case functions, one per API surface
//!
//! Each suite issues its requests through the executor and reports one
//! record per logical assertion. Suites share nothing: none of them reads
//! state another one created.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::common::Result;
use crate::http::{Executor, Outcome, Request};

use super::report::{Reporter, TestRecord};

const SIGNUP: &str = "/auth/signup";
const KNOWN_SLUG: &str = "acme-corporation";
const UNKNOWN_SLUG: &str = "non-existent-business";
/// Keys every business record carries, listed or looked up by slug
const BUSINESS_KEYS: [&str; 2] = ["name", "averageRating"];

/// An API surface exercised by the runner
///
/// Declaration order is the order the runner executes suites in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Suite {
    Signup,
    Businesses,
    Reviews,
    Admin,
    Dashboard,
    Catalog,
    ErrorHandling,
    Validation,
}

impl Suite {
    pub const ALL: [Suite; 8] = [
        Suite::Signup,
        Suite::Businesses,
        Suite::Reviews,
        Suite::Admin,
        Suite::Dashboard,
        Suite::Catalog,
        Suite::ErrorHandling,
        Suite::Validation,
    ];

    /// Section heading for the report
    pub fn title(&self) -> &'static str {
        match self {
            Suite::Signup => "User Signup API",
            Suite::Businesses => "Business APIs",
            Suite::Reviews => "Review APIs",
            Suite::Admin => "Admin APIs",
            Suite::Dashboard => "Business Dashboard API",
            Suite::Catalog => "Catalog APIs",
            Suite::ErrorHandling => "API Error Handling",
            Suite::Validation => "Data Validation",
        }
    }

    pub async fn run(self, executor: &Executor, reporter: &mut Reporter) -> Result<()> {
        reporter.section(self.title());
        match self {
            Suite::Signup => signup(executor, reporter).await,
            Suite::Businesses => businesses(executor, reporter).await,
            Suite::Reviews => reviews(executor, reporter).await,
            Suite::Admin => admin(executor, reporter).await,
            Suite::Dashboard => dashboard(executor, reporter).await,
            Suite::Catalog => catalog(executor, reporter).await,
            Suite::ErrorHandling => error_handling(executor, reporter).await,
            Suite::Validation => validation(executor, reporter).await,
        }
    }
}

/// Signup: creation, duplicate rejection, and required-field validation
pub async fn signup(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let user = signup_payload("testuser", "testpass123", "Test User", "USER");
    let outcome = executor.execute(&Request::post(SIGNUP).json(user)).await;
    expect_created(reporter, "User Signup - Valid Data", &outcome, "User created successfully");

    let owner = signup_payload("business", "businesspass123", "Business Owner", "BUSINESS");
    let outcome = executor.execute(&Request::post(SIGNUP).json(owner)).await;
    expect_created(
        reporter,
        "Business User Signup",
        &outcome,
        "Business user created successfully",
    );

    let existing = json!({"email": "john@example.com", "password": "password123"});
    let outcome = executor.execute(&Request::post(SIGNUP).json(existing)).await;
    expect_status(
        reporter,
        "Duplicate Email Validation",
        &outcome,
        &[400],
        "Correctly rejected duplicate email",
    );

    let missing_password = json!({"email": "test@example.com"});
    let outcome = executor
        .execute(&Request::post(SIGNUP).json(missing_password))
        .await;
    expect_status(
        reporter,
        "Missing Password Validation",
        &outcome,
        &[400],
        "Correctly rejected missing password",
    );

    let payload = signup_payload("roundtrip", "roundtrip123", "Round Trip", "USER");
    let request = Request::post(SIGNUP).json(payload);
    let first = executor.execute(&request).await;
    let second = executor.execute(&request).await;
    reporter.report(duplicate_round_trip(&first, &second));

    Ok(())
}

/// Business listing, filtering, and lookup by slug
pub async fn businesses(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let outcome = executor.execute(&Request::get("/businesses")).await;
    let record = match outcome.response() {
        Some(resp) if resp.status == 200 => match resp.items() {
            Some(items) if !items.is_empty() => match first_malformed(items, &BUSINESS_KEYS) {
                None => TestRecord::pass(
                    "List Businesses",
                    format!("Retrieved {} businesses", items.len()),
                ),
                Some((index, key)) => TestRecord::fail(
                    "List Businesses",
                    format!("Business at index {} is missing '{}'", index, key),
                ),
            },
            _ => TestRecord::fail("List Businesses", "No businesses returned"),
        },
        _ => status_failure("List Businesses", &outcome, reporter),
    };
    reporter.report(record);

    let outcome = executor
        .execute(&Request::get("/businesses?category=Technology"))
        .await;
    expect_listing(
        reporter,
        "List Businesses - Category Filter",
        &outcome,
        "technology businesses",
        "Retrieved",
    );

    let outcome = executor.execute(&Request::get("/businesses?search=Acme")).await;
    expect_listing(reporter, "Search Businesses", &outcome, "results", "Search returned");

    let outcome = executor
        .execute(&Request::get(format!("/businesses/{}", KNOWN_SLUG)))
        .await;
    let record = match outcome.response() {
        Some(resp) if resp.status == 200 => {
            match (resp.field(BUSINESS_KEYS[0]), resp.field(BUSINESS_KEYS[1])) {
                (Some(name), Some(rating)) => TestRecord::pass(
                    "Get Business by Slug",
                    format!("Retrieved {} with rating {}", display_value(name), rating),
                ),
                _ => TestRecord::fail("Get Business by Slug", "Missing expected fields in response"),
            }
        }
        _ => status_failure("Get Business by Slug", &outcome, reporter),
    };
    reporter.report(record);

    let outcome = executor
        .execute(&Request::get(format!("/businesses/{}", UNKNOWN_SLUG)))
        .await;
    expect_status(
        reporter,
        "Get Non-existent Business",
        &outcome,
        &[404],
        "Correctly returned 404",
    );

    let outcome = executor
        .execute(&Request::get(format!("/businesses/{}/reviews", UNKNOWN_SLUG)))
        .await;
    expect_status(
        reporter,
        "Get Reviews for Non-existent Business",
        &outcome,
        &[404],
        "Correctly returned 404",
    );

    let first = executor.execute(&Request::get("/businesses")).await;
    let second = executor.execute(&Request::get("/businesses")).await;
    reporter.report(repeated_status(&first, &second));

    Ok(())
}

/// Review listing with and without filters, and anonymous creation
pub async fn reviews(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let outcome = executor.execute(&Request::get("/reviews")).await;
    expect_listing(reporter, "Get All Reviews", &outcome, "reviews", "Retrieved");

    let outcome = executor
        .execute(&Request::get(format!("/reviews?businessId={}", KNOWN_SLUG)))
        .await;
    expect_listing(
        reporter,
        "Get Reviews by Business",
        &outcome,
        "reviews for business",
        "Retrieved",
    );

    let outcome = executor.execute(&Request::get("/reviews?status=PENDING")).await;
    expect_listing(
        reporter,
        "Get Pending Reviews",
        &outcome,
        "pending reviews",
        "Retrieved",
    );

    let review = json!({"businessId": KNOWN_SLUG, "rating": 5, "title": "Great", "content": "Smoke test"});
    let outcome = executor.execute(&Request::post("/reviews").json(review)).await;
    expect_unauthorized(reporter, "Create Review - No Auth", &outcome);

    Ok(())
}

/// Admin endpoints must reject anonymous callers
pub async fn admin(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    for (name, endpoint) in [
        ("Admin Stats - No Auth", "/admin/stats"),
        ("Admin Users - No Auth", "/admin/users"),
        ("Admin Claims - No Auth", "/admin/claims"),
    ] {
        let outcome = executor.execute(&Request::get(endpoint)).await;
        expect_unauthorized(reporter, name, &outcome);
    }
    Ok(())
}

/// Business dashboard endpoints must reject anonymous callers
pub async fn dashboard(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    for (name, endpoint) in [
        ("Business Dashboard - No Auth", "/dashboard/business"),
        ("Dashboard Export - No Auth", "/dashboard/business/export"),
    ] {
        let outcome = executor.execute(&Request::get(endpoint)).await;
        expect_unauthorized(reporter, name, &outcome);
    }
    Ok(())
}

/// Public lookup data: countries, categories, and global search
pub async fn catalog(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let outcome = executor.execute(&Request::get("/countries")).await;
    let record = match outcome.response() {
        Some(resp) if resp.status == 200 => {
            let default_country = resp.field("defaultCountry").filter(|v| is_truthy(v));
            let countries = resp.field("countries").and_then(Value::as_array);
            match (default_country, countries) {
                (Some(default), Some(list)) if !list.is_empty() => TestRecord::pass(
                    "List Countries",
                    format!(
                        "Retrieved {} countries, default {}",
                        list.len(),
                        display_value(default)
                    ),
                ),
                (None, _) => TestRecord::fail("List Countries", "Missing defaultCountry"),
                _ => TestRecord::fail("List Countries", "No countries returned"),
            }
        }
        _ => status_failure("List Countries", &outcome, reporter),
    };
    reporter.report(record);

    let outcome = executor.execute(&Request::get("/categories")).await;
    expect_array_field(reporter, "List Categories", &outcome, "categories");

    let outcome = executor.execute(&Request::get("/search?q=Acme")).await;
    expect_array_field(reporter, "Global Search", &outcome, "companies");

    Ok(())
}

/// Unknown paths and unsupported methods
pub async fn error_handling(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let outcome = executor.execute(&Request::get("/invalid-endpoint")).await;
    expect_status(
        reporter,
        "Invalid Endpoint",
        &outcome,
        &[404],
        "Correctly returned 404",
    );

    let outcome = executor.call("PUT", "/businesses", None).await?;
    let message = format!("Correctly rejected with status {}", outcome.status_label());
    expect_status(reporter, "Invalid Method", &outcome, &[404, 405], message);

    Ok(())
}

/// Malformed request bodies
pub async fn validation(executor: &Executor, reporter: &mut Reporter) -> Result<()> {
    let request = Request::post(SIGNUP)
        .raw_body("invalid json")
        .header("Content-Type", "application/json");
    let outcome = executor.execute(&request).await;

    let record = match &outcome {
        Outcome::Failed(failure) => {
            TestRecord::fail("Invalid JSON Handling", format!("Exception: {}", failure))
        }
        Outcome::Response(resp) if resp.status == 400 => {
            TestRecord::pass("Invalid JSON Handling", "Correctly rejected invalid JSON")
        }
        Outcome::Response(resp) => {
            TestRecord::fail("Invalid JSON Handling", format!("Expected 400, got {}", resp.status))
                .with_details(response_details(&outcome, reporter))
        }
    };
    reporter.report(record);

    Ok(())
}

/// Judge a signup submitted twice: created first, rejected second
pub fn duplicate_round_trip(first: &Outcome, second: &Outcome) -> TestRecord {
    const NAME: &str = "Duplicate Signup Round Trip";
    if first.has_status(201) && second.has_status(400) {
        TestRecord::pass(NAME, "First submission created, second rejected with 400")
    } else {
        TestRecord::fail(
            NAME,
            format!(
                "Expected 201 then 400, got {} then {}",
                first.status_label(),
                second.status_label()
            ),
        )
    }
}

/// Judge two identical reads: both must come back with the same status
pub fn repeated_status(first: &Outcome, second: &Outcome) -> TestRecord {
    const NAME: &str = "Repeated Listing Status";
    if first.status().is_some() && first.status() == second.status() {
        TestRecord::pass(NAME, format!("Both calls returned {}", first.status_label()))
    } else {
        TestRecord::fail(
            NAME,
            format!(
                "First call returned {}, second returned {}",
                first.status_label(),
                second.status_label()
            ),
        )
    }
}

fn expect_status(
    reporter: &mut Reporter,
    name: &str,
    outcome: &Outcome,
    expected: &[u16],
    pass_message: impl Into<String>,
) {
    let record = if outcome.status().is_some_and(|s| expected.contains(&s)) {
        TestRecord::pass(name, pass_message)
    } else {
        let expected = expected
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join("/");
        TestRecord::fail(
            name,
            format!("Expected {}, got {}", expected, outcome.status_label()),
        )
        .with_details(response_details(outcome, reporter))
    };
    reporter.report(record);
}

fn expect_unauthorized(reporter: &mut Reporter, name: &str, outcome: &Outcome) {
    expect_status(
        reporter,
        name,
        outcome,
        &[401],
        "Correctly rejected unauthenticated request",
    );
}

fn expect_created(reporter: &mut Reporter, name: &str, outcome: &Outcome, pass_message: &str) {
    let record = if outcome.has_status(201) {
        TestRecord::pass(name, pass_message)
    } else {
        TestRecord::fail(
            name,
            format!(
                "Status: {}, Error: {}",
                outcome.status_label(),
                outcome.error_label()
            ),
        )
        .with_details(response_details(outcome, reporter))
    };
    reporter.report(record);
}

/// 200 with the item count logged; filter correctness is not checked
fn expect_listing(
    reporter: &mut Reporter,
    name: &str,
    outcome: &Outcome,
    noun: &str,
    verb: &str,
) {
    let record = match outcome.response() {
        Some(resp) if resp.status == 200 => {
            TestRecord::pass(name, format!("{} {} {}", verb, resp.count(), noun))
        }
        _ => status_failure(name, outcome, reporter),
    };
    reporter.report(record);
}

/// 200 with a JSON object carrying an array under `field`
fn expect_array_field(reporter: &mut Reporter, name: &str, outcome: &Outcome, field: &str) {
    let record = match outcome.response() {
        Some(resp) if resp.status == 200 => match resp.field(field).and_then(Value::as_array) {
            Some(items) => TestRecord::pass(name, format!("Retrieved {} {}", items.len(), field)),
            None => TestRecord::fail(name, format!("Missing '{}' array in response", field)),
        },
        _ => status_failure(name, outcome, reporter),
    };
    reporter.report(record);
}

fn status_failure(name: &str, outcome: &Outcome, reporter: &Reporter) -> TestRecord {
    TestRecord::fail(name, format!("Status: {}", outcome.status_label()))
        .with_details(response_details(outcome, reporter))
}

/// Transport failures are always explained; bodies only in verbose mode
fn response_details(outcome: &Outcome, reporter: &Reporter) -> Option<String> {
    match outcome {
        Outcome::Failed(failure) => Some(failure.to_string()),
        Outcome::Response(resp) if reporter.verbose() => Some(resp.body.to_string()),
        Outcome::Response(_) => None,
    }
}

/// First item that is not an object carrying every key, with the key it lacks
fn first_malformed<'k>(items: &[Value], keys: &[&'k str]) -> Option<(usize, &'k str)> {
    items.iter().enumerate().find_map(|(index, item)| {
        keys.iter()
            .find(|key| item.as_object().map_or(true, |obj| !obj.contains_key(**key)))
            .map(|key| (index, *key))
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Strings without quotes, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn signup_payload(prefix: &str, password: &str, name: &str, role: &str) -> Value {
    json!({
        "email": format!("{}_{}@example.com", prefix, unique_suffix()),
        "password": password,
        "name": name,
        "role": role,
    })
}

/// Timestamp-based suffix that stays unique within one process
fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", micros, seq)
}
