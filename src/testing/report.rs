//! Pass/fail reporting
//!
//! Every assertion ends up here. The reporter prints one uniform block per
//! record and keeps a tally for the closing summary.

use colored::Colorize;

/// Width of the separator rule printed around the run
const RULE_WIDTH: usize = 60;

/// Outcome of one logical assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
    pub details: Option<String>,
}

impl TestRecord {
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
            message: None,
            details: None,
        }
    }

    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, true).with_message(message)
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, false).with_message(message)
    }

    /// Attach a message; an empty string means no message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.is_empty()).then_some(message);
        self
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details.filter(|d| !d.is_empty());
        self
    }
}

/// Tally of a completed (or aborted) run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    /// Exit code for a run that reached the end of its sequence
    ///
    /// Assertion failures only affect the exit code in strict mode.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.all_passed() {
            1
        } else {
            0
        }
    }
}

/// Terminal sink for test records
pub struct Reporter {
    echo: bool,
    verbose: bool,
    summary: RunSummary,
}

impl Reporter {
    /// Reporter that prints to stdout
    pub fn new(verbose: bool) -> Self {
        Self {
            echo: true,
            verbose,
            summary: RunSummary::default(),
        }
    }

    /// Reporter that only tallies
    pub fn quiet() -> Self {
        Self {
            echo: false,
            verbose: false,
            summary: RunSummary::default(),
        }
    }

    /// Whether failed checks should carry response bodies as details
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Record one assertion and print it
    pub fn report(&mut self, record: TestRecord) {
        if self.echo {
            println!("{}", render(&record));
        }
        if record.passed {
            self.summary.passed.push(record.name);
        } else {
            self.summary.failed.push(record.name);
        }
    }

    /// Header printed before each suite
    pub fn section(&self, title: &str) {
        if self.echo {
            println!("{}", format!("=== Testing {} ===", title).cyan().bold());
        }
    }

    /// Free-form line, e.g. for the run banner
    pub fn line(&self, text: &str) {
        if self.echo {
            println!("{}", text);
        }
    }

    pub fn rule(&self) {
        self.line(&"=".repeat(RULE_WIDTH));
    }
}

/// Format a record as printed: status line, optional message and details,
/// then a blank line
pub fn render(record: &TestRecord) -> String {
    let status = if record.passed {
        "✅ PASS".green().bold()
    } else {
        "❌ FAIL".red().bold()
    };

    let mut out = format!("{} | {}\n", status, record.name);
    if let Some(message) = &record.message {
        out.push_str(&format!("    {}\n", message));
    }
    if let Some(details) = &record.details {
        out.push_str(&format!("    {} {}\n", "Details:".dimmed(), details));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pass_without_extras() {
        let out = render(&TestRecord::new("List Businesses", true));
        assert!(out.contains("PASS"));
        assert!(out.contains("| List Businesses"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_render_fail_with_message_and_details() {
        let record = TestRecord::fail("Invalid Endpoint", "Expected 404, got 200")
            .with_details(Some("{\"ok\":true}".to_string()));
        let out = render(&record);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("FAIL"));
        assert_eq!(lines[1], "    Expected 404, got 200");
        assert!(lines[2].contains("{\"ok\":true}"));
    }

    #[test]
    fn test_empty_message_and_details_are_dropped() {
        let record = TestRecord::pass("x", "").with_details(Some(String::new()));
        assert!(record.message.is_none());
        assert!(record.details.is_none());
    }

    #[test]
    fn test_reporter_tallies_in_order() {
        let mut reporter = Reporter::quiet();
        reporter.report(TestRecord::pass("a", "ok"));
        reporter.report(TestRecord::fail("b", "nope"));
        reporter.report(TestRecord::pass("c", "ok"));

        let summary = reporter.summary();
        assert_eq!(summary.passed, vec!["a", "c"]);
        assert_eq!(summary.failed, vec!["b"]);
        assert_eq!(summary.total(), 3);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_exit_code_only_strict_fails() {
        let summary = RunSummary {
            passed: vec!["a".into()],
            failed: vec!["b".into()],
        };
        assert_eq!(summary.exit_code(false), 0);
        assert_eq!(summary.exit_code(true), 1);
        assert_eq!(RunSummary::default().exit_code(true), 0);
    }
}
