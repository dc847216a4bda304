//! Validation findings and the report they roll up into.
//!
//! Both validation passes (per-table audit and cross-table checks) are
//! read-only over the data: they collect findings, never raise. Only
//! the report's failure count decides the process exit status.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Pass,
    Warning,
    Failure,
}

impl Severity {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARN",
            Self::Failure => "FAIL",
        }
    }
}

/// One validation finding. `affected` is the number of offending rows
/// (zero for aggregate checks that pass or fail as a whole).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub table: String,
    pub check: String,
    pub severity: Severity,
    pub message: String,
    pub affected: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub title: String,
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string(), findings: Vec::new() }
    }

    pub fn pass(&mut self, table: &str, check: &str, message: impl Into<String>) {
        self.push(table, check, Severity::Pass, message, 0);
    }

    pub fn warn(&mut self, table: &str, check: &str, message: impl Into<String>) {
        self.push(table, check, Severity::Warning, message, 0);
    }

    pub fn fail(
        &mut self,
        table: &str,
        check: &str,
        message: impl Into<String>,
        affected: u64,
    ) {
        self.push(table, check, Severity::Failure, message, affected);
    }

    pub fn push(
        &mut self,
        table: &str,
        check: &str,
        severity: Severity,
        message: impl Into<String>,
        affected: u64,
    ) {
        self.findings.push(Finding {
            table: table.to_string(),
            check: check.to_string(),
            severity,
            message: message.into(),
            affected,
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Zero failure-severity findings means the run is clean.
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.findings.extend(other.findings);
    }

    /// Human-readable report, grouped by table.
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(66));
        let _ = writeln!(out, "  {}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(66));

        let mut current_table = "";
        for f in &self.findings {
            if f.table != current_table {
                current_table = &f.table;
                let _ = writeln!(out, "\n  -- {current_table} --");
            }
            if f.affected > 0 {
                let _ = writeln!(
                    out,
                    "  [{}] {}: {} ({} rows)",
                    f.severity.tag(),
                    f.check,
                    f.message,
                    f.affected
                );
            } else {
                let _ = writeln!(out, "  [{}] {}: {}", f.severity.tag(), f.check, f.message);
            }
        }

        let _ = writeln!(
            out,
            "\n  SUMMARY: {} pass / {} warning / {} failure",
            self.count(Severity::Pass),
            self.count(Severity::Warning),
            self.failure_count()
        );
        if self.is_success() {
            let _ = writeln!(out, "  RESULT: clean");
        } else {
            let _ = writeln!(out, "  RESULT: FAILED");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_means_zero_failures() {
        let mut report = ValidationReport::new("test");
        report.pass("t", "c1", "ok");
        report.warn("t", "c2", "meh");
        assert!(report.is_success());
        report.fail("t", "c3", "broken", 3);
        assert!(!report.is_success());
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn render_carries_affected_counts() {
        let mut report = ValidationReport::new("test");
        report.fail("usage", "referential_integrity", "dangling customer ids", 17);
        let text = report.render();
        assert!(text.contains("17 rows"), "render lost the affected count:\n{text}");
        assert!(text.contains("FAILED"));
    }
}
