//! Console progress output for plan runs

use colored::Colorize;
use std::path::Path;

use crate::common::Error;
use crate::plan::{Requirement, TestPlan};

use super::report::{RunSummary, TestResult};

const RULE_WIDTH: usize = 70;

/// Title banner between two heavy rules
pub fn print_banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", rule.cyan().bold());
    println!("{}", format!("  {title}").cyan().bold());
    println!("{}\n", rule.cyan().bold());
}

pub fn print_plan_header(plan: &TestPlan, plan_path: &Path) {
    print_banner("Local Test Runner");
    println!(
        "{} {}",
        "Project:".bold(),
        plan.project_name.as_deref().unwrap_or("Unknown")
    );
    println!(
        "{} {}",
        "Test Type:".bold(),
        plan.test_type.as_deref().unwrap_or("Unknown")
    );
    println!("{} {}", "Base URL:".bold(), plan.base_url());
    println!("{} {}\n", "Test Plan:".bold(), plan_path.display());
}

pub fn print_requirement(req: &Requirement) {
    println!("{}", format!("[{}] {}", req.id(), req.name()).blue().bold());
    println!("{}\n", "-".repeat(RULE_WIDTH).blue());
}

pub fn print_result(result: &TestResult) {
    let icon = if result.passed {
        "[PASS]".green()
    } else {
        "[FAIL]".red()
    };
    println!("  {} [{}] {}", icon, result.id, result.name);
    println!("    {} {}", result.method, result.url);

    if let Some(status) = result.response_status {
        let status = if result.passed {
            status.to_string().green()
        } else {
            status.to_string().red()
        };
        println!("    Status: {} | Duration: {}ms", status, result.duration_ms);
    }

    if !result.passed {
        println!("    {}", format!("Error: {}", result.message).red());
    }
    println!();
}

pub fn print_summary(summary: &RunSummary, results: &[TestResult]) {
    print_banner("Test Summary");
    println!("{}  {}", "Total Tests:".bold(), summary.total);
    println!("{}       {}", "Passed:".green(), summary.passed);
    println!("{}       {}", "Failed:".red(), summary.failed);
    println!("{}    {:.1}%\n", "Pass Rate:".bold(), summary.pass_rate());

    if summary.failed > 0 {
        println!("{}", "Failed Tests:".red().bold());
        for result in results.iter().filter(|r| !r.passed) {
            println!("  • [{}] {}", result.id, result.name);
            println!("    {}", result.message.red());
        }
        println!();
    }
}

pub fn print_report_saved(path: &Path) {
    println!("{}\n", format!("Report saved to: {}", path.display()).green());
}

// === Fixture lines ===

pub fn fixtures_header() {
    println!("{}\n", "Setting up fixtures...".yellow().bold());
}

pub fn fixture_created(name: &str) {
    println!("  {}", format!("[OK] Fixture '{name}' created").green());
}

pub fn fixture_skipped(name: &str, method: &str) {
    println!(
        "  {}",
        format!("[SKIP] Fixture '{name}': Unsupported method {method}").yellow()
    );
}

pub fn fixture_failed(name: &str, status: u16) {
    println!("  {}", format!("[FAIL] Fixture '{name}': Status {status}").red());
}

pub fn fixture_error(name: &str, error: &Error) {
    println!("  {}", format!("[ERROR] Fixture '{name}': {error}").red());
}

pub fn cleanup_header() {
    println!("\n{}\n", "Cleaning up fixtures...".yellow().bold());
}

pub fn cleanup_done(path: &str) {
    println!("  {}", format!("[OK] Cleaned up: {path}").green());
}

pub fn cleanup_skipped(path: &str, method: &str) {
    println!(
        "  {}",
        format!("[SKIP] Cleanup {path}: Unsupported method {method}").yellow()
    );
}

pub fn cleanup_failed(path: &str, status: u16) {
    println!(
        "  {}",
        format!("[WARN] Cleanup failed: {path} (Status {status})").yellow()
    );
}

pub fn cleanup_error(path: &str, error: &Error) {
    println!("  {}", format!("[ERROR] Cleanup failed: {path} - {error}").red());
}

pub fn section_end() {
    println!();
}
