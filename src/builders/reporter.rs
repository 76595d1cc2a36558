use colored::Colorize;

use crate::builders::analyzer::Conflict;
use crate::builders::fixer::{FixReport, FixStatus};
use crate::builders::rules::{Action, Rule};
use crate::builders::store::ActionResult;

/// The `Reporter` trait defines how engine outcomes are presented to a user.
///
/// The engine itself only returns data; front ends pick a reporter to turn
/// that data into output.
pub trait Reporter {
    fn report_results(&self, results: &[ActionResult]);
    fn report_conflicts(&self, conflicts: &[Conflict]);
    fn report_fix(&self, report: &FixReport);
    fn report_rules(&self, rules: &[Rule]);
}

/// Prints reports to standard output with colored status markers.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_result(result: &ActionResult) -> String {
        if result.success {
            format!("{} {}", "✓".green().bold(), result.message)
        } else {
            format!("{} {}", "⚠️ ".yellow().bold(), result.message)
        }
    }

    fn format_conflict(conflict: &Conflict) -> String {
        format!(
            "{} Left: {}, Right: {}, Type: {}",
            "FOUND CONFLICT:".red().bold(),
            conflict.left.render().bright_yellow(),
            conflict.right.render().bright_yellow(),
            conflict.conflict_type
        )
    }

    /// One listing line: position, kind, action and the rendered pattern.
    ///
    /// Columns are padded before coloring; escape codes would otherwise count
    /// towards the width.
    fn format_rule(position: usize, rule: &Rule) -> String {
        let action = format!("{:<8}", rule.action.to_string());
        let action = match rule.action {
            Action::Include => action.cyan(),
            Action::Exclude => action.magenta(),
        };
        format!(
            "{:>4}  {:<10} {} {}",
            position,
            rule.kind.label(),
            action,
            rule.render().bold()
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report_results(&self, results: &[ActionResult]) {
        for result in results {
            println!("{}", Self::format_result(result));
        }
    }

    fn report_conflicts(&self, conflicts: &[Conflict]) {
        if conflicts.is_empty() {
            println!("{} No conflicts found", "✓".green().bold());
            return;
        }
        for conflict in conflicts {
            println!("{}", Self::format_conflict(conflict));
        }
    }

    fn report_fix(&self, report: &FixReport) {
        self.report_results(&report.results());
        if report.status == FixStatus::PartialFix {
            println!("\n{}", "Remaining conflicts:".yellow().bold());
            for conflict in &report.remaining {
                println!("  └─ {conflict}");
            }
        }
    }

    fn report_rules(&self, rules: &[Rule]) {
        if rules.is_empty() {
            println!("No rules configured.");
            return;
        }
        println!("{}", format!("{:>4}  {:<10} {:<8} PATTERN", "#", "KIND", "ACTION").bold());
        for (position, rule) in rules.iter().enumerate() {
            println!("{}", Self::format_rule(position, rule));
        }
        println!("\n📈 Total rules: {}", rules.len());
    }
}
