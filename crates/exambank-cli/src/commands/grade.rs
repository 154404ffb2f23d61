//! The `exambank grade-exams` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use exambank_core::batch::grade_directory;
use exambank_core::report::GradingReport;
use exambank_core::statistics::{distribution_shares, short_str};
use exambank_core::QuestionBank;

use super::Context;

pub fn execute(
    ctx: &Context,
    directory: PathBuf,
    display_questions: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    let (bank, _) = ctx.require_bank()?;

    let report = grade_directory(&bank, &directory)?;

    for skipped in &report.skipped {
        eprintln!("Skipped {}: {}", skipped.file, skipped.reason);
    }

    if report.outcomes.is_empty() {
        println!("No exams graded.");
    } else {
        print_ranking(&report);
        if display_questions {
            print_questions(&bank, &report);
        }
        print_summary(&report);
    }

    if let Some(path) = json {
        report.save_json(&path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_ranking(report: &GradingReport) {
    let mut table = Table::new();
    table.set_header(vec!["User", "File", "Score", "Max", "%"]);

    for outcome in report.ranked() {
        table.add_row(vec![
            Cell::new(outcome.display_name()),
            Cell::new(&outcome.file),
            Cell::new(outcome.score),
            Cell::new(outcome.max_score),
            Cell::new(format!("{:.1}%", outcome.percentage())),
        ]);
    }

    println!("{table}");
}

fn print_questions(bank: &QuestionBank, report: &GradingReport) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Text", "Points", "Count", "%"]);

    for (question_id, distribution) in &report.question_scores {
        let text = bank
            .find_question(question_id)
            .map(|q| short_str(&q.text, 32))
            .unwrap_or_default();
        for (points, count, share) in distribution_shares(distribution) {
            table.add_row(vec![
                Cell::new(question_id),
                Cell::new(&text),
                Cell::new(points),
                Cell::new(count),
                Cell::new(format!("{share:.1}%")),
            ]);
        }
    }

    println!("{table}");
}

fn print_summary(report: &GradingReport) {
    let Some(summary) = report.summary() else {
        return;
    };

    let mut table = Table::new();
    table.set_header(vec!["Participants", "Max", "Mean", "Median"]);
    table.add_row(vec![
        Cell::new(summary.participants),
        Cell::new(summary.max_score),
        Cell::new(format!("{:.2}", summary.mean)),
        Cell::new(format!("{:.2}", summary.median)),
    ]);

    println!("{table}");
}
