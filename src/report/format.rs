//! Terminal formatting for quotes, grids, plans, assessments and books.

use std::cmp::Ordering;

use crate::domain::RateQuote;
use crate::io::RowError;
use crate::math::InstallmentPlan;
use crate::pricing::{RateGrid, RateTable};
use crate::risk::{Assessment, BookFailure, BookSummary, COMMITMENT_LIMIT_PCT};

/// `23.56% a.a.` (two decimals, per-year suffix).
pub fn fmt_rate(rate: f64) -> String {
    format!("{rate:.2}% a.a.")
}

/// Two decimals with thousands separators: `-1,234,567.89`.
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let s = format!("{:.2}", v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && s != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_quote(q: &RateQuote) -> String {
    let mut out = String::new();
    out.push_str("=== credit - Rate Quote ===\n");
    out.push_str(&format!("Credit score : {}\n", fmt_num(q.credit_score)));
    out.push_str(&format!("Term         : {} months\n", fmt_num(q.term_months)));
    out.push_str(&format!("Base rate    : {:.2}%\n", q.base_rate));
    out.push_str(&format!("Term adj.    : {:+.2} pp\n", q.term_adjustment));
    out.push_str(&format!("Score adj.   : {:+.2} pp\n", q.score_adjustment));
    out.push_str(&format!("Final rate   : {}\n", fmt_rate(q.final_rate)));
    out
}

/// Rate matrix: one row per score, one column per term.
pub fn format_grid(grid: &RateGrid) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>8}", "score"));
    for t in &grid.terms {
        out.push_str(&format!(" {:>8}", format!("{}m", fmt_num(*t))));
    }
    out.push('\n');

    out.push_str(&format!("{:-<8}", ""));
    for _ in &grid.terms {
        out.push_str(&format!(" {:-<8}", ""));
    }
    out.push('\n');

    for (score, row) in grid.scores.iter().zip(&grid.rates) {
        out.push_str(&format!("{:>8}", fmt_num(*score)));
        for r in row {
            out.push_str(&format!(" {r:>8.2}"));
        }
        out.push('\n');
    }
    out
}

/// The bracket table itself (labels and adjustments).
pub fn format_table(table: &RateTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Base rate: {:.2}%\n", table.base_rate));

    out.push_str("Term brackets (months):\n");
    let term_adjs = table
        .term_brackets
        .iter()
        .map(|b| b.adjustment)
        .chain(std::iter::once(table.term_overflow));
    for (label, adj) in table.term_labels().iter().zip(term_adjs) {
        out.push_str(&format!("  {label:<8} {adj:+.2} pp\n"));
    }

    out.push_str("Score brackets:\n");
    let score_adjs = table
        .score_brackets
        .iter()
        .map(|b| b.adjustment)
        .chain(std::iter::once(table.score_floor));
    for (label, adj) in table.score_labels().iter().zip(score_adjs) {
        out.push_str(&format!("  {label:<8} {adj:+.2} pp\n"));
    }
    out
}

pub fn format_plan(plan: &InstallmentPlan, with_schedule: bool) -> String {
    let mut out = String::new();
    out.push_str("=== Loan Simulation ===\n");
    out.push_str(&format!("Amount        : {}\n", fmt_money(plan.principal)));
    out.push_str(&format!("Rate          : {}\n", fmt_rate(plan.annual_rate)));
    out.push_str(&format!("Monthly rate  : {:.4}%\n", plan.monthly_rate * 100.0));
    out.push_str(&format!("Installments  : {} x {}\n", plan.months, fmt_money(plan.installment)));
    out.push_str(&format!("Total paid    : {}\n", fmt_money(plan.total_paid)));
    out.push_str(&format!("Total interest: {}\n", fmt_money(plan.total_interest)));

    if !with_schedule {
        return out;
    }

    out.push('\n');
    out.push_str(&format!(
        "{:>5} {:<10} {:>14} {:>14} {:>14} {:>16}\n",
        "month", "due", "payment", "principal", "interest", "balance"
    ));
    out.push_str(&format!(
        "{:-<5} {:-<10} {:-<14} {:-<14} {:-<14} {:-<16}\n",
        "", "", "", "", "", ""
    ));
    for row in &plan.schedule {
        let due = row.due_date.map(|d| d.to_string()).unwrap_or_default();
        out.push_str(
            format!(
                "{:>5} {:<10} {:>14} {:>14} {:>14} {:>16}\n",
                row.month,
                due,
                fmt_money(row.payment),
                fmt_money(row.principal),
                fmt_money(row.interest),
                fmt_money(row.balance),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_assessment(a: &Assessment) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Credit Assessment: {} ===\n", a.application_id));
    out.push_str(&format!(
        "Rate: {} (score {}, {} months)\n",
        fmt_rate(a.quote.final_rate),
        fmt_num(a.quote.credit_score),
        fmt_num(a.quote.term_months)
    ));
    out.push_str(&format!(
        "Installment: {} | Total interest: {}\n",
        fmt_money(a.plan.installment),
        fmt_money(a.plan.total_interest)
    ));

    out.push_str("\nMetrics:\n");
    out.push_str(&format!("- DTI: {:.1}%\n", a.metrics.dti_pct));
    out.push_str(&format!("- Loan-to-income: {:.3}\n", a.metrics.loan_to_income));
    out.push_str(&format!("- Payment-to-income: {:.3}\n", a.metrics.payment_to_income));
    for note in a.metrics.notes(a.quote.final_rate) {
        let mark = if note.adverse { "!" } else { " " };
        out.push_str(&format!("  {mark} {}\n", note.message));
    }

    out.push_str(&format!("\nModel: {}\n", a.model));
    out.push_str(&format!("Prediction: {}\n", a.risk_level.display_name()));
    out.push_str(&format!("Default probability: {:.1}%\n", a.default_probability * 100.0));
    out.push_str(&format!("Confidence: {}\n", a.confidence.display_name()));

    if a.risk_factors.is_empty() {
        out.push_str("\nNo significant risk factors identified.\n");
    } else {
        out.push_str("\nRisk factors:\n");
        for f in &a.risk_factors {
            out.push_str(&format!("- {f}\n"));
        }
    }

    out.push_str(&format!(
        "\nIncome commitment: {:.1}% of monthly income\n",
        a.income_commitment_pct
    ));
    if a.commitment_exceeded() {
        out.push_str(&format!(
            "WARNING: income commitment above the recommended {COMMITMENT_LIMIT_PCT:.0}%\n"
        ));
    }
    out.push_str(&format!("\nRecommendation: {}\n", a.recommendation.display_name()));
    out
}

pub fn format_book_summary(summary: &BookSummary, model: &str) -> String {
    let mut out = String::new();
    out.push_str("=== credit - Book Summary ===\n");
    out.push_str(&format!("Model: {model}\n"));
    out.push_str(&format!(
        "Applications: n={} | high risk={} | low risk={}\n",
        summary.n, summary.high_risk, summary.low_risk
    ));
    out.push_str(&format!(
        "Rates: mean={} | range=[{:.2}, {:.2}]\n",
        fmt_rate(summary.mean_rate),
        summary.min_rate,
        summary.max_rate
    ));
    out.push_str(&format!(
        "Mean default probability: {:.1}%\n",
        summary.mean_probability * 100.0
    ));
    out.push_str(&format!(
        "Mean income commitment: {:.1}%\n",
        summary.mean_commitment_pct
    ));
    if let Some(rate) = summary.observed_default_rate {
        out.push_str(&format!("Observed default rate: {:.1}%\n", rate * 100.0));
    }
    if let Some(acc) = summary.accuracy {
        out.push_str(&format!("Classification accuracy: {:.1}%\n", acc * 100.0));
    }

    out.push_str("\nRecommendations:\n");
    for (rec, count) in &summary.by_recommendation {
        out.push_str(&format!("  {:<22} {count:>6}\n", rec.display_name()));
    }
    out
}

/// Top-N applications by default probability (ties broken by rate).
pub fn format_riskiest(assessments: &[Assessment], top_n: usize) -> String {
    let mut sorted: Vec<&Assessment> = assessments.iter().collect();
    sorted.sort_by(|a, b| {
        b.default_probability
            .partial_cmp(&a.default_probability)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.quote
                    .final_rate
                    .partial_cmp(&a.quote.final_rate)
                    .unwrap_or(Ordering::Equal)
            })
    });

    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:>7} {:>5} {:>8} {:>8} {:>9} {:<22}\n",
        "id", "score", "term", "rate", "p(def)", "commit%", "recommendation"
    ));
    out.push_str(&format!(
        "{:-<16} {:-<7} {:-<5} {:-<8} {:-<8} {:-<9} {:-<22}\n",
        "", "", "", "", "", "", ""
    ));
    for a in sorted.into_iter().take(top_n) {
        out.push_str(&format!(
            "{:<16} {:>7.0} {:>5} {:>8.2} {:>8.3} {:>9.1} {:<22}\n",
            truncate(&a.application_id, 16),
            a.quote.credit_score,
            fmt_num(a.quote.term_months),
            a.quote.final_rate,
            a.default_probability,
            a.income_commitment_pct,
            a.recommendation.display_name(),
        ));
    }
    out
}

pub fn format_failures(failures: &[BookFailure], row_errors: &[RowError]) -> String {
    let mut out = String::new();
    for e in row_errors {
        out.push_str(&format!(
            "  line {}{}: {}\n",
            e.line,
            e.id.as_deref().map(|id| format!(" ({id})")).unwrap_or_default(),
            e.message
        ));
    }
    for f in failures {
        out.push_str(&format!("  {}: {}\n", f.application_id, f.message));
    }
    if out.is_empty() {
        return out;
    }
    format!("Skipped {} record(s):\n{out}", failures.len() + row_errors.len())
}

/// Integers without decimals, everything else with up to two.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
