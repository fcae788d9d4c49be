//! CSV ingest of loan applications.
//!
//! Turns a loan-application CSV into validated `LoanApplication`s.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no pricing or scoring here
//!
//! Required columns: `id, loan_amount, annual_income, term_months, credit_score`.
//! Every other `LoanApplication` field is optional and defaults to a clean history.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::LoanApplication;
use crate::error::AppError;
use crate::math::MAX_TERM_MONTHS;

const REQUIRED_COLUMNS: [&str; 5] = [
    "id",
    "loan_amount",
    "annual_income",
    "term_months",
    "credit_score",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct IngestedBook {
    pub applications: Vec<LoanApplication>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load and validate loan applications from a CSV file.
pub fn load_applications(path: &Path) -> Result<IngestedBook, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let book = read_applications(file)?;

    info!(
        path = %path.display(),
        rows = book.rows_read,
        used = book.applications.len(),
        "loaded applications"
    );
    Ok(book)
}

/// Parse applications from any reader (file, stdin, in-memory).
pub fn read_applications<R: std::io::Read>(source: R) -> Result<IngestedBook, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut applications = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(app) => applications.push(app),
            Err(message) => {
                let id = get_optional(&record, &header_map, "id").map(str::to_string);
                warn!(line, id = id.as_deref().unwrap_or(""), %message, "skipping row");
                row_errors.push(RowError { line, id, message });
            }
        }
    }

    if applications.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after validation."));
    }

    Ok(IngestedBook {
        applications,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<LoanApplication, String> {
    let id = get_required(record, header_map, "id")?.to_string();
    let loan_amount = parse_f64("loan_amount", get_required(record, header_map, "loan_amount")?)?;
    let annual_income = parse_f64("annual_income", get_required(record, header_map, "annual_income")?)?;
    let term_months = parse_u32("term_months", get_required(record, header_map, "term_months")?)?;
    let credit_score = parse_f64("credit_score", get_required(record, header_map, "credit_score")?)?;

    if term_months == 0 || term_months > MAX_TERM_MONTHS {
        return Err(format!(
            "term_months must be within 1..={MAX_TERM_MONTHS}, got {term_months}"
        ));
    }
    if loan_amount <= 0.0 {
        return Err(format!("loan_amount must be > 0, got {loan_amount}"));
    }
    if annual_income <= 0.0 {
        return Err(format!("annual_income must be > 0, got {annual_income}"));
    }

    let mut app = LoanApplication::new(id, loan_amount, annual_income, term_months, credit_score);

    let opt_f64 = |name: &str| -> Result<Option<f64>, String> {
        get_optional(record, header_map, name)
            .map(|s| parse_f64(name, s))
            .transpose()
    };
    let opt_bool = |name: &str| -> Result<Option<bool>, String> {
        get_optional(record, header_map, name)
            .map(|s| parse_bool(name, s))
            .transpose()
    };

    if let Some(v) = opt_f64("existing_debt")? {
        app.existing_debt = v;
    }
    if let Some(v) = opt_f64("avg_days_late")? {
        app.avg_days_late = v;
    }
    if let Some(v) = opt_f64("on_time_ratio")? {
        if !(0.0..=1.0).contains(&v) {
            return Err(format!("on_time_ratio must be within 0..=1, got {v}"));
        }
        app.on_time_ratio = v;
    }
    if let Some(v) = opt_f64("max_days_late")? {
        app.max_days_late = v;
    }
    if let Some(v) = opt_f64("account_age_years")? {
        app.account_age_years = v;
    }
    if let Some(v) = opt_f64("avg_balance")? {
        app.avg_balance = v;
    }
    if let Some(v) = opt_bool("uses_overdraft")? {
        app.uses_overdraft = v;
    }
    if let Some(s) = get_optional(record, header_map, "inquiries_6m") {
        app.inquiries_6m = parse_u32("inquiries_6m", s)?;
    }
    if let Some(v) = opt_bool("has_other_loans")? {
        app.has_other_loans = v;
    }
    app.defaulted = opt_bool("defaulted")?;

    Ok(app)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(name: &str, s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{s}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`: '{s}'"))
    }
}

fn parse_u32(name: &str, s: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Invalid non-negative integer for `{name}`: '{s}'"))
}

fn parse_bool(name: &str, s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "s" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(format!("Invalid boolean for `{name}`: '{s}'")),
    }
}

/// Parse a date in one of the accepted formats.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}
