//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - builds the rate engine and default model once
//! - runs the requested command and prints reports
//! - writes optional exports

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    AssessArgs, BookArgs, Command, GridArgs, ModelArgs, PricingArgs, QuoteArgs, ScheduleArgs,
    SimulateArgs, TableArgs,
};
use crate::data::SimulationConfig;
use crate::domain::{LoanApplication, ModelChoice, ModelConfig, PricingConfig};
use crate::error::AppError;
use crate::models::{DefaultModel, LogisticModel, RuleModel};
use crate::pricing::{OFFERED_TERMS, RateEngine, RateTable};

pub mod pipeline;

/// Entry point for the `credit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Quote(args) => handle_quote(args),
        Command::Grid(args) => handle_grid(args),
        Command::Table(args) => handle_table(args),
        Command::Schedule(args) => handle_schedule(args),
        Command::Assess(args) => handle_assess(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Book(args) => handle_book(args),
    }
}

/// Logs go to stderr so reports on stdout stay pipeable. `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_quote(args: QuoteArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;
    let quote = engine.quote(args.score, args.term)?;

    if args.json {
        println!("{}", to_json(&quote)?);
    } else {
        print!("{}", crate::report::format_quote(&quote));
    }
    Ok(())
}

fn handle_grid(args: GridArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;

    let terms: Vec<f64> = if args.terms.is_empty() {
        OFFERED_TERMS.iter().map(|&t| t as f64).collect()
    } else {
        args.terms.clone()
    };
    let grid = crate::pricing::rate_grid(&engine, &args.scores, &terms)?;

    if args.json {
        println!("{}", to_json(&grid)?);
    } else {
        print!("{}", crate::report::format_grid(&grid));
    }
    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;

    if let Some(path) = &args.write {
        crate::io::write_rate_table(path, engine.table())?;
        info!(path = %path.display(), "rate table written");
    }
    print!("{}", crate::report::format_table(engine.table()));
    Ok(())
}

fn handle_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;
    let rate = engine.rate(args.score, args.term as f64)?;
    let plan = crate::math::amortization_schedule(args.amount, rate, args.term, args.start)?;

    print!("{}", crate::report::format_plan(&plan, !args.summary_only));

    if let Some(path) = &args.export {
        crate::io::write_schedule_csv(path, &plan)?;
    }
    Ok(())
}

fn handle_assess(args: AssessArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;
    let model = build_model(&model_config_from_args(&args.model))?;

    let app = application_from_args(&args);
    let assessment = crate::risk::assess(&app, &engine, model.as_ref(), args.start)?;

    if args.json {
        println!("{}", to_json(&assessment)?);
    } else {
        print!("{}", crate::report::format_assessment(&assessment));
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;
    let model = build_model(&model_config_from_args(&args.model))?;

    let config = SimulationConfig {
        count: args.count,
        seed: args.seed,
    };
    let run = pipeline::run_simulation(&config, &engine, model.as_ref())?;

    print_run(&run, model.name(), args.top);

    if let Some(path) = &args.export {
        crate::io::write_applications_csv(path, &run.applications)?;
    }
    if let Some(path) = &args.export_book {
        crate::io::write_book_csv(path, &run.book.assessments)?;
    }
    Ok(())
}

fn handle_book(args: BookArgs) -> Result<(), AppError> {
    let engine = build_engine(&pricing_config_from_args(&args.pricing))?;
    let model = build_model(&model_config_from_args(&args.model))?;

    let run = pipeline::run_csv(&args.csv, &engine, model.as_ref())?;

    print_run(&run, model.name(), args.top);

    if let Some(path) = &args.export {
        crate::io::write_book_csv(path, &run.book.assessments)?;
    }
    Ok(())
}

fn print_run(run: &pipeline::RunOutput, model_name: &str, top: usize) {
    println!("{}", crate::report::format_book_summary(&run.summary, model_name));
    if top > 0 {
        println!("Riskiest applications:");
        println!("{}", crate::report::format_riskiest(&run.book.assessments, top));
    }
    let skipped = crate::report::format_failures(&run.book.failures, &run.row_errors);
    if !skipped.is_empty() {
        eprint!("{skipped}");
    }
}

pub fn pricing_config_from_args(args: &PricingArgs) -> PricingConfig {
    PricingConfig {
        input_mode: args.mode,
        rate_table: args.rate_table.clone(),
    }
}

pub fn model_config_from_args(args: &ModelArgs) -> ModelConfig {
    // A model file only makes sense for the logistic model.
    let choice = if args.model.is_some() {
        ModelChoice::Logistic
    } else {
        args.model_kind
    };
    ModelConfig {
        choice,
        path: args.model.clone(),
    }
}

/// Build the shared rate engine (built-in or JSON table).
pub fn build_engine(config: &PricingConfig) -> Result<RateEngine, AppError> {
    let table = match &config.rate_table {
        Some(path) => {
            debug!(path = %path.display(), "loading rate table");
            crate::io::read_rate_table(path)?
        }
        None => RateTable::default(),
    };
    Ok(RateEngine::new(table, config.input_mode)?)
}

/// Build the default model once; callers share it by reference.
pub fn build_model(config: &ModelConfig) -> Result<Box<dyn DefaultModel>, AppError> {
    match (config.choice, &config.path) {
        (ModelChoice::Rules, _) => Ok(Box::new(RuleModel)),
        (ModelChoice::Logistic, Some(path)) => {
            debug!(path = %path.display(), "loading logistic model");
            let file = crate::io::read_model_file(path)?;
            Ok(Box::new(LogisticModel::from_file(&file)?))
        }
        (ModelChoice::Logistic, None) => Err(AppError::new(
            2,
            "The logistic model needs coefficients: pass --model <JSON> or set CREDIT_MODEL.",
        )),
    }
}

fn application_from_args(args: &AssessArgs) -> LoanApplication {
    let mut app = LoanApplication::new(
        args.id.clone(),
        args.amount,
        args.income,
        args.term,
        args.score,
    );
    app.existing_debt = args.debt;
    app.avg_days_late = args.days_late;
    app.on_time_ratio = args.on_time;
    app.max_days_late = args.max_days_late;
    app.account_age_years = args.account_age;
    app.avg_balance = args.balance;
    app.uses_overdraft = args.overdraft;
    app.inquiries_6m = args.inquiries;
    app.has_other_loans = args.other_loans;
    app
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputMode;

    #[test]
    fn model_file_implies_logistic() {
        let args = ModelArgs {
            model_kind: ModelChoice::Rules,
            model: Some("m.json".into()),
        };
        assert_eq!(model_config_from_args(&args).choice, ModelChoice::Logistic);
    }

    #[test]
    fn logistic_without_file_is_an_input_error() {
        let config = ModelConfig {
            choice: ModelChoice::Logistic,
            path: None,
        };
        let err = build_model(&config).err().unwrap();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(build_model(&ModelConfig { choice: ModelChoice::Rules, path: None }).unwrap().name(), "rules");
    }

    #[test]
    fn engine_uses_configured_table_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let mut table = RateTable::default();
        table.base_rate = 10.0;
        crate::io::write_rate_table(&path, &table).unwrap();

        let engine = build_engine(&PricingConfig {
            input_mode: InputMode::Clamp,
            rate_table: Some(path),
        })
        .unwrap();
        assert_eq!(engine.mode(), InputMode::Clamp);
        assert!((engine.rate(700.0, 24.0).unwrap() - 10.0).abs() < 1e-12);
    }
}
