//! Command-line parsing for the `lm-workbook` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lm_workbook::core::{IntervalType, NaAction};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lm-workbook", version, about = "Linear regression workbook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model and print its summary and coefficient intervals.
    Fit(ModelArgs),
    /// Fit a model and predict at new covariate rows.
    Predict(PredictArgs),
    /// Fit a model and print per-observation diagnostics.
    Diagnostics(DiagnosticsArgs),
    /// Pearson correlation test between two numeric columns.
    Correlate(CorrelateArgs),
    /// Run the full exercise sequence on synthetic data.
    Demo(DemoArgs),
}

/// Options shared by every command that fits a model.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// CSV file with a header row.
    #[arg(short, long)]
    pub data: PathBuf,

    /// Model formula, e.g. "y ~ x + group".
    #[arg(short, long)]
    pub formula: String,

    /// Confidence level for coefficient intervals.
    #[arg(short, long, default_value_t = 0.95)]
    pub level: f64,

    /// Treat a column as categorical even if it is numeric (repeatable).
    #[arg(long = "factor")]
    pub factors: Vec<String>,

    /// Reference level of a categorical predictor, as VARIABLE=LEVEL (repeatable).
    #[arg(long = "reference", value_parser = parse_reference)]
    pub references: Vec<(String, String)>,

    /// Handling of rows with missing values.
    #[arg(long, value_enum, default_value_t = NaActionArg::Omit)]
    pub na_action: NaActionArg,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// CSV file with the new covariate rows.
    #[arg(long)]
    pub new: PathBuf,

    /// Interval to report around each prediction.
    #[arg(long, value_enum, default_value_t = IntervalArg::Prediction)]
    pub interval: IntervalArg,
}

#[derive(Debug, Args, Clone)]
pub struct DiagnosticsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Write the diagnostic plot series as CSV files into this directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Show the N most influential observations (by Cook's distance).
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CorrelateArgs {
    /// CSV file with a header row.
    #[arg(short, long)]
    pub data: PathBuf,

    #[arg(long)]
    pub x: String,

    #[arg(long)]
    pub y: String,

    /// Confidence level for the Fisher-z interval.
    #[arg(short, long, default_value_t = 0.95)]
    pub level: f64,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Seed for the synthetic datasets.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Noise standard deviation.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Write the diagnostic plot series as CSV files into this directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NaActionArg {
    Omit,
    Exclude,
    Fail,
}

impl From<NaActionArg> for NaAction {
    fn from(arg: NaActionArg) -> Self {
        match arg {
            NaActionArg::Omit => NaAction::Omit,
            NaActionArg::Exclude => NaAction::Exclude,
            NaActionArg::Fail => NaAction::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IntervalArg {
    None,
    Confidence,
    Prediction,
}

impl From<IntervalArg> for Option<IntervalType> {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::None => None,
            IntervalArg::Confidence => Some(IntervalType::Confidence),
            IntervalArg::Prediction => Some(IntervalType::Prediction),
        }
    }
}

fn parse_reference(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((variable, level)) if !variable.trim().is_empty() && !level.trim().is_empty() => {
            Ok((variable.trim().to_string(), level.trim().to_string()))
        }
        _ => Err(format!("expected VARIABLE=LEVEL, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            parse_reference("group = B"),
            Ok(("group".to_string(), "B".to_string()))
        );
        assert!(parse_reference("group").is_err());
        assert!(parse_reference("=B").is_err());
    }

    #[test]
    fn test_cli_parses_model_args() {
        let cli = Cli::parse_from([
            "lm-workbook",
            "fit",
            "--data",
            "data/exercise.csv",
            "--formula",
            "score ~ hours + section",
            "--reference",
            "section=B",
            "--na-action",
            "exclude",
        ]);
        match cli.command {
            Command::Fit(args) => {
                assert_eq!(args.references, vec![("section".to_string(), "B".to_string())]);
                assert_eq!(args.na_action, NaActionArg::Exclude);
                assert_eq!(args.level, 0.95);
            }
            other => panic!("expected fit, got {other:?}"),
        }
    }
    #[test]
    fn test_cli_parses_interval() {
        let parse = |interval: &str| {
            let cli = Cli::parse_from([
                "lm-workbook",
                "predict",
                "--data",
                "data/exercise.csv",
                "--formula",
                "score ~ hours",
                "--new",
                "new.csv",
                "--interval",
                interval,
            ]);
            match cli.command {
                Command::Predict(args) => Option::<IntervalType>::from(args.interval),
                other => panic!("expected predict, got {other:?}"),
            }
        };

        assert_eq!(parse("confidence"), Some(IntervalType::Confidence));
        assert_eq!(parse("prediction"), Some(IntervalType::Prediction));
        assert_eq!(parse("none"), None);
        assert!(Cli::try_parse_from(["lm-workbook", "predict", "--interval", "band"]).is_err());
    }
}
