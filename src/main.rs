//! `lm-workbook` command-line entry point.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, CorrelateArgs, DemoArgs, DiagnosticsArgs, ModelArgs, PredictArgs};
use lm_workbook::data::{grouped_linear, simple_linear, GroupedDataConfig, LinearDataConfig};
use lm_workbook::inference::pearson;
use lm_workbook::prelude::*;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lm_workbook=info".into()),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fit(args) => handle_fit(&args),
        Command::Predict(args) => handle_predict(&args),
        Command::Diagnostics(args) => handle_diagnostics(&args),
        Command::Correlate(args) => handle_correlate(&args),
        Command::Demo(args) => handle_demo(&args),
    }
}

fn csv_options(args: &ModelArgs) -> CsvOptions {
    args.factors
        .iter()
        .fold(CsvOptions::default(), |options, name| options.categorical(name))
}

fn load(path: &Path, options: &CsvOptions) -> Result<Dataset> {
    Dataset::from_csv_path(path, options)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn model_spec(args: &ModelArgs) -> Result<ModelSpec> {
    let spec: ModelSpec = args
        .formula
        .parse()
        .with_context(|| format!("invalid formula '{}'", args.formula))?;
    Ok(args
        .references
        .iter()
        .fold(spec, |spec, (variable, level)| spec.reference(variable, level)))
}

fn fit_model(args: &ModelArgs) -> Result<FittedOls> {
    let data = load(&args.data, &csv_options(args))?;
    let spec = model_spec(args)?;

    let fitted = OlsRegressor::builder()
        .confidence_level(args.level)
        .na_action(args.na_action.into())
        .build()
        .fit(&data, &spec)
        .with_context(|| format!("failed to fit '{spec}'"))?;

    let result = fitted.result();
    info!(
        formula = %spec,
        n = result.n_observations,
        p = result.n_parameters,
        r_squared = result.r_squared,
        "model fitted"
    );
    Ok(fitted)
}

fn handle_fit(args: &ModelArgs) -> Result<()> {
    let fitted = fit_model(args)?;

    println!("{}", ModelSummary::new(&fitted));
    println!("{}", ConfintTable::new(&fitted, args.level)?);
    Ok(())
}

fn handle_predict(args: &PredictArgs) -> Result<()> {
    let fitted = fit_model(&args.model)?;
    let new_data = load(&args.new, &csv_options(&args.model))?;

    let prediction = fitted
        .predict_with_interval(&new_data, args.interval.into(), args.model.level)
        .context("prediction failed")?;

    println!("{}", PredictionTable::new(&prediction));
    Ok(())
}

fn handle_diagnostics(args: &DiagnosticsArgs) -> Result<()> {
    let fitted = fit_model(&args.model)?;
    print_diagnostics(&fitted, args.top);

    if let Some(dir) = &args.out_dir {
        write_plots(&fitted, dir)?;
    }
    Ok(())
}

fn handle_correlate(args: &CorrelateArgs) -> Result<()> {
    let data = load(&args.data, &CsvOptions::default())?;
    let x = data.numeric(&args.x)?;
    let y = data.numeric(&args.y)?;

    let test = pearson(x, y, args.level)
        .with_context(|| format!("cannot correlate '{}' and '{}'", args.x, args.y))?;
    println!("data:  {} and {}", args.x, args.y);
    println!("{test}");
    Ok(())
}

fn print_diagnostics(fitted: &FittedOls, top: usize) {
    let diagnostics = fitted.diagnostics();

    let mut by_influence: Vec<ObservationDiagnostics> = diagnostics.iter().collect();
    by_influence.sort_by(|a, b| b.cooks_distance.total_cmp(&a.cooks_distance));

    println!("Most influential observations (Cook's distance):");
    println!(
        "{:>5} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "row", "fitted", "residual", "std.res", "stud.res", "hat", "cook"
    );
    for obs in by_influence.iter().take(top) {
        println!(
            "{:>5} {:>10.4} {:>10.4} {:>8.3} {:>8.3} {:>8.4} {:>8.4}",
            obs.row + 1,
            obs.fitted,
            obs.residual,
            obs.standardized_residual,
            obs.studentized_residual,
            obs.leverage,
            obs.cooks_distance
        );
    }

    let rows = |indices: Vec<usize>| -> Vec<usize> {
        indices
            .into_iter()
            .filter_map(|i| diagnostics.get(i).map(|obs| obs.row + 1))
            .collect()
    };
    println!();
    println!("High leverage (h > 2p/n): {:?}", rows(diagnostics.high_leverage()));
    println!("Influential (D > 4/n):    {:?}", rows(diagnostics.influential()));
    println!("Outliers (|t| > 3):       {:?}", rows(diagnostics.outliers(3.0)));

    let vif = diagnostics.vif();
    if vif.len() > 1 {
        println!();
        println!("Variance inflation factors:");
        for (term, value) in vif {
            println!("  {term:<20} {value:.3}");
        }
    }
}

fn write_plots(fitted: &FittedOls, dir: &Path) -> Result<()> {
    let written = DiagnosticPlots::from_fit(fitted)
        .write_csv(dir)
        .with_context(|| format!("failed to write plot series to {}", dir.display()))?;
    for path in written {
        info!(path = %path.display(), "wrote plot series");
    }
    Ok(())
}

fn section(title: &str) {
    println!();
    println!("==> {title}");
    println!();
}

fn handle_demo(args: &DemoArgs) -> Result<()> {
    // 1. Simple regression
    let linear = simple_linear(&LinearDataConfig {
        noise_sd: args.noise,
        seed: args.seed,
        ..LinearDataConfig::default()
    })?;
    let spec: ModelSpec = "y ~ x".parse()?;
    let simple = OlsRegressor::default().fit(&linear, &spec)?;

    section("Simple regression: y ~ x");
    println!("{}", ModelSummary::new(&simple));

    // 2. Coefficient intervals at a non-default level
    section("97% confidence intervals");
    println!("{}", ConfintTable::new(&simple, 0.97)?);

    // 3. Intervals at the mean of x
    let x_mean = linear.numeric_mean("x")?;
    let y_mean = linear.numeric_mean("y")?;
    let at_mean = Dataset::new().with_numeric("x", vec![x_mean])?;

    section(&format!("Prediction at mean(x) = {x_mean:.4}"));
    for interval in [IntervalType::Confidence, IntervalType::Prediction] {
        let prediction = simple.predict_with_interval(&at_mean, Some(interval), 0.95)?;
        println!("{interval} interval:");
        println!("{}", PredictionTable::new(&prediction));
    }
    println!("mean(y) = {y_mean:.6}");

    // 4. Categorical predictor
    let grouped = grouped_linear(&GroupedDataConfig {
        noise_sd: args.noise,
        seed: args.seed,
        ..GroupedDataConfig::default()
    })?;
    let spec: ModelSpec = "y ~ x + group".parse()?;
    let by_group = OlsRegressor::default().fit(&grouped, &spec)?;

    section("Categorical predictor: y ~ x + group");
    println!("{}", ModelSummary::new(&by_group));

    let releveled = OlsRegressor::default().fit(&grouped, &spec.clone().reference("group", "high"))?;
    section("Same model with reference level 'high'");
    println!("{}", ConfintTable::new(&releveled, 0.95)?);

    // 5. Unseen level
    section("Prediction for an unseen group");
    let unseen = Dataset::new()
        .with_numeric("x", vec![5.0])?
        .with_categorical("group", ["extreme"])?;
    match by_group.predict(&unseen) {
        Ok(values) => println!("unexpected prediction: {:?}", values.iter().collect::<Vec<_>>()),
        Err(err) => println!("rejected: {err}"),
    }

    // 6. Diagnostics
    section("Diagnostics for y ~ x + group");
    print_diagnostics(&by_group, 5);

    if let Some(dir) = &args.out_dir {
        write_plots(&simple, &dir.join("simple"))?;
        write_plots(&by_group, &dir.join("grouped"))?;
    }
    Ok(())
}
