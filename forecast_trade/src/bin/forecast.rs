use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use forecast_trade::data::{BarSource, CsvBarSource, SyntheticBarSource};
use forecast_trade::metrics::holdout_backtest;
use forecast_trade::{ForecastConfig, HybridForecaster};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

const SYNTHETIC_HISTORY_DAYS: usize = 250;

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    csv: Option<PathBuf>,
    days: Option<usize>,
    seed: Option<u64>,
    holdout: Option<usize>,
}

fn print_usage() {
    println!("usage: forecast [--config FILE] [--csv FILE] [--days N] [--seed N] [--holdout N]");
    println!();
    println!("  --config FILE   TOML file with [forecast], [model] and [logging] tables");
    println!("  --csv FILE      daily bars (Date,Open,High,Low,Close,Adj Close,Volume)");
    println!("  --days N        trading days to forecast");
    println!("  --seed N        seed of the forecast random stream");
    println!("  --holdout N     also score a forecast of the last N bars");
}

fn parse_number<T>(flag: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid {} '{}'", flag, value))
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        if matches!(flag.as_str(), "help" | "--help" | "-h") {
            return Ok(None);
        }
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("`{}` requires a value", flag))?;
        match flag.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--csv" => parsed.csv = Some(PathBuf::from(value)),
            "--days" => parsed.days = Some(parse_number(flag, value)?),
            "--seed" => parsed.seed = Some(parse_number(flag, value)?),
            "--holdout" => parsed.holdout = Some(parse_number(flag, value)?),
            other => bail!("unknown argument '{}'", other),
        }
    }

    Ok(Some(parsed))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cli) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => ForecastConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(csv) = cli.csv {
        config.forecast.csv_path = Some(csv);
    }
    if let Some(days) = cli.days {
        config.forecast.days = days;
    }
    if let Some(seed) = cli.seed {
        config.forecast.seed = seed;
    }
    if cli.holdout.is_some() {
        config.forecast.holdout = cli.holdout;
    }
    config.validate().context("invalid configuration")?;

    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let source: Box<dyn BarSource> = match &config.forecast.csv_path {
        Some(path) => Box::new(CsvBarSource::new(path)),
        None => {
            let today: NaiveDate = Local::now().date_naive();
            Box::new(
                SyntheticBarSource::new(today, SYNTHETIC_HISTORY_DAYS)
                    .with_seed(config.forecast.seed),
            )
        }
    };

    tracing::info!(
        source = source.name(),
        days = config.forecast.days,
        seed = config.forecast.seed,
        n_estimators = config.model.n_estimators,
        lasso_penalty = config.model.lasso_penalty,
        "Starting forecast"
    );

    let series = source
        .load()
        .with_context(|| format!("failed to load bars from {}", source.name()))?;
    let forecaster =
        HybridForecaster::new(config.model.clone()).context("invalid model parameters")?;

    if let Some(fit) = forecaster.fit(&series)? {
        for feature in fit.active_features(config.model.feature_importance_threshold) {
            tracing::info!(
                feature = %feature.name,
                coefficient = feature.coefficient,
                "Active feature"
            );
        }
    }

    let mut rng = StdRng::seed_from_u64(config.forecast.seed);
    let predictions = forecaster.generate_predictions(&series, config.forecast.days, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&predictions)?);

    if let Some(holdout) = config.forecast.holdout {
        let mut rng = StdRng::seed_from_u64(config.forecast.seed);
        let metrics = holdout_backtest(&forecaster, &series, holdout, &mut rng)?;
        eprint!("{}", metrics);
    }

    Ok(())
}
