use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use kdsearch::api::{render, render_json};
use kdsearch::{Config, QueryRunner};

/// Finds the K passages whose embeddings are closest to a query embedding.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file whose first element is the query
    query: PathBuf,
    /// JSON array of passages with `id`, `embedding` and optional `text`
    passages: PathBuf,
    /// Number of neighbors to return
    #[arg(allow_negative_numbers = true)]
    k: i64,
    /// Approximation factor; 0 searches exactly
    #[arg(allow_negative_numbers = true)]
    eps: f32,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Expected embedding dimension (defaults to the query's)
    #[arg(long)]
    dimension: Option<usize>,
    /// Answer with a brute-force scan instead of the KD-tree
    #[arg(long)]
    linear: bool,
    /// Omit the performance block
    #[arg(long)]
    no_timings: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref()).context("loading configuration")?;

    let Ok(k) = usize::try_from(cli.k) else {
        bail!("K must be positive, got {}", cli.k);
    };
    config.k = k;
    config.epsilon = cli.eps;
    if cli.dimension.is_some() {
        config.dimension = cli.dimension;
    }
    if cli.linear {
        config.use_linear_scan = true;
    }
    if cli.no_timings {
        config.report_performance = false;
    }
    config.validate().context("invalid search parameters")?;
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli)?;
    let show_performance = config.report_performance;
    let runner = QueryRunner::new(config)?;

    let report = runner.run(&cli.query, &cli.passages).with_context(|| {
        format!(
            "searching '{}' for neighbors of '{}'",
            cli.passages.display(),
            cli.query.display()
        )
    })?;

    if cli.json {
        println!("{}", render_json(&report, show_performance)?);
    } else {
        print!("{}", render(&report, show_performance));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
