//! CLI tool to train the risk model and report how it does on held-out rows.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use walkrisk_cli::{build_context, init_tracing};

/// Train the risk model and print held-out evaluation metrics
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Obstacle dataset (CSV)
    #[arg(long, default_value = "data/Access_to_Everyday_Life_Dataset.csv")]
    data: PathBuf,

    /// Pipeline config (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the model summary as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level pipeline logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::info!("Evaluating model trained on {}", args.data.display());
    let context = build_context(&args.data, args.config.as_ref())?;
    let summary = context.summary();
    if summary.evaluation.is_none() {
        tracing::warn!("No held-out rows; metrics unavailable");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Obstacles:             {}", summary.obstacles);
    println!("Dropped (no severity): {}", summary.dropped_without_severity);
    println!("Feature radii (m):     {:?}", summary.feature_radii_m);
    println!("Trees:                 {}", summary.n_trees);
    println!("Baseline risk:         {:.6}", summary.baseline_risk);
    match summary.evaluation {
        Some(eval) => {
            println!("Train / test rows:     {} / {}", eval.train_rows, eval.test_rows);
            println!("Test MSE:              {:.6}", eval.mse);
            println!("Test MAE:              {:.6}", eval.mae);
            println!("Test R2:               {:.4}", eval.r2);
        }
        None => println!("Dataset too small for a held-out split"),
    }

    Ok(())
}
