//! CLI tool to score a walking route against the obstacle dataset.
//!
//! Trains the risk model from the dataset, then prints the mean predicted
//! risk over the route's points.

use anyhow::{bail, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use walkrisk_cli::{build_context, init_tracing, parse_point, read_route_file};
use walkrisk_core::{haversine_distance, LatLon, RouteScorer};

/// Score a walking route for accessibility-obstacle risk
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Obstacle dataset (CSV)
    #[arg(long, default_value = "data/Access_to_Everyday_Life_Dataset.csv")]
    data: PathBuf,

    /// Pipeline config (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route point as `lat,lon` in degrees; repeat in walking order
    #[arg(long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    points: Vec<LatLon>,

    /// JSON file holding `[[lat, lon], ...]` or `{"points": [...]}`
    #[arg(long, conflicts_with = "points")]
    route_file: Option<PathBuf>,

    /// Print per-point scores as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level pipeline logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let route = match &args.route_file {
        Some(path) => read_route_file(path)?
            .iter()
            .enumerate()
            .map(|(index, pair)| LatLon::from_pair(index, pair))
            .collect::<Result<Vec<_>, _>>()?,
        None => args.points.clone(),
    };
    if route.is_empty() && args.route_file.is_none() {
        bail!("no route given; pass --point lat,lon (repeatable) or --route-file");
    }

    let context = build_context(&args.data, args.config.as_ref())?;
    let scorer = RouteScorer::new(&context);
    tracing::info!("Scoring route of {} points", route.len());
    let severity = scorer.score(&route)?;

    if args.json {
        let per_point = route
            .iter()
            .map(|p| {
                let risk = scorer.score_point(*p)?;
                Ok::<_, anyhow::Error>(json!({ "lat": p.lat, "lon": p.lon, "risk": risk }))
            })
            .collect::<Result<Vec<_>>>()?;
        let length_m: f64 = route
            .windows(2)
            .map(|w| haversine_distance(w[0].lat, w[0].lon, w[1].lat, w[1].lon))
            .sum();
        let out = json!({ "severity": severity, "length_m": length_m, "points": per_point });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Route of {} points: severity {:.6}", route.len(), severity);
    }

    Ok(())
}
