//! Nearby command handler
//!
//! Ranks every neighbourhood by distance from a location.

use crate::cli::{formatter, init_tracing};
use crate::config::Config;
use crate::error::Result;
use crate::format::{Operation, Report};
use crate::proximity::validate_radius;
use crate::service::{self, LocationQuery};
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Location: "lat,lng", an address, or "here" (after any options)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Search radius in kilometres (0 = no limit; default from config)
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    init_tracing("warn");

    let formatter = formatter(&args.format)?;
    let config = Config::load()?;
    let radius = validate_radius(args.radius.or(Some(config.proximity.default_radius_km)))?;
    let service = service::build(&config)?;

    let text = args.query.join(" ");
    let query = LocationQuery::parse(&text);
    let ranked = service.try_find_nearby(&query, radius).await?;

    let report = Report::new(Operation::Nearby, ranked)
        .with_query(text)
        .with_radius(radius);
    print!("{}", formatter.format(&report)?);
    Ok(())
}
