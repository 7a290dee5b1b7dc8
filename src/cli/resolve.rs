//! Resolve command handler
//!
//! Finds the neighbourhood containing a coordinate, address or the current
//! location.

use crate::cli::{formatter, init_tracing};
use crate::config::Config;
use crate::error::{Error, ResolveError, Result};
use crate::format::{Operation, Report};
use crate::service::{self, LocationQuery};
use clap::Args;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Location: "lat,lng", an address, or "here" (after any options)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    init_tracing("warn");

    let formatter = formatter(&args.format)?;
    let config = Config::load()?;
    let service = service::build(&config)?;

    let text = args.query.join(" ");
    let query = LocationQuery::parse(&text);

    let report = match service.try_resolve_neighbourhood(&query).await {
        Ok(resolved) => Report::new(Operation::Resolve, vec![resolved]),
        Err(e @ (ResolveError::OutOfTerritory { .. } | ResolveError::NoMatch { .. })) => {
            Report::new(Operation::Resolve, Vec::new()).with_reason(e.kind())
        }
        Err(e) => return Err(Error::Resolve(e)),
    };

    print!("{}", formatter.format(&report.with_query(text))?);
    Ok(())
}
