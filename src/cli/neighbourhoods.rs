//! Neighbourhoods command handler
//!
//! Lists the taxonomy, optionally for one region.

use crate::cli::{formatter, init_tracing};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{Operation, Report};
use crate::service;
use clap::Args;

/// Neighbourhoods command arguments
#[derive(Args)]
pub struct NeighbourhoodsArgs {
    /// Region key or name (e.g., "auckland", "Te Whanganui-a-Tara")
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// List region keys only
    #[arg(long)]
    pub regions: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the neighbourhoods command
pub fn run(args: NeighbourhoodsArgs) -> Result<()> {
    init_tracing("warn");

    let formatter = formatter(&args.format)?;
    let config = Config::load()?;
    let service = service::build(&config)?;

    if args.regions {
        for region in service.taxonomy().regions() {
            if region.local_name == region.name {
                println!("{:<14} {}", region.key, region.name);
            } else {
                println!("{:<14} {} / {}", region.key, region.name, region.local_name);
            }
        }
        return Ok(());
    }

    let listing = service.browse_region(args.region.as_deref());
    if listing.is_empty() {
        if let Some(region) = &args.region {
            let keys: Vec<&str> = service.taxonomy().region_keys().collect();
            return Err(Error::Config(format!(
                "Unknown region: {} (available: {})",
                region,
                keys.join(", ")
            )));
        }
    }

    let mut report = Report::new(Operation::Browse, listing);
    if let Some(region) = args.region {
        report = report.with_query(region);
    }
    print!("{}", formatter.format(&report)?);
    Ok(())
}
