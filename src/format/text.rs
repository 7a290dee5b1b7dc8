//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{Operation, OutputFormatter, Report};
use crate::proximity::{Confidence, ResolvedNeighbourhood};

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

fn describe(n: &ResolvedNeighbourhood) -> String {
    let entry = &n.entry;
    let mut line = entry.name.clone();
    if entry.local_name != entry.name {
        line.push_str(&format!(" / {}", entry.local_name));
    }
    line.push_str(&format!(" [{}, {}]", entry.region, entry.kind));
    line
}

fn distance(n: &ResolvedNeighbourhood) -> String {
    match (n.distance_km, n.confidence) {
        (Some(d), Confidence::Exact) => format!("{:.2} km", d),
        (Some(d), Confidence::Estimated) => format!("~{:.0} km (estimated)", d),
        (None, _) => String::new(),
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        // Header
        let query = report.query.as_deref().unwrap_or("all regions");
        match report.operation {
            Operation::Resolve => output.push_str(&format!("Neighbourhood for {}\n", query)),
            Operation::Nearby => {
                output.push_str(&format!("Neighbourhoods near {}", query));
                if let Some(radius) = report.radius_km.filter(|r| *r > 0.0) {
                    output.push_str(&format!(" (within {} km)", radius));
                }
                output.push('\n');
            }
            Operation::Browse => output.push_str(&format!("Neighbourhoods in {}\n", query)),
        }

        if report.results.is_empty() {
            output.push_str("  (none)");
            if let Some(reason) = &report.reason {
                output.push_str(&format!(": {}", reason));
            }
            output.push('\n');
            return Ok(output);
        }

        for (i, n) in report.results.iter().enumerate() {
            match report.operation {
                Operation::Resolve => {
                    output.push_str(&format!("  {}\n", describe(n)));
                    output.push_str(&format!("  Suburbs: {}\n", n.entry.suburbs.join(", ")));
                }
                Operation::Nearby => output.push_str(&format!(
                    "  {:>2}. {:<48} {}\n",
                    i + 1,
                    describe(n),
                    distance(n)
                )),
                Operation::Browse => output.push_str(&format!("  {}\n", describe(n))),
            }
        }

        Ok(output)
    }
}
