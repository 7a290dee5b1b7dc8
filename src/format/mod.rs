//! Output formatters
//!
//! Provides trait-based output formatting for resolution reports.

pub mod json;
pub mod text;

use crate::error::Result;
use crate::proximity::ResolvedNeighbourhood;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Which operation produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Resolve,
    Nearby,
    Browse,
}

/// Result of one operation, ready for output
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub operation: Operation,
    /// The query as given, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Active radius filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
    /// Why the result list is empty, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub results: Vec<ResolvedNeighbourhood>,
}

impl Report {
    pub fn new(operation: Operation, results: Vec<ResolvedNeighbourhood>) -> Self {
        Self {
            operation,
            query: None,
            radius_km: None,
            reason: None,
            results,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_radius(mut self, radius_km: Option<f64>) -> Self {
        self.radius_km = radius_km.filter(|r| *r > 0.0);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a report
    fn format(&self, report: &Report) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON report".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
    ]
}
