//! neighbourly: Geo-Resolution & Neighbourhood Proximity Engine
//!
//! A library and CLI tool that turns raw location input (coordinates, free
//! text or the current location) into neighbourhoods from a declarative
//! region -> neighbourhood -> suburb taxonomy.
//!
//! ## Features
//!
//! - Forward/reverse geocoding behind a provider trait (Nominatim, in-memory)
//! - Address parsing that copes with folded suburb/city components
//! - Bidirectional suburb matching against the taxonomy
//! - Distance ranking with bounded concurrent centroid lookups
//! - TTL/LRU resolution cache
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neighbourly::service::{self, LocationQuery};
//! use neighbourly::Config;
//!
//! # async fn demo() -> neighbourly::Result<()> {
//! let service = service::build(&Config::default())?;
//!
//! // Which neighbourhood is this point in?
//! let here = LocationQuery::parse("-36.856,174.7445");
//! if let Some(hood) = service.resolve_neighbourhood(&here).await {
//!     println!("{}", hood.entry.name);
//! }
//!
//! // Everything within 5 km, nearest first
//! for hood in service.find_nearby(&here, Some(5.0)).await {
//!     println!("{} {:?}", hood.entry.name, hood.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod matcher;
pub mod proximity;
pub mod server;
pub mod service;
pub mod taxonomy;

// Re-export commonly used types
pub use address::ParsedAddress;
pub use config::Config;
pub use coord::Coordinate;
pub use error::{Error, GeoError, ResolveError, Result};
pub use proximity::{Confidence, ResolvedNeighbourhood};
pub use service::{GeoResolutionService, LocationQuery};
pub use taxonomy::{NeighbourhoodEntry, Taxonomy};
