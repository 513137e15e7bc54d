//! Core library for the `locast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (geocoding, IP-based auto-location)
//! - Abstraction over forecast providers
//! - Display helpers (rounding, bearings, timestamps, icons)
//!
//! It is used by `locast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod geocode;
pub mod http;
pub mod icon;
pub mod locate;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod resolve;

pub use config::{Config, Endpoints, ProviderConfig};
pub use error::WeatherError;
pub use http::HttpClient;
pub use lookup::{Lookup, Report};
pub use model::{Coordinate, ForecastDocument, ForecastRequest, GeocodeResult, Section, Units};
pub use provider::{ForecastProvider, ProviderId};
pub use resolve::{LocationResolver, LocationStrategy, ResolvedLocation};
