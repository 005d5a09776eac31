//! Upstox v2 REST provider.

mod params;
mod provider;
mod response;

pub use provider::UpstoxProvider;
