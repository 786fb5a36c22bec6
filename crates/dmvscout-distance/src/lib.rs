pub mod client;
pub mod error;
pub mod types;

pub use client::{enrich_offices, DistanceClient, MAX_DESTINATIONS_PER_REQUEST};
pub use error::DistanceError;
