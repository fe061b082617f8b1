//! Real-estate calculations (mortgage quotes, price metrics, energy grades,
//! mobility scores) plus the listing surfaces that display them.

pub mod config;
pub mod engine;
pub mod error;
pub mod listings;
pub mod telemetry;
