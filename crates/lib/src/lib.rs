//! strata-lib: host access and schema federation for the strata build engine
//!
//! This crate provides:
//! - `schema`: merging schema units into one schema and resolver registry
//! - `host`: confined, switchable access to host paths, materialized as
//!   content-addressed build-graph nodes
//! - `export`: exporting build results to the host while mirroring status
//! - `progress`: grouping graph vertices for observability

pub mod config;
pub mod consts;
pub mod export;
pub mod graph;
pub mod host;
pub mod pipeline;
pub mod platform;
pub mod progress;
pub mod schema;
pub mod telemetry;
pub mod util;
