//! # stratum-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the stratum workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the layer-stack and mount-info value types
//! that the mount drivers and the CLI exchange.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
