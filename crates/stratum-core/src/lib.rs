//! # stratum-core
//!
//! Mount mechanics for layered build directories.
//!
//! This crate provides:
//! - **Probing**: detection of kernel overlay support and optional overlay parameters.
//! - **Drivers**: an overlay driver issuing `mount(2)`, a copy-based fallback,
//!   and [`driver::MountDriver`] choosing between them.
//! - **Introspection**: recovering the layer stack of an existing mount from
//!   mount-table text, locally, on a remote host, or across all build mounts.
//!
//! Mount-table parsing is a pure function over one line and can be exercised
//! without any OS interaction.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod driver;
pub mod error;
pub mod fallback;
pub mod mountinfo;
pub mod options;
pub mod overlay;
pub mod probe;
pub mod syscall;
