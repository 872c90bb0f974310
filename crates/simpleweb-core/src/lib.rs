//! simpleweb core: transport-agnostic primitives shared by the server and its tests.
//!
//! This crate defines the error surface and the label vocabulary used by the
//! request metrics (status classes, route sentinel, method normalization). It
//! intentionally carries no runtime or HTTP dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `WebError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod labels;

/// Shared result type.
pub use error::{Result, WebError};
pub use labels::StatusClass;
