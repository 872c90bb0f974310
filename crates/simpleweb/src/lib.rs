//! Top-level facade crate for simpleweb.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use simpleweb_core::*;
}

pub mod server {
    pub use simpleweb_server::*;
}
