//! Build script for simpleweb-server.
//!
//! Bakes the compiler version into the binary (`SIMPLEWEB_RUSTC_VERSION`) for
//! the `/info` report. Leaves it unset if `rustc --version` cannot be run.

use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_owned());
    if let Ok(out) = Command::new(rustc).arg("--version").output() {
        if out.status.success() {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_owned();
            println!("cargo:rustc-env=SIMPLEWEB_RUSTC_VERSION={version}");
        }
    }
    println!("cargo:rerun-if-env-changed=RUSTC");
}
