//! Umbrella crate for the `ziptools` workspace.
//!
//! Re-exports [`ziptools_core`] so the demos under `demos/` can be run with
//! `cargo run --example basic_usage` from the repository root.

pub use ziptools_core::*;
