//! Umbrella crate for the postcode-rs workspace.
//!
//! Everything lives in [`postcode_core`]; this crate re-exports it and hosts
//! the demos under `demos/`.

pub use postcode_core::*;
