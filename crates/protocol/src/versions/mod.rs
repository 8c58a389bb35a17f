//! Per-build protocol adapters

pub mod b291;

pub use b291::B291;
