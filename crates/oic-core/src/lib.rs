pub mod config;
pub mod error;
pub mod export;
pub mod parse;
pub mod transform;

/// Value written to `__export_source`: the generating tool's name and version.
pub const EXPORT_SOURCE: &str = concat!("oic:", env!("CARGO_PKG_VERSION"));
