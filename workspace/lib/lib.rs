//! Shared glue for the driver binaries: output formatting and persistence.

pub mod output;
