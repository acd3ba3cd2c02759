//! Library side of the `loanstar` binary: configuration, logging, pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
