//! Batch conversion processing.
//!
//! The processor walks a directory tree, feeds every candidate through a
//! [`Converter`](crate::converter::Converter), verifies the output, removes
//! sources of verified conversions, and accumulates a [`RunReport`].
//!
//! Processing is strictly sequential: one file is fully transcoded,
//! verified, and cleaned up before the next begins. Per-file failures never
//! stop the walk.

mod batch;
mod config;
mod types;

pub use batch::{BatchProcessor, ProcessorError};
pub use config::ProcessorConfig;
pub use types::{FileFailure, RunEvent, RunReport, TARGET_EXTENSION};
