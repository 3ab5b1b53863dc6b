//! docsync library.
//!
//! Summarizes the commits made since an AI agent guidance document was last
//! brought up to date, and records the checkpoint once it has been.

pub mod advance;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod report;

#[cfg(test)]
mod testing;

pub use error::Error;
