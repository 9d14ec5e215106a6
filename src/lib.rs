// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;

pub mod analysis;
pub mod csv;
pub mod data;
pub mod extract;
pub mod file;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod snapshot;
pub mod store;

pub mod gui;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, ErrorKind, Result};
