// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod specs;

pub mod choropleth;
pub mod collect;
pub mod csv;
pub mod emendas;
pub mod error;
pub mod file;
pub mod filter;
pub mod gui;
pub mod progress;
pub mod store;

pub use error::{Error, Result};
