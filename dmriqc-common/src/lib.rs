//! # dMRI QC Common Library
//!
//! Shared code for the dMRI quality-control tools including:
//! - Common error type
//! - Bootstrap configuration (TOML) and config file resolution
//! - Logging settings

pub mod config;
pub mod error;

pub use error::{Error, Result};
