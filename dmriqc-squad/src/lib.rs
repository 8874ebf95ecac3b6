//! dmriqc-squad library interface
//!
//! Group-level diffusion MRI QC: collects per-subject QC folders, runs the
//! external group aggregator over them, and classifies every subject's
//! metrics into pass / warn / fail tiers relative to the group.

pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod services;
pub mod types;

pub use crate::error::{PipelineError, PipelineResult};
pub use crate::pipeline::{run, PipelineConfig, PipelineSummary};
