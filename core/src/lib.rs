//! Synthetic Refugee Status Determination dataset generator.
//!
//! Produces a reproducible table of applicants run through an automated
//! scoring and decision pipeline with intentionally engineered biases,
//! for fairness-analysis coursework. Not a decision system.

pub mod audit;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod export;
pub mod rng;
pub mod sampler;
pub mod scoring;
pub mod store;
pub mod summary;
pub mod table;
pub mod types;

pub use config::{ModelConfig, RunConfig};
pub use engine::{generate, DatasetEngine};
pub use error::{GenError, GenResult};
pub use table::{ApplicantRecord, DatasetTable, COLUMNS};
