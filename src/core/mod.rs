// src/core/mod.rs — Chat cycle driving sessions and analysis

pub mod analyst;

pub use analyst::{Analyst, SubmitOutcome};
