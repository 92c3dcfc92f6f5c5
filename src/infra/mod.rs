// src/infra/mod.rs — Infrastructure: config, paths, errors, logging

pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
