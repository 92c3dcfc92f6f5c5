// src/lib.rs — Library root for reqanalyzer

pub mod analysis;
pub mod app;
pub mod auth;
pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod session;
pub mod store;
