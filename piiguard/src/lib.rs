// piiguard/src/lib.rs
//! # piiguard CLI and HTTP service
//!
//! This crate provides the process boundary for the `piiguard-core` engine:
//! command-line parsing, logging, configuration loading with environment
//! toggles, and the axum HTTP server.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod server;
pub mod settings;

pub use server::{router, AppState};
