//! SQL Sandbox - a SQL learning sandbox.
//!
//! The query gateway exposes a small REST surface over one database
//! connection; the sandbox UI lets a learner run SQL against it and checks
//! a fixed set of test cases. This library exposes the core modules for use
//! by the binary and the integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod sandbox;
pub mod tui;
