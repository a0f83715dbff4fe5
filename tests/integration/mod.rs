//! Integration tests for SQL Sandbox.

pub mod client_test;
pub mod gateway_test;
pub mod mysql_test;
pub mod postgres_test;
