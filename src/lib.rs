//! testplan - JSON API test plans as Postman collections and local runs
//!
//! A test plan lists requirements, each with HTTP test cases and their
//! expectations. This library converts plans into Postman Collection v2.1
//! documents and executes them sequentially against a server.

pub mod cli;
pub mod commands;
pub mod common;
pub mod plan;
pub mod postman;
pub mod runner;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use plan::TestPlan;
