//! JSON test plans
//!
//! The input format shared by the Postman converter and the runner.

mod loader;
mod types;

pub use loader::load;
pub use types::*;
