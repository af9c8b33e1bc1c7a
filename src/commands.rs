//! CLI command definitions
//!
//! Defines the clap commands for the testplan CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a test plan into a Postman Collection v2.1 file
    Convert {
        /// Path to the JSON test plan
        plan: PathBuf,

        /// Output file (default: postman_collections/postman_<plan stem>.json)
        output: Option<PathBuf>,
    },

    /// Convert every plan under the tests directory and build a combined collection
    ConvertAll {
        /// Directory scanned for **/*.json plans (default: tests)
        #[arg(long)]
        tests_dir: Option<PathBuf>,

        /// Directory receiving the collections (default: postman_collections)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Execute a test plan against its base URL and write a JSON report
    Run {
        /// Path to the JSON test plan
        /// (default: testsprite_tests/testsprite_backend_test_plan.json)
        plan: Option<PathBuf>,

        /// Report file (default: test_report.json)
        #[arg(long, short)]
        report: Option<PathBuf>,
    },
}
