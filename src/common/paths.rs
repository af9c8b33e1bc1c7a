//! Configuration and default file locations

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "testplan";

/// Test plan run when `testplan run` gets no path
pub const DEFAULT_PLAN: &str = "testsprite_tests/testsprite_backend_test_plan.json";

/// Report written by `testplan run`
pub const DEFAULT_REPORT: &str = "test_report.json";

/// Directory scanned by `testplan convert-all`
pub const DEFAULT_TESTS_DIR: &str = "tests";

/// Directory that receives generated Postman collections
pub const DEFAULT_COLLECTIONS_DIR: &str = "postman_collections";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/testplan/`
/// - macOS: `~/Library/Application Support/testplan/`
/// - Windows: `%APPDATA%\testplan\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Default output file for a single converted plan: `postman_<stem>.json`
pub fn collection_file_name(plan_path: &Path) -> String {
    let stem = plan_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("postman_{stem}.json")
}

/// Ensure a directory exists, creating parents as needed
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
