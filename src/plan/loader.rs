//! Test plan loading

use std::io;
use std::path::Path;

use crate::common::{Error, Result};

use super::types::TestPlan;

/// Load and parse a test plan from a JSON file
///
/// The document is parsed whole or not at all. A missing file and
/// malformed JSON are reported as distinct errors.
pub fn load(path: &Path) -> Result<TestPlan> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::PlanNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => {
            return Err(Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            });
        }
    };

    let plan: TestPlan =
        serde_json::from_str(&content).map_err(|e| Error::plan_parse(path, &e))?;

    tracing::debug!(
        path = %path.display(),
        requirements = plan.requirements.len(),
        test_cases = plan.test_case_count(),
        "Loaded test plan"
    );

    Ok(plan)
}
