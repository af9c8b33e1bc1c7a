//! Postman Collection v2.1 export
//!
//! Converts test plans into collections that can be imported into Postman,
//! either one file per plan or a combined collection grouped by category.

mod aggregate;
mod collection;
mod convert;

pub use aggregate::{aggregate, Category};
pub use collection::*;
pub use convert::{convert, convert_requirement, convert_test_case, DEFAULT_COLLECTION_NAME};

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::{paths, Error, Result};
use crate::plan;

/// Load a plan file and convert it
pub fn convert_file(plan_path: &Path, generated: &str) -> Result<Collection> {
    let plan = plan::load(plan_path)?;
    Ok(convert(&plan, &plan_path.display().to_string(), generated))
}

/// Write a collection as pretty-printed JSON, creating the parent directory
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent).map_err(|e| Error::file_write(path, e))?;
    }
    let file = std::fs::File::create(path).map_err(|e| Error::file_write(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| Error::file_write(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote collection");
    Ok(())
}

/// All `*.json` plans below `tests_dir`, sorted by path
pub fn discover_plans(tests_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*.json",
        glob::Pattern::escape(&tests_dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| Error::Config(format!("Invalid tests directory '{}': {}", tests_dir.display(), e)))?;

    let mut plans = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            plans.push(path);
        }
    }
    plans.sort();
    Ok(plans)
}

/// Settings for a batch conversion
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub tests_dir: PathBuf,
    pub output_dir: PathBuf,
    pub combined_file: String,
    pub combined_name: String,
}

/// One collection written by a batch conversion
#[derive(Debug)]
pub struct WrittenCollection {
    pub plan_path: PathBuf,
    pub output_path: PathBuf,
    pub name: String,
    pub folders: usize,
    pub requests: usize,
}

/// Outcome of [`convert_all`]
#[derive(Debug)]
pub struct BatchReport {
    pub individual: Vec<WrittenCollection>,
    pub combined_path: PathBuf,
    pub categories: usize,
    pub folders: usize,
    pub requests: usize,
}

/// Convert every plan under `tests_dir` into its own collection, then write
/// one combined collection grouped by category
///
/// Any plan that fails to load aborts the batch.
pub fn convert_all(options: &BatchOptions, generated: &str) -> Result<BatchReport> {
    paths::ensure_dir(&options.output_dir)?;

    let plans = discover_plans(&options.tests_dir)?;
    let mut individual = Vec::with_capacity(plans.len());
    let mut grouped = Vec::with_capacity(plans.len());

    for plan_path in plans {
        let collection = convert_file(&plan_path, generated)?;
        let output_path = options
            .output_dir
            .join(paths::collection_file_name(&plan_path));
        write_json(&output_path, &collection)?;

        individual.push(WrittenCollection {
            output_path,
            name: collection.info.name.clone(),
            folders: collection.folder_count(),
            requests: collection.request_count(),
            plan_path: plan_path.clone(),
        });
        grouped.push((Category::for_plan(&plan_path), collection));
    }

    let combined = aggregate(grouped, &options.combined_name, generated);
    let combined_path = options.output_dir.join(&options.combined_file);
    write_json(&combined_path, &combined)?;

    Ok(BatchReport {
        individual,
        combined_path,
        categories: combined.item.len(),
        folders: combined.folder_count(),
        requests: combined.request_count(),
    })
}
