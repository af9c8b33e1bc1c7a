//! CLI command handling
//!
//! Dispatches CLI commands to the converter and the runner and formats
//! their output.

use colored::Colorize;
use std::path::Path;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{paths, timestamp_now, Result};
use crate::plan;
use crate::postman::{self, BatchOptions, BatchReport, Collection};
use crate::runner::{self, TestReport};

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<i32> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match command {
        Commands::Convert { plan, output } => {
            let output = output.unwrap_or_else(|| {
                config
                    .postman
                    .output_dir
                    .join(paths::collection_file_name(&plan))
            });

            let collection = postman::convert_file(&plan, &timestamp_now())?;
            postman::write_json(&output, &collection)?;
            print_collection_saved(&output, &collection);
            print_import_hint(&output);

            Ok(0)
        }

        Commands::ConvertAll {
            tests_dir,
            output_dir,
        } => {
            let options = BatchOptions {
                tests_dir: tests_dir.unwrap_or(config.postman.tests_dir),
                output_dir: output_dir.unwrap_or(config.postman.output_dir),
                combined_file: config.postman.combined_file,
                combined_name: config.postman.combined_name,
            };

            print_banner("Generating Postman Collections");
            let report = postman::convert_all(&options, &timestamp_now())?;
            print_batch_report(&options, &report);

            Ok(0)
        }

        Commands::Run { plan, report } => {
            let plan_path = plan.unwrap_or(config.runner.default_plan);
            let report_path = report.unwrap_or(config.runner.report_path);

            let test_plan = plan::load(&plan_path)?;
            let outcome = runner::run_plan(&test_plan, &plan_path).await?;
            let exit_code = outcome.summary.exit_code();

            let report = TestReport::new(&test_plan, timestamp_now(), outcome.summary, outcome.results);
            report.save(&report_path)?;
            runner::print_report_saved(&report_path);

            Ok(exit_code)
        }
    }
}

fn print_banner(title: &str) {
    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("  {}", title.bold());
    println!("{}", rule);
    println!();
}

fn print_collection_saved(output: &Path, collection: &Collection) {
    println!(
        "{} Postman collection saved to: {}",
        "[OK]".green(),
        output.display()
    );
    println!("Collection: {}", collection.info.name);
    println!("Folders: {}", collection.folder_count());
    println!("Total Requests: {}", collection.request_count());
}

fn print_import_hint(path: &Path) {
    println!("\nImport this file into Postman:");
    println!("   File -> Import -> Upload Files -> {}", path.display());
}

fn print_batch_report(options: &BatchOptions, report: &BatchReport) {
    println!("Generating individual collections...");
    if report.individual.is_empty() {
        println!(
            "  {} No test plans found under {}",
            "[WARN]".yellow(),
            options.tests_dir.display()
        );
    }
    for written in &report.individual {
        println!(
            "  {} {} \"{}\" ({} folders, {} requests) <- {}",
            "[OK]".green(),
            file_name(&written.output_path),
            written.name,
            written.folders,
            written.requests,
            written.plan_path.display()
        );
    }
    println!();

    println!("Generating combined collection...");
    println!("  {} {}", "[OK]".green(), file_name(&report.combined_path));
    println!();

    print_banner("Summary");
    println!("Individual Collections: {}", report.individual.len());
    for written in &report.individual {
        println!("  - {}", file_name(&written.output_path));
    }
    println!();
    println!("Combined Collection: {}", file_name(&report.combined_path));
    println!("  Categories: {}", report.categories);
    println!("  Folders: {}", report.folders);
    println!("  Total Requests: {}", report.requests);
    println!();
    println!(
        "All collections saved to: {}/",
        options.output_dir.display()
    );
    print_import_hint(&report.combined_path);
    println!();
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
