use clap::Parser;
use colored::Colorize;
use glob::glob;
use sift_common::test_case::TestCase;
use std::path::PathBuf;

mod test_runner;
use test_runner::{TestResult, TestRunner};

/// Runs markdown compatibility tests against a sift binary
#[derive(Parser, Debug)]
struct Args {
    /// Path to the sift binary
    runtime: PathBuf,

    /// Glob matching the compatibility tests, e.g. "compatibility-tests/*.md"
    compatibility_tests: String,
}

fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    let runner = TestRunner::from_path(args.runtime);

    let paths = match glob(&args.compatibility_tests) {
        Ok(paths) => paths,
        Err(err) => {
            println!("ERROR: Invalid pattern: {}", err);
            std::process::exit(1);
        }
    };

    let (mut passed, mut failed, mut skipped) = (0, 0, 0);
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                println!("{} {}", "ERROR".red(), err);
                failed += 1;
                continue;
            }
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                println!("{} {}: {}", "ERROR".red(), path.display(), err);
                failed += 1;
                continue;
            }
        };

        let test_case = TestCase::from_string(content, &path);
        let name = test_case.name.clone();
        if test_case.disabled {
            println!("{} {}", "SKIP".yellow(), name);
            skipped += 1;
            continue;
        }

        match runner.run(test_case) {
            TestResult::Pass => {
                println!("{} {}", "PASS".green(), name);
                passed += 1;
            }
            TestResult::Fail { expected, actual } => {
                println!("{} {} ({})", "FAIL".red(), name, path.display());
                if let Some(expected) = expected {
                    println!("{}\n{}", "Expected:".bold(), expected);
                }
                println!("{}\n{}", "Actual:".bold(), actual);
                failed += 1;
            }
        }
    }

    println!("\n{} passed, {} failed, {} skipped", passed, failed, skipped);
    if failed > 0 {
        std::process::exit(1);
    }
}
