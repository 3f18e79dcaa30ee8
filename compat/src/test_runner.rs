use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process::Command;

use sift_common::test_case::TestCase;

#[derive(Debug, Clone)]
pub enum TestResult {
    Pass,
    Fail {
        expected: Option<String>,
        actual: String,
    },
}

pub struct TestRunner {
    runtime_path: PathBuf,
}

struct TempFileGuard {
    path: PathBuf,
    dir: PathBuf,
}

impl TempFileGuard {
    fn new(path: PathBuf, dir: PathBuf) -> Self {
        Self { path, dir }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = std::fs::remove_dir(&self.dir);
    }
}

impl TestRunner {
    pub fn from_path(path: PathBuf) -> Self {
        TestRunner { runtime_path: path }
    }

    pub fn run(&self, test_case: TestCase) -> TestResult {
        let mut command = Command::new(&self.runtime_path);
        command.arg("run").arg("--seed").arg("0");

        let _temp_guard = match &test_case.bank {
            Some(bank) => match write_bank(&test_case, bank) {
                Ok((path, guard)) => {
                    command.arg("--bank").arg(path);
                    Some(guard)
                }
                Err(err) => {
                    return TestResult::Fail {
                        expected: None,
                        actual: format!("Could not write question bank: {}", err),
                    }
                }
            },
            None => None,
        };

        match command.arg(test_case.input_commands()).output() {
            Ok(result) => {
                let output = String::from_utf8(result.stdout).unwrap_or_default();
                let output_trimmed = output.trim_end_matches(&['\r', '\n'][..]);
                let expected_trimmed = test_case.result.trim_end_matches(&['\r', '\n'][..]);

                if expected_trimmed == output_trimmed {
                    TestResult::Pass
                } else {
                    TestResult::Fail {
                        expected: Some(test_case.result),
                        actual: output,
                    }
                }
            }
            Err(err) => {
                log::error!("could not run {}: {}", self.runtime_path.display(), err);
                TestResult::Fail {
                    expected: None,
                    actual: "Error running test".to_string(),
                }
            }
        }
    }
}

fn write_bank(test_case: &TestCase, bank: &str) -> std::io::Result<(PathBuf, TempFileGuard)> {
    let file_stem = test_case
        .path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    let unique = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_dir = std::env::temp_dir().join(format!(
        "sift-compat-{}-{}",
        std::process::id(),
        unique
    ));
    std::fs::create_dir_all(&temp_dir)?;
    let temp_path = temp_dir.join(format!("{}.toml", file_stem));
    let guard = TempFileGuard::new(temp_path.clone(), temp_dir);

    let mut file = File::create(&temp_path)?;
    writeln!(file, "{}", bank)?;
    Ok((temp_path, guard))
}
