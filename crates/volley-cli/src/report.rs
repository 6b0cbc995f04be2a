use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::evaluate::EvaluationResult;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failure_rate: f64,
    pub average_double_commit_risk: f64,
    pub last_man_violations: usize,
}

impl Summary {
    pub fn new(results: &[EvaluationResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        let denominator = total.max(1) as f64;
        Self {
            total,
            passed,
            failed,
            failure_rate: failed as f64 / denominator,
            average_double_commit_risk: results
                .iter()
                .map(|r| r.double_commit_risk)
                .sum::<f64>()
                / denominator,
            last_man_violations: results.iter().filter(|r| r.last_man_violation).count(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    summary: Summary,
    results: &'a [EvaluationResult],
}

/// Write the summary and all results as pretty JSON, creating parent directories.
pub fn write_report(path: impl AsRef<Path>, results: &[EvaluationResult]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    }
    let report = Report {
        summary: Summary::new(results),
        results,
    };
    let contents = serde_json::to_string_pretty(&report)?;
    fs::write(path, contents).with_context(|| format!("Failed to write report {}", path.display()))
}
