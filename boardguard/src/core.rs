//! Core validation logic shared by the CLI and embedding applications.
//! No terminal or editor state dependencies.

use std::path::{Path, PathBuf};

use crate::board::Board;
use crate::drc::{DrcEngine, DrcSummary, Violation};
use crate::model::ObjectLimits;
use crate::rules::{DesignRules, RulePreset};

/// File extension suffix for board files discovered in project directories
pub const BOARD_FILE_SUFFIX: &str = ".pcb.json";

#[derive(Debug, thiserror::Error)]
pub enum BoardGuardError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Options for validation runs.
#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Preset applied on top of the base rule table
    pub preset: Option<RulePreset>,
    /// JSON rule table used as the base instead of the defaults
    pub rules_file: Option<PathBuf>,
    /// Individual rule values applied last, by camelCase key
    pub overrides: Vec<(String, f64)>,
    /// Use the R-tree clearance pass
    pub indexed: bool,
    pub limits: ObjectLimits,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            preset: None,
            rules_file: None,
            overrides: vec![],
            indexed: false,
            limits: ObjectLimits::default(),
        }
    }
}

impl ValidationOptions {
    /// Resolve the effective rule table: file or defaults, then preset,
    /// then overrides.
    pub fn design_rules(&self) -> Result<DesignRules, BoardGuardError> {
        let mut rules = match &self.rules_file {
            Some(path) => DesignRules::from_json_file(path)?,
            None => DesignRules::default(),
        };
        if let Some(preset) = self.preset {
            rules.apply_preset(preset);
        }
        for (key, value) in &self.overrides {
            rules.set_rule(key, *value);
        }
        Ok(rules)
    }
}

/// Per-file validation result with violations and counts.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub file: PathBuf,
    pub violations: Vec<Violation>,
    pub stats: ValidationStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ValidationStats {
    pub objects: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings_or_errors(&self) -> bool {
        self.stats.errors > 0 || self.stats.warnings > 0
    }

    pub fn total_issues(&self) -> usize {
        self.stats.errors + self.stats.warnings
    }
}

fn is_board_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(BOARD_FILE_SUFFIX))
}

/// Recursively discover board files in a directory.
pub fn discover_board_files(dir: &Path) -> Result<Vec<PathBuf>, BoardGuardError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), BoardGuardError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "build" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() && is_board_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Core validation API used by the CLI.
pub struct BoardGuardCore;

impl BoardGuardCore {
    /// Load a single board file and run DRC over it.
    pub fn validate_board(
        path: &Path,
        options: &ValidationOptions,
    ) -> Result<ValidationResult, BoardGuardError> {
        let board = Board::from_json_file(path, options.limits)?;
        let rules = options.design_rules()?;
        Ok(Self::validate_loaded(path, &board, rules, options.indexed))
    }

    /// Run DRC over an already loaded board.
    pub fn validate_loaded(
        path: &Path,
        board: &Board,
        rules: DesignRules,
        indexed: bool,
    ) -> ValidationResult {
        let mut engine = DrcEngine::new(rules);
        let violations = if indexed {
            engine.run_indexed(board.objects())
        } else {
            engine.run(board.objects())
        };

        let DrcSummary { errors, warnings } = DrcSummary::from_violations(&violations);
        tracing::debug!(
            "Validated {}: {} errors, {} warnings",
            path.display(),
            errors,
            warnings
        );
        ValidationResult {
            file: path.to_path_buf(),
            violations,
            stats: ValidationStats {
                objects: board.len(),
                errors,
                warnings,
            },
        }
    }

    /// Validate every board file in a directory.
    pub fn validate_project(
        dir: &Path,
        options: &ValidationOptions,
    ) -> Result<Vec<ValidationResult>, BoardGuardError> {
        let files = discover_board_files(dir)?;
        if files.is_empty() {
            tracing::warn!("No *{} files found in {}", BOARD_FILE_SUFFIX, dir.display());
        }
        let rules = options.design_rules()?;
        let mut results = Vec::with_capacity(files.len());
        for path in files {
            let board = Board::from_json_file(&path, options.limits)?;
            results.push(Self::validate_loaded(&path, &board, rules.clone(), options.indexed));
        }
        Ok(results)
    }
}
