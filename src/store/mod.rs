//! One-file-per-record JSON store.
//!
//! The directory listing is the only index: there is no manifest, lock file or
//! cache next to the records.

mod naming;

pub use naming::{derive_filename, derive_stem, sanitize_filename, MAX_STEM_CHARS, RECORD_EXTENSION};

use crate::errors::{AppError, AppResult};
use crate::models::{Evaluation, EvaluationSummary};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const UNNAMED_DISPLAY: &str = "Unnamed";

#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

/// Result of reading one file during a scan.
enum ScanOutcome {
    Loaded(EvaluationSummary),
    Skipped { path: PathBuf, error: AppError },
}

impl RecordStore {
    /// Opens the store, creating its directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened record store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates or fully replaces the record file derived from the person fields.
    ///
    /// Returns the derived filename without extension.
    pub fn save(&self, mut evaluation: Evaluation) -> AppResult<String> {
        let age = match evaluation.person_age {
            Some(age) if age != 0 => age,
            _ => return Err(AppError::Validation("Age is required".to_string())),
        };
        let stem = derive_stem(
            evaluation.person_name.as_deref(),
            age,
            evaluation.person_sex.as_deref(),
        );
        evaluation.updated_at = now_timestamp();

        let path = self.record_path(&stem);
        let replaced = path.exists();
        write_json_atomic(&self.root, &path, &evaluation)?;
        tracing::info!(
            filename = %stem,
            id = %evaluation.id,
            replaced,
            "saved evaluation"
        );
        Ok(stem)
    }

    /// Loads the stored document as-is, without schema checks.
    pub fn get(&self, raw_filename: &str) -> AppResult<Value> {
        let path = self.resolve_existing(raw_filename)?;
        read_json_file(&path)
    }

    /// Summaries of every readable record, newest `updated_at` first.
    ///
    /// Unreadable or malformed files are left out of the result.
    pub fn list(&self) -> AppResult<Vec<EvaluationSummary>> {
        let mut summaries = Vec::new();
        let mut skipped = 0usize;
        for outcome in self.scan()? {
            match outcome {
                ScanOutcome::Loaded(summary) => summaries.push(summary),
                ScanOutcome::Skipped { path, error } => {
                    skipped += 1;
                    tracing::warn!(path = %path.display(), error = %error, "skipping malformed evaluation file");
                }
            }
        }
        sort_by_updated_at_desc(&mut summaries);
        tracing::debug!(count = summaries.len(), skipped, "listed evaluations");
        Ok(summaries)
    }

    pub fn delete(&self, raw_filename: &str) -> AppResult<()> {
        let path = self.resolve_existing(raw_filename)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(not_found(raw_filename));
            }
            Err(error) => return Err(error.into()),
        }
        tracing::info!(path = %path.display(), "deleted evaluation");
        Ok(())
    }

    fn record_path(&self, stem: &str) -> PathBuf {
        self.root.join(naming::with_extension(stem))
    }

    fn resolve_existing(&self, raw_filename: &str) -> AppResult<PathBuf> {
        let path = self.record_path(&sanitize_filename(raw_filename));
        if path.is_file() {
            Ok(path)
        } else {
            Err(not_found(raw_filename))
        }
    }

    fn scan(&self) -> AppResult<Vec<ScanOutcome>> {
        let mut outcomes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|value| value.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let outcome = match summarize_file(&path) {
                Ok(summary) => ScanOutcome::Loaded(summary),
                Err(error) => ScanOutcome::Skipped { path, error },
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

fn summarize_file(path: &Path) -> AppResult<EvaluationSummary> {
    let filename = path
        .file_stem()
        .and_then(|value| value.to_str())
        .ok_or_else(|| AppError::Malformed(format!("non-utf8 filename {}", path.display())))?
        .to_string();
    let document: Value = read_json_file(path).map_err(|error| AppError::Malformed(error.to_string()))?;
    summarize(filename, &document)
}

fn summarize(filename: String, document: &Value) -> AppResult<EvaluationSummary> {
    let object = document
        .as_object()
        .ok_or_else(|| AppError::Malformed(format!("{} is not a JSON object", filename)))?;
    Ok(EvaluationSummary {
        name: object
            .get("person_name")
            .and_then(Value::as_str)
            .unwrap_or(UNNAMED_DISPLAY)
            .to_string(),
        age: object.get("person_age").and_then(Value::as_i64),
        sex: object
            .get("person_sex")
            .and_then(Value::as_str)
            .map(str::to_string),
        measurement_count: object
            .get("measurements")
            .and_then(Value::as_object)
            .map_or(0, |measurements| measurements.len()),
        updated_at: object
            .get("updated_at")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        filename,
    })
}

fn sort_by_updated_at_desc(items: &mut [EvaluationSummary]) {
    items.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn not_found(raw_filename: &str) -> AppError {
    AppError::NotFound(format!("Evaluation '{}' not found", raw_filename))
}

fn read_json_file(path: &Path) -> AppResult<Value> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(AppError::from)
}

/// Writes through a dot-prefixed temp file in `dir`, then renames it over `path`.
fn write_json_atomic<T: serde::Serialize>(dir: &Path, path: &Path, value: &T) -> AppResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let mut temp = tempfile::Builder::new()
        .prefix(".evaluation-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|error| AppError::Io(error.error.to_string()))?;
    Ok(())
}
