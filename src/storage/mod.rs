// Batch input loading and result persistence
//
// Batch files look like {"ideas": [{"content": "..."}, ...]}. Results are
// rewritten in full after every idea so an interrupted batch keeps what
// finished.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::arise::types::IdeaResult;
use crate::errors::{batch_shape_error, IdeanatorError, IdeanatorResult};

/// Read and validate a batch file, returning the idea texts in order.
pub fn load_batch_ideas(path: &Path) -> IdeanatorResult<Vec<String>> {
    let display = path.display().to_string();

    let contents = fs::read_to_string(path).map_err(|e| {
        IdeanatorError::Validation(format!("cannot read ideas file '{display}': {e}"))
    })?;
    let data: Value = serde_json::from_str(&contents).map_err(|e| {
        IdeanatorError::Validation(format!("ideas file '{display}' is not valid JSON: {e}"))
    })?;

    let entries = data
        .get("ideas")
        .and_then(Value::as_array)
        .ok_or_else(|| batch_shape_error(&display))?;
    if entries.is_empty() {
        return Err(IdeanatorError::Validation(format!(
            "ideas file '{display}' contains no ideas"
        )));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get("content")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    IdeanatorError::Validation(format!(
                        "idea #{i} in '{display}' needs a non-empty string \"content\""
                    ))
                })
        })
        .collect()
}

/// Accumulates batch results and rewrites the output file after each one
pub struct ResultWriter {
    path: PathBuf,
    results: Vec<IdeaResult>,
}

impl ResultWriter {
    /// Create a writer, making sure the parent directory exists
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
        Ok(Self {
            path,
            results: Vec::new(),
        })
    }

    /// Append a result and persist everything so far
    pub fn push(&mut self, result: IdeaResult) -> Result<()> {
        self.results.push(result);
        write_json(&self.path, &self.results)?;
        debug!(count = self.results.len(), path = %self.path.display(), "Saved results");
        Ok(())
    }

    pub fn results(&self) -> &[IdeaResult] {
        &self.results
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write one result as a single JSON object (interactive mode)
pub fn save_result(path: &Path, result: &IdeaResult) -> Result<()> {
    write_json(path, result)
}

/// Pretty-print to a sibling temp file, then rename over the target
fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .with_context(|| format!("Failed to write results to {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move results into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arise::types::{DimensionCoverage, VaguenessAssessment};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn result(idea: &str) -> IdeaResult {
        IdeaResult::new(
            idea,
            VaguenessAssessment::from_coverage(&DimensionCoverage::new(), "NONE"),
        )
    }

    #[test]
    fn test_load_valid_batch() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ideas.json",
            r#"{"ideas": [{"content": "A garden app"}, {"content": "  Band booking  ", "id": 2}]}"#,
        );
        let ideas = load_batch_ideas(&path).unwrap();
        assert_eq!(ideas, vec!["A garden app", "Band booking"]);
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("bad.json", "not json"),
            ("noideas.json", r#"{"other": []}"#),
            ("empty.json", r#"{"ideas": []}"#),
            ("nocontent.json", r#"{"ideas": [{"text": "x"}]}"#),
            ("blank.json", r#"{"ideas": [{"content": "ok"}, {"content": "   "}]}"#),
            ("number.json", r#"{"ideas": [{"content": 5}]}"#),
        ];
        for (name, contents) in cases {
            let path = write(&dir, name, contents);
            let err = load_batch_ideas(&path).unwrap_err();
            assert!(matches!(err, IdeanatorError::Validation(_)), "{name}: {err}");
        }

        let path = write(&dir, "index.json", r#"{"ideas": [{"content": "ok"}, {}]}"#);
        assert!(load_batch_ideas(&path).unwrap_err().to_string().contains("#1"));
    }

    #[test]
    fn test_missing_file_is_validation_error() {
        let err = load_batch_ideas(Path::new("/nonexistent/ideas.json")).unwrap_err();
        assert!(matches!(err, IdeanatorError::Validation(_)));
    }

    #[test]
    fn test_writer_saves_incrementally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("results.json");
        let mut writer = ResultWriter::new(&path).unwrap();

        writer.push(result("first")).unwrap();
        let saved: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.len(), 1);

        writer.push(result("second")).unwrap();
        let saved: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1]["original_idea"], "second");
        assert_eq!(writer.results().len(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_single_result_as_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.json");
        save_result(&path, &result("solo")).unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["original_idea"], "solo");
        assert_eq!(saved["vagueness_assessment"]["score"], "6/6");
    }
}
