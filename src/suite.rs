//! Test suite loading.
//!
//! Provides the [`Suite`] trait and a JSON-file loader for expert-authored
//! test cases.

use crate::expected::TestCase;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Errors that can occur when loading a test suite.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SuiteError {
    /// Failed to read the suite file
    #[error("Failed to read suite: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the suite
    #[error("Failed to parse suite: {0}")]
    Parse(String),
}

/// Trait for test suites.
///
/// Implement this trait to load test cases from a custom source.
pub trait Suite: Send + Sync {
    /// The name of this suite (used in reports).
    fn name(&self) -> &str;

    /// Load test cases from the suite.
    ///
    /// If `sample_size` is specified, return at most that many cases.
    fn load(
        &self,
        sample_size: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<TestCase>, SuiteError>> + Send;
}

/// A suite loaded from a JSON file.
///
/// Expects a JSON array of test cases; each case carries a `query` plus the
/// expected-value columns, e.g.:
///
/// ```json
/// [
///   {
///     "id": "tc-1",
///     "query": "How much tree cover did Brazil lose in 2023?",
///     "expected_aoi_ids": "BRA",
///     "expected_dataset_id": "tree_cover_loss",
///     "expected_start_date": "1/1/2023",
///     "expected_end_date": "12/31/2023",
///     "expected_answer": "2.9 Mha"
///   }
/// ]
/// ```
///
/// Cases without an `id` get one derived from their position. An optional
/// `test_group` filter limits which cases load.
pub struct JsonSuite {
    path: PathBuf,
    name: String,
    test_group: Option<String>,
}

impl JsonSuite {
    /// Create a suite from a JSON file.
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("json_suite")
            .to_string();

        Self {
            path,
            name,
            test_group: None,
        }
    }

    /// Create a suite with a custom name.
    pub fn with_name(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
            test_group: None,
        }
    }

    /// Only load cases belonging to the given test group.
    #[must_use]
    pub fn with_test_group(mut self, group: impl Into<String>) -> Self {
        self.test_group = Some(group.into());
        self
    }
}

impl Suite for JsonSuite {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, sample_size: Option<usize>) -> Result<Vec<TestCase>, SuiteError> {
        let content = fs::read_to_string(&self.path).await?;
        let entries: Vec<TestCase> =
            serde_json::from_str(&content).map_err(|e| SuiteError::Parse(e.to_string()))?;

        let mut cases: Vec<TestCase> = entries
            .into_iter()
            .enumerate()
            .map(|(idx, mut case)| {
                if case.id.is_empty() {
                    case.id = format!("{}_{}", self.name, idx);
                }
                case
            })
            .filter(|case| {
                self.test_group
                    .as_ref()
                    .map_or(true, |group| &case.expected.test_group == group)
            })
            .collect();

        if let Some(size) = sample_size {
            cases.truncate(size);
        }

        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SUITE_JSON: &str = r#"[
        {
            "id": "tc-1",
            "query": "tree cover loss in Brazil",
            "expected_aoi_ids": "BRA",
            "expected_answer": "Brazil",
            "test_group": "aoi"
        },
        {
            "query": "deforestation drivers in Colombia",
            "expected_aoi_ids": ["COL"],
            "test_group": "drivers"
        }
    ]"#;

    fn suite_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SUITE_JSON.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_json_suite_load() {
        let file = suite_file();
        let suite = JsonSuite::new(file.path().to_path_buf());
        let cases = suite.load(None).await.unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, "tc-1");
        assert_eq!(cases[0].expected.expected_aoi_ids, vec!["BRA"]);
        assert_eq!(cases[1].expected.expected_aoi_ids, vec!["COL"]);
    }

    #[tokio::test]
    async fn test_missing_id_gets_positional_one() {
        let file = suite_file();
        let suite = JsonSuite::with_name(file.path().to_path_buf(), "custom");
        let cases = suite.load(None).await.unwrap();

        assert_eq!(cases[1].id, "custom_1");
    }

    #[tokio::test]
    async fn test_sample_size_truncates() {
        let file = suite_file();
        let suite = JsonSuite::new(file.path().to_path_buf());
        let cases = suite.load(Some(1)).await.unwrap();

        assert_eq!(cases.len(), 1);
    }

    #[tokio::test]
    async fn test_test_group_filter() {
        let file = suite_file();
        let suite = JsonSuite::new(file.path().to_path_buf()).with_test_group("drivers");
        let cases = suite.load(None).await.unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].query, "deforestation drivers in Colombia");
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        let suite = JsonSuite::new(file.path().to_path_buf());
        assert!(matches!(
            suite.load(None).await,
            Err(SuiteError::Parse(_))
        ));
    }
}
