//! Built-in analyzers shipped with the CLI

use async_trait::async_trait;
use serde_json::{Value, json};
use sift_core::{AnalyzeRequest, Analyzer, AnalyzerRegistry, SiftError, SiftResult};
use std::sync::Arc;

/// Line, blank-line and byte counts for text files
#[derive(Debug, Default)]
pub struct StatsAnalyzer;

#[async_trait]
impl Analyzer for StatsAnalyzer {
    fn name(&self) -> &str {
        "stats"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> SiftResult<Option<Value>> {
        let bytes = tokio::fs::read(&request.path)
            .await
            .map_err(|e| SiftError::analyze(&request.path, e.to_string()))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!(path = %request.path, "Skipping non-UTF-8 file");
                return Ok(None);
            }
        };

        let lines = text.lines().count();
        let blank = text.lines().filter(|l| l.trim().is_empty()).count();
        Ok(Some(json!({
            "lines": lines,
            "blank": blank,
            "code": lines - blank,
            "bytes": bytes.len(),
        })))
    }
}

/// Echoes the request without touching the file system
#[derive(Debug, Default)]
pub struct NoopAnalyzer;

#[async_trait]
impl Analyzer for NoopAnalyzer {
    fn name(&self) -> &str {
        "noop"
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> SiftResult<Option<Value>> {
        Ok(Some(json!({
            "name": request.name,
            "extension": request.extension,
            "size": request.size,
        })))
    }
}

/// Registry with every built-in analyzer; `stats` is the default
pub fn builtin_registry() -> AnalyzerRegistry {
    AnalyzerRegistry::new()
        .with_analyzer(Arc::new(StatsAnalyzer))
        .with_analyzer(Arc::new(NoopAnalyzer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(path: &std::path::Path) -> AnalyzeRequest {
        AnalyzeRequest {
            path: path.to_string_lossy().into_owned(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: path.extension().map(|e| e.to_string_lossy().into_owned()),
            size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        }
    }

    #[tokio::test]
    async fn test_stats_counts_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lib.rs");
        fs::write(&path, "fn a() {}\n\nfn b() {}\n").unwrap();

        let value = StatsAnalyzer.analyze(&request(&path)).await.unwrap().unwrap();
        assert_eq!(value["lines"], 3);
        assert_eq!(value["blank"], 1);
        assert_eq!(value["code"], 2);
        assert_eq!(value["bytes"], 21);
    }

    #[tokio::test]
    async fn test_stats_empty_and_binary_files_yield_nothing() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.rs");
        let binary = dir.path().join("blob.bin");
        fs::write(&empty, "").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert!(StatsAnalyzer.analyze(&request(&empty)).await.unwrap().is_none());
        assert!(StatsAnalyzer.analyze(&request(&binary)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = StatsAnalyzer
            .analyze(&request(&dir.path().join("gone.rs")))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("gone.rs"));
    }

    #[tokio::test]
    async fn test_noop_echoes_request() {
        let request = AnalyzeRequest {
            path: "src/lib.rs".into(),
            name: "lib.rs".into(),
            extension: Some("rs".into()),
            size: 42,
        };
        let value = NoopAnalyzer.analyze(&request).await.unwrap().unwrap();
        assert_eq!(value, json!({ "name": "lib.rs", "extension": "rs", "size": 42 }));
    }

    #[test]
    fn test_builtin_registry_defaults_to_stats() {
        let registry = builtin_registry();
        assert_eq!(registry.default_name(), Some("stats"));
        assert_eq!(registry.names(), vec!["noop", "stats"]);
    }
}
