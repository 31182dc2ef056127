//! Shared data types for the analysis pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Kind of a node in the project tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A node in a pre-filtered project tree
///
/// Trees are produced by a tree builder (see the `sift` CLI) or loaded from
/// JSON, and are never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub name: String,
    pub path: String,
    /// Size in bytes; zero for directories
    #[serde(default)]
    pub size: u64,
    /// Extension without the leading dot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a file node, deriving name and extension from the path
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let as_path = Path::new(&path);
        let name = as_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let extension = as_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        Self {
            kind: NodeKind::File,
            name,
            path,
            size,
            extension,
            children: Vec::new(),
        }
    }

    /// Create a directory node with the given children
    pub fn directory(path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());

        Self {
            kind: NodeKind::Directory,
            name,
            path,
            size: 0,
            extension: None,
            children,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Number of file nodes in this subtree
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(TreeNode::file_count).sum(),
        }
    }
}

/// A file queued for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    pub path: String,
    pub name: String,
    pub extension: Option<String>,
    pub size: u64,
    /// Priority score; higher runs first
    pub priority: i32,
    /// Position in depth-first traversal order, used to break ties
    pub order: usize,
}

impl FileTask {
    /// Build the analyzer request for this task
    pub fn request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            path: self.path.clone(),
            name: self.name.clone(),
            extension: self.extension.clone(),
            size: self.size,
        }
    }
}

/// Arguments passed to an analyzer for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub path: String,
    pub name: String,
    pub extension: Option<String>,
    pub size: u64,
}

/// Terminal outcome of analyzing one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The analyzer produced a payload
    Success { payload: Value },
    /// The analyzer succeeded but had nothing to report
    Empty,
    /// Every attempt failed
    Failed { error: String },
    /// Never admitted because the run was cancelled
    Cancelled,
}

/// Outcome of analyzing one file, with the file's identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub path: String,
    pub name: String,
    pub extension: Option<String>,
    pub size: u64,
    pub priority: i32,
    /// Analyze calls made for this file
    pub attempts: u32,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn new(task: &FileTask, attempts: u32, outcome: AnalysisOutcome) -> Self {
        Self {
            path: task.path.clone(),
            name: task.name.clone(),
            extension: task.extension.clone(),
            size: task.size,
            priority: task.priority,
            attempts,
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Failed { .. })
    }

    /// Whether this result belongs in the final output
    ///
    /// Successes and terminal failures are reported; empty and cancelled
    /// outcomes only show up in the counters.
    pub fn is_reportable(&self) -> bool {
        self.is_success() || self.is_failed()
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            AnalysisOutcome::Success { payload } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_node_derives_name_and_extension() {
        let node = TreeNode::file("src/core/engine.rs", 120);
        assert_eq!(node.name, "engine.rs");
        assert_eq!(node.extension.as_deref(), Some("rs"));
        assert!(node.is_file());

        let node = TreeNode::file("Makefile", 10);
        assert_eq!(node.name, "Makefile");
        assert_eq!(node.extension, None);
    }

    #[test]
    fn test_file_count() {
        let tree = TreeNode::directory(
            "root",
            vec![
                TreeNode::file("root/a.rs", 1),
                TreeNode::directory("root/sub", vec![TreeNode::file("root/sub/b.rs", 2)]),
                TreeNode::directory("root/empty", vec![]),
            ],
        );
        assert_eq!(tree.file_count(), 2);
    }

    #[test]
    fn test_tree_deserializes_from_json() {
        let tree: TreeNode = serde_json::from_value(json!({
            "kind": "directory",
            "name": "app",
            "path": "app",
            "children": [
                { "kind": "file", "name": "main.go", "path": "app/main.go", "size": 42, "extension": "go" }
            ]
        }))
        .unwrap();

        assert!(tree.is_directory());
        assert_eq!(tree.children[0].size, 42);
    }

    #[test]
    fn test_result_reportability() {
        let task = FileTask {
            path: "a.rs".into(),
            name: "a.rs".into(),
            extension: Some("rs".into()),
            size: 5,
            priority: 150,
            order: 0,
        };

        let ok = AnalysisResult::new(&task, 1, AnalysisOutcome::Success { payload: json!(1) });
        let empty = AnalysisResult::new(&task, 1, AnalysisOutcome::Empty);
        let failed = AnalysisResult::new(
            &task,
            4,
            AnalysisOutcome::Failed {
                error: "boom".into(),
            },
        );

        assert!(ok.is_reportable());
        assert_eq!(ok.payload(), Some(&json!(1)));
        assert!(!empty.is_reportable());
        assert!(failed.is_reportable());
        assert!(failed.is_failed());
    }

    #[test]
    fn test_result_serializes_with_status_tag() {
        let task = FileTask {
            path: "a.py".into(),
            name: "a.py".into(),
            extension: Some("py".into()),
            size: 5,
            priority: 150,
            order: 0,
        };
        let failed = AnalysisResult::new(
            &task,
            4,
            AnalysisOutcome::Failed {
                error: "boom".into(),
            },
        );

        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "boom");
        assert_eq!(value["attempts"], 4);
    }
}
