//! File collection and prioritization
//!
//! Walks a pre-filtered [`TreeNode`] depth-first, drops files over the size
//! cap and orders the remaining files so the most valuable ones are analyzed
//! first.

use crate::config::AnalysisOptions;
use crate::types::{FileTask, TreeNode};

/// Extensions treated as core source code
pub const CORE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "jsx", "ts", "tsx", "mjs", "cjs", "go", "java", "kt", "swift", "c", "h",
    "cc", "cpp", "hpp", "cs", "rb", "php", "scala", "vue", "svelte",
];

const TEST_MARKERS: &[&str] = &[".test.", ".spec.", "_test.", "test_", "__tests__"];
const E2E_MARKER: &str = "e2e";

const CORE_EXTENSION_BONUS: i32 = 100;
const SMALL_FILE_BONUS: i32 = 50;
const MEDIUM_FILE_BONUS: i32 = 25;
const SMALL_FILE_LIMIT: u64 = 10 * 1024;
const MEDIUM_FILE_LIMIT: u64 = 50 * 1024;
const TEST_PENALTY: i32 = 20;
const E2E_PENALTY: i32 = 30;

/// Files gathered from a tree, sorted by descending priority
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub files: Vec<FileTask>,
    /// Bytes across all collected (not skipped) files
    pub total_bytes: u64,
    /// Files over `max_file_size`
    pub skipped: u64,
}

impl Collection {
    /// Files seen during traversal, collected or skipped
    pub fn total_files(&self) -> u64 {
        self.files.len() as u64 + self.skipped
    }
}

/// Turns a project tree into a prioritized task list
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCollector;

impl FileCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn collect(&self, root: &TreeNode, options: &AnalysisOptions) -> Collection {
        let mut collection = Collection::default();
        Self::visit(root, options, &mut collection);

        // sort_by is stable, so equal priorities keep traversal order
        collection
            .files
            .sort_by(|a, b| b.priority.cmp(&a.priority));

        tracing::debug!(
            collected = collection.files.len(),
            skipped = collection.skipped,
            total_bytes = collection.total_bytes,
            "Collected files"
        );
        collection
    }

    fn visit(node: &TreeNode, options: &AnalysisOptions, collection: &mut Collection) {
        if node.is_directory() {
            for child in &node.children {
                Self::visit(child, options, collection);
            }
            return;
        }

        if node.size > options.max_file_size {
            tracing::debug!(
                path = %node.path,
                size = node.size,
                max = options.max_file_size,
                "Skipping oversized file"
            );
            collection.skipped += 1;
            return;
        }

        let order = collection.files.len();
        collection.total_bytes += node.size;
        collection.files.push(FileTask {
            path: node.path.clone(),
            name: node.name.clone(),
            extension: node.extension.clone(),
            size: node.size,
            priority: priority_score(&node.name, node.extension.as_deref(), node.size),
            order,
        });
    }
}

/// Priority score for a file; higher is analyzed earlier
pub fn priority_score(name: &str, extension: Option<&str>, size: u64) -> i32 {
    let mut score = 0;

    if extension.is_some_and(is_core_extension) {
        score += CORE_EXTENSION_BONUS;
    }

    score += if size < SMALL_FILE_LIMIT {
        SMALL_FILE_BONUS
    } else if size < MEDIUM_FILE_LIMIT {
        MEDIUM_FILE_BONUS
    } else {
        0
    };

    let lower = name.to_lowercase();
    if lower.contains(E2E_MARKER) {
        score -= E2E_PENALTY;
    } else if TEST_MARKERS.iter().any(|marker| lower.contains(marker)) {
        score -= TEST_PENALTY;
    }

    score
}

pub fn is_core_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.');
    CORE_EXTENSIONS
        .iter()
        .any(|core| core.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AnalysisOptions {
        AnalysisOptions::default().with_max_file_size(100 * 1024)
    }

    #[test]
    fn test_priority_scoring() {
        assert_eq!(priority_score("main.rs", Some("rs"), 1024), 150);
        assert_eq!(priority_score("big.py", Some("py"), 20 * 1024), 125);
        assert_eq!(priority_score("huge.ts", Some("ts"), 80 * 1024), 100);
        assert_eq!(priority_score("README.md", Some("md"), 1024), 50);
        assert_eq!(priority_score("parser_test.go", Some("go"), 1024), 130);
        assert_eq!(priority_score("login.e2e.test.ts", Some("ts"), 1024), 120);
        assert_eq!(priority_score("Makefile", None, 60 * 1024), 0);
    }

    #[test]
    fn test_core_extension_matching() {
        assert!(is_core_extension("RS"));
        assert!(is_core_extension(".tsx"));
        assert!(!is_core_extension("md"));
        assert!(!is_core_extension(""));
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let tree = TreeNode::directory(
            "repo",
            vec![
                TreeNode::file("repo/a.rs", 100),
                TreeNode::file("repo/blob.bin", 200 * 1024),
                TreeNode::file("repo/b.rs", 300),
            ],
        );

        let collection = FileCollector::new().collect(&tree, &options());

        assert_eq!(collection.files.len(), 2);
        assert_eq!(collection.skipped, 1);
        assert_eq!(collection.total_bytes, 400);
        assert_eq!(collection.total_files(), 3);
        assert!(collection.files.iter().all(|f| f.size <= 100 * 1024));
    }

    #[test]
    fn test_file_at_exact_limit_is_kept() {
        let tree = TreeNode::file("edge.rs", 100 * 1024);
        let collection = FileCollector::new().collect(&tree, &options());
        assert_eq!(collection.files.len(), 1);
        assert_eq!(collection.skipped, 0);
    }

    #[test]
    fn test_sort_is_stable_descending() {
        let tree = TreeNode::directory(
            "repo",
            vec![
                TreeNode::file("repo/notes.md", 10),
                TreeNode::file("repo/one.rs", 10),
                TreeNode::directory(
                    "repo/src",
                    vec![
                        TreeNode::file("repo/src/two.rs", 10),
                        TreeNode::file("repo/src/util_test.rs", 10),
                    ],
                ),
                TreeNode::file("repo/three.rs", 10),
            ],
        );

        let collection = FileCollector::new().collect(&tree, &options());
        let names: Vec<_> = collection.files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["one.rs", "two.rs", "three.rs", "util_test.rs", "notes.md"]
        );
        // traversal order is recorded before sorting
        assert_eq!(collection.files[0].order, 1);
        assert_eq!(collection.files[4].order, 0);
    }

    #[test]
    fn test_empty_tree() {
        let tree = TreeNode::directory("repo", vec![]);
        let collection = FileCollector::new().collect(&tree, &options());
        assert!(collection.files.is_empty());
        assert_eq!(collection.total_files(), 0);
    }
}
