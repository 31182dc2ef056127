//! Building a project tree from the file system
//!
//! Respects `.gitignore`, skips hidden entries and applies `--exclude` globs.
//! Siblings are sorted by file name so the same directory always produces
//! the same tree.

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use sift_core::{SiftError, SiftResult, TreeNode};
use std::path::{Path, PathBuf};

/// Walks a directory into a [`TreeNode`]
pub struct TreeBuilder {
    root: PathBuf,
    excludes: Vec<String>,
    respect_gitignore: bool,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: Vec::new(),
            respect_gitignore: true,
        }
    }

    pub fn with_excludes(mut self, excludes: &[String]) -> Self {
        self.excludes = excludes.to_vec();
        self
    }

    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    pub fn build(&self) -> SiftResult<TreeNode> {
        if !self.root.exists() {
            return Err(SiftError::config(format!(
                "Path does not exist: {}",
                self.root.display()
            )));
        }

        let mut overrides = OverrideBuilder::new(&self.root);
        for glob in &self.excludes {
            overrides
                .add(&format!("!{}", glob))
                .map_err(|e| SiftError::config(format!("Invalid exclude '{}': {}", glob, e)))?;
        }
        let overrides = overrides
            .build()
            .map_err(|e| SiftError::config(format!("Invalid exclude patterns: {}", e)))?;

        let mut walker = WalkBuilder::new(&self.root);
        walker
            .hidden(true)
            .git_ignore(self.respect_gitignore)
            .require_git(false)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b));

        // open directories, innermost last; depth of entry == index in stack
        let mut stack: Vec<(String, Vec<TreeNode>)> = Vec::new();
        let mut root_file = None;

        for entry in walker.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walker error: {}", e);
                    continue;
                }
            };

            while stack.len() > entry.depth() {
                close_directory(&mut stack);
            }

            let path = display_path(entry.path());
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if is_dir {
                stack.push((path, Vec::new()));
                continue;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    tracing::warn!("Cannot stat {}: {}", path, e);
                    continue;
                }
            };
            let node = TreeNode::file(path, size);
            match stack.last_mut() {
                Some((_, children)) => children.push(node),
                None => root_file = Some(node),
            }
        }

        while stack.len() > 1 {
            close_directory(&mut stack);
        }
        match (stack.pop(), root_file) {
            (Some((path, children)), _) => Ok(TreeNode::directory(path, children)),
            (None, Some(file)) => Ok(file),
            (None, None) => Err(SiftError::config(format!(
                "Nothing to analyze under {}",
                self.root.display()
            ))),
        }
    }
}

fn close_directory(stack: &mut Vec<(String, Vec<TreeNode>)>) {
    if let Some((path, children)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(TreeNode::directory(path, children));
        }
    }
}

fn display_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    match text.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(root.join("src/lib.rs"), "pub mod nested;\n").unwrap();
        fs::write(root.join("src/nested/mod.rs"), "").unwrap();
        fs::write(root.join("target/out.bin"), [0u8; 16]).unwrap();
        fs::write(root.join("README.md"), "# demo\n").unwrap();
        fs::write(root.join(".env"), "SECRET=1\n").unwrap();
        fs::write(root.join(".gitignore"), "target/\n").unwrap();
        dir
    }

    fn file_names(node: &TreeNode, out: &mut Vec<String>) {
        if node.is_file() {
            out.push(node.name.clone());
        }
        for child in &node.children {
            file_names(child, out);
        }
    }

    #[test]
    fn test_builds_sorted_tree() {
        let dir = project();
        let tree = TreeBuilder::new(dir.path()).build().unwrap();

        assert!(tree.is_directory());
        let mut names = Vec::new();
        file_names(&tree, &mut names);
        assert_eq!(names, vec!["README.md", "lib.rs", "main.rs", "mod.rs"]);

        let src = tree.children.iter().find(|c| c.name == "src").unwrap();
        assert!(src.is_directory());
        assert_eq!(src.file_count(), 3);
        let main = src.children.iter().find(|c| c.name == "main.rs").unwrap();
        assert_eq!(main.size, 13);
        assert_eq!(main.extension.as_deref(), Some("rs"));
    }

    #[test]
    fn test_gitignore_can_be_disabled() {
        let dir = project();
        let tree = TreeBuilder::new(dir.path())
            .respect_gitignore(false)
            .build()
            .unwrap();

        let mut names = Vec::new();
        file_names(&tree, &mut names);
        assert!(names.contains(&"out.bin".to_string()));
        assert!(!names.contains(&".env".to_string()));
    }

    #[test]
    fn test_excludes_are_applied() {
        let dir = project();
        let tree = TreeBuilder::new(dir.path())
            .with_excludes(&["*.md".to_string(), "src/nested/**".to_string()])
            .build()
            .unwrap();

        let mut names = Vec::new();
        file_names(&tree, &mut names);
        assert_eq!(names, vec!["lib.rs", "main.rs"]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = project();
        let tree = TreeBuilder::new(dir.path().join("src/main.rs"))
            .build()
            .unwrap();
        assert!(tree.is_file());
        assert_eq!(tree.name, "main.rs");
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let err = TreeBuilder::new("/definitely/not/here").build().err().unwrap();
        assert!(err.is_setup_error());
    }
}
