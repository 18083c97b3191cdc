//! Directory listing backed by the real filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::GlobSet;
use walkdir::WalkDir;

use crate::engine::{DirectoryView, SortOrder, Tree};

/// Which entries are offered to the batch driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Files,
    FilesAndDirectories,
    Directories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Directory,
    Other,
}

/// Lists directories in a fixed order and filters out entries that must
/// never be renamed.
#[derive(Debug, Clone)]
pub struct FsTree {
    selection: Selection,
    order: SortOrder,
    exclude: Option<GlobSet>,
    reserved: Vec<String>,
}

impl FsTree {
    pub fn new(selection: Selection, order: SortOrder) -> Self {
        Self {
            selection,
            order,
            exclude: None,
            reserved: Vec::new(),
        }
    }

    /// Names matching `exclude` are never candidates.
    pub fn with_exclusions(mut self, exclude: Option<GlobSet>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Names (such as the tool's own logs) that are never candidates.
    pub fn with_reserved(mut self, reserved: Vec<String>) -> Self {
        self.reserved = reserved;
        self
    }

    /// Names with their kind and whether the entry is a symlink.
    fn entries(&self, dir: &Path) -> Result<Vec<(String, Kind, bool)>> {
        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if self.order != SortOrder::Unsorted {
            let order = self.order;
            walker = walker.sort_by(move |a, b| {
                order.compare(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
            });
        }

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("skipping non UTF-8 name {:?}", entry.file_name());
                continue;
            };
            // Follow symlinks the way a plain stat does; dangling links are neither.
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => Kind::Directory,
                Ok(meta) if meta.is_file() => Kind::File,
                _ => Kind::Other,
            };
            entries.push((name.to_string(), kind, entry.path_is_symlink()));
        }
        Ok(entries)
    }
}

impl Tree for FsTree {
    type View = FsView;

    fn candidates(&self, dir: &Path) -> Result<Vec<String>> {
        let selected = |kind: Kind| match self.selection {
            Selection::Files => kind == Kind::File,
            Selection::FilesAndDirectories => kind != Kind::Other,
            Selection::Directories => kind == Kind::Directory,
        };

        Ok(self
            .entries(dir)?
            .into_iter()
            .filter(|(name, kind, _)| {
                selected(*kind)
                    && !self.reserved.contains(name)
                    && !self.exclude.as_ref().is_some_and(|set| set.is_match(name))
            })
            .map(|(name, _, _)| name)
            .collect())
    }

    /// Linked directories are renamed like any other entry but never entered.
    fn subdirectories(&self, dir: &Path) -> Result<Vec<String>> {
        Ok(self
            .entries(dir)?
            .into_iter()
            .filter(|(_, kind, linked)| *kind == Kind::Directory && !linked)
            .map(|(name, _, _)| name)
            .collect())
    }

    fn view(&self, dir: &Path) -> FsView {
        FsView {
            dir: dir.to_path_buf(),
        }
    }
}

/// Existence checks against one directory.
#[derive(Debug, Clone)]
pub struct FsView {
    dir: PathBuf,
}

impl DirectoryView for FsView {
    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).exists()
    }

    fn is_same_entry(&self, old: &str, new: &str) -> bool {
        same_entry(&self.dir.join(old), &self.dir.join(new))
    }
}

/// True when both paths resolve to one filesystem object.
#[cfg(unix)]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

/// True when both paths resolve to one filesystem object.
#[cfg(not(unix))]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Render `dir` relative to `base` with components joined by `>`.
pub fn display_dir(base: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(base).unwrap_or(dir);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(">")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::glob::build_globset;
    use tempfile::TempDir;

    fn sample_dir() -> Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();
        for name in ["b.txt", "A.txt", "a.txt", "reneAct", "skip.lnk"] {
            fs::write(base.join(name), "x")?;
        }
        fs::create_dir(base.join("sub"))?;
        Ok(temp_dir)
    }

    #[test]
    fn test_candidates_are_sorted_files() -> Result<()> {
        let temp_dir = sample_dir()?;
        let tree = FsTree::new(Selection::Files, SortOrder::CaseSensitive);
        let names = tree.candidates(temp_dir.path())?;
        assert_eq!(names, vec!["A.txt", "a.txt", "b.txt", "reneAct", "skip.lnk"]);
        Ok(())
    }

    #[test]
    fn test_reserved_and_excluded_names() -> Result<()> {
        let temp_dir = sample_dir()?;
        let exclude = build_globset(&["*.lnk".to_string()])?;
        let tree = FsTree::new(Selection::Files, SortOrder::CaseInsensitive)
            .with_exclusions(Some(exclude))
            .with_reserved(vec!["reneAct".to_string()]);
        let names = tree.candidates(temp_dir.path())?;
        assert_eq!(names, vec!["A.txt", "a.txt", "b.txt"]);
        Ok(())
    }

    #[test]
    fn test_directory_selection() -> Result<()> {
        let temp_dir = sample_dir()?;
        let only_dirs = FsTree::new(Selection::Directories, SortOrder::CaseSensitive);
        assert_eq!(only_dirs.candidates(temp_dir.path())?, vec!["sub"]);
        assert_eq!(only_dirs.subdirectories(temp_dir.path())?, vec!["sub"]);

        let both = FsTree::new(Selection::FilesAndDirectories, SortOrder::CaseSensitive);
        assert_eq!(both.candidates(temp_dir.path())?.len(), 6);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directories_are_not_entered() -> Result<()> {
        let temp_dir = sample_dir()?;
        std::os::unix::fs::symlink(".", temp_dir.path().join("loop"))?;

        let tree = FsTree::new(Selection::FilesAndDirectories, SortOrder::CaseSensitive);
        assert_eq!(tree.subdirectories(temp_dir.path())?, vec!["sub"]);
        assert!(tree.candidates(temp_dir.path())?.contains(&"loop".to_string()));
        Ok(())
    }

    #[test]
    fn test_view_existence() -> Result<()> {
        let temp_dir = sample_dir()?;
        let view = FsTree::new(Selection::Files, SortOrder::CaseSensitive).view(temp_dir.path());
        assert!(view.exists("b.txt"));
        assert!(!view.exists("c.txt"));
        assert!(view.is_same_entry("b.txt", "b.txt"));
        assert!(!view.is_same_entry("a.txt", "b.txt"));
        Ok(())
    }

    #[test]
    fn test_display_dir() {
        let base = Path::new("/work");
        assert_eq!(display_dir(base, Path::new("/work/recurse/X_New")), "recurse>X_New");
        assert_eq!(display_dir(base, Path::new("/work/recurse")), "recurse");
    }
}
