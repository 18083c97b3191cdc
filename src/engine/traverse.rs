//! Recursive traversal
//!
//! Each directory is planned in full (and handed to the caller to execute)
//! before its subdirectories are listed, so renamed directories are entered
//! under their new names. Reload-flagged Insert counters restart at every
//! directory; all other rule state carries on across the whole walk.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::Result;
use globset::GlobSet;

use super::batch::{BatchDriver, BatchPlan, DirectoryView};
use super::error::CompileError;
use crate::shared::glob::build_globset;
use crate::shared::params::{param_list, parse_count};

/// Order in which directory entries are presented to the batch driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Unsorted,
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl SortOrder {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Unsorted => Ordering::Equal,
            Self::CaseSensitive => a.cmp(b),
            Self::CaseInsensitive => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }

    /// The order to actually use. Counters and the numbering of duplicate
    /// names in a batch follow enumeration order, so unsorted becomes
    /// case-sensitive.
    pub fn effective(self) -> Self {
        if self == Self::Unsorted {
            tracing::warn!("numbering follows listing order; sorting case-sensitively");
            Self::CaseSensitive
        } else {
            self
        }
    }
}

/// Directory listing used by the traversal.
pub trait Tree {
    type View: DirectoryView;

    /// Names in `dir` eligible for renaming, in batch order.
    fn candidates(&self, dir: &Path) -> Result<Vec<String>>;

    /// Names of the subdirectories of `dir`, in visiting order.
    fn subdirectories(&self, dir: &Path) -> Result<Vec<String>>;

    fn view(&self, dir: &Path) -> Self::View;
}

/// Depth limit and directory-name filter for recursion.
#[derive(Debug, Clone)]
pub struct Recursion {
    /// Levels below the starting directory; `None` is unlimited.
    pub max_depth: Option<usize>,
    patterns: Option<GlobSet>,
    include: bool,
}

impl Default for Recursion {
    fn default() -> Self {
        Self::none()
    }
}

impl Recursion {
    /// Only the starting directory.
    pub fn none() -> Self {
        Self {
            max_depth: Some(0),
            patterns: None,
            include: false,
        }
    }

    /// Parse a recursion spec such as `4/+/bak` or `/.*/X_Old/`.
    pub fn parse(spec: &str) -> Result<Self, CompileError> {
        let mut max_depth = None;
        let mut include = false;
        let mut patterns = Vec::new();
        for field in param_list(spec) {
            match field {
                "+" => include = true,
                "-" => include = false,
                f if f.chars().all(|c| c.is_ascii_digit()) => {
                    max_depth = Some(parse_count("recursion depth", f)?)
                }
                f => patterns.push(f.to_string()),
            }
        }

        let patterns = if patterns.is_empty() {
            None
        } else {
            Some(build_globset(&patterns)?)
        };
        Ok(Self {
            max_depth,
            patterns,
            include,
        })
    }

    /// True when the walk may descend into a directory called `name`.
    pub fn admits(&self, name: &str) -> bool {
        match &self.patterns {
            None => true,
            Some(set) => set.is_match(name) == self.include,
        }
    }
}

/// Walks a tree, planning each directory with one batch driver.
pub struct Traversal<'a, T: Tree> {
    tree: &'a T,
    driver: &'a mut BatchDriver,
    recursion: &'a Recursion,
}

impl<'a, T: Tree> Traversal<'a, T> {
    pub fn new(tree: &'a T, driver: &'a mut BatchDriver, recursion: &'a Recursion) -> Self {
        Self {
            tree,
            driver,
            recursion,
        }
    }

    /// Visit `root` and its admitted subdirectories. `visit` receives each
    /// directory's plan before the walk descends. Returns `false` when a
    /// plan was aborted by the stop policy.
    pub fn run<F>(&mut self, root: &Path, visit: &mut F) -> Result<bool>
    where
        F: FnMut(&Path, BatchPlan) -> Result<()>,
    {
        self.walk(root, 0, visit)
    }

    fn walk<F>(&mut self, dir: &Path, depth: usize, visit: &mut F) -> Result<bool>
    where
        F: FnMut(&Path, BatchPlan) -> Result<()>,
    {
        self.driver.enter_directory();
        let candidates = self.tree.candidates(dir)?;
        let plan = self.driver.plan(&candidates, &self.tree.view(dir));
        let aborted = plan.aborted;
        visit(dir, plan)?;
        if aborted {
            return Ok(false);
        }

        if self.recursion.max_depth.is_some_and(|max| depth >= max) {
            return Ok(true);
        }
        for name in self.tree.subdirectories(dir)? {
            if !self.recursion.admits(&name) {
                tracing::debug!("not descending into {name}");
                continue;
            }
            if !self.walk(&dir.join(&name), depth + 1, visit)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collision::CollisionScheme;
    use crate::engine::transform::{MatchOptions, NameTransform, NativeProgram};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// Directory path -> (files, subdirectories)
    struct MemoryTree(BTreeMap<PathBuf, (Vec<String>, Vec<String>)>);

    struct NoCollisions;

    impl DirectoryView for NoCollisions {
        fn exists(&self, _name: &str) -> bool {
            false
        }

        fn is_same_entry(&self, _old: &str, _new: &str) -> bool {
            false
        }
    }

    impl Tree for MemoryTree {
        type View = NoCollisions;

        fn candidates(&self, dir: &Path) -> Result<Vec<String>> {
            Ok(self.0.get(dir).map(|(files, _)| files.clone()).unwrap_or_default())
        }

        fn subdirectories(&self, dir: &Path) -> Result<Vec<String>> {
            Ok(self.0.get(dir).map(|(_, dirs)| dirs.clone()).unwrap_or_default())
        }

        fn view(&self, _dir: &Path) -> NoCollisions {
            NoCollisions
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_tree() -> MemoryTree {
        let mut map = BTreeMap::new();
        map.insert(
            PathBuf::from("top"),
            (strings(&["my_Cat", "my_Dog"]), strings(&["X_New", "X_Old"])),
        );
        map.insert(
            PathBuf::from("top/X_New"),
            (strings(&["my_Cat"]), strings(&["deep"])),
        );
        map.insert(PathBuf::from("top/X_New/deep"), (strings(&["my_Eel"]), vec![]));
        map.insert(PathBuf::from("top/X_Old"), (strings(&["my_Dog"]), vec![]));
        MemoryTree(map)
    }

    fn run(recursion: &Recursion) -> Vec<(PathBuf, Vec<String>)> {
        let tree = sample_tree();
        let program = NativeProgram::compile(
            "my_*",
            "my_*::",
            &["I/A///R", "I/5/10/2"],
            &MatchOptions::default(),
        )
        .unwrap();
        let mut driver =
            BatchDriver::new(NameTransform::Native(program), CollisionScheme::default());
        let mut seen = Vec::new();
        Traversal::new(&tree, &mut driver, recursion)
            .run(Path::new("top"), &mut |dir: &Path, plan: BatchPlan| {
                let names = plan.renames.into_iter().map(|(_, new)| new).collect();
                seen.push((dir.to_path_buf(), names));
                Ok(())
            })
            .unwrap();
        seen
    }

    /// Reload counters restart per directory, plain counters keep going
    #[test]
    fn test_reload_at_directory_boundaries() {
        let seen = run(&Recursion::parse("").unwrap());
        assert_eq!(seen[0].1, vec!["my_CatA05", "my_DogB15"]);
        assert_eq!(seen[1].0, PathBuf::from("top/X_New"));
        assert_eq!(seen[1].1, vec!["my_CatA25"]);
        assert_eq!(seen[2].1, vec!["my_EelA35"]);
        assert_eq!(seen[3].1, vec!["my_DogA45"]);
    }

    #[test]
    fn test_depth_limit() {
        let seen = run(&Recursion::parse("1").unwrap());
        let dirs: Vec<_> = seen.iter().map(|(dir, _)| dir.clone()).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("top"),
                PathBuf::from("top/X_New"),
                PathBuf::from("top/X_Old")
            ]
        );
        assert_eq!(run(&Recursion::none()).len(), 1);
    }

    #[test]
    fn test_exclude_and_include_patterns() {
        let seen = run(&Recursion::parse("/X_Old/").unwrap());
        assert!(seen.iter().all(|(dir, _)| !dir.ends_with("X_Old")));
        assert_eq!(seen.len(), 3);

        let seen = run(&Recursion::parse("+/X_Old/").unwrap());
        let dirs: Vec<_> = seen.iter().map(|(dir, _)| dir.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::from("top"), PathBuf::from("top/X_Old")]);
    }

    #[test]
    fn test_sort_orders() {
        let mut names = strings(&["b", "B", "a", "C"]);
        names.sort_by(|a, b| SortOrder::CaseSensitive.compare(a, b));
        assert_eq!(names, strings(&["B", "C", "a", "b"]));
        names.sort_by(|a, b| SortOrder::CaseInsensitive.compare(a, b));
        assert_eq!(names, strings(&["a", "B", "b", "C"]));
        assert_eq!(SortOrder::Unsorted.effective(), SortOrder::CaseSensitive);
        assert_eq!(SortOrder::CaseInsensitive.effective(), SortOrder::CaseInsensitive);
    }
}
