//! Glob pattern utilities
//!
//! Exclusion lists (`-F`) and recursion filters (`-R`) match bare entry
//! names, never paths, so `*` and `?` behave like shell wildcards.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Create a GlobSet from a list of name patterns
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?;
        builder.add(glob);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_name_patterns() {
        let set = build_globset(&patterns(&["*.lnk", "bak", ".*"])).unwrap();
        assert!(set.is_match("shortcut.lnk"));
        assert!(set.is_match("bak"));
        assert!(set.is_match(".git"));
        assert!(!set.is_match("backup"));
        assert!(!set.is_match("BAK"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(build_globset(&patterns(&["[z-a"])).is_err());
    }
}
