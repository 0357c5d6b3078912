//! Path utilities and the traversal exclusion list

use std::path::{Path, PathBuf};

/// Pseudo filesystems, caches, temp dirs and mount points never descended into
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "/proc",
    "/sys",
    "/dev",
    "/run",
    "/tmp",
    "/var/cache",
    "/var/lib/docker",
    "/snap",
    "/mnt",
    "/media",
];

/// Fixed set of absolute path prefixes pruned from every traversal.
///
/// Matching is component-wise prefix matching, so `/proc` excludes
/// `/proc/1/maps` but not `/procfs`.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    prefixes: Vec<PathBuf>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDES.iter().map(PathBuf::from))
    }
}

impl ExclusionFilter {
    pub fn new(prefixes: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Add extra prefixes to the list
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        self.prefixes.extend(extra);
        self
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Narrow the filter for a traversal starting at `root`.
    ///
    /// A prefix that contains the root itself is dropped: an explicitly chosen
    /// root such as `/tmp/fixture` is searched even though `/tmp` is excluded
    /// when reached from `/`.
    pub fn for_root(&self, root: &Path) -> Self {
        Self {
            prefixes: self
                .prefixes
                .iter()
                .filter(|prefix| !root.starts_with(prefix))
                .cloned()
                .collect(),
        }
    }

    /// True when `path` must be pruned
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_pseudo_filesystems() {
        let filter = ExclusionFilter::default();
        assert!(filter.is_excluded(Path::new("/proc")));
        assert!(filter.is_excluded(Path::new("/proc/self/environ")));
        assert!(filter.is_excluded(Path::new("/var/lib/docker/overlay2")));
        assert!(!filter.is_excluded(Path::new("/var/lib/dpkg")));
        assert!(!filter.is_excluded(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_prefix_match_is_component_wise() {
        let filter = ExclusionFilter::default();
        assert!(!filter.is_excluded(Path::new("/procfs/file")));
        assert!(!filter.is_excluded(Path::new("/devices")));
    }

    #[test]
    fn test_for_root_drops_enclosing_prefixes() {
        let filter = ExclusionFilter::default().for_root(Path::new("/tmp/fixture"));
        assert!(!filter.is_excluded(Path::new("/tmp/fixture/a.txt")));
        assert!(filter.is_excluded(Path::new("/proc/1")));

        let from_slash = ExclusionFilter::default().for_root(Path::new("/"));
        assert!(from_slash.is_excluded(Path::new("/tmp/fixture/a.txt")));
    }

    #[test]
    fn test_with_extra() {
        let filter = ExclusionFilter::default().with_extra([PathBuf::from("/opt/huge")]);
        assert!(filter.is_excluded(Path::new("/opt/huge/x")));
        assert!(filter.prefixes().len() > DEFAULT_EXCLUDES.len());
    }
}
