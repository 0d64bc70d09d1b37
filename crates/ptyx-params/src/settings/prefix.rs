use std::path::{Path, PathBuf};

/// Rewrite of a leading path component sequence, applied when saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixChange {
    pub find: PathBuf,
    pub replace: PathBuf,
}

impl PathPrefixChange {
    pub fn new(find: impl Into<PathBuf>, replace: impl Into<PathBuf>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// `path` with the prefix replaced, or unchanged when it does not match.
    ///
    /// Matching is component-wise and purely lexical.
    pub fn apply(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.find) {
            Ok(relative) => self.replace.join(relative),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_matching_prefix() {
        let change = PathPrefixChange::new("/beamline/data", "/home/user/data");
        assert_eq!(
            change.apply(Path::new("/beamline/data/scan_0042.h5")),
            PathBuf::from("/home/user/data/scan_0042.h5")
        );
    }

    #[test]
    fn test_apply_is_component_wise() {
        let change = PathPrefixChange::new("/beamline/data", "/mnt");
        let unrelated = Path::new("/beamline/database/scan.h5");
        assert_eq!(change.apply(unrelated), unrelated);
    }
}
