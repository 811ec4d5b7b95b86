use std::{fmt, str::FromStr};

use crate::tree::TreeError;

/// Location of a folder: the folder names from the root down, excluding the
/// root's own name. The empty path is the root.
///
/// Paths are never stored on nodes. They are computed while walking the tree,
/// so renaming a folder moves every descendant without touching it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath {
    segments: Vec<String>,
}
impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a `/` separated path. An empty string is the root; any empty
    /// segment (`"a//b"`, `"/a"`, `"a/"`) cannot name a folder.
    pub fn parse(path: &str) -> Result<Self, TreeError> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = path.split('/').map(str::to_string).collect();

        if segments.iter().any(String::is_empty) {
            return Err(TreeError::PathNotFound {
                path: path.to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn join(&self, folder_name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(folder_name.to_string());
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &TreePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Replaces `from` with `to` at the front of this path, or `None` when
    /// this path does not live under `from`.
    pub fn rebase(&self, from: &TreePath, to: &TreePath) -> Option<Self> {
        let rest = self.segments.strip_prefix(from.segments.as_slice())?;

        let mut segments = to.segments.clone();
        segments.extend_from_slice(rest);

        Some(Self { segments })
    }

    /// Human readable form for messages, where the root has no visible path.
    pub fn label(&self) -> String {
        if self.is_root() {
            "<root>".to_string()
        } else {
            self.to_string()
        }
    }
}
impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
impl FromStr for TreePath {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_root() {
        let path = TreePath::parse("").expect("root path");

        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
        assert_eq!(path.label(), "<root>");
    }

    #[test]
    fn test_parse_round_trips_display() {
        let path = TreePath::parse("src/components/ui").expect("valid path");

        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "src/components/ui");
        assert_eq!(path.parent(), Some(TreePath::parse("src/components").unwrap()));
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["/src", "src/", "src//lib", "/"] {
            assert_eq!(
                TreePath::parse(raw),
                Err(TreeError::PathNotFound {
                    path: raw.to_string()
                }),
                "{raw} should not parse"
            );
        }
    }

    #[test]
    fn test_rebase_moves_descendants_only() {
        let from = TreePath::parse("src").unwrap();
        let to = TreePath::parse("source").unwrap();

        let nested = TreePath::parse("src/lib").unwrap();
        assert_eq!(
            nested.rebase(&from, &to),
            Some(TreePath::parse("source/lib").unwrap())
        );

        let sibling = TreePath::parse("srcs/lib").unwrap();
        assert_eq!(sibling.rebase(&from, &to), None);
        assert!(!sibling.starts_with(&from));
    }
}
