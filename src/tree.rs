use miette::Diagnostic;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::{
    item::{
        validate_file_name, validate_folder_name, FileDraft, FileRef, FolderDraft, FolderRef,
        NodeKey, NodeKind, TemplateFile, TemplateFolder, TemplateItem,
    },
    path::TreePath,
};

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TreeError {
    #[error("path '{path}' does not resolve to a folder")]
    #[diagnostic(
        code(playtree::tree::path_not_found),
        help("Paths are folder names joined with '/', the empty path is the root")
    )]
    PathNotFound { path: String },

    #[error("{kind} '{name}' already exists in {parent}")]
    #[diagnostic(
        code(playtree::tree::duplicate_name),
        help("Pick another name, or opt into overwriting duplicates")
    )]
    DuplicateName {
        kind: NodeKind,
        name: String,
        parent: String,
    },

    #[error("{kind} '{name}' not found in {parent}")]
    #[diagnostic(code(playtree::tree::not_found))]
    NotFound {
        kind: NodeKind,
        name: String,
        parent: String,
    },

    #[error("invalid {kind}: {reason}")]
    #[diagnostic(code(playtree::tree::invalid_node))]
    InvalidNode { kind: NodeKind, reason: String },
}
impl TreeError {
    fn duplicate(key: &NodeKey, parent: &TreePath) -> Self {
        Self::DuplicateName {
            kind: key.kind(),
            name: key.name(),
            parent: parent.label(),
        }
    }

    fn not_found(key: &NodeKey, parent: &TreePath) -> Self {
        Self::NotFound {
            kind: key.kind(),
            name: key.name(),
            parent: parent.label(),
        }
    }

    /// Adds the folder an invalid node was found in to its reason.
    fn located(self, parent: &TreePath) -> Self {
        match self {
            Self::InvalidNode { kind, reason } => Self::InvalidNode {
                kind,
                reason: format!("{} (in {})", reason, parent.label()),
            },
            other => other,
        }
    }
}

/// What an insert does when a sibling with the same identity already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with [`TreeError::DuplicateName`].
    #[default]
    Reject,
    /// Replace the existing sibling in place, keeping its position.
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Added,
    /// An insert replaced an existing sibling under [`DuplicatePolicy::Overwrite`].
    Replaced,
    /// `removed` counts the node itself and all of its descendants.
    Deleted {
        removed: usize,
    },
    Renamed {
        from: NodeKey,
    },
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub operation: Operation,
    /// Path of the folder holding the affected node.
    pub parent: TreePath,
    /// Key of the affected node after the mutation.
    pub node: NodeKey,
}
impl Change {
    /// Resolved path of the affected node: the folder's own path for folders,
    /// the containing folder for files.
    pub fn path(&self) -> TreePath {
        match &self.node {
            NodeKey::Folder(folder) => self.parent.join(&folder.folder_name),
            NodeKey::File(_) => self.parent.clone(),
        }
    }
}

/// The playground's project tree.
///
/// Every mutation validates its input and the current state before touching
/// anything, so a failed call leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFileTree {
    root: TemplateFolder,
    policy: DuplicatePolicy,
}
impl VirtualFileTree {
    /// Seeds a tree from an existing root, checking every invariant first.
    pub fn new(root: TemplateFolder) -> Result<Self, TreeError> {
        validate(&root)?;

        Ok(Self {
            root,
            policy: DuplicatePolicy::default(),
        })
    }

    pub fn empty(root_name: impl Into<String>) -> Self {
        Self {
            root: TemplateFolder::new(root_name),
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn root(&self) -> &TemplateFolder {
        &self.root
    }

    pub fn into_root(self) -> TemplateFolder {
        self.root
    }

    /// Looks up the folder at `path`. Never mutates.
    pub fn resolve(&self, path: &str) -> Result<&TemplateFolder, TreeError> {
        self.resolve_path(&TreePath::parse(path)?)
    }

    pub fn resolve_path(&self, path: &TreePath) -> Result<&TemplateFolder, TreeError> {
        let mut current = &self.root;

        for segment in path.segments() {
            current = current
                .folder(segment)
                .ok_or_else(|| TreeError::PathNotFound {
                    path: path.to_string(),
                })?;
        }

        Ok(current)
    }

    fn resolve_mut(&mut self, path: &TreePath) -> Result<&mut TemplateFolder, TreeError> {
        let mut current = &mut self.root;

        for segment in path.segments() {
            current = current
                .folder_mut(segment)
                .ok_or_else(|| TreeError::PathNotFound {
                    path: path.to_string(),
                })?;
        }

        Ok(current)
    }

    pub fn file(&self, file: &FileRef, parent_path: &str) -> Result<&TemplateFile, TreeError> {
        let parent = TreePath::parse(parent_path)?;

        self.resolve_path(&parent)?
            .file(file)
            .ok_or_else(|| TreeError::not_found(&NodeKey::File(file.clone()), &parent))
    }

    pub fn folder(
        &self,
        folder: &FolderRef,
        parent_path: &str,
    ) -> Result<&TemplateFolder, TreeError> {
        let parent = TreePath::parse(parent_path)?;

        self.resolve_path(&parent)?
            .folder(&folder.folder_name)
            .ok_or_else(|| TreeError::not_found(&NodeKey::Folder(folder.clone()), &parent))
    }

    pub fn add_file(&mut self, file: FileDraft, parent_path: &str) -> Result<Change, TreeError> {
        file.validate()?;

        let parent = TreePath::parse(parent_path)?;
        let policy = self.policy;
        let folder = self.resolve_mut(&parent)?;
        let key = NodeKey::File(file.key());

        let operation = match (folder.position_of_file(&file.key()), policy) {
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(TreeError::duplicate(&key, &parent));
            }
            (Some(index), DuplicatePolicy::Overwrite) => {
                folder.items[index] = TemplateItem::File(file.into());
                Operation::Replaced
            }
            (None, _) => {
                folder.items.push(TemplateItem::File(file.into()));
                Operation::Added
            }
        };

        log::debug!("{:?} {} under '{}'", operation, key, parent);

        Ok(Change {
            operation,
            parent,
            node: key,
        })
    }

    pub fn add_folder(
        &mut self,
        folder: FolderDraft,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        folder.validate()?;

        let parent = TreePath::parse(parent_path)?;
        let policy = self.policy;
        let target = self.resolve_mut(&parent)?;
        let key = NodeKey::Folder(FolderRef::new(folder.folder_name.clone()));

        let operation = match (target.position_of_folder(&folder.folder_name), policy) {
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(TreeError::duplicate(&key, &parent));
            }
            (Some(index), DuplicatePolicy::Overwrite) => {
                target.items[index] = TemplateItem::Folder(folder.into());
                Operation::Replaced
            }
            (None, _) => {
                target.items.push(TemplateItem::Folder(folder.into()));
                Operation::Added
            }
        };

        log::debug!("{:?} {} under '{}'", operation, key, parent);

        Ok(Change {
            operation,
            parent,
            node: key,
        })
    }

    /// Removes one file. Deleting a file that is not there is an error, not a no-op.
    pub fn delete_file(&mut self, file: &FileRef, parent_path: &str) -> Result<Change, TreeError> {
        let parent = TreePath::parse(parent_path)?;
        let folder = self.resolve_mut(&parent)?;
        let key = NodeKey::File(file.clone());

        let index = folder
            .position_of_file(file)
            .ok_or_else(|| TreeError::not_found(&key, &parent))?;

        folder.items.remove(index);

        log::debug!("deleted {} under '{}'", key, parent);

        Ok(Change {
            operation: Operation::Deleted { removed: 1 },
            parent,
            node: key,
        })
    }

    /// Removes a folder together with its whole subtree.
    pub fn delete_folder(
        &mut self,
        folder: &FolderRef,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        let parent = TreePath::parse(parent_path)?;
        let target = self.resolve_mut(&parent)?;
        let key = NodeKey::Folder(folder.clone());

        let (remaining, removed) = remove_subtree(target, &folder.folder_name)
            .ok_or_else(|| TreeError::not_found(&key, &parent))?;

        *target = remaining;

        log::debug!("deleted {} under '{}' ({} nodes)", key, parent, removed);

        Ok(Change {
            operation: Operation::Deleted { removed },
            parent,
            node: key,
        })
    }

    /// Renames a file in place. Content and position are untouched, and
    /// renaming a file to its current name succeeds without effect.
    pub fn rename_file(
        &mut self,
        file: &FileRef,
        new_filename: &str,
        new_extension: &str,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        validate_file_name(new_filename, new_extension)?;

        let parent = TreePath::parse(parent_path)?;
        let folder = self.resolve_mut(&parent)?;
        let from = NodeKey::File(file.clone());
        let renamed = FileRef::new(new_filename, new_extension);
        let key = NodeKey::File(renamed.clone());

        let index = folder
            .position_of_file(file)
            .ok_or_else(|| TreeError::not_found(&from, &parent))?;

        if renamed != *file && folder.position_of_file(&renamed).is_some() {
            return Err(TreeError::duplicate(&key, &parent));
        }

        if let TemplateItem::File(target) = &mut folder.items[index] {
            target.filename = renamed.filename;
            target.file_extension = renamed.file_extension;
        }

        log::debug!("renamed {} to {} under '{}'", from, key, parent);

        Ok(Change {
            operation: Operation::Renamed { from },
            parent,
            node: key,
        })
    }

    /// Renames a folder in place. Its descendants are not touched; their
    /// paths change because paths are derived from folder names.
    pub fn rename_folder(
        &mut self,
        folder: &FolderRef,
        new_folder_name: &str,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        validate_folder_name(new_folder_name)?;

        let parent = TreePath::parse(parent_path)?;
        let target = self.resolve_mut(&parent)?;
        let from = NodeKey::Folder(folder.clone());
        let key = NodeKey::Folder(FolderRef::new(new_folder_name));

        let index = target
            .position_of_folder(&folder.folder_name)
            .ok_or_else(|| TreeError::not_found(&from, &parent))?;

        if new_folder_name != folder.folder_name
            && target.position_of_folder(new_folder_name).is_some()
        {
            return Err(TreeError::duplicate(&key, &parent));
        }

        if let TemplateItem::Folder(renamed) = &mut target.items[index] {
            renamed.folder_name = new_folder_name.to_string();
        }

        log::debug!("renamed {} to {} under '{}'", from, key, parent);

        Ok(Change {
            operation: Operation::Renamed { from },
            parent,
            node: key,
        })
    }

    /// Depth-first, in insertion order. Each item comes with the path of the
    /// folder holding it.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root)
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }
}

/// Iterator returned by [`VirtualFileTree::walk`].
pub struct Walk<'a> {
    stack: Vec<(TreePath, &'a TemplateItem)>,
}
impl<'a> Walk<'a> {
    fn new(root: &'a TemplateFolder) -> Self {
        let stack = root
            .items
            .iter()
            .rev()
            .map(|item| (TreePath::root(), item))
            .collect();

        Self { stack }
    }
}
impl<'a> Iterator for Walk<'a> {
    type Item = (TreePath, &'a TemplateItem);

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, item) = self.stack.pop()?;

        if let TemplateItem::Folder(folder) = item {
            let path = parent.join(&folder.folder_name);
            self.stack
                .extend(folder.items.iter().rev().map(|child| (path.clone(), child)));
        }

        Some((parent, item))
    }
}

/// Returns a copy of `folder` without its child folder `name`, along with the
/// number of nodes removed (the child plus all of its descendants). `None`
/// when no such child folder exists.
pub fn remove_subtree(folder: &TemplateFolder, name: &str) -> Option<(TemplateFolder, usize)> {
    let index = folder.position_of_folder(name)?;

    let mut remaining = folder.clone();
    let removed = remaining.items.remove(index);

    Some((remaining, removed.subtree_size()))
}

/// Checks names and sibling uniqueness across a whole tree.
pub fn validate(root: &TemplateFolder) -> Result<(), TreeError> {
    let mut stack: Vec<(TreePath, &TemplateFolder)> = vec![(TreePath::root(), root)];

    while let Some((path, folder)) = stack.pop() {
        let mut files: HashSet<FileRef> = HashSet::new();
        let mut folders: HashSet<&str> = HashSet::new();

        for item in &folder.items {
            match item {
                TemplateItem::File(file) => {
                    validate_file_name(&file.filename, &file.file_extension)
                        .map_err(|error| error.located(&path))?;

                    if !files.insert(file.key()) {
                        return Err(TreeError::duplicate(&NodeKey::File(file.key()), &path));
                    }
                }
                TemplateItem::Folder(child) => {
                    validate_folder_name(&child.folder_name)
                        .map_err(|error| error.located(&path))?;

                    if !folders.insert(child.folder_name.as_str()) {
                        return Err(TreeError::duplicate(
                            &NodeKey::Folder(FolderRef::from(child)),
                            &path,
                        ));
                    }

                    stack.push((path.join(&child.folder_name), child));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, ext: &str) -> FileRef {
        FileRef::new(name, ext)
    }

    fn folder(name: &str) -> FolderRef {
        FolderRef::new(name)
    }

    /// root
    /// ├── src
    /// │   ├── index.ts  ("console.log(1)")
    /// │   └── components
    /// │       ├── Button.tsx
    /// │       └── ui
    /// │           └── Card.tsx
    /// ├── package.json
    /// └── Makefile
    fn sample_tree() -> VirtualFileTree {
        let root = TemplateFolder::new("react-ts").with_items([
            TemplateFolder::new("src")
                .with_items([
                    TemplateFile::new("index", "ts")
                        .with_content("console.log(1)")
                        .into(),
                    TemplateFolder::new("components")
                        .with_items([
                            TemplateFile::new("Button", "tsx").into(),
                            TemplateFolder::new("ui")
                                .with_items([TemplateFile::new("Card", "tsx").into()])
                                .into(),
                        ])
                        .into(),
                ])
                .into(),
            TemplateFile::new("package", "json").into(),
            TemplateFile::new("Makefile", "").into(),
        ]);

        VirtualFileTree::new(root).expect("a valid sample tree")
    }

    #[test]
    fn test_scenario_add_folder_to_empty_root() {
        let mut tree = VirtualFileTree::empty("root");

        let change = tree.add_folder(FolderDraft::new("src"), "").unwrap();

        assert_eq!(change.operation, Operation::Added);
        assert_eq!(change.path(), TreePath::parse("src").unwrap());
        assert_eq!(tree.root().items.len(), 1);
        assert_eq!(tree.resolve("src").unwrap(), &TemplateFolder::new("src"));
    }

    #[test]
    fn test_scenario_full_lifecycle() {
        let mut tree = VirtualFileTree::empty("root");
        tree.add_folder(FolderDraft::new("src"), "").unwrap();

        tree.add_file(FileDraft::new("index", "ts"), "src").unwrap();
        let src = tree.resolve("src").unwrap();
        assert_eq!(src.items, vec![TemplateFile::new("index", "ts").into()]);

        let duplicate = tree.add_file(FileDraft::new("index", "ts"), "src");
        assert!(matches!(
            duplicate,
            Err(TreeError::DuplicateName {
                kind: NodeKind::File,
                ..
            })
        ));
        assert_eq!(tree.resolve("src").unwrap().items.len(), 1);

        tree.rename_folder(&folder("src"), "source", "").unwrap();
        assert_eq!(tree.root().items.len(), 1);
        assert!(tree.resolve("source").unwrap().file(&file("index", "ts")).is_some());
        assert!(tree.resolve("src").is_err());

        let change = tree.delete_folder(&folder("source"), "").unwrap();
        assert_eq!(change.operation, Operation::Deleted { removed: 2 });
        assert!(tree.root().items.is_empty());
        assert_eq!(
            tree.resolve("source"),
            Err(TreeError::PathNotFound {
                path: "source".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_rejects_files_and_missing_segments() {
        let tree = sample_tree();

        assert!(tree.resolve("src/components/ui").is_ok());
        assert!(tree.resolve("package").is_err());
        assert!(tree.resolve("src/index").is_err());
        assert!(tree.resolve("src/missing/ui").is_err());
        assert!(tree.resolve("SRC").is_err());
    }

    #[test]
    fn test_add_file_appends_in_insertion_order() {
        let mut tree = sample_tree();

        tree.add_file(FileDraft::new("README", "md"), "").unwrap();

        let last = tree.root().items.last().unwrap();
        assert_eq!(last.name(), "README.md");
    }

    #[test]
    fn test_file_and_folder_may_share_a_name() {
        let mut tree = sample_tree();

        tree.add_folder(FolderDraft::new("Makefile"), "").unwrap();
        tree.add_file(FileDraft::new("src", ""), "").unwrap();

        assert!(tree.resolve("Makefile").is_ok());
        assert!(tree.file(&file("src", ""), "").is_ok());
    }

    #[test]
    fn test_add_under_missing_parent_fails() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let result = tree.add_file(FileDraft::new("a", "ts"), "lib");

        assert_eq!(
            result,
            Err(TreeError::PathNotFound {
                path: "lib".to_string()
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_add_rejects_invalid_drafts() {
        let mut tree = sample_tree();
        let before = tree.clone();

        assert!(matches!(
            tree.add_file(FileDraft::new("", "ts"), "src"),
            Err(TreeError::InvalidNode { .. })
        ));
        assert!(matches!(
            tree.add_folder(FolderDraft::new("a/b"), "src"),
            Err(TreeError::InvalidNode { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_overwrite_policy_replaces_in_place() {
        let mut tree = sample_tree().with_policy(DuplicatePolicy::Overwrite);

        let change = tree
            .add_file(FileDraft::new("index", "ts").with_content("new"), "src")
            .unwrap();

        assert_eq!(change.operation, Operation::Replaced);
        let src = tree.resolve("src").unwrap();
        assert_eq!(src.items.len(), 2);
        assert_eq!(
            src.items[0],
            TemplateFile::new("index", "ts").with_content("new").into()
        );

        tree.add_folder(FolderDraft::new("components"), "src").unwrap();
        let components = tree.resolve("src/components").unwrap();
        assert!(components.items.is_empty());
        assert_eq!(tree.resolve("src").unwrap().items.len(), 2);
    }

    #[test]
    fn test_delete_file_preserves_sibling_order() {
        let mut tree = sample_tree();

        tree.delete_file(&file("package", "json"), "").unwrap();

        let names: Vec<String> = tree.root().items.iter().map(TemplateItem::name).collect();
        assert_eq!(names, vec!["src", "Makefile"]);
    }

    #[test]
    fn test_delete_missing_file_is_reported() {
        let mut tree = sample_tree();
        tree.delete_file(&file("Makefile", ""), "").unwrap();
        let before = tree.clone();

        let again = tree.delete_file(&file("Makefile", ""), "");

        assert_eq!(
            again,
            Err(TreeError::NotFound {
                kind: NodeKind::File,
                name: "Makefile".to_string(),
                parent: "<root>".to_string(),
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_delete_file_does_not_match_folder() {
        let mut tree = sample_tree();
        let before = tree.clone();

        assert!(matches!(
            tree.delete_file(&file("src", ""), ""),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.delete_folder(&folder("Makefile"), ""),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.delete_folder(&folder("ui"), "src/missing"),
            Err(TreeError::PathNotFound { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_add_folder_duplicate_is_rejected() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let result = tree.add_folder(FolderDraft::new("components"), "src");

        assert_eq!(
            result,
            Err(TreeError::DuplicateName {
                kind: NodeKind::Folder,
                name: "components".to_string(),
                parent: "src".to_string(),
            })
        );
        assert_eq!(tree.resolve("src").unwrap().items.len(), 2);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_folder_lookup() {
        let tree = sample_tree();

        assert_eq!(
            tree.folder(&folder("ui"), "src/components").unwrap().items.len(),
            1
        );
        assert!(matches!(
            tree.folder(&folder("index"), "src"),
            Err(TreeError::NotFound {
                kind: NodeKind::Folder,
                ..
            })
        ));
    }

    #[test]
    fn test_delete_folder_removes_whole_subtree() {
        let mut tree = sample_tree();
        let before = tree.node_count();

        let change = tree.delete_folder(&folder("components"), "src").unwrap();

        assert_eq!(change.operation, Operation::Deleted { removed: 4 });
        assert_eq!(tree.node_count(), before - 4);
        assert!(tree.resolve("src/components").is_err());
        assert!(tree.resolve("src/components/ui").is_err());
        assert!(tree
            .walk()
            .all(|(path, _)| !path.starts_with(&TreePath::parse("src/components").unwrap())));
    }

    #[test]
    fn test_rename_file_keeps_content_and_position() {
        let mut tree = sample_tree();

        let change = tree
            .rename_file(&file("index", "ts"), "main", "tsx", "src")
            .unwrap();

        assert_eq!(change.node, NodeKey::File(file("main", "tsx")));
        let src = tree.resolve("src").unwrap();
        assert_eq!(
            src.items[0],
            TemplateFile::new("main", "tsx")
                .with_content("console.log(1)")
                .into()
        );
        assert!(src.file(&file("index", "ts")).is_none());
    }

    #[test]
    fn test_rename_file_to_same_name_is_noop() {
        let mut tree = sample_tree();
        let before = tree.clone();

        tree.rename_file(&file("index", "ts"), "index", "ts", "src")
            .unwrap();

        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_file_onto_sibling_fails() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let result = tree.rename_file(&file("package", "json"), "Makefile", "", "");

        assert!(matches!(result, Err(TreeError::DuplicateName { .. })));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_missing_file_fails() {
        let mut tree = sample_tree();
        let before = tree.clone();

        assert!(matches!(
            tree.rename_file(&file("nope", "ts"), "x", "ts", "src"),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.rename_folder(&folder("nope"), "x", "src"),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.rename_folder(&folder("ui"), "x", "src/widgets"),
            Err(TreeError::PathNotFound { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_folder_moves_descendant_paths() {
        let mut tree = sample_tree();
        let card_before = tree.resolve("src/components/ui").unwrap().clone();

        tree.rename_folder(&folder("components"), "widgets", "src")
            .unwrap();

        assert_eq!(tree.resolve("src/widgets/ui").unwrap(), &card_before);
        assert!(tree.resolve("src/components/ui").is_err());
    }

    #[test]
    fn test_rename_folder_onto_sibling_fails() {
        let mut tree = sample_tree();
        tree.add_folder(FolderDraft::new("lib"), "").unwrap();
        let before = tree.clone();

        let result = tree.rename_folder(&folder("lib"), "src", "");

        assert!(matches!(result, Err(TreeError::DuplicateName { .. })));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_walk_paths_resolve_to_parents() {
        let tree = sample_tree();

        let mut visited = 0;
        for (path, item) in tree.walk() {
            let parent = tree.resolve_path(&path).unwrap();
            assert!(parent.items.contains(item));
            visited += 1;
        }

        assert_eq!(visited, tree.node_count());
        assert_eq!(visited, 8);
    }

    #[test]
    fn test_walk_is_depth_first_in_insertion_order() {
        let tree = sample_tree();

        let names: Vec<String> = tree.walk().map(|(_, item)| item.name()).collect();

        assert_eq!(
            names,
            vec![
                "src",
                "index.ts",
                "components",
                "Button.tsx",
                "ui",
                "Card.tsx",
                "package.json",
                "Makefile"
            ]
        );
    }

    #[test]
    fn test_remove_subtree_is_pure() {
        let tree = sample_tree();
        let src = tree.resolve("src").unwrap();

        let (remaining, removed) = remove_subtree(src, "components").unwrap();

        assert_eq!(removed, 4);
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(src.items.len(), 2);
        assert!(remove_subtree(src, "index").is_none());
    }

    #[test]
    fn test_new_rejects_duplicate_siblings() {
        let root = TemplateFolder::new("root").with_items([
            TemplateFolder::new("lib")
                .with_items([
                    TemplateFile::new("a", "rs").into(),
                    TemplateFile::new("a", "rs").into(),
                ])
                .into(),
        ]);

        assert_eq!(
            VirtualFileTree::new(root),
            Err(TreeError::DuplicateName {
                kind: NodeKind::File,
                name: "a.rs".to_string(),
                parent: "lib".to_string(),
            })
        );
    }

    #[test]
    fn test_new_rejects_empty_names() {
        let root = TemplateFolder::new("root").with_items([TemplateFolder::new("").into()]);

        assert!(matches!(
            VirtualFileTree::new(root),
            Err(TreeError::InvalidNode {
                kind: NodeKind::Folder,
                ..
            })
        ));
    }

    #[test]
    fn test_new_reports_where_an_invalid_name_sits() {
        let root = TemplateFolder::new("root").with_items([TemplateFolder::new("src")
            .with_items([TemplateFolder::new("lib")
                .with_items([TemplateFolder::new("").into()])
                .into()])
            .into()]);

        let error = VirtualFileTree::new(root).unwrap_err();

        assert!(matches!(error, TreeError::InvalidNode { .. }));
        assert!(error.to_string().contains("src/lib"), "{error}");
    }
}
