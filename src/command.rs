use crate::{
    item::{FileDraft, FileRef, FolderDraft, FolderRef, TemplateFolder},
    tree::{Change, DuplicatePolicy, TreeError, VirtualFileTree},
};

/// A structural edit, addressed by the path of the folder it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    AddFile {
        file: FileDraft,
        parent: String,
    },
    AddFolder {
        folder: FolderDraft,
        parent: String,
    },
    DeleteFile {
        file: FileRef,
        parent: String,
    },
    DeleteFolder {
        folder: FolderRef,
        parent: String,
    },
    RenameFile {
        file: FileRef,
        new_filename: String,
        new_extension: String,
        parent: String,
    },
    RenameFolder {
        folder: FolderRef,
        new_folder_name: String,
        parent: String,
    },
}
impl TreeCommand {
    pub fn parent(&self) -> &str {
        match self {
            Self::AddFile { parent, .. }
            | Self::AddFolder { parent, .. }
            | Self::DeleteFile { parent, .. }
            | Self::DeleteFolder { parent, .. }
            | Self::RenameFile { parent, .. }
            | Self::RenameFolder { parent, .. } => parent,
        }
    }

    /// Deletes cannot be undone; callers usually confirm them first.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::DeleteFile { .. } | Self::DeleteFolder { .. })
    }
}

impl VirtualFileTree {
    /// Checks that the node a command addresses is there, without changing
    /// anything: the parent folder for adds, the node itself otherwise.
    pub fn check_target(&self, command: &TreeCommand) -> Result<(), TreeError> {
        match command {
            TreeCommand::AddFile { parent, .. } | TreeCommand::AddFolder { parent, .. } => {
                self.resolve(parent).map(|_| ())
            }
            TreeCommand::DeleteFile { file, parent }
            | TreeCommand::RenameFile { file, parent, .. } => self.file(file, parent).map(|_| ()),
            TreeCommand::DeleteFolder { folder, parent }
            | TreeCommand::RenameFolder { folder, parent, .. } => {
                self.folder(folder, parent).map(|_| ())
            }
        }
    }

    pub fn execute(&mut self, command: TreeCommand) -> Result<Change, TreeError> {
        match command {
            TreeCommand::AddFile { file, parent } => self.add_file(file, &parent),
            TreeCommand::AddFolder { folder, parent } => self.add_folder(folder, &parent),
            TreeCommand::DeleteFile { file, parent } => self.delete_file(&file, &parent),
            TreeCommand::DeleteFolder { folder, parent } => self.delete_folder(&folder, &parent),
            TreeCommand::RenameFile {
                file,
                new_filename,
                new_extension,
                parent,
            } => self.rename_file(&file, &new_filename, &new_extension, &parent),
            TreeCommand::RenameFolder {
                folder,
                new_folder_name,
                parent,
            } => self.rename_folder(&folder, &new_folder_name, &parent),
        }
    }
}

/// Applies `command` to a copy of `root`. The input is never modified; the
/// caller keeps the returned tree on success and its old one on failure.
pub fn apply(
    root: &TemplateFolder,
    command: TreeCommand,
    policy: DuplicatePolicy,
) -> Result<(TemplateFolder, Change), TreeError> {
    let mut tree = VirtualFileTree::new(root.clone())?.with_policy(policy);

    let change = tree.execute(command)?;

    Ok((tree.into_root(), change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        item::{TemplateFile, TemplateItem},
        tree::Operation,
    };

    fn base() -> TemplateFolder {
        TemplateFolder::new("root").with_items([TemplateItem::Folder(
            TemplateFolder::new("src").with_items([TemplateFile::new("index", "ts").into()]),
        )])
    }

    #[test]
    fn test_apply_returns_new_tree_and_keeps_input() {
        let root = base();

        let (next, change) = apply(
            &root,
            TreeCommand::AddFile {
                file: FileDraft::new("app", "tsx"),
                parent: "src".to_string(),
            },
            DuplicatePolicy::Reject,
        )
        .unwrap();

        assert_eq!(change.operation, Operation::Added);
        assert_eq!(next.folder("src").unwrap().items.len(), 2);
        assert_eq!(root, base());
    }

    #[test]
    fn test_apply_error_leaves_no_new_tree() {
        let root = base();

        let result = apply(
            &root,
            TreeCommand::RenameFolder {
                folder: FolderRef::new("lib"),
                new_folder_name: "src".to_string(),
                parent: String::new(),
            },
            DuplicatePolicy::Reject,
        );

        assert!(matches!(result, Err(TreeError::NotFound { .. })));
        assert_eq!(root, base());
    }

    #[test]
    fn test_apply_honours_policy() {
        let command = TreeCommand::AddFile {
            file: FileDraft::new("index", "ts").with_content("v2"),
            parent: "src".to_string(),
        };

        assert!(apply(&base(), command.clone(), DuplicatePolicy::Reject).is_err());

        let (next, change) = apply(&base(), command, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(change.operation, Operation::Replaced);
        assert_eq!(
            next.folder("src").unwrap().items,
            vec![TemplateFile::new("index", "ts").with_content("v2").into()]
        );
    }

    #[test]
    fn test_check_target_does_not_mutate() {
        let tree = VirtualFileTree::new(base()).unwrap();

        let present = TreeCommand::DeleteFile {
            file: FileRef::new("index", "ts"),
            parent: "src".to_string(),
        };
        let missing = TreeCommand::DeleteFolder {
            folder: FolderRef::new("lib"),
            parent: "src".to_string(),
        };
        let bad_parent = TreeCommand::AddFolder {
            folder: FolderDraft::new("lib"),
            parent: "lib".to_string(),
        };

        assert_eq!(tree.check_target(&present), Ok(()));
        assert!(matches!(
            tree.check_target(&missing),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            tree.check_target(&bad_parent),
            Err(TreeError::PathNotFound { .. })
        ));
        assert_eq!(tree.root(), &base());
    }

    #[test]
    fn test_only_deletes_are_destructive() {
        let delete = TreeCommand::DeleteFolder {
            folder: FolderRef::new("src"),
            parent: String::new(),
        };
        let add = TreeCommand::AddFolder {
            folder: FolderDraft::new("lib"),
            parent: "src".to_string(),
        };

        assert!(delete.is_destructive());
        assert!(!add.is_destructive());
        assert_eq!(add.parent(), "src");
    }
}
