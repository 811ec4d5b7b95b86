use crate::{
    command::TreeCommand,
    item::{FileDraft, FileRef, FolderDraft, FolderRef, NodeKey, TemplateFile, TemplateFolder},
    path::TreePath,
    tree::{Change, Operation, TreeError, VirtualFileTree},
};

/// Receives every successful mutation, e.g. to persist the tree or re-render.
///
/// Rejected mutations are never reported: the tree did not change.
pub trait TreeListener {
    fn tree_changed(&mut self, change: &Change, root: &TemplateFolder);
}
impl<F> TreeListener for F
where
    F: FnMut(&Change, &TemplateFolder),
{
    fn tree_changed(&mut self, change: &Change, root: &TemplateFolder) {
        self(change, root)
    }
}

/// The file currently open in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub parent: TreePath,
    pub file: FileRef,
}

/// A user's editing session over one tree: the entry points a UI calls,
/// the active file, and the listener told about each change.
pub struct Playground<L: TreeListener> {
    tree: VirtualFileTree,
    selection: Option<Selection>,
    listener: L,
}
impl<L: TreeListener> Playground<L> {
    pub fn new(tree: VirtualFileTree, listener: L) -> Self {
        Self {
            tree,
            selection: None,
            listener,
        }
    }

    pub fn tree(&self) -> &VirtualFileTree {
        &self.tree
    }

    pub fn into_tree(self) -> VirtualFileTree {
        self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_file(&self) -> Option<&TemplateFile> {
        let selection = self.selection.as_ref()?;

        self.tree
            .resolve_path(&selection.parent)
            .ok()?
            .file(&selection.file)
    }

    /// Marks a file as active. Does not touch the tree.
    pub fn on_file_select(
        &mut self,
        file: &FileRef,
        parent_path: &str,
    ) -> Result<&TemplateFile, TreeError> {
        let parent = TreePath::parse(parent_path)?;
        let selected = self.tree.file(file, parent_path)?;

        self.selection = Some(Selection {
            parent,
            file: file.clone(),
        });

        Ok(selected)
    }

    pub fn on_add_file(&mut self, file: FileDraft, parent_path: &str) -> Result<Change, TreeError> {
        let change = self.tree.add_file(file, parent_path)?;
        Ok(self.committed(change))
    }

    pub fn on_add_folder(
        &mut self,
        folder: FolderDraft,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        let change = self.tree.add_folder(folder, parent_path)?;
        Ok(self.committed(change))
    }

    pub fn on_delete_file(&mut self, file: &FileRef, parent_path: &str) -> Result<Change, TreeError> {
        let change = self.tree.delete_file(file, parent_path)?;
        Ok(self.committed(change))
    }

    pub fn on_delete_folder(
        &mut self,
        folder: &FolderRef,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        let change = self.tree.delete_folder(folder, parent_path)?;
        Ok(self.committed(change))
    }

    pub fn on_rename_file(
        &mut self,
        file: &FileRef,
        new_filename: &str,
        new_extension: &str,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        let change = self
            .tree
            .rename_file(file, new_filename, new_extension, parent_path)?;
        Ok(self.committed(change))
    }

    pub fn on_rename_folder(
        &mut self,
        folder: &FolderRef,
        new_folder_name: &str,
        parent_path: &str,
    ) -> Result<Change, TreeError> {
        let change = self
            .tree
            .rename_folder(folder, new_folder_name, parent_path)?;
        Ok(self.committed(change))
    }

    /// Routes a [`TreeCommand`] to the matching `on_*` entry point.
    pub fn dispatch(&mut self, command: TreeCommand) -> Result<Change, TreeError> {
        match command {
            TreeCommand::AddFile { file, parent } => self.on_add_file(file, &parent),
            TreeCommand::AddFolder { folder, parent } => self.on_add_folder(folder, &parent),
            TreeCommand::DeleteFile { file, parent } => self.on_delete_file(&file, &parent),
            TreeCommand::DeleteFolder { folder, parent } => {
                self.on_delete_folder(&folder, &parent)
            }
            TreeCommand::RenameFile {
                file,
                new_filename,
                new_extension,
                parent,
            } => self.on_rename_file(&file, &new_filename, &new_extension, &parent),
            TreeCommand::RenameFolder {
                folder,
                new_folder_name,
                parent,
            } => self.on_rename_folder(&folder, &new_folder_name, &parent),
        }
    }

    fn committed(&mut self, change: Change) -> Change {
        self.follow_selection(&change);
        self.listener.tree_changed(&change, self.tree.root());
        change
    }

    /// Keeps the selection pointing at the same file after renames, and drops
    /// it once the file is gone.
    fn follow_selection(&mut self, change: &Change) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        match (&change.operation, &change.node) {
            (Operation::Renamed { from: NodeKey::File(old) }, NodeKey::File(new)) => {
                if selection.parent == change.parent && selection.file == *old {
                    selection.file = new.clone();
                }
            }
            (Operation::Renamed { from: NodeKey::Folder(old) }, NodeKey::Folder(new)) => {
                let from = change.parent.join(&old.folder_name);
                let to = change.parent.join(&new.folder_name);

                if let Some(moved) = selection.parent.rebase(&from, &to) {
                    log::debug!("selection moved from '{}' to '{}'", selection.parent, moved);
                    selection.parent = moved;
                }
            }
            (Operation::Deleted { .. }, NodeKey::File(file)) => {
                if selection.parent == change.parent && selection.file == *file {
                    self.selection = None;
                }
            }
            (Operation::Deleted { .. } | Operation::Replaced, NodeKey::Folder(_)) => {
                if selection.parent.starts_with(&change.path()) {
                    self.selection = None;
                }
            }
            _ => {}
        }
    }
}
