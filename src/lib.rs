//! A path-addressed virtual file tree for code playground projects.
//!
//! [`tree::VirtualFileTree`] owns a root folder and applies structural edits
//! (add, delete and rename of files and folders) addressed by `/` separated
//! folder paths. Every edit is validated before it is applied, so a rejected
//! edit leaves the tree untouched.
//!
//! The remaining modules are the collaborators around it: JSON persistence,
//! directory import/export, terminal preview and the `playtree` CLI.
pub mod api;
pub mod command;
pub mod config;
pub mod disk;
pub mod errors;
pub mod item;
pub mod path;
pub mod playground;
pub mod preview;
pub mod prompt;
pub mod store;
pub mod transactions;
pub mod tree;
pub mod utils;

pub use command::{apply, TreeCommand};
pub use item::{
    FileDraft, FileRef, FolderDraft, FolderRef, NodeKey, NodeKind, TemplateFile, TemplateFolder,
    TemplateItem,
};
pub use path::TreePath;
pub use playground::{Playground, Selection, TreeListener};
pub use tree::{remove_subtree, Change, DuplicatePolicy, Operation, TreeError, VirtualFileTree};
