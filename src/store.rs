use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    errors::{FileOperation, IoError},
    item::TemplateFolder,
    tree::{TreeError, VirtualFileTree},
};

#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    #[error("I/O error within store domain")]
    #[diagnostic(code(playtree::store::io))]
    Io(#[from] IoError),

    #[error("Unable to parse tree file at '{path}': {source}")]
    #[diagnostic(
        code(playtree::store::parse_json),
        help("Tree files hold a root folder: {{\"folderName\": ..., \"items\": [...]}}")
    )]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tree file at '{path}' breaks a tree invariant")]
    #[diagnostic(code(playtree::store::invalid_tree))]
    InvalidTree {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: TreeError,
    },

    #[error("Unable to serialize tree for '{path}'")]
    #[diagnostic(code(playtree::store::serialize))]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tree file already exists at '{path}'")]
    #[diagnostic(
        code(playtree::store::already_exists),
        help("Remove it first or pick another path")
    )]
    AlreadyExists { path: PathBuf },
}

/// Reads and validates a tree file.
pub fn load(path: &Path) -> Result<VirtualFileTree, StoreError> {
    let content = fs::read_to_string(path).map_err(|error| IoError::read(path, error))?;

    let root: TemplateFolder =
        serde_json::from_str(&content).map_err(|error| StoreError::ParseJson {
            path: path.to_path_buf(),
            source: error,
        })?;

    let tree = VirtualFileTree::new(root).map_err(|error| StoreError::InvalidTree {
        path: path.to_path_buf(),
        source: error,
    })?;

    log::debug!(
        "loaded tree '{}' with {} nodes from {}",
        tree.root().folder_name,
        tree.node_count(),
        path.display()
    );

    Ok(tree)
}

/// Writes `root` as pretty JSON, replacing any previous content.
pub fn save(root: &TemplateFolder, path: &Path) -> Result<(), StoreError> {
    let mut content =
        serde_json::to_string_pretty(root).map_err(|error| StoreError::Serialize {
            path: path.to_path_buf(),
            source: error,
        })?;
    content.push('\n');

    fs::write(path, content).map_err(|error| IoError::write(path, error))?;

    log::debug!("saved tree '{}' to {}", root.folder_name, path.display());

    Ok(())
}

/// Writes a new, empty tree file. Refuses to replace an existing one.
pub fn create(root_name: &str, path: &Path) -> Result<VirtualFileTree, StoreError> {
    if path.exists() {
        return Err(StoreError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|error| IoError::new(FileOperation::Mkdir, parent.to_path_buf(), error))?;
    }

    let tree = VirtualFileTree::empty(root_name);
    save(tree.root(), path)?;

    Ok(tree)
}
