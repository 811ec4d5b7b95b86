use colored::Colorize;
use miette::Diagnostic;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

use crate::{
    errors::{FileOperation, IoError},
    item::{FileDraft, FolderDraft, TemplateFolder, TemplateItem},
    path::TreePath,
    transactions::{Active, RollbackOperation, Transaction},
    tree::{TreeError, VirtualFileTree},
    utils::split_file_name,
};

#[derive(Debug, Error, Diagnostic)]
pub enum DiskError {
    #[error("I/O error within disk domain")]
    #[diagnostic(code(playtree::disk::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),

    #[error("'{path}' is not a directory")]
    #[diagnostic(code(playtree::disk::not_a_directory))]
    NotADirectory { path: PathBuf },

    #[error("'{path}' already exists")]
    #[diagnostic(
        code(playtree::disk::already_exists),
        help("Export into an empty directory, or remove the conflicting file")
    )]
    AlreadyExists { path: PathBuf },

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(playtree::disk::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },
}

/// Builds a tree from a directory on disk. The root folder is named after the
/// directory. Symlinks and files that are not UTF-8 text are skipped.
pub fn import_dir(directory: &Path) -> Result<VirtualFileTree, DiskError> {
    if !directory.is_dir() {
        return Err(DiskError::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let root_name = directory
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".to_string());

    let mut tree = VirtualFileTree::empty(root_name);

    // sorted so imports are reproducible across platforms
    for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or_else(|| Path::new("")).to_path_buf();

                Err(IoError::new(FileOperation::ReadDir, path, error.into()))?
            }
        };

        let full_path = entry.path();
        let relative = match full_path.strip_prefix(directory) {
            Ok(r) => r,
            Err(error) => Err(DiskError::StripPrefix {
                path: full_path.to_path_buf(),
                dir: directory.to_path_buf(),
                source: error,
            })?,
        };

        let Some(name) = entry.file_name().to_str() else {
            log::warn!("skipping non UTF-8 name: {}", full_path.display());
            continue;
        };

        let parent = TreePath::from_segments(
            relative
                .parent()
                .into_iter()
                .flat_map(Path::components)
                .map(|component| component.as_os_str().to_string_lossy().to_string()),
        );

        // entries below a skipped directory have no parent in the tree
        if tree.resolve_path(&parent).is_err() {
            continue;
        }

        let file_type = entry.file_type();

        let added = if file_type.is_symlink() {
            log::debug!("skipping symlink: {}", full_path.display());
            continue;
        } else if file_type.is_dir() {
            tree.add_folder(FolderDraft::new(name), &parent.to_string())
        } else {
            let bytes = fs::read(full_path).map_err(|error| IoError::read(full_path, error))?;

            let Ok(content) = String::from_utf8(bytes) else {
                log::warn!("skipping binary file: {}", full_path.display());
                continue;
            };

            let (filename, extension) = split_file_name(name);

            tree.add_file(
                FileDraft::new(filename, extension).with_content(content),
                &parent.to_string(),
            )
        };

        match added {
            Ok(_) => {}
            Err(TreeError::InvalidNode { reason, .. }) => {
                log::warn!("skipping {}: {}", full_path.display(), reason);
            }
            Err(error) => return Err(error.into()),
        }
    }

    log::debug!(
        "imported {} nodes from {}",
        tree.node_count(),
        directory.display()
    );

    Ok(tree)
}

/// Writes the contents of `root` below `destination`: folders become
/// directories and files are written under their display names.
///
/// Existing files are never replaced. Everything created is recorded in `trx`,
/// so dropping it uncommitted after an error removes the partial export.
pub fn export(
    root: &TemplateFolder,
    destination: &Path,
    trx: &mut Transaction<Active>,
) -> Result<(), DiskError> {
    create_directory(trx, destination)?;

    let mut pending: Vec<(&TemplateFolder, PathBuf)> = vec![(root, destination.to_path_buf())];

    while let Some((folder, directory)) = pending.pop() {
        for item in &folder.items {
            match item {
                TemplateItem::Folder(child) => {
                    let path = directory.join(&child.folder_name);

                    create_directory(trx, &path)?;

                    pending.push((child, path));
                }
                TemplateItem::File(file) => {
                    let path = directory.join(file.display_name());

                    write_file(trx, &path, &file.content)?;
                }
            }
        }
    }

    Ok(())
}

/// Creates `path` and any missing parents, recording only the directories
/// that did not exist before.
fn create_directory(trx: &mut Transaction<Active>, path: &Path) -> Result<(), DiskError> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(DiskError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_directory(trx, parent)?;
    }

    fs::create_dir(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))?;

    trx.add_operation(RollbackOperation::RemoveDir(path.to_path_buf()));

    Ok(())
}

fn write_file(trx: &mut Transaction<Active>, path: &Path, contents: &str) -> Result<(), DiskError> {
    let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
            return Err(DiskError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        Err(error) => {
            return Err(IoError::new(FileOperation::Create, path.to_path_buf(), error).into());
        }
    };

    trx.add_operation(RollbackOperation::RemoveFile(path.to_path_buf()));

    file.write_all(contents.as_bytes())
        .map_err(|error| IoError::write(path, error))?;

    println!("{} {}", "create".green(), path.display());

    Ok(())
}
