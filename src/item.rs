use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tree::TreeError;

/// Kind of a node. Files and folders live in disjoint name spaces within a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}
impl NodeKind {
    fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}
impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file of a playground project. Its identity within a folder is
/// `(filename, file_extension)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    pub filename: String,
    /// Empty for extensionless files such as `Makefile`.
    #[serde(default)]
    pub file_extension: String,
    #[serde(default)]
    pub content: String,
}
impl TemplateFile {
    pub fn new(filename: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_extension: file_extension.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Name as shown to users and written to disk: `index.ts`, or `Makefile`
    /// when the extension is empty.
    pub fn display_name(&self) -> String {
        display_name(&self.filename, &self.file_extension)
    }

    pub fn key(&self) -> FileRef {
        FileRef::new(self.filename.clone(), self.file_extension.clone())
    }

    pub fn is(&self, file: &FileRef) -> bool {
        self.filename == file.filename && self.file_extension == file.file_extension
    }
}

/// A folder and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFolder {
    pub folder_name: String,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
}
impl TemplateFolder {
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = TemplateItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.items.iter().filter_map(TemplateItem::as_file)
    }

    pub fn folders(&self) -> impl Iterator<Item = &TemplateFolder> {
        self.items.iter().filter_map(TemplateItem::as_folder)
    }

    pub fn file(&self, file: &FileRef) -> Option<&TemplateFile> {
        self.files().find(|candidate| candidate.is(file))
    }

    pub fn folder(&self, folder_name: &str) -> Option<&TemplateFolder> {
        self.folders()
            .find(|candidate| candidate.folder_name == folder_name)
    }

    pub fn folder_mut(&mut self, folder_name: &str) -> Option<&mut TemplateFolder> {
        self.items.iter_mut().find_map(|item| match item {
            TemplateItem::Folder(folder) if folder.folder_name == folder_name => Some(folder),
            _ => None,
        })
    }

    pub(crate) fn position_of_file(&self, file: &FileRef) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.as_file().is_some_and(|candidate| candidate.is(file)))
    }

    pub(crate) fn position_of_folder(&self, folder_name: &str) -> Option<usize> {
        self.items.iter().position(|item| {
            item.as_folder()
                .is_some_and(|candidate| candidate.folder_name == folder_name)
        })
    }

    /// Number of nodes below this folder, at any depth.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&TemplateFolder> = vec![self];

        while let Some(folder) = stack.pop() {
            count += folder.items.len();
            stack.extend(folder.folders());
        }

        count
    }
}

/// A node of the tree, tagged by kind when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TemplateItem {
    File(TemplateFile),
    Folder(TemplateFolder),
}
impl TemplateItem {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::File(file) => file.display_name(),
            Self::Folder(folder) => folder.folder_name.clone(),
        }
    }

    pub fn as_file(&self) -> Option<&TemplateFile> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&TemplateFolder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    /// The node itself plus everything below it.
    pub fn subtree_size(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Folder(folder) => 1 + folder.descendant_count(),
        }
    }
}
impl From<TemplateFile> for TemplateItem {
    fn from(file: TemplateFile) -> Self {
        Self::File(file)
    }
}
impl From<TemplateFolder> for TemplateItem {
    fn from(folder: TemplateFolder) -> Self {
        Self::Folder(folder)
    }
}

/// Data needed to create a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDraft {
    pub filename: String,
    pub file_extension: String,
    pub content: String,
}
impl FileDraft {
    pub fn new(filename: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_extension: file_extension.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn key(&self) -> FileRef {
        FileRef::new(self.filename.clone(), self.file_extension.clone())
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        validate_file_name(&self.filename, &self.file_extension)
    }
}
impl From<FileDraft> for TemplateFile {
    fn from(draft: FileDraft) -> Self {
        TemplateFile::new(draft.filename, draft.file_extension).with_content(draft.content)
    }
}

/// Data needed to create a folder. New folders always start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDraft {
    pub folder_name: String,
}
impl FolderDraft {
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        validate_folder_name(&self.folder_name)
    }
}
impl From<FolderDraft> for TemplateFolder {
    fn from(draft: FolderDraft) -> Self {
        TemplateFolder::new(draft.folder_name)
    }
}

/// Identifies an existing file within its parent folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    pub filename: String,
    pub file_extension: String,
}
impl FileRef {
    pub fn new(filename: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_extension: file_extension.into(),
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.filename, &self.file_extension)
    }
}
impl From<&TemplateFile> for FileRef {
    fn from(file: &TemplateFile) -> Self {
        file.key()
    }
}

/// Identifies an existing folder within its parent folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRef {
    pub folder_name: String,
}
impl FolderRef {
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
        }
    }
}
impl From<&TemplateFolder> for FolderRef {
    fn from(folder: &TemplateFolder) -> Self {
        FolderRef::new(folder.folder_name.clone())
    }
}

/// Identity key of any node within its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    File(FileRef),
    Folder(FolderRef),
}
impl NodeKey {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::File(file) => file.display_name(),
            Self::Folder(folder) => folder.folder_name.clone(),
        }
    }
}
impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.name())
    }
}

fn display_name(filename: &str, file_extension: &str) -> String {
    if file_extension.is_empty() {
        filename.to_string()
    } else {
        format!("{}.{}", filename, file_extension)
    }
}

lazy_static::lazy_static! {
    // a single path segment: no separators and no NUL
    static ref SEGMENT_REGEX: regex::Regex =
        regex::Regex::new(r"^[^/\\\x00]+$").expect("a valid regex pattern");
}

fn check_segment(kind: NodeKind, field: &str, value: &str) -> Result<(), TreeError> {
    if value.is_empty() {
        return Err(TreeError::InvalidNode {
            kind,
            reason: format!("{} must not be empty", field),
        });
    }
    if value == "." || value == ".." {
        return Err(TreeError::InvalidNode {
            kind,
            reason: format!("{} must not be '{}'", field, value),
        });
    }
    if !SEGMENT_REGEX.is_match(value) {
        return Err(TreeError::InvalidNode {
            kind,
            reason: format!("{} '{}' contains a path separator or NUL", field, value),
        });
    }

    Ok(())
}

pub fn validate_file_name(filename: &str, file_extension: &str) -> Result<(), TreeError> {
    check_segment(NodeKind::File, "filename", filename)?;

    if !file_extension.is_empty() {
        check_segment(NodeKind::File, "file extension", file_extension)?;
    }

    Ok(())
}

pub fn validate_folder_name(folder_name: &str) -> Result<(), TreeError> {
    check_segment(NodeKind::Folder, "folder name", folder_name)
}
