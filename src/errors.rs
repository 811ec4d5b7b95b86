use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("reading a directory")]
    ReadDir,
    #[error("writing a file")]
    Write,
    #[error("creating a file")]
    Create,
    #[error("creating a directory")]
    Mkdir,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(playtree::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }

    pub fn read(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::new(FileOperation::Read, path.into(), error)
    }

    pub fn write(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::new(FileOperation::Write, path.into(), error)
    }
}
