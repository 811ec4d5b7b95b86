use inquire::{Confirm, InquireError};
use miette::Diagnostic;
use thiserror::Error;

use crate::command::TreeCommand;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Failed to read an answer from the terminal")]
    #[diagnostic(
        code(playtree::prompt::inquire),
        help("Pass --yes to skip confirmation when not running in a terminal")
    )]
    Inquire(#[from] InquireError),
}

/// Question asked before a destructive command runs, or `None` when the
/// command needs no confirmation.
pub fn confirmation_message(command: &TreeCommand) -> Option<String> {
    match command {
        TreeCommand::DeleteFile { file, .. } => Some(format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            file.display_name()
        )),
        TreeCommand::DeleteFolder { folder, .. } => Some(format!(
            "Are you sure you want to delete \"{}\" and all its contents? This action cannot be undone.",
            folder.folder_name
        )),
        _ => None,
    }
}

pub fn confirm(message: &str) -> Result<bool, PromptError> {
    let answer = Confirm::new(message).with_default(false).prompt()?;

    Ok(answer)
}

pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new("Apply changes?")
        .with_default(false)
        .with_help_message("Writes the previewed tree to disk")
        .prompt()?;

    Ok(answer)
}
