use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::{
    command::TreeCommand,
    config::{self, Config},
    disk,
    item::TemplateFolder,
    playground::Playground,
    preview, prompt,
    store::{self, StoreError},
    transactions::{Active, FinalTransactionState, Transaction},
    tree::{Change, DuplicatePolicy, TreeError},
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PlaytreeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] store::StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Disk(#[from] disk::DiskError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] prompt::PromptError),
}

/// Settings shared by every command of one CLI invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    /// `--overwrite` on the command line; otherwise the config decides.
    pub overwrite: bool,
    /// `--yes`: skip confirmation prompts.
    pub assume_yes: bool,
}
impl Session {
    pub fn new(
        config_path: Option<&Path>,
        overwrite: bool,
        assume_yes: bool,
    ) -> Result<Self, PlaytreeError> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::load_or_default(config::CONFIG_FILE_NAME)?,
        };

        Ok(Self {
            config,
            overwrite,
            assume_yes,
        })
    }

    pub fn policy(&self) -> DuplicatePolicy {
        if self.overwrite {
            DuplicatePolicy::Overwrite
        } else {
            self.config.duplicates
        }
    }

    pub fn tree_file(&self, reference: &str) -> PathBuf {
        self.config.tree_file(reference)
    }

    fn confirmed(&self, message: &str) -> Result<bool, PlaytreeError> {
        if self.assume_yes {
            return Ok(true);
        }

        Ok(prompt::confirm(message)?)
    }
}

/// Creates an empty tree file. The root is named after the file unless
/// `root_name` is given.
pub fn new_tree(path: &Path, root_name: Option<&str>) -> Result<(), PlaytreeError> {
    let root_name = root_name
        .map(str::to_string)
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "root".to_string());

    store::create(&root_name, path)?;

    println!("{} {}", "create".green(), path.display());

    Ok(())
}

pub fn show(session: &Session, tree: &str) -> Result<(), PlaytreeError> {
    let tree = store::load(&session.tree_file(tree))?;

    print!("{}", preview::render_tree(tree.root()));

    Ok(())
}

/// Prints the direct children of the folder at `path`.
pub fn list(session: &Session, tree: &str, path: &str) -> Result<(), PlaytreeError> {
    let tree = store::load(&session.tree_file(tree))?;

    let folder = tree.resolve(path)?;

    print!("{}", preview::render_listing(folder));

    Ok(())
}

/// Loads the tree, applies `command` through a [`Playground`], and saves the
/// result. Returns `None` when the user declined a destructive command.
pub fn run(
    session: &Session,
    tree: &str,
    command: TreeCommand,
) -> Result<Option<Change>, PlaytreeError> {
    let file = session.tree_file(tree);
    let loaded = store::load(&file)?.with_policy(session.policy());

    loaded.check_target(&command)?;

    if let Some(message) = prompt::confirmation_message(&command) {
        if !session.confirmed(&message)? {
            println!("{}", "aborted".yellow());
            return Ok(None);
        }
    }

    let mut playground = Playground::new(loaded, |change: &Change, _: &TemplateFolder| {
        preview::print_change(change)
    });

    let change = playground.dispatch(command)?;

    store::save(playground.tree().root(), &file)?;

    Ok(Some(change))
}

/// Builds a tree file from a directory on disk.
pub fn import(directory: &Path, output: &Path) -> Result<(), PlaytreeError> {
    if output.exists() {
        return Err(StoreError::AlreadyExists {
            path: output.to_path_buf(),
        }
        .into());
    }

    let tree = disk::import_dir(directory)?;

    store::save(tree.root(), output)?;

    println!(
        "{} {} ({} nodes)",
        "create".green(),
        output.display(),
        tree.node_count()
    );

    Ok(())
}

/// Previews the tree, asks for confirmation, and writes it below `destination`.
/// A failed export leaves nothing it created behind.
pub fn export(
    session: &Session,
    tree: &str,
    destination: &Path,
) -> Result<FinalTransactionState, PlaytreeError> {
    let tree = store::load(&session.tree_file(tree))?;

    preview::preview_as_tree(tree.root());

    let mut trx = Transaction::<Active>::new();

    let apply = session.assume_yes || prompt::apply_changes()?;

    if apply {
        disk::export(tree.root(), destination, &mut trx)?;

        Ok(FinalTransactionState::Committed(trx.commit()))
    } else {
        Ok(FinalTransactionState::Canceled(trx.cancel()))
    }
}
