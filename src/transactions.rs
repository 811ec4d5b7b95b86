use std::{fs, marker::PhantomData, path::PathBuf};

/// Undo step for something a transaction created on disk.
#[derive(Debug)]
pub enum RollbackOperation {
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
}
/// Still recording.
pub struct Active;
/// Kept; nothing is undone on drop.
pub struct Committed;
/// Abandoned; everything recorded is undone on drop.
pub struct Canceled;
/// Whether dropping a transaction in this state undoes its work.
pub trait TransactionState {
    const SHOULD_ROLLBACK: bool;
}
impl TransactionState for Active {
    const SHOULD_ROLLBACK: bool = true;
}
impl TransactionState for Committed {
    const SHOULD_ROLLBACK: bool = false;
}
impl TransactionState for Canceled {
    const SHOULD_ROLLBACK: bool = true;
}
/// How an [`Active`] transaction ended.
pub enum FinalTransactionState {
    Committed(Transaction<Committed>),
    Canceled(Transaction<Canceled>),
}
impl FinalTransactionState {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
/// Records files and directories created while exporting a tree to disk.
///
/// An `Active` transaction that is dropped, for instance because an export
/// failed halfway and `?` returned early, removes everything it recorded in
/// reverse order. Only [`Transaction::commit`] keeps the work.
///
/// ```ignore
/// let mut trx = Transaction::<Active>::new();
/// disk::export(tree.root(), destination, &mut trx)?;
/// let done = trx.commit();
/// ```
pub struct Transaction<State: TransactionState> {
    rollback_operations: Vec<RollbackOperation>,
    created: usize,
    state: PhantomData<State>,
}
impl Default for Transaction<Active> {
    fn default() -> Self {
        Self::new()
    }
}
impl Transaction<Active> {
    pub fn new() -> Self {
        Transaction {
            rollback_operations: vec![],
            created: 0,
            state: PhantomData,
        }
    }
    /// Registers the undo step for an entry this transaction just created.
    /// Never register entries that existed before.
    pub fn add_operation(&mut self, operation: RollbackOperation) {
        self.created += 1;
        self.rollback_operations.push(operation);
    }
    /// Keeps everything created so far.
    pub fn commit(mut self) -> Transaction<Committed> {
        self.rollback_operations.clear();

        Transaction {
            rollback_operations: vec![],
            created: self.created,
            state: PhantomData,
        }
    }
    /// Gives up; the returned transaction undoes the recorded work when dropped.
    pub fn cancel(mut self) -> Transaction<Canceled> {
        let rollback_operations = std::mem::take(&mut self.rollback_operations);

        Transaction {
            rollback_operations,
            created: 0,
            state: PhantomData,
        }
    }
}
impl<S: TransactionState> Transaction<S> {
    /// Number of entries created and kept (after commit) or recorded (while active).
    pub fn created(&self) -> usize {
        self.created
    }
}
impl<S: TransactionState> Drop for Transaction<S> {
    fn drop(&mut self) {
        if S::SHOULD_ROLLBACK && !self.rollback_operations.is_empty() {
            log::debug!(
                "rolling back {} created entries",
                self.rollback_operations.len()
            );
            while let Some(operation) = self.rollback_operations.pop() {
                match operation {
                    RollbackOperation::RemoveDir(path) => {
                        log::debug!("removing dir: {}", path.display());
                        let _ = fs::remove_dir_all(&path);
                    }
                    RollbackOperation::RemoveFile(path) => {
                        log::debug!("removing file: {}", path.display());
                        let _ = fs::remove_file(&path);
                    }
                }
            }
        } else if !S::SHOULD_ROLLBACK {
            log::debug!("committed {} created entries", self.created);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropping_active_transaction_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src");
        let file = nested.join("index.ts");
        fs::create_dir(&nested).unwrap();
        fs::write(&file, "x").unwrap();

        {
            let mut trx = Transaction::<Active>::new();
            trx.add_operation(RollbackOperation::RemoveDir(nested.clone()));
            trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        }

        assert!(!file.exists());
        assert!(!nested.exists());
    }

    #[test]
    fn test_committed_transaction_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("README.md");
        fs::write(&file, "x").unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        let committed = trx.commit();

        assert_eq!(committed.created(), 1);
        drop(committed);
        assert!(file.exists());
    }

    #[test]
    fn test_canceled_transaction_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("README.md");
        fs::write(&file, "x").unwrap();

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveFile(file.clone()));
        let outcome = FinalTransactionState::Canceled(trx.cancel());

        assert!(!outcome.is_committed());
        drop(outcome);
        assert!(!file.exists());
    }
}
