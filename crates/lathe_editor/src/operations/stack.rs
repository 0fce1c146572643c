//! Undo/redo operation stack with transaction support.
//!
//! Pushing an operation executes it immediately. Operations can be grouped
//! into transactions for atomic multi-step edits.

use lathe_scene::Scene;

use super::{GroupedOperation, Operation, OperationError, OperationResult};

/// Operations collected while a transaction is open.
struct Transaction {
    name: String,
    operations: Vec<Box<dyn Operation>>,
}

/// Linear undo/redo history.
///
/// The undo stack holds executed operations, most recent last; the redo
/// stack holds undone ones. Pushing a new operation clears the redo stack.
pub struct OperationStack {
    /// Operations that can be undone
    undo_stack: Vec<Box<dyn Operation>>,
    /// Operations that can be redone
    redo_stack: Vec<Box<dyn Operation>>,
    /// Maximum history size
    capacity: usize,
    /// Current open transaction
    current_transaction: Option<Transaction>,
    /// Whether history has changed since the last save
    dirty: bool,
}

impl Default for OperationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationStack {
    /// Default maximum history size.
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            current_transaction: None,
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Execute `op` and record it.
    ///
    /// On failure nothing is recorded and the error is returned. While a
    /// transaction is open the operation joins the transaction instead.
    pub fn push(&mut self, mut op: Box<dyn Operation>, scene: &mut Scene) -> OperationResult {
        if let Err(err) = op.execute(scene) {
            log::warn!("Operation '{}' failed: {}", op.description(), err);
            return Err(err);
        }
        log::debug!("Executed '{}'", op.description());

        if let Some(transaction) = &mut self.current_transaction {
            transaction.operations.push(op);
        } else {
            self.record(op);
        }
        Ok(())
    }

    fn record(&mut self, op: Box<dyn Operation>) {
        self.undo_stack.push(op);
        self.redo_stack.clear();
        self.dirty = true;

        if self.undo_stack.len() > self.capacity {
            let excess = self.undo_stack.len() - self.capacity;
            self.undo_stack.drain(..excess);
        }
    }

    /// Undo the most recent operation. Returns `Ok(false)` when there is
    /// nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> OperationResult<bool> {
        self.ensure_no_transaction()?;

        let Some(mut op) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = op.undo(scene) {
            log::error!("Undo of '{}' failed: {}", op.description(), err);
            self.undo_stack.push(op);
            return Err(err);
        }

        log::debug!("Undid '{}'", op.description());
        self.redo_stack.push(op);
        self.dirty = true;
        Ok(true)
    }

    /// Re-execute the most recently undone operation. Returns `Ok(false)`
    /// when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> OperationResult<bool> {
        self.ensure_no_transaction()?;

        let Some(mut op) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = op.execute(scene) {
            log::error!("Redo of '{}' failed: {}", op.description(), err);
            self.redo_stack.push(op);
            return Err(err);
        }

        log::debug!("Redid '{}'", op.description());
        self.undo_stack.push(op);
        self.dirty = true;
        Ok(true)
    }

    fn ensure_no_transaction(&self) -> OperationResult {
        match &self.current_transaction {
            Some(transaction) => Err(OperationError::TransactionOpen(transaction.name.clone())),
            None => Ok(()),
        }
    }

    /// Begin a new transaction.
    /// Operations pushed during a transaction are grouped as one undo unit.
    pub fn begin_transaction(&mut self, name: impl Into<String>) {
        if let Some(open) = &self.current_transaction {
            log::warn!("Beginning transaction while '{}' is still open", open.name);
        }
        self.current_transaction = Some(Transaction {
            name: name.into(),
            operations: Vec::new(),
        });
    }

    /// Commit the current transaction as a single [`GroupedOperation`].
    /// Empty transactions leave no history entry.
    pub fn commit_transaction(&mut self) {
        if let Some(transaction) = self.current_transaction.take() {
            if !transaction.operations.is_empty() {
                let group = GroupedOperation::with_children(transaction.name, transaction.operations);
                self.record(Box::new(group));
            }
        }
    }

    /// Undo everything pushed since the transaction began and discard it.
    pub fn rollback_transaction(&mut self, scene: &mut Scene) -> OperationResult {
        let Some(transaction) = self.current_transaction.take() else {
            return Ok(());
        };

        let mut result = Ok(());
        for mut op in transaction.operations.into_iter().rev() {
            if let Err(err) = op.undo(scene) {
                log::error!("Rollback of '{}' failed: {}", op.description(), err);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Check if a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.current_transaction.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the next undo operation.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|op| op.description())
    }

    /// Get the description of the next redo operation.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|op| op.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark as saved (clears dirty flag).
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_transaction = None;
        self.dirty = false;
    }
}
