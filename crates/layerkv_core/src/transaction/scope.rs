//! Stack of open transaction scopes.

use crate::types::TransactionId;

/// The path of open transactions from the outermost (bottom) to the active
/// one (top).
///
/// Only one child of a scope can be open at a time, so the scope tree
/// degenerates to this stack: each entry's parent is the entry below it,
/// and the bottom entry's parent is the root.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    stack: Vec<TransactionId>,
}

impl ScopeStack {
    pub(crate) fn push(&mut self, txid: TransactionId) {
        self.stack.push(txid);
    }

    pub(crate) fn pop(&mut self) -> Option<TransactionId> {
        self.stack.pop()
    }

    pub(crate) fn active(&self) -> Option<TransactionId> {
        self.stack.last().copied()
    }

    /// Returns the parent of an open transaction, or `None` if `txid` is
    /// outermost or not open.
    pub(crate) fn parent(&self, txid: TransactionId) -> Option<TransactionId> {
        let pos = self.stack.iter().position(|&id| id == txid)?;
        pos.checked_sub(1).map(|p| self.stack[p])
    }

    pub(crate) fn contains(&self, txid: TransactionId) -> bool {
        self.stack.contains(&txid)
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub(crate) fn path(&self) -> &[TransactionId] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_chain() {
        let outer = TransactionId::generate();
        let inner = TransactionId::generate();
        let mut scopes = ScopeStack::default();
        scopes.push(outer);
        scopes.push(inner);

        assert_eq!(scopes.active(), Some(inner));
        assert_eq!(scopes.parent(inner), Some(outer));
        assert_eq!(scopes.parent(outer), None);
        assert_eq!(scopes.depth(), 2);
        assert_eq!(scopes.path(), &[outer, inner]);
    }

    #[test]
    fn pop_returns_innermost() {
        let outer = TransactionId::generate();
        let inner = TransactionId::generate();
        let mut scopes = ScopeStack::default();
        scopes.push(outer);
        scopes.push(inner);

        assert_eq!(scopes.pop(), Some(inner));
        assert!(!scopes.contains(inner));
        assert_eq!(scopes.active(), Some(outer));
        assert_eq!(scopes.pop(), Some(outer));
        assert_eq!(scopes.pop(), None);
        assert!(scopes.is_empty());
    }
}
