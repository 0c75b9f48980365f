//! Stack of active scopes.
//!
//! Navigation descends into nested values: a projection or selection pushes
//! each element while its sub-expression runs, and a compound expression
//! pushes each intermediate result for the next suffix. The innermost entry
//! is what `#this`, bare properties and indexers see. With nothing pushed the
//! root document is active:
//! ```text
//! orders.![items.^[price > 10]]   // `price` is looked up on each item
//! ```

use core::fmt;

/// A LIFO stack of scope values, searched from the innermost entry.
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    scopes: Vec<T>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeStack<T> {
    /// Create a new empty scope stack.
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a scope onto the stack.
    pub fn push(&mut self, scope: T) {
        self.scopes.push(scope);
    }

    /// Pop the topmost scope from the stack.
    ///
    /// Returns an error if the stack is empty.
    pub fn pop(&mut self) -> Result<T, PopError> {
        self.scopes.pop().ok_or(PopError::EmptyStack)
    }

    /// The innermost scope, if any.
    pub fn top(&self) -> Option<&T> {
        self.scopes.last()
    }

    /// The innermost scope, falling back to `base` when the stack is empty.
    pub fn active<'r>(&'r self, base: &'r T) -> &'r T {
        self.top().unwrap_or(base)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Error when trying to pop a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopError {
    /// The stack is empty.
    EmptyStack,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::EmptyStack => write!(f, "Cannot pop from empty scope stack"),
        }
    }
}

impl std::error::Error for PopError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_falls_back_to_base() {
        let stack: ScopeStack<i32> = ScopeStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
        assert_eq!(stack.active(&7), &7);
    }

    #[test]
    fn test_innermost_scope_is_active() {
        let mut stack = ScopeStack::new();
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.active(&0), &2);

        // Popping makes the outer scope visible again
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.active(&0), &1);
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.active(&0), &0);
    }

    #[test]
    fn test_pop_empty_stack_error() {
        let mut stack: ScopeStack<i32> = ScopeStack::new();
        let result = stack.pop();
        assert!(matches!(result, Err(PopError::EmptyStack)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cannot pop from empty scope stack"
        );
    }
}
