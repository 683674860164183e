//! Transaction manager configuration.

/// What `commit` and `rollback` do when no transaction is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Silently do nothing.
    #[default]
    Lenient,
    /// Return [`CoreError::NoActiveTransaction`](crate::CoreError::NoActiveTransaction).
    Strict,
}

/// Configuration for a transaction manager.
#[derive(Debug, Clone)]
pub struct Config {
    /// Behavior of `commit`/`rollback` with nothing open.
    pub close_policy: ClosePolicy,

    /// Number of undo records to reserve up front.
    pub log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            close_policy: ClosePolicy::Lenient,
            log_capacity: 64,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the close policy.
    #[must_use]
    pub const fn close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    /// Shorthand for `close_policy(ClosePolicy::Strict)`.
    #[must_use]
    pub const fn strict(self) -> Self {
        self.close_policy(ClosePolicy::Strict)
    }

    /// Sets the initial undo log capacity.
    #[must_use]
    pub const fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }
}
