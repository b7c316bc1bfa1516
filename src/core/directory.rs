//! User directory collaborator
//!
//! Transfers must not credit an owner id that no user actually holds.
//! User management itself (sign-up, authentication) lives outside this
//! crate; the engine only needs an existence check, expressed here as a
//! trait so callers can plug in whatever user source they have.

use crate::types::OwnerId;
use dashmap::DashSet;

/// Existence check for transfer recipients
///
/// Implementations must be safe to share across threads; the engine
/// consults the directory from every concurrent transfer attempt.
pub trait UserDirectory: Send + Sync {
    /// Whether a user with this owner id exists
    fn exists(&self, owner: OwnerId) -> bool;
}

/// In-memory user directory
///
/// Backs the CLI driver and tests. Owners are registered explicitly;
/// everyone else is unknown.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashSet<OwnerId>,
}

impl InMemoryDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self {
            users: DashSet::new(),
        }
    }

    /// Register an owner; registering twice is a no-op
    pub fn register(&self, owner: OwnerId) {
        self.users.insert(owner);
    }

    /// Number of registered owners
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no registered owners
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for InMemoryDirectory {
    fn exists(&self, owner: OwnerId) -> bool {
        self.users.contains(&owner)
    }
}
