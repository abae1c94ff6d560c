//! Shared in-memory tables backing every in-memory repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use warikan_core::domain::{Author, Entry, Group, Id, Payment, User};
use warikan_core::error::RepoError;

use super::repos::{
    InMemoryAuthorRepository, InMemoryEntryRepository, InMemoryGroupRepository,
    InMemoryPaymentRepository, InMemoryUserRepository,
};

#[derive(Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<Id, User>,
    pub groups: BTreeMap<Id, Group>,
    pub payments: BTreeMap<Id, Payment>,
    pub authors: BTreeMap<Id, Author>,
    pub entries: BTreeMap<Id, Entry>,
    sequence: Id,
}

impl Tables {
    /// Ids are unique across all tables, which is fine for a fallback store.
    pub fn next_id(&mut self) -> Id {
        self.sequence += 1;
        self.sequence
    }

    pub fn require_users<I>(&self, ids: I) -> Result<(), RepoError>
    where
        I: IntoIterator<Item = Id>,
    {
        for id in ids {
            if !self.users.contains_key(&id) {
                return Err(RepoError::Constraint(format!("user {} does not exist", id)));
            }
        }
        Ok(())
    }

    pub fn require_groups(&self, ids: &[Id]) -> Result<(), RepoError> {
        match ids.iter().find(|id| !self.groups.contains_key(id)) {
            Some(id) => Err(RepoError::Constraint(format!("group {} does not exist", id))),
            None => Ok(()),
        }
    }

    pub fn require_author(&self, id: Id) -> Result<(), RepoError> {
        if self.authors.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("author {} does not exist", id)))
        }
    }

    pub fn username_taken(&self, username: &str, except: Option<Id>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    pub fn group_name_taken(&self, name: &str, except: Option<Id>) -> bool {
        self.groups
            .values()
            .any(|g| g.name == name && Some(g.id) != except)
    }

    /// Remove a user and everything that hangs off it.
    pub fn cascade_user(&mut self, id: Id) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        self.payments.retain(|_, p| p.paid_by != id);
        for payment in self.payments.values_mut() {
            payment.paid_for.retain(|&u| u != id);
        }
        true
    }

    pub fn cascade_group(&mut self, id: Id) -> bool {
        if self.groups.remove(&id).is_none() {
            return false;
        }
        for user in self.users.values_mut() {
            user.groups.retain(|&g| g != id);
        }
        true
    }

    pub fn cascade_author(&mut self, id: Id) -> bool {
        if self.authors.remove(&id).is_none() {
            return false;
        }
        self.entries.retain(|_, e| e.author_id != id);
        true
    }
}

/// In-memory database shared by the in-memory repositories.
///
/// This is the fallback when PostgreSQL is not configured.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct MemoryDatabase {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn users(self: &Arc<Self>) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    pub fn groups(self: &Arc<Self>) -> InMemoryGroupRepository {
        InMemoryGroupRepository::new(self.clone())
    }

    pub fn payments(self: &Arc<Self>) -> InMemoryPaymentRepository {
        InMemoryPaymentRepository::new(self.clone())
    }

    pub fn authors(self: &Arc<Self>) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository::new(self.clone())
    }

    pub fn entries(self: &Arc<Self>) -> InMemoryEntryRepository {
        InMemoryEntryRepository::new(self.clone())
    }
}
