use async_trait::async_trait;

use super::pagination::{Page, PageRequest};
use crate::domain::{
    Author, Entry, EntryStatus, Group, Id, NewAuthor, NewEntry, NewGroup, NewPayment, NewUser,
    Payment, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored record and `N` the draft it is created from.
#[async_trait]
pub trait BaseRepository<T, N>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: Id) -> Result<Option<T>, RepoError>;

    /// One page of the default listing.
    async fn list(&self, page: PageRequest) -> Result<Page<T>, RepoError>;

    /// Store a new entity and return it with its assigned ID.
    async fn create(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to dependent rows.
    async fn delete(&self, id: Id) -> Result<(), RepoError>;
}

/// Users, listed newest `date_joined` first.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Members of a group, in the default user order.
    async fn list_in_group(&self, group_id: Id, page: PageRequest)
    -> Result<Page<User>, RepoError>;
}

#[async_trait]
pub trait GroupRepository: BaseRepository<Group, NewGroup> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, RepoError>;
}

#[async_trait]
pub trait PaymentRepository: BaseRepository<Payment, NewPayment> {
    /// IDs of payments the user paid, ascending.
    async fn ids_paid_by(&self, user_id: Id) -> Result<Vec<Id>, RepoError>;

    /// IDs of payments the user was paid for, ascending.
    async fn ids_paid_for(&self, user_id: Id) -> Result<Vec<Id>, RepoError>;
}

#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, NewAuthor> {}

/// Optional narrowing of the entry listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub author_id: Option<Id>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        self.author_id.is_none_or(|id| entry.author_id == id)
            && self.status.is_none_or(|s| entry.status == s)
    }
}

#[async_trait]
pub trait EntryRepository: BaseRepository<Entry, NewEntry> {
    async fn list_filtered(
        &self,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<Page<Entry>, RepoError>;
}
