//! In-memory repository implementations over [`MemoryDatabase`].

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use warikan_core::domain::{
    Author, Entry, Group, Id, NewAuthor, NewEntry, NewGroup, NewPayment, NewUser, Payment, User,
};
use warikan_core::error::RepoError;
use warikan_core::ports::{
    AuthorRepository, BaseRepository, EntryFilter, EntryRepository, GroupRepository, Page,
    PageRequest, PaymentRepository, UserRepository,
};

use super::store::MemoryDatabase;

fn newest_first(users: &mut [User]) {
    users.sort_by_key(|u| Reverse((u.date_joined, u.id)));
}

pub struct InMemoryUserRepository {
    db: Arc<MemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, NewUser> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<User>, RepoError> {
        Ok(self.db.tables.read().await.users.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepoError> {
        let mut users: Vec<User> = self.db.tables.read().await.users.values().cloned().collect();
        newest_first(&mut users);
        Ok(Page::from_sorted(users, page))
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.username_taken(&new.username, None) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        tables.require_groups(&new.groups)?;

        let user = User {
            id: tables.next_id(),
            username: new.username,
            email: new.email,
            date_joined: new.date_joined,
            groups: new.groups,
        };
        tables.users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "User stored in memory");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        tables.require_groups(&user.groups)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.cascade_user(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_in_group(
        &self,
        group_id: Id,
        page: PageRequest,
    ) -> Result<Page<User>, RepoError> {
        let mut users: Vec<User> = self
            .db
            .tables
            .read()
            .await
            .users
            .values()
            .filter(|u| u.is_member_of(group_id))
            .cloned()
            .collect();
        newest_first(&mut users);
        Ok(Page::from_sorted(users, page))
    }
}

pub struct InMemoryGroupRepository {
    db: Arc<MemoryDatabase>,
}

impl InMemoryGroupRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Group, NewGroup> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Group>, RepoError> {
        Ok(self.db.tables.read().await.groups.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Group>, RepoError> {
        let groups = self.db.tables.read().await.groups.values().cloned().collect();
        Ok(Page::from_sorted(groups, page))
    }

    async fn create(&self, new: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.group_name_taken(&new.name, None) {
            return Err(RepoError::Constraint("group name already exists".to_string()));
        }
        let group = Group {
            id: tables.next_id(),
            name: new.name,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.groups.contains_key(&group.id) {
            return Err(RepoError::NotFound);
        }
        if tables.group_name_taken(&group.name, Some(group.id)) {
            return Err(RepoError::Constraint("group name already exists".to_string()));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.cascade_group(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.groups.values().find(|g| g.name == name).cloned())
    }
}

pub struct InMemoryPaymentRepository {
    db: Arc<MemoryDatabase>,
}

impl InMemoryPaymentRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Payment, NewPayment> for InMemoryPaymentRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Payment>, RepoError> {
        Ok(self.db.tables.read().await.payments.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Payment>, RepoError> {
        let payments = self.db.tables.read().await.payments.values().cloned().collect();
        Ok(Page::from_sorted(payments, page))
    }

    async fn create(&self, new: NewPayment) -> Result<Payment, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.require_users(std::iter::once(new.paid_by).chain(new.paid_for.iter().copied()))?;

        let payment = Payment {
            id: tables.next_id(),
            paid_by: new.paid_by,
            paid_for: new.paid_for,
            amount: new.amount,
            title: new.title,
            date: new.date,
            cleared: new.cleared,
        };
        tables.payments.insert(payment.id, payment.clone());
        tracing::debug!(payment_id = payment.id, "Payment stored in memory");
        Ok(payment)
    }

    async fn update(&self, payment: Payment) -> Result<Payment, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.payments.contains_key(&payment.id) {
            return Err(RepoError::NotFound);
        }
        tables.require_users(payment.user_ids())?;
        tables.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        tables
            .payments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn ids_paid_by(&self, user_id: Id) -> Result<Vec<Id>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .payments
            .values()
            .filter(|p| p.paid_by == user_id)
            .map(|p| p.id)
            .collect())
    }

    async fn ids_paid_for(&self, user_id: Id) -> Result<Vec<Id>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .payments
            .values()
            .filter(|p| p.paid_for.contains(&user_id))
            .map(|p| p.id)
            .collect())
    }
}

pub struct InMemoryAuthorRepository {
    db: Arc<MemoryDatabase>,
}

impl InMemoryAuthorRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Author, NewAuthor> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Author>, RepoError> {
        Ok(self.db.tables.read().await.authors.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Author>, RepoError> {
        let authors = self.db.tables.read().await.authors.values().cloned().collect();
        Ok(Page::from_sorted(authors, page))
    }

    async fn create(&self, new: NewAuthor) -> Result<Author, RepoError> {
        let mut tables = self.db.tables.write().await;
        let author = Author {
            id: tables.next_id(),
            name: new.name,
            mail: new.mail,
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, author: Author) -> Result<Author, RepoError> {
        let mut tables = self.db.tables.write().await;
        match tables.authors.get_mut(&author.id) {
            Some(stored) => {
                *stored = author.clone();
                Ok(author)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.cascade_author(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {}

pub struct InMemoryEntryRepository {
    db: Arc<MemoryDatabase>,
}

impl InMemoryEntryRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Entry, NewEntry> for InMemoryEntryRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Entry>, RepoError> {
        Ok(self.db.tables.read().await.entries.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Entry>, RepoError> {
        self.list_filtered(EntryFilter::default(), page).await
    }

    async fn create(&self, new: NewEntry) -> Result<Entry, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.require_author(new.author_id)?;
        let entry = Entry {
            id: tables.next_id(),
            title: new.title,
            body: new.body,
            created_at: new.created_at,
            updated_at: new.updated_at,
            status: new.status,
            author_id: new.author_id,
        };
        tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: Entry) -> Result<Entry, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.entries.contains_key(&entry.id) {
            return Err(RepoError::NotFound);
        }
        tables.require_author(entry.author_id)?;
        tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        tables
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn list_filtered(
        &self,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<Page<Entry>, RepoError> {
        let entries = self
            .db
            .tables
            .read()
            .await
            .entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        Ok(Page::from_sorted(entries, page))
    }
}
