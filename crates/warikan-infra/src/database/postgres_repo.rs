//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbConn, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use warikan_core::domain::{Entry, Group, Id, NewPayment, NewUser, Payment, User};
use warikan_core::error::RepoError;
use warikan_core::ports::{
    AuthorRepository, BaseRepository, EntryFilter, EntryRepository, GroupRepository, Page,
    PageRequest, PaymentRepository, UserRepository,
};

use super::entity::blog_user::Entity as AuthorEntity;
use super::entity::entry::{self, Entity as EntryEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::payment::{self, Entity as PaymentEntity};
use super::entity::payment_payee::{self, Entity as PaymentPayeeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_group::{self, Entity as UserGroupEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL blog user repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL entry repository.
pub type PostgresEntryRepository = PostgresBaseRepository<EntryEntity>;

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn list_filtered(
        &self,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<Page<Entry>, RepoError> {
        let mut condition = Condition::all();
        if let Some(author_id) = filter.author_id {
            condition = condition.add(entry::Column::AuthorId.eq(author_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(entry::Column::Status.eq(entry::Status::from(status)));
        }

        let paginator = EntryEntity::find()
            .filter(condition)
            .order_by_asc(entry::Column::Id)
            .paginate(&self.db, page.page_size);
        let count = paginator.num_items().await.map_err(map_db_err)?;
        let items = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(items.into_iter().map(Into::into).collect(), count))
    }
}

/// PostgreSQL user repository. Group memberships live in `user_groups`.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn groups_by_user(&self, user_ids: Vec<Id>) -> Result<HashMap<Id, Vec<Id>>, RepoError> {
        let mut groups: HashMap<Id, Vec<Id>> = HashMap::new();
        if user_ids.is_empty() {
            return Ok(groups);
        }

        let rows = UserGroupEntity::find()
            .filter(user_group::Column::UserId.is_in(user_ids))
            .order_by_asc(user_group::Column::GroupId)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        for row in rows {
            groups.entry(row.user_id).or_default().push(row.group_id);
        }
        Ok(groups)
    }

    async fn fetch_page(
        &self,
        query: Select<UserEntity>,
        page: PageRequest,
    ) -> Result<Page<User>, RepoError> {
        let paginator = query
            .order_by_desc(user::Column::DateJoined)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, page.page_size);
        let count = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        let mut groups = self
            .groups_by_user(models.iter().map(|m| m.id).collect())
            .await?;
        let users = models
            .into_iter()
            .map(|m| {
                let member_of = groups.remove(&m.id).unwrap_or_default();
                m.into_domain(member_of)
            })
            .collect();
        Ok(Page::new(users, count))
    }

    async fn with_groups(&self, model: Option<user::Model>) -> Result<Option<User>, RepoError> {
        match model {
            Some(model) => {
                let mut groups = self.groups_by_user(vec![model.id]).await?;
                let member_of = groups.remove(&model.id).unwrap_or_default();
                Ok(Some(model.into_domain(member_of)))
            }
            None => Ok(None),
        }
    }
}

async fn insert_memberships(
    txn: &DatabaseTransaction,
    user_id: Id,
    group_ids: &[Id],
) -> Result<(), RepoError> {
    if group_ids.is_empty() {
        return Ok(());
    }
    let rows = group_ids.iter().map(|&group_id| user_group::ActiveModel {
        user_id: Set(user_id),
        group_id: Set(group_id),
    });
    UserGroupEntity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

#[async_trait]
impl BaseRepository<User, NewUser> for PostgresUserRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<User>, RepoError> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        self.with_groups(model).await
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepoError> {
        self.fetch_page(UserEntity::find(), page).await
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = user::ActiveModel::from(&new)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        insert_memberships(&txn, model.id, &new.groups).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into_domain(new.groups))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = user::ActiveModel::from(&user)
            .update(&txn)
            .await
            .map_err(map_db_err)?;
        UserGroupEntity::delete_many()
            .filter(user_group::Column::UserId.eq(user.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        insert_memberships(&txn, user.id, &user.groups).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into_domain(user.groups))
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let model = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        self.with_groups(model).await
    }

    async fn list_in_group(
        &self,
        group_id: Id,
        page: PageRequest,
    ) -> Result<Page<User>, RepoError> {
        let members = Query::select()
            .column(user_group::Column::UserId)
            .from(UserGroupEntity)
            .and_where(user_group::Column::GroupId.eq(group_id))
            .to_owned();
        let query = UserEntity::find().filter(user::Column::Id.in_subquery(members));
        self.fetch_page(query, page).await
    }
}

/// PostgreSQL payment repository. Payees live in `payment_payees`.
pub struct PostgresPaymentRepository {
    db: DbConn,
}

impl PostgresPaymentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn payees_by_payment(
        &self,
        payment_ids: Vec<Id>,
    ) -> Result<HashMap<Id, Vec<Id>>, RepoError> {
        let mut payees: HashMap<Id, Vec<Id>> = HashMap::new();
        if payment_ids.is_empty() {
            return Ok(payees);
        }

        let rows = PaymentPayeeEntity::find()
            .filter(payment_payee::Column::PaymentId.is_in(payment_ids))
            .order_by_asc(payment_payee::Column::UserId)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        for row in rows {
            payees.entry(row.payment_id).or_default().push(row.user_id);
        }
        Ok(payees)
    }
}

async fn insert_payees(
    txn: &DatabaseTransaction,
    payment_id: Id,
    user_ids: &[Id],
) -> Result<(), RepoError> {
    if user_ids.is_empty() {
        return Ok(());
    }
    let rows = user_ids.iter().map(|&user_id| payment_payee::ActiveModel {
        payment_id: Set(payment_id),
        user_id: Set(user_id),
    });
    PaymentPayeeEntity::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

#[async_trait]
impl BaseRepository<Payment, NewPayment> for PostgresPaymentRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Payment>, RepoError> {
        let Some(model) = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut payees = self.payees_by_payment(vec![model.id]).await?;
        let paid_for = payees.remove(&model.id).unwrap_or_default();
        Ok(Some(model.into_domain(paid_for)))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Payment>, RepoError> {
        let paginator = PaymentEntity::find()
            .order_by_asc(payment::Column::Id)
            .paginate(&self.db, page.page_size);
        let count = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        let mut payees = self
            .payees_by_payment(models.iter().map(|m| m.id).collect())
            .await?;
        let payments = models
            .into_iter()
            .map(|m| {
                let paid_for = payees.remove(&m.id).unwrap_or_default();
                m.into_domain(paid_for)
            })
            .collect();
        Ok(Page::new(payments, count))
    }

    async fn create(&self, new: NewPayment) -> Result<Payment, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = payment::ActiveModel::from(&new)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        insert_payees(&txn, model.id, &new.paid_for).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(payment_id = model.id, amount = model.amount, "Payment created");
        Ok(model.into_domain(new.paid_for))
    }

    async fn update(&self, payment: Payment) -> Result<Payment, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = payment::ActiveModel::from(&payment)
            .update(&txn)
            .await
            .map_err(map_db_err)?;
        PaymentPayeeEntity::delete_many()
            .filter(payment_payee::Column::PaymentId.eq(payment.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        insert_payees(&txn, payment.id, &payment.paid_for).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into_domain(payment.paid_for))
    }

    async fn delete(&self, id: Id) -> Result<(), RepoError> {
        let result = PaymentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn ids_paid_by(&self, user_id: Id) -> Result<Vec<Id>, RepoError> {
        PaymentEntity::find()
            .select_only()
            .column(payment::Column::Id)
            .filter(payment::Column::PaidById.eq(user_id))
            .order_by_asc(payment::Column::Id)
            .into_tuple::<Id>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn ids_paid_for(&self, user_id: Id) -> Result<Vec<Id>, RepoError> {
        let rows = PaymentPayeeEntity::find()
            .filter(payment_payee::Column::UserId.eq(user_id))
            .order_by_asc(payment_payee::Column::PaymentId)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|r| r.payment_id).collect())
    }
}

