//! Blog entry entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use warikan_core::domain::{Entry, EntryStatus, NewEntry};

/// Stored form of [`EntryStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "public")]
    Public,
}

impl From<Status> for EntryStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => EntryStatus::Draft,
            Status::Public => EntryStatus::Public,
        }
    }
}

impl From<EntryStatus> for Status {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Draft => Status::Draft,
            EntryStatus::Public => Status::Public,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub status: Status,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blog_user::Entity",
        from = "Column::AuthorId",
        to = "super::blog_user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::blog_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Entry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            status: model.status.into(),
            author_id: model.author_id,
        }
    }
}

impl From<NewEntry> for ActiveModel {
    fn from(entry: NewEntry) -> Self {
        Self {
            id: NotSet,
            title: Set(entry.title),
            body: Set(entry.body),
            created_at: Set(entry.created_at.into()),
            updated_at: Set(entry.updated_at.into()),
            status: Set(entry.status.into()),
            author_id: Set(entry.author_id),
        }
    }
}

impl From<Entry> for ActiveModel {
    fn from(entry: Entry) -> Self {
        Self {
            id: Set(entry.id),
            title: Set(entry.title),
            body: Set(entry.body),
            created_at: Set(entry.created_at.into()),
            updated_at: Set(entry.updated_at.into()),
            status: Set(entry.status.into()),
            author_id: Set(entry.author_id),
        }
    }
}
