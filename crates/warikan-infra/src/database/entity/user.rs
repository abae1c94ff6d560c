//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use warikan_core::domain::{Id, NewUser, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub date_joined: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_group::Entity")]
    UserGroup,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroup.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain user; memberships live in `user_groups` and are passed in.
    pub fn into_domain(self, groups: Vec<Id>) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            date_joined: self.date_joined.into(),
            groups,
        }
    }
}

impl From<&NewUser> for ActiveModel {
    fn from(user: &NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            date_joined: Set(user.date_joined.into()),
        }
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            date_joined: Set(user.date_joined.into()),
        }
    }
}
