//! Payment entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use warikan_core::domain::{Id, NewPayment, Payment};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub paid_by_id: i32,
    pub amount: i32,
    pub title: String,
    pub date: Date,
    pub cleared: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PaidById",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PaidBy,
    #[sea_orm(has_many = "super::payment_payee::Entity")]
    Payee,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaidBy.def()
    }
}

impl Related<super::payment_payee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain payment; payees live in `payment_payees` and are passed in.
    pub fn into_domain(self, paid_for: Vec<Id>) -> Payment {
        Payment {
            id: self.id,
            paid_by: self.paid_by_id,
            paid_for,
            amount: self.amount,
            title: self.title,
            date: self.date,
            cleared: self.cleared,
        }
    }
}

impl From<&NewPayment> for ActiveModel {
    fn from(payment: &NewPayment) -> Self {
        Self {
            id: NotSet,
            paid_by_id: Set(payment.paid_by),
            amount: Set(payment.amount),
            title: Set(payment.title.clone()),
            date: Set(payment.date),
            cleared: Set(payment.cleared),
        }
    }
}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: Set(payment.id),
            paid_by_id: Set(payment.paid_by),
            amount: Set(payment.amount),
            title: Set(payment.title.clone()),
            date: Set(payment.date),
            cleared: Set(payment.cleared),
        }
    }
}
