#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::database::entity::{blog_user, entry, payment, payment_payee, user, user_group};
    use crate::database::postgres_repo::{
        PostgresAuthorRepository, PostgresEntryRepository, PostgresGroupRepository,
        PostgresPaymentRepository, PostgresUserRepository,
    };
    use warikan_core::domain::{EntryStatus, NewAuthor, NewPayment};
    use warikan_core::error::RepoError;
    use warikan_core::ports::{
        AuthorRepository, BaseRepository, EntryRepository, GroupRepository, PaymentRepository,
        UserRepository,
    };

    #[tokio::test]
    async fn test_find_entry_by_id() {
        let now = Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![entry::Model {
                id: 3,
                title: "はじめての投稿".to_owned(),
                body: "本文".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
                status: entry::Status::Public,
                author_id: 1,
            }]])
            .into_connection();

        let repo: Box<dyn EntryRepository> = Box::new(PostgresEntryRepository::new(db));

        let entry = repo.find_by_id(3).await.unwrap().unwrap();
        assert_eq!(entry.title, "はじめての投稿");
        assert_eq!(entry.status, EntryStatus::Public);
        assert_eq!(entry.author_id, 1);
    }

    #[tokio::test]
    async fn test_create_author_returns_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![blog_user::Model {
                id: 9,
                name: "hanako".to_owned(),
                mail: "hanako@example.com".to_owned(),
            }]])
            .into_connection();

        let repo: Box<dyn AuthorRepository> = Box::new(PostgresAuthorRepository::new(db));

        let author = repo
            .create(NewAuthor::new("hanako", "hanako@example.com"))
            .await
            .unwrap();
        assert_eq!(author.id, 9);
        assert_eq!(author.mail, "hanako@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<blog_user::Model>::new()])
            .into_connection();

        let repo: Box<dyn AuthorRepository> = Box::new(PostgresAuthorRepository::new(db));

        let result = repo
            .update(warikan_core::domain::Author {
                id: 404,
                name: "ghost".to_owned(),
                mail: "ghost@example.com".to_owned(),
            })
            .await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_group_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo: Box<dyn GroupRepository> = Box::new(PostgresGroupRepository::new(db));

        assert!(matches!(repo.delete(12).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_user_loads_groups() {
        let now = Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: 5,
                username: "taro".to_owned(),
                email: "taro@example.com".to_owned(),
                date_joined: now.into(),
            }]])
            .append_query_results(vec![vec![
                user_group::Model {
                    user_id: 5,
                    group_id: 1,
                },
                user_group::Model {
                    user_id: 5,
                    group_id: 4,
                },
            ]])
            .into_connection();

        let repo: Box<dyn UserRepository> = Box::new(PostgresUserRepository::new(db));

        let user = repo.find_by_id(5).await.unwrap().unwrap();
        assert_eq!(user.username, "taro");
        assert_eq!(user.groups, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_create_payment_writes_payees() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![payment::Model {
                id: 21,
                paid_by_id: 1,
                amount: 1200,
                title: "映画チケット".to_owned(),
                date,
                cleared: false,
            }]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let repo: Box<dyn PaymentRepository> = Box::new(PostgresPaymentRepository::new(db));

        let payment = repo
            .create(NewPayment::new(1, vec![3, 2], 1200, "映画チケット", Some(date), false))
            .await
            .unwrap();
        assert_eq!(payment.id, 21);
        assert_eq!(payment.paid_for, vec![2, 3]);
        assert!(!payment.cleared);
    }

    #[tokio::test]
    async fn test_ids_paid_for() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                payment_payee::Model {
                    payment_id: 2,
                    user_id: 7,
                },
                payment_payee::Model {
                    payment_id: 6,
                    user_id: 7,
                },
            ]])
            .into_connection();

        let repo: Box<dyn PaymentRepository> = Box::new(PostgresPaymentRepository::new(db));

        assert_eq!(repo.ids_paid_for(7).await.unwrap(), vec![2, 6]);
    }
}
