//! Integration tests for the Postgres user repository
//!
//! Run against a real PostgreSQL container with migrations applied.
//! Require Docker: `cargo test -p domain_users -- --ignored`

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore]
async fn test_create_and_get_user() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_create_and_get");

    let created = service
        .create_user(CreateUser {
            name: builder.name("user", "ada"),
            email: builder.email("ada"),
        })
        .await;
    assert!(created.success, "{}", created.message);

    let user = created.result.unwrap();
    assert_eq!(user.created_on, user.updated_on);

    let fetched = service.get_user(user.id).await;
    assert_eq!(fetched.result.unwrap().email, builder.email("ada"));
}

#[tokio::test]
#[ignore]
async fn test_unique_index_rejects_case_variant() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_unique_index");
    let email = builder.email("ada");

    repo.create(CreateUser {
        name: "Ada".into(),
        email: email.clone(),
    })
    .await
    .unwrap();

    // Bypass the service pre-check so the index itself must reject the row
    let err = repo
        .create(CreateUser {
            name: "Bea".into(),
            email: email.to_uppercase(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateEmail(_)));
}

#[tokio::test]
#[ignore]
async fn test_update_refreshes_updated_on_only() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_update");

    let user = service
        .create_user(CreateUser {
            name: "Ada".into(),
            email: builder.email("ada"),
        })
        .await
        .result
        .unwrap();

    let updated = service
        .update_user(
            user.id,
            UpdateUser {
                name: "Ada King".into(),
                email: builder.email("ada").to_uppercase(),
            },
        )
        .await;
    assert!(updated.success, "{}", updated.message);

    let updated = updated.result.unwrap();
    assert_eq!(updated.created_on, user.created_on);
    assert!(updated.updated_on >= user.updated_on);
}

#[tokio::test]
#[ignore]
async fn test_list_and_delete() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_list_delete");

    let first = service
        .create_user(CreateUser {
            name: "Ada".into(),
            email: builder.email("first"),
        })
        .await
        .result
        .unwrap();
    let second = service
        .create_user(CreateUser {
            name: "Bea".into(),
            email: builder.email("second"),
        })
        .await
        .result
        .unwrap();

    let listed = service.list_users().await.result.unwrap();
    let positions: Vec<i32> = listed.iter().map(|u| u.id).collect();
    let first_pos = positions.iter().position(|id| *id == first.id).unwrap();
    let second_pos = positions.iter().position(|id| *id == second.id).unwrap();
    assert!(second_pos < first_pos);

    assert_eq!(service.delete_user(first.id).await.result, Some(true));
    assert!(!service.exists(first.id).await.unwrap());
    assert!(service.get_user(first.id).await.message.contains("not found"));
}
