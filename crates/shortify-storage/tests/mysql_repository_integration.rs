//! These tests start a MySQL container and need a Docker daemon.

use std::time::Duration;

use shortify_core::{NewUrlMapping, ShortCode};
use shortify_storage::{MySqlRepository, ReadRepository, Repository, StorageError};
use shortify_test_infra::mysql::{MySqlServer, MysqlConfig};
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let repo = MySqlRepository::new(pool);
        repo.migrate().await.expect("apply migrations");

        Self {
            _mysql: mysql,
            repo,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn code(value: &str) -> ShortCode {
    ShortCode::new(value).unwrap()
}

#[tokio::test]
async fn insert_then_update_then_find() {
    let fixture = Fixture::start().await;

    let pending = fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com/a"))
        .await
        .unwrap();
    assert!(pending.is_pending());

    assert!(fixture.repo.update(pending.id, &code("1abcd")).await.unwrap());

    let by_code = fixture
        .repo
        .find_by_short_code(&code("1abcd"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.id, pending.id);
    assert_eq!(by_code.long_url, "https://example.com/a");

    let by_url = fixture
        .repo
        .find_by_long_url("https://example.com/a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.short_code, Some(code("1abcd")));
}

#[tokio::test]
async fn ids_are_assigned_in_order() {
    let fixture = Fixture::start().await;

    let first = fixture
        .repo
        .insert(NewUrlMapping::new("https://one.example"))
        .await
        .unwrap();
    let second = fixture
        .repo
        .insert(NewUrlMapping::new("https://two.example"))
        .await
        .unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn insert_conflicts_on_duplicate_long_url() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn long_urls_compare_exactly() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com/Path"))
        .await
        .unwrap();

    let other_case = fixture
        .repo
        .find_by_long_url("https://example.com/path")
        .await
        .unwrap();
    assert!(other_case.is_none());

    fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com/path"))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_is_conditional_on_pending_row() {
    let fixture = Fixture::start().await;
    let pending = fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com"))
        .await
        .unwrap();

    assert!(fixture.repo.update(pending.id, &code("1aaaa")).await.unwrap());
    assert!(!fixture.repo.update(pending.id, &code("1bbbb")).await.unwrap());
    assert!(!fixture.repo.update(pending.id + 100, &code("1cccc")).await.unwrap());
}

#[tokio::test]
async fn update_conflicts_on_duplicate_short_code() {
    let fixture = Fixture::start().await;
    let one = fixture
        .repo
        .insert(NewUrlMapping::new("https://one.example"))
        .await
        .unwrap();
    let two = fixture
        .repo
        .insert(NewUrlMapping::new("https://two.example"))
        .await
        .unwrap();

    fixture.repo.update(one.id, &code("same1")).await.unwrap();
    let err = fixture.repo.update(two.id, &code("same1")).await.unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn short_codes_are_case_sensitive() {
    let fixture = Fixture::start().await;
    let one = fixture
        .repo
        .insert(NewUrlMapping::new("https://one.example"))
        .await
        .unwrap();
    let two = fixture
        .repo
        .insert(NewUrlMapping::new("https://two.example"))
        .await
        .unwrap();

    fixture.repo.update(one.id, &code("abcde")).await.unwrap();
    fixture.repo.update(two.id, &code("ABCDE")).await.unwrap();

    let lower = fixture
        .repo
        .find_by_short_code(&code("abcde"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lower.long_url, "https://one.example");
}

#[tokio::test]
async fn pending_rows_are_not_found_by_code() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(NewUrlMapping::new("https://example.com"))
        .await
        .unwrap();

    assert!(fixture
        .repo
        .find_by_short_code(&code("zzzzzzzz"))
        .await
        .unwrap()
        .is_none());
}
