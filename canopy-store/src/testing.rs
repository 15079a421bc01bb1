//! Shared fixtures for repository tests.

use uuid::Uuid;

use crate::{mentor_repo, reference_repo, Database};

pub(crate) async fn db() -> Database {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect in-memory db");
    db.migrate().await.expect("run migrations");
    db
}

pub(crate) async fn seed_tech(db: &Database, name: &str) -> Uuid {
    let mut conn = db.acquire().await.unwrap();
    let id = Uuid::new_v4();
    reference_repo::create_tech(&mut conn, id, name).await.unwrap();
    id
}

pub(crate) async fn seed_offering(db: &Database, name: &str) -> Uuid {
    let mut conn = db.acquire().await.unwrap();
    let id = Uuid::new_v4();
    reference_repo::create_offering(&mut conn, id, name).await.unwrap();
    id
}

pub(crate) async fn seed_mentor(db: &Database, name: &str) -> Uuid {
    let mut conn = db.acquire().await.unwrap();
    let id = Uuid::new_v4();
    mentor_repo::create_mentor(&mut conn, id, name, None).await.unwrap();
    id
}
