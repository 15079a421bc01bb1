use std::collections::HashMap;

use canopy_catalog::reference::{Mentor, MentorPatch};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::decode;
use crate::error::StoreError;

fn row_to_mentor(row: &SqliteRow) -> Result<Mentor, StoreError> {
    Ok(Mentor {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        name: row.try_get("name")?,
        photo_url: row.try_get("photo_url")?,
    })
}

/// Inserts a mentor under the normalized form of `name`.
pub async fn create_mentor(
    conn: &mut SqliteConnection,
    id: Uuid,
    name: &str,
    photo_url: Option<&str>,
) -> Result<Mentor, StoreError> {
    let name = Mentor::normalize_name(name);
    ensure_name_free(&mut *conn, &name, None).await?;

    sqlx::query("INSERT INTO mentors (id, name, photo_url) VALUES (?, ?, ?)")
        .bind(id.to_string())
        .bind(&name)
        .bind(photo_url)
        .execute(&mut *conn)
        .await?;

    Ok(Mentor {
        id,
        name,
        photo_url: photo_url.map(str::to_string),
    })
}

pub async fn list_mentors(conn: &mut SqliteConnection) -> Result<Vec<Mentor>, StoreError> {
    let rows = sqlx::query("SELECT id, name, photo_url FROM mentors ORDER BY name ASC")
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(row_to_mentor).collect()
}

pub async fn get_mentor(conn: &mut SqliteConnection, id: Uuid) -> Result<Mentor, StoreError> {
    let row = sqlx::query("SELECT id, name, photo_url FROM mentors WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_mentor(&row),
        None => Err(StoreError::NotFound("Mentor")),
    }
}

pub async fn update_mentor(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &MentorPatch,
) -> Result<Mentor, StoreError> {
    let mut mentor = get_mentor(&mut *conn, id).await?;
    mentor.apply(patch);

    if patch.name.is_some() {
        ensure_name_free(&mut *conn, &mentor.name, Some(id)).await?;
    }

    sqlx::query("UPDATE mentors SET name = ?, photo_url = ? WHERE id = ?")
        .bind(&mentor.name)
        .bind(mentor.photo_url.as_deref())
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(mentor)
}

/// Mentors are resolved for training links the same way techs are for
/// services; returned in requested order.
pub async fn resolve_mentors(
    conn: &mut SqliteConnection,
    ids: &[Uuid],
) -> Result<Vec<Mentor>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, name, photo_url FROM mentors WHERE id IN ({})",
        placeholders
    );
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id.to_string());
    }
    let rows = query.fetch_all(&mut *conn).await?;

    let mut by_id: HashMap<Uuid, Mentor> = HashMap::with_capacity(rows.len());
    for row in &rows {
        let mentor = row_to_mentor(row)?;
        by_id.insert(mentor.id, mentor);
    }
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn ensure_name_free(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<Uuid>,
) -> Result<(), StoreError> {
    let row = match exclude_id {
        Some(id) => {
            sqlx::query("SELECT id FROM mentors WHERE name = ? AND id != ?")
                .bind(name)
                .bind(id.to_string())
                .fetch_optional(&mut *conn)
                .await?
        }
        None => {
            sqlx::query("SELECT id FROM mentors WHERE name = ?")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?
        }
    };
    if row.is_some() {
        return Err(StoreError::DuplicateName("Mentor"));
    }
    Ok(())
}
