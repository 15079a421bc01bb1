use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::decode;
use crate::error::StoreError;

/// An administrator account. Passwords are stored as bcrypt hashes; the
/// plain text never reaches this layer.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, email, password_hash, role, is_active, created_at";

fn row_to_admin(row: &SqliteRow) -> Result<AdminUser, StoreError> {
    Ok(AdminUser {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: row.try_get("role")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn insert(conn: &mut SqliteConnection, user: &AdminUser) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO admin_users (id, email, password_hash, role, is_active, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.role)
    .bind(user.is_active)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AdminUser>, StoreError> {
    let sql = format!("SELECT {} FROM admin_users WHERE email = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(row_to_admin).transpose()
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<AdminUser>, StoreError> {
    let sql = format!("SELECT {} FROM admin_users WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(row_to_admin).transpose()
}
