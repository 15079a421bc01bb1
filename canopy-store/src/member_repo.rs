use canopy_catalog::member::{Member, MemberPatch, MemberRole};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::decode;
use crate::error::StoreError;

const COLUMNS: &str =
    "id, name, role, photo_url, position, bio, social_media, is_visible, created_at, updated_at";

fn row_to_member(row: &SqliteRow) -> Result<Member, StoreError> {
    Ok(Member {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        name: row.try_get("name")?,
        role: decode::member_role(&row.try_get::<String, _>("role")?)?,
        photo_url: row.try_get("photo_url")?,
        position: row.try_get("position")?,
        bio: row.try_get("bio")?,
        social_media: decode::social_media(row.try_get("social_media")?)?,
        is_visible: row.try_get("is_visible")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn create_member(conn: &mut SqliteConnection, member: &Member) -> Result<(), StoreError> {
    let social = decode::social_media_to_json(member.social_media.as_ref())?;
    sqlx::query(
        "INSERT INTO members (id, name, role, photo_url, position, bio, social_media, is_visible, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(member.id.to_string())
    .bind(&member.name)
    .bind(member.role.as_str())
    .bind(member.photo_url.as_deref())
    .bind(member.position.as_deref())
    .bind(member.bio.as_deref())
    .bind(social)
    .bind(member.is_visible)
    .bind(member.created_at)
    .bind(member.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn list_members(conn: &mut SqliteConnection) -> Result<Vec<Member>, StoreError> {
    let sql = format!("SELECT {} FROM members", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    rows.iter().map(row_to_member).collect()
}

/// Public roster view: members in `role` that are marked visible.
pub async fn list_visible_by_role(
    conn: &mut SqliteConnection,
    role: MemberRole,
) -> Result<Vec<Member>, StoreError> {
    let sql = format!(
        "SELECT {} FROM members WHERE role = ? AND is_visible = 1",
        COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(role.as_str())
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(row_to_member).collect()
}

pub async fn get_member(conn: &mut SqliteConnection, id: Uuid) -> Result<Member, StoreError> {
    let sql = format!("SELECT {} FROM members WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_member(&row),
        None => Err(StoreError::NotFound("Member")),
    }
}

/// Role-scoped lookup; the error label names the requested roster so the
/// message reads "Team member not found" / "Intern not found".
pub async fn get_member_with_role(
    conn: &mut SqliteConnection,
    id: Uuid,
    role: MemberRole,
) -> Result<Member, StoreError> {
    let label = match role {
        MemberRole::Team => "Team member",
        MemberRole::Intern => "Intern",
    };
    let sql = format!("SELECT {} FROM members WHERE id = ? AND role = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .bind(role.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_member(&row),
        None => Err(StoreError::NotFound(label)),
    }
}

pub async fn update_member(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &MemberPatch,
) -> Result<Member, StoreError> {
    let mut member = get_member(&mut *conn, id).await?;
    member.apply(patch);
    member.updated_at = Utc::now();

    let social = decode::social_media_to_json(member.social_media.as_ref())?;
    sqlx::query(
        "UPDATE members SET name = ?, role = ?, photo_url = ?, position = ?, bio = ?,
                social_media = ?, is_visible = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&member.name)
    .bind(member.role.as_str())
    .bind(member.photo_url.as_deref())
    .bind(member.position.as_deref())
    .bind(member.bio.as_deref())
    .bind(social)
    .bind(member.is_visible)
    .bind(member.updated_at)
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(member)
}
