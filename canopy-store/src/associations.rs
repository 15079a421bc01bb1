//! Link-table plumbing shared by every owner↔reference pair. The replace
//! contract (validate, delete the old set, insert the new one) lives in the
//! owning repositories; these helpers only move rows for one join table.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::StoreError;

/// One owner↔reference join table.
pub(crate) struct LinkTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub reference_column: &'static str,
}

pub(crate) const SERVICE_TECH_LINKS: LinkTable = LinkTable {
    table: "service_tech_map",
    owner_column: "service_id",
    reference_column: "tech_id",
};

pub(crate) const SERVICE_OFFERING_LINKS: LinkTable = LinkTable {
    table: "service_offering_map",
    owner_column: "service_id",
    reference_column: "offering_id",
};

pub(crate) const PROJECT_TECH_LINKS: LinkTable = LinkTable {
    table: "project_tech_map",
    owner_column: "project_id",
    reference_column: "tech_id",
};

pub(crate) const TRAINING_MENTOR_LINKS: LinkTable = LinkTable {
    table: "training_mentor_map",
    owner_column: "training_id",
    reference_column: "mentor_id",
};

pub(crate) async fn delete_links(
    conn: &mut SqliteConnection,
    links: &LinkTable,
    owner_id: Uuid,
) -> Result<(), StoreError> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        links.table, links.owner_column
    );
    sqlx::query(&sql)
        .bind(owner_id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Replaces the full link set for one owner. Runs on the caller's
/// transaction; the ids must already be validated.
pub(crate) async fn replace_links(
    conn: &mut SqliteConnection,
    links: &LinkTable,
    owner_id: Uuid,
    reference_ids: &[Uuid],
) -> Result<(), StoreError> {
    delete_links(&mut *conn, links, owner_id).await?;

    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?, ?)",
        links.table, links.owner_column, links.reference_column
    );
    for reference_id in reference_ids {
        sqlx::query(&sql)
            .bind(owner_id.to_string())
            .bind(reference_id.to_string())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Number of link rows currently stored for one owner.
#[cfg(test)]
pub(crate) async fn count_links(
    conn: &mut SqliteConnection,
    links: &LinkTable,
    owner_id: Uuid,
) -> Result<i64, StoreError> {
    use sqlx::Row;

    let sql = format!(
        "SELECT COUNT(*) AS n FROM {} WHERE {} = ?",
        links.table, links.owner_column
    );
    let row = sqlx::query(&sql)
        .bind(owner_id.to_string())
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.try_get::<i64, _>("n")?)
}
