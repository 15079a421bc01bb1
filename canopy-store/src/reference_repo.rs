//! Service techs and offerings: flat reference tables with create/list and
//! the id-set resolution the association replaces are built on.

use std::collections::HashMap;

use canopy_catalog::reference::{ServiceOffering, ServiceTech};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::decode;
use crate::error::StoreError;

pub async fn create_tech(
    conn: &mut SqliteConnection,
    id: Uuid,
    name: &str,
) -> Result<ServiceTech, StoreError> {
    let existing = sqlx::query("SELECT id FROM service_techs WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    if existing.is_some() {
        return Err(StoreError::DuplicateName("Service tech"));
    }

    sqlx::query("INSERT INTO service_techs (id, name) VALUES (?, ?)")
        .bind(id.to_string())
        .bind(name)
        .execute(&mut *conn)
        .await?;

    Ok(ServiceTech {
        id,
        name: name.to_string(),
    })
}

pub async fn list_techs(conn: &mut SqliteConnection) -> Result<Vec<ServiceTech>, StoreError> {
    let rows = sqlx::query("SELECT id, name FROM service_techs")
        .fetch_all(&mut *conn)
        .await?;
    rows.iter()
        .map(|row| {
            Ok(ServiceTech {
                id: decode::uuid(&row.try_get::<String, _>("id")?)?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

pub async fn create_offering(
    conn: &mut SqliteConnection,
    id: Uuid,
    name: &str,
) -> Result<ServiceOffering, StoreError> {
    let existing = sqlx::query("SELECT id FROM service_offerings WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    if existing.is_some() {
        return Err(StoreError::DuplicateName("Service offering"));
    }

    sqlx::query("INSERT INTO service_offerings (id, name) VALUES (?, ?)")
        .bind(id.to_string())
        .bind(name)
        .execute(&mut *conn)
        .await?;

    Ok(ServiceOffering {
        id,
        name: name.to_string(),
    })
}

pub async fn list_offerings(
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceOffering>, StoreError> {
    let rows = sqlx::query("SELECT id, name FROM service_offerings")
        .fetch_all(&mut *conn)
        .await?;
    rows.iter()
        .map(|row| {
            Ok(ServiceOffering {
                id: decode::uuid(&row.try_get::<String, _>("id")?)?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

/// Fetches the techs whose ids appear in `ids`, returned in requested
/// order. Missing ids are simply absent; the caller compares counts.
pub async fn resolve_techs(
    conn: &mut SqliteConnection,
    ids: &[Uuid],
) -> Result<Vec<ServiceTech>, StoreError> {
    let rows = fetch_by_ids(&mut *conn, "service_techs", ids).await?;
    let mut by_id: HashMap<Uuid, ServiceTech> = HashMap::with_capacity(rows.len());
    for (id, name) in rows {
        by_id.insert(id, ServiceTech { id, name });
    }
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Offering counterpart of [`resolve_techs`].
pub async fn resolve_offerings(
    conn: &mut SqliteConnection,
    ids: &[Uuid],
) -> Result<Vec<ServiceOffering>, StoreError> {
    let rows = fetch_by_ids(&mut *conn, "service_offerings", ids).await?;
    let mut by_id: HashMap<Uuid, ServiceOffering> = HashMap::with_capacity(rows.len());
    for (id, name) in rows {
        by_id.insert(id, ServiceOffering { id, name });
    }
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn fetch_by_ids(
    conn: &mut SqliteConnection,
    table: &str,
    ids: &[Uuid],
) -> Result<Vec<(Uuid, String)>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, name FROM {} WHERE id IN ({})", table, placeholders);
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id.to_string());
    }

    let rows = query.fetch_all(&mut *conn).await?;
    rows.iter()
        .map(|row| {
            Ok((
                decode::uuid(&row.try_get::<String, _>("id")?)?,
                row.try_get::<String, _>("name")?,
            ))
        })
        .collect()
}
