use canopy_catalog::associations::dedup_ids;
use canopy_catalog::reference::{ServiceOffering, ServiceTech};
use canopy_catalog::service::{Service, ServiceDetail, ServicePatch};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::associations::{self, SERVICE_OFFERING_LINKS, SERVICE_TECH_LINKS};
use crate::error::StoreError;
use crate::{decode, reference_repo};

const COLUMNS: &str =
    "id, photo_url, title, description, base_price, discount_type, discount_value, created_at, updated_at";

fn row_to_service(row: &SqliteRow) -> Result<Service, StoreError> {
    Ok(Service {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        photo_url: row.try_get("photo_url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        base_price: decode::decimal(&row.try_get::<String, _>("base_price")?)?,
        discount_type: decode::opt_discount_type(row.try_get("discount_type")?)?,
        discount_value: decode::opt_decimal(row.try_get("discount_value")?)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Inserts the owner row and writes both link sets. Any invalid reference
/// id aborts with nothing persisted, provided the caller runs this on a
/// transaction.
pub async fn create_service(
    conn: &mut SqliteConnection,
    service: &Service,
    tech_ids: &[Uuid],
    offering_ids: &[Uuid],
) -> Result<ServiceDetail, StoreError> {
    sqlx::query(
        "INSERT INTO services (id, photo_url, title, description, base_price, discount_type, discount_value, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(service.id.to_string())
    .bind(service.photo_url.as_deref())
    .bind(&service.title)
    .bind(service.description.as_deref())
    .bind(service.base_price.to_string())
    .bind(service.discount_type.map(|t| t.as_str()))
    .bind(service.discount_value.map(|v| v.to_string()))
    .bind(service.created_at)
    .bind(service.updated_at)
    .execute(&mut *conn)
    .await?;

    let techs = set_service_techs(&mut *conn, service.id, tech_ids).await?;
    let offerings = set_service_offerings(&mut *conn, service.id, offering_ids).await?;

    Ok(ServiceDetail {
        service: service.clone(),
        techs,
        offerings,
    })
}

/// Validates and replaces the service→tech link set, returning the
/// resolved techs in requested order. Duplicates collapse before the
/// count check; an empty set clears every link.
pub async fn set_service_techs(
    conn: &mut SqliteConnection,
    service_id: Uuid,
    tech_ids: &[Uuid],
) -> Result<Vec<ServiceTech>, StoreError> {
    let requested = dedup_ids(tech_ids);
    let techs = reference_repo::resolve_techs(&mut *conn, &requested).await?;
    if techs.len() != requested.len() {
        return Err(StoreError::InvalidReferenceIds("tech"));
    }
    associations::replace_links(&mut *conn, &SERVICE_TECH_LINKS, service_id, &requested).await?;
    Ok(techs)
}

/// Offering counterpart of [`set_service_techs`].
pub async fn set_service_offerings(
    conn: &mut SqliteConnection,
    service_id: Uuid,
    offering_ids: &[Uuid],
) -> Result<Vec<ServiceOffering>, StoreError> {
    let requested = dedup_ids(offering_ids);
    let offerings = reference_repo::resolve_offerings(&mut *conn, &requested).await?;
    if offerings.len() != requested.len() {
        return Err(StoreError::InvalidReferenceIds("offering"));
    }
    associations::replace_links(&mut *conn, &SERVICE_OFFERING_LINKS, service_id, &requested).await?;
    Ok(offerings)
}

pub async fn list_services(conn: &mut SqliteConnection) -> Result<Vec<ServiceDetail>, StoreError> {
    let sql = format!("SELECT {} FROM services", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in &rows {
        let service = row_to_service(row)?;
        let techs = techs_for_service(&mut *conn, service.id).await?;
        let offerings = offerings_for_service(&mut *conn, service.id).await?;
        details.push(ServiceDetail {
            service,
            techs,
            offerings,
        });
    }
    Ok(details)
}

pub async fn get_service(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<ServiceDetail, StoreError> {
    let service = fetch_service(&mut *conn, id).await?;
    let techs = techs_for_service(&mut *conn, id).await?;
    let offerings = offerings_for_service(&mut *conn, id).await?;
    Ok(ServiceDetail {
        service,
        techs,
        offerings,
    })
}

/// Applies the scalar patch, then replaces whichever link sets were
/// supplied. `None` leaves a link set untouched; `Some(&[])` clears it.
pub async fn update_service(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &ServicePatch,
    tech_ids: Option<&[Uuid]>,
    offering_ids: Option<&[Uuid]>,
) -> Result<(), StoreError> {
    let mut service = fetch_service(&mut *conn, id).await?;
    service.apply(patch);
    service.updated_at = Utc::now();

    sqlx::query(
        "UPDATE services SET photo_url = ?, title = ?, description = ?, base_price = ?,
                discount_type = ?, discount_value = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(service.photo_url.as_deref())
    .bind(&service.title)
    .bind(service.description.as_deref())
    .bind(service.base_price.to_string())
    .bind(service.discount_type.map(|t| t.as_str()))
    .bind(service.discount_value.map(|v| v.to_string()))
    .bind(service.updated_at)
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    if let Some(ids) = tech_ids {
        set_service_techs(&mut *conn, id, ids).await?;
    }
    if let Some(ids) = offering_ids {
        set_service_offerings(&mut *conn, id, ids).await?;
    }
    Ok(())
}

/// Removes both link sets before the owner row so no orphaned link rows
/// survive the delete.
pub async fn delete_service(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    fetch_service(&mut *conn, id).await?;
    associations::delete_links(&mut *conn, &SERVICE_TECH_LINKS, id).await?;
    associations::delete_links(&mut *conn, &SERVICE_OFFERING_LINKS, id).await?;
    sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn fetch_service(conn: &mut SqliteConnection, id: Uuid) -> Result<Service, StoreError> {
    let sql = format!("SELECT {} FROM services WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_service(&row),
        None => Err(StoreError::NotFound("Service")),
    }
}

async fn techs_for_service(
    conn: &mut SqliteConnection,
    service_id: Uuid,
) -> Result<Vec<ServiceTech>, StoreError> {
    let rows = sqlx::query(
        "SELECT t.id, t.name FROM service_techs t
         JOIN service_tech_map m ON m.tech_id = t.id
         WHERE m.service_id = ?",
    )
    .bind(service_id.to_string())
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

async fn offerings_for_service(
    conn: &mut SqliteConnection,
    service_id: Uuid,
) -> Result<Vec<ServiceOffering>, StoreError> {
    let rows = sqlx::query(
        "SELECT o.id, o.name FROM service_offerings o
         JOIN service_offering_map m ON m.offering_id = o.id
         WHERE m.service_id = ?",
    )
    .bind(service_id.to_string())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use canopy_catalog::pricing::DiscountType;
    use rust_decimal::Decimal;

    fn sample(title: &str) -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4(),
            photo_url: None,
            title: title.to_string(),
            description: None,
            base_price: Decimal::from(200),
            discount_type: Some(DiscountType::Percentage),
            discount_value: Some(Decimal::from(10)),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_resolves_names_in_request_order() {
        let db = testing::db().await;
        let react = testing::seed_tech(&db, "React").await;
        let rust = testing::seed_tech(&db, "Rust").await;
        let web = testing::seed_offering(&db, "Web development").await;

        let mut tx = db.begin().await.unwrap();
        let detail = create_service(&mut tx, &sample("Storefront build"), &[rust, react], &[web])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let names: Vec<&str> = detail.techs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "React"]);
        assert_eq!(detail.offerings[0].name, "Web development");
        assert_eq!(detail.service.effective_price(), Decimal::from(180));

        let mut conn = db.acquire().await.unwrap();
        let fetched = get_service(&mut conn, detail.service.id).await.unwrap();
        assert_eq!(fetched.service.title, "Storefront build");
        assert_eq!(fetched.techs.len(), 2);
    }

    #[tokio::test]
    async fn test_create_aborts_on_invalid_tech() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;

        let ghost = sample("Ghost");
        let err = {
            let mut tx = db.begin().await.unwrap();
            create_service(&mut tx, &ghost, &[rust, Uuid::new_v4()], &[])
                .await
                .unwrap_err()
            // tx dropped without commit: rollback
        };
        assert!(matches!(err, StoreError::InvalidReferenceIds("tech")));
        assert_eq!(err.to_string(), "One or more tech IDs are invalid");

        let mut conn = db.acquire().await.unwrap();
        assert!(list_services(&mut conn).await.unwrap().is_empty());
        let links = associations::count_links(&mut conn, &SERVICE_TECH_LINKS, ghost.id)
            .await
            .unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_collapse_to_one_link() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;

        let service = sample("Dup ids");
        let mut tx = db.begin().await.unwrap();
        let detail = create_service(&mut tx, &service, &[rust, rust], &[]).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(detail.techs.len(), 1);

        let mut conn = db.acquire().await.unwrap();
        let links = associations::count_links(&mut conn, &SERVICE_TECH_LINKS, service.id)
            .await
            .unwrap();
        assert_eq!(links, 1);
    }

    #[tokio::test]
    async fn test_replace_is_exact_and_idempotent() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;
        let go = testing::seed_tech(&db, "Go").await;

        let service = sample("Replace target");
        let mut tx = db.begin().await.unwrap();
        create_service(&mut tx, &service, &[rust], &[]).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        set_service_techs(&mut conn, service.id, &[rust, go]).await.unwrap();
        let first = get_service(&mut conn, service.id).await.unwrap();
        assert_eq!(first.techs.len(), 2);

        // Same set again: observable state does not change.
        set_service_techs(&mut conn, service.id, &[rust, go]).await.unwrap();
        let second = get_service(&mut conn, service.id).await.unwrap();
        let mut a: Vec<Uuid> = first.techs.iter().map(|t| t.id).collect();
        let mut b: Vec<Uuid> = second.techs.iter().map(|t| t.id).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_set_clears_links() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;

        let service = sample("Clearing");
        let mut tx = db.begin().await.unwrap();
        create_service(&mut tx, &service, &[rust], &[]).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        set_service_techs(&mut conn, service.id, &[]).await.unwrap();
        let links = associations::count_links(&mut conn, &SERVICE_TECH_LINKS, service.id)
            .await
            .unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn test_update_leaves_omitted_links_untouched() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;
        let web = testing::seed_offering(&db, "Web development").await;

        let service = sample("Partial update");
        let mut tx = db.begin().await.unwrap();
        create_service(&mut tx, &service, &[rust], &[web]).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        update_service(
            &mut tx,
            service.id,
            &ServicePatch {
                title: Some("Renamed".to_string()),
                ..ServicePatch::default()
            },
            None,
            Some(&[]),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        let detail = get_service(&mut conn, service.id).await.unwrap();
        assert_eq!(detail.service.title, "Renamed");
        // Omitted tech set untouched, explicit empty offering set cleared.
        assert_eq!(detail.techs.len(), 1);
        assert!(detail.offerings.is_empty());
        // Scalars absent from the patch keep their values.
        assert_eq!(detail.service.base_price, Decimal::from(200));
    }

    #[tokio::test]
    async fn test_update_with_invalid_offering_rolls_back_scalars() {
        let db = testing::db().await;
        let service = sample("Atomic");
        let mut tx = db.begin().await.unwrap();
        create_service(&mut tx, &service, &[], &[]).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = update_service(
            &mut tx,
            service.id,
            &ServicePatch {
                title: Some("Should not stick".to_string()),
                ..ServicePatch::default()
            },
            None,
            Some(&[Uuid::new_v4()]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReferenceIds("offering")));
        tx.rollback().await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        let detail = get_service(&mut conn, service.id).await.unwrap();
        assert_eq!(detail.service.title, "Atomic");
    }

    #[tokio::test]
    async fn test_delete_leaves_no_orphaned_links() {
        let db = testing::db().await;
        let rust = testing::seed_tech(&db, "Rust").await;
        let go = testing::seed_tech(&db, "Go").await;
        let web = testing::seed_offering(&db, "Web development").await;

        let service = sample("Doorstop");
        let mut tx = db.begin().await.unwrap();
        create_service(&mut tx, &service, &[rust, go], &[web]).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        delete_service(&mut tx, service.id).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        let err = get_service(&mut conn, service.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Service")));
        let techs = associations::count_links(&mut conn, &SERVICE_TECH_LINKS, service.id)
            .await
            .unwrap();
        let offerings = associations::count_links(&mut conn, &SERVICE_OFFERING_LINKS, service.id)
            .await
            .unwrap();
        assert_eq!(techs + offerings, 0);

        let err = delete_service(&mut conn, service.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Service")));
    }
}
