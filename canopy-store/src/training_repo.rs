use canopy_catalog::associations::dedup_ids;
use canopy_catalog::reference::Mentor;
use canopy_catalog::training::{Training, TrainingDetail, TrainingPatch};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::associations::{self, TRAINING_MENTOR_LINKS};
use crate::error::StoreError;
use crate::{decode, mentor_repo};

const COLUMNS: &str =
    "id, photo_url, title, description, base_price, discount_type, discount_value, created_at, updated_at";

fn row_to_training(row: &SqliteRow) -> Result<Training, StoreError> {
    Ok(Training {
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

pub async fn create_training(
    conn: &mut SqliteConnection,
    training: &Training,
    benefits: &[String],
    mentor_ids: &[Uuid],
) -> Result<TrainingDetail, StoreError> {
    sqlx::query(
        "INSERT INTO trainings (id, photo_url, title, description, base_price, discount_type, discount_value, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(training.id.to_string())
    .bind(training.photo_url.as_deref())
    .bind(&training.title)
    .bind(training.description.as_deref())
    .bind(training.base_price.to_string())
    .bind(training.discount_type.map(|t| t.as_str()))
    .bind(training.discount_value.map(|v| v.to_string()))
    .bind(training.created_at)
    .bind(training.updated_at)
    .execute(&mut *conn)
    .await?;

    replace_benefits(&mut *conn, training.id, benefits).await?;
    let mentors = set_training_mentors(&mut *conn, training.id, mentor_ids).await?;

    Ok(TrainingDetail {
        training: training.clone(),
        benefits: benefits.to_vec(),
        mentors,
    })
}

/// Validates and replaces the training→mentor link set, returning the
/// resolved mentors in requested order.
pub async fn set_training_mentors(
    conn: &mut SqliteConnection,
    training_id: Uuid,
    mentor_ids: &[Uuid],
) -> Result<Vec<Mentor>, StoreError> {
    let requested = dedup_ids(mentor_ids);
    let mentors = mentor_repo::resolve_mentors(&mut *conn, &requested).await?;
    if mentors.len() != requested.len() {
        return Err(StoreError::InvalidReferenceIds("mentor"));
    }
    associations::replace_links(&mut *conn, &TRAINING_MENTOR_LINKS, training_id, &requested).await?;
    Ok(mentors)
}

/// Rewrites the benefit list wholesale, keeping payload order.
pub async fn replace_benefits(
    conn: &mut SqliteConnection,
    training_id: Uuid,
    benefits: &[String],
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM training_benefits WHERE training_id = ?")
        .bind(training_id.to_string())
        .execute(&mut *conn)
        .await?;

    for (position, benefit) in benefits.iter().enumerate() {
        sqlx::query(
            "INSERT INTO training_benefits (training_id, position, benefit) VALUES (?, ?, ?)",
        )
        .bind(training_id.to_string())
        .bind(position as i64)
        .bind(benefit)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list_trainings(conn: &mut SqliteConnection) -> Result<Vec<TrainingDetail>, StoreError> {
    let sql = format!("SELECT {} FROM trainings", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in &rows {
        let training = row_to_training(row)?;
        let benefits = benefits_for_training(&mut *conn, training.id).await?;
        let mentors = mentors_for_training(&mut *conn, training.id).await?;
        details.push(TrainingDetail {
            training,
            benefits,
            mentors,
        });
    }
    Ok(details)
}

pub async fn get_training(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<TrainingDetail, StoreError> {
    let training = fetch_training(&mut *conn, id).await?;
    let benefits = benefits_for_training(&mut *conn, id).await?;
    let mentors = mentors_for_training(&mut *conn, id).await?;
    Ok(TrainingDetail {
        training,
        benefits,
        mentors,
    })
}

pub async fn update_training(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &TrainingPatch,
    benefits: Option<&[String]>,
    mentor_ids: Option<&[Uuid]>,
) -> Result<(), StoreError> {
    let mut training = fetch_training(&mut *conn, id).await?;
    training.apply(patch);
    training.updated_at = Utc::now();

    sqlx::query(
        "UPDATE trainings SET photo_url = ?, title = ?, description = ?, base_price = ?,
                discount_type = ?, discount_value = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(training.photo_url.as_deref())
    .bind(&training.title)
    .bind(training.description.as_deref())
    .bind(training.base_price.to_string())
    .bind(training.discount_type.map(|t| t.as_str()))
    .bind(training.discount_value.map(|v| v.to_string()))
    .bind(training.updated_at)
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    if let Some(benefits) = benefits {
        replace_benefits(&mut *conn, id, benefits).await?;
    }
    if let Some(ids) = mentor_ids {
        set_training_mentors(&mut *conn, id, ids).await?;
    }
    Ok(())
}

/// Mentor links are removed explicitly; benefit rows cascade with the
/// owner row.
pub async fn delete_training(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    fetch_training(&mut *conn, id).await?;
    associations::delete_links(&mut *conn, &TRAINING_MENTOR_LINKS, id).await?;
    sqlx::query("DELETE FROM trainings WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn fetch_training(conn: &mut SqliteConnection, id: Uuid) -> Result<Training, StoreError> {
    let sql = format!("SELECT {} FROM trainings WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_training(&row),
        None => Err(StoreError::NotFound("Training")),
    }
}

async fn benefits_for_training(
    conn: &mut SqliteConnection,
    training_id: Uuid,
) -> Result<Vec<String>, StoreError> {
    let rows = sqlx::query(
        "SELECT benefit FROM training_benefits WHERE training_id = ? ORDER BY position ASC",
    )
    .bind(training_id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    rows.iter()
        .map(|row| Ok(row.try_get::<String, _>("benefit")?))
        .collect()
}

async fn mentors_for_training(
    conn: &mut SqliteConnection,
    training_id: Uuid,
) -> Result<Vec<Mentor>, StoreError> {
    let rows = sqlx::query(
        "SELECT mn.id, mn.name, mn.photo_url FROM mentors mn
         JOIN training_mentor_map m ON m.mentor_id = mn.id
         WHERE m.training_id = ?",
    )
    .bind(training_id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    rows.iter()
        .map(|row| {
            Ok(Mentor {
                id: decode::uuid(&row.try_get::<String, _>("id")?)?,
                name: row.try_get("name")?,
                photo_url: row.try_get("photo_url")?,
            })
        })
        .collect()
}
