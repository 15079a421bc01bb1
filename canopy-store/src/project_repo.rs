use canopy_catalog::associations::dedup_ids;
use canopy_catalog::project::{Project, ProjectDetail, ProjectFeedback, ProjectPatch};
use canopy_catalog::reference::ServiceTech;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::associations::{self, PROJECT_TECH_LINKS};
use crate::error::StoreError;
use crate::{decode, reference_repo};

const COLUMNS: &str = "id, photo_url, title, description, project_link, created_at, updated_at";

fn row_to_project(row: &SqliteRow) -> Result<Project, StoreError> {
    Ok(Project {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        photo_url: row.try_get("photo_url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        project_link: row.try_get("project_link")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_feedback(row: &SqliteRow) -> Result<ProjectFeedback, StoreError> {
    Ok(ProjectFeedback {
        id: decode::uuid(&row.try_get::<String, _>("id")?)?,
        project_id: decode::uuid(&row.try_get::<String, _>("project_id")?)?,
        client_name: row.try_get("client_name")?,
        client_photo: row.try_get("client_photo")?,
        feedback_description: row.try_get("feedback_description")?,
        rating: row.try_get("rating")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn create_project(
    conn: &mut SqliteConnection,
    project: &Project,
    tech_ids: &[Uuid],
) -> Result<ProjectDetail, StoreError> {
    sqlx::query(
        "INSERT INTO projects (id, photo_url, title, description, project_link, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(project.id.to_string())
    .bind(project.photo_url.as_deref())
    .bind(&project.title)
    .bind(project.description.as_deref())
    .bind(project.project_link.as_deref())
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(&mut *conn)
    .await?;

    let techs = set_project_techs(&mut *conn, project.id, tech_ids).await?;

    Ok(ProjectDetail {
        project: project.clone(),
        techs,
        feedbacks: Vec::new(),
    })
}

/// Validates and replaces the project→tech link set, returning the
/// resolved techs in requested order.
pub async fn set_project_techs(
    conn: &mut SqliteConnection,
    project_id: Uuid,
    tech_ids: &[Uuid],
) -> Result<Vec<ServiceTech>, StoreError> {
    let requested = dedup_ids(tech_ids);
    let techs = reference_repo::resolve_techs(&mut *conn, &requested).await?;
    if techs.len() != requested.len() {
        return Err(StoreError::InvalidReferenceIds("tech"));
    }
    associations::replace_links(&mut *conn, &PROJECT_TECH_LINKS, project_id, &requested).await?;
    Ok(techs)
}

pub async fn list_projects(conn: &mut SqliteConnection) -> Result<Vec<ProjectDetail>, StoreError> {
    let sql = format!("SELECT {} FROM projects", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in &rows {
        let project = row_to_project(row)?;
        let techs = techs_for_project(&mut *conn, project.id).await?;
        let feedbacks = feedbacks_for_project(&mut *conn, project.id).await?;
        details.push(ProjectDetail {
            project,
            techs,
            feedbacks,
        });
    }
    Ok(details)
}

pub async fn get_project(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<ProjectDetail, StoreError> {
    let project = fetch_project(&mut *conn, id).await?;
    let techs = techs_for_project(&mut *conn, id).await?;
    let feedbacks = feedbacks_for_project(&mut *conn, id).await?;
    Ok(ProjectDetail {
        project,
        techs,
        feedbacks,
    })
}

pub async fn update_project(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &ProjectPatch,
    tech_ids: Option<&[Uuid]>,
) -> Result<(), StoreError> {
    let mut project = fetch_project(&mut *conn, id).await?;
    project.apply(patch);
    project.updated_at = Utc::now();

    sqlx::query(
        "UPDATE projects SET photo_url = ?, title = ?, description = ?, project_link = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(project.photo_url.as_deref())
    .bind(&project.title)
    .bind(project.description.as_deref())
    .bind(project.project_link.as_deref())
    .bind(project.updated_at)
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    if let Some(ids) = tech_ids {
        set_project_techs(&mut *conn, id, ids).await?;
    }
    Ok(())
}

/// Tech links are removed explicitly; feedback rows cascade with the
/// owner row.
pub async fn delete_project(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    fetch_project(&mut *conn, id).await?;
    associations::delete_links(&mut *conn, &PROJECT_TECH_LINKS, id).await?;
    sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Inserts a feedback row after confirming the project exists.
pub async fn create_feedback(
    conn: &mut SqliteConnection,
    feedback: &ProjectFeedback,
) -> Result<(), StoreError> {
    fetch_project(&mut *conn, feedback.project_id).await?;

    sqlx::query(
        "INSERT INTO project_feedbacks (id, project_id, client_name, client_photo, feedback_description, rating, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(feedback.id.to_string())
    .bind(feedback.project_id.to_string())
    .bind(&feedback.client_name)
    .bind(feedback.client_photo.as_deref())
    .bind(&feedback.feedback_description)
    .bind(feedback.rating)
    .bind(feedback.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Newest feedback first; errors if the project itself is gone.
pub async fn list_feedbacks(
    conn: &mut SqliteConnection,
    project_id: Uuid,
) -> Result<Vec<ProjectFeedback>, StoreError> {
    fetch_project(&mut *conn, project_id).await?;
    feedbacks_for_project(&mut *conn, project_id).await
}

pub async fn delete_feedback(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM project_feedbacks WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("Feedback"));
    }
    Ok(())
}

async fn fetch_project(conn: &mut SqliteConnection, id: Uuid) -> Result<Project, StoreError> {
    let sql = format!("SELECT {} FROM projects WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => row_to_project(&row),
        None => Err(StoreError::NotFound("Project")),
    }
}

async fn techs_for_project(
    conn: &mut SqliteConnection,
    project_id: Uuid,
) -> Result<Vec<ServiceTech>, StoreError> {
    let rows = sqlx::query(
        "SELECT t.id, t.name FROM service_techs t
         JOIN project_tech_map m ON m.tech_id = t.id
         WHERE m.project_id = ?",
    )
    .bind(project_id.to_string())
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

async fn feedbacks_for_project(
    conn: &mut SqliteConnection,
    project_id: Uuid,
) -> Result<Vec<ProjectFeedback>, StoreError> {
    let rows = sqlx::query(
        "SELECT id, project_id, client_name, client_photo, feedback_description, rating, created_at
         FROM project_feedbacks
         WHERE project_id = ?
         ORDER BY created_at DESC",
    )
    .bind(project_id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(row_to_feedback).collect()
}
