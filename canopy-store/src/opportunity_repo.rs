use canopy_catalog::opportunity::{
    InternshipDetails, JobDetails, Opportunity, OpportunityDetails, OpportunityPatch,
    OpportunityType,
};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::decode;
use crate::error::StoreError;

const COLUMNS: &str = "id, title, description, location, opportunity_type, created_at, updated_at";

/// List filters; all optional and combinable. Type matches exactly,
/// location and search match as substrings (search against the title).
#[derive(Debug, Default, Clone)]
pub struct OpportunityFilter {
    pub opportunity_type: Option<OpportunityType>,
    pub location: Option<String>,
    pub search: Option<String>,
}

/// Inserts the owner row, the detail row for its variant, and the
/// requirement list. Runs on the caller's transaction.
pub async fn create_opportunity(
    conn: &mut SqliteConnection,
    opportunity: &Opportunity,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO opportunities (id, title, description, location, opportunity_type, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(opportunity.id.to_string())
    .bind(&opportunity.title)
    .bind(&opportunity.description)
    .bind(&opportunity.location)
    .bind(opportunity.details.kind().as_str())
    .bind(opportunity.created_at)
    .bind(opportunity.updated_at)
    .execute(&mut *conn)
    .await?;

    match &opportunity.details {
        OpportunityDetails::Job(details) => {
            sqlx::query(
                "INSERT INTO opportunity_job_details (opportunity_id, employment_type, salary_range)
                 VALUES (?, ?, ?)",
            )
            .bind(opportunity.id.to_string())
            .bind(details.employment_type.as_deref())
            .bind(details.salary_range.as_deref())
            .execute(&mut *conn)
            .await?;
        }
        OpportunityDetails::Internship(details) => {
            sqlx::query(
                "INSERT INTO opportunity_internship_details (opportunity_id, duration_months, stipend)
                 VALUES (?, ?, ?)",
            )
            .bind(opportunity.id.to_string())
            .bind(details.duration_months)
            .bind(details.stipend.as_deref())
            .execute(&mut *conn)
            .await?;
        }
    }

    replace_requirements(&mut *conn, opportunity.id, &opportunity.requirements).await?;
    Ok(())
}

/// Newest postings first.
pub async fn list_opportunities(
    conn: &mut SqliteConnection,
    filter: &OpportunityFilter,
) -> Result<Vec<Opportunity>, StoreError> {
    let mut sql = format!("SELECT {} FROM opportunities WHERE 1 = 1", COLUMNS);
    if filter.opportunity_type.is_some() {
        sql.push_str(" AND opportunity_type = ?");
    }
    if filter.location.is_some() {
        sql.push_str(" AND location LIKE ?");
    }
    if filter.search.is_some() {
        sql.push_str(" AND title LIKE ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query(&sql);
    if let Some(kind) = filter.opportunity_type {
        query = query.bind(kind.as_str());
    }
    if let Some(location) = &filter.location {
        query = query.bind(format!("%{}%", location));
    }
    if let Some(search) = &filter.search {
        query = query.bind(format!("%{}%", search));
    }

    let rows = query.fetch_all(&mut *conn).await?;
    let mut opportunities = Vec::with_capacity(rows.len());
    for row in &rows {
        opportunities.push(hydrate(&mut *conn, row).await?);
    }
    Ok(opportunities)
}

pub async fn get_opportunity(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Opportunity, StoreError> {
    let sql = format!("SELECT {} FROM opportunities WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => hydrate(&mut *conn, &row).await,
        None => Err(StoreError::NotFound("Opportunity")),
    }
}

/// Applies the scalar patch, then the detail payload matching the row's
/// type (a payload for the other variant is ignored; the type itself never
/// changes), then the requirement list if supplied.
pub async fn update_opportunity(
    conn: &mut SqliteConnection,
    id: Uuid,
    patch: &OpportunityPatch,
    job_details: Option<&JobDetails>,
    internship_details: Option<&InternshipDetails>,
    requirements: Option<&[String]>,
) -> Result<(), StoreError> {
    let mut opportunity = get_opportunity(&mut *conn, id).await?;
    opportunity.apply(patch);
    opportunity.updated_at = Utc::now();

    sqlx::query(
        "UPDATE opportunities SET title = ?, description = ?, location = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&opportunity.title)
    .bind(&opportunity.description)
    .bind(&opportunity.location)
    .bind(opportunity.updated_at)
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    match opportunity.details.kind() {
        OpportunityType::Job => {
            if let Some(details) = job_details {
                sqlx::query(
                    "UPDATE opportunity_job_details SET employment_type = ?, salary_range = ?
                     WHERE opportunity_id = ?",
                )
                .bind(details.employment_type.as_deref())
                .bind(details.salary_range.as_deref())
                .bind(id.to_string())
                .execute(&mut *conn)
                .await?;
            }
        }
        OpportunityType::Internship => {
            if let Some(details) = internship_details {
                sqlx::query(
                    "UPDATE opportunity_internship_details SET duration_months = ?, stipend = ?
                     WHERE opportunity_id = ?",
                )
                .bind(details.duration_months)
                .bind(details.stipend.as_deref())
                .bind(id.to_string())
                .execute(&mut *conn)
                .await?;
            }
        }
    }

    if let Some(requirements) = requirements {
        replace_requirements(&mut *conn, id, requirements).await?;
    }
    Ok(())
}

/// Detail and requirement rows cascade with the owner row.
pub async fn delete_opportunity(conn: &mut SqliteConnection, id: Uuid) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM opportunities WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("Opportunity"));
    }
    Ok(())
}

/// Rewrites the requirement list wholesale, keeping payload order.
async fn replace_requirements(
    conn: &mut SqliteConnection,
    opportunity_id: Uuid,
    requirements: &[String],
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM opportunity_requirements WHERE opportunity_id = ?")
        .bind(opportunity_id.to_string())
        .execute(&mut *conn)
        .await?;

    for (position, requirement) in requirements.iter().enumerate() {
        sqlx::query(
            "INSERT INTO opportunity_requirements (opportunity_id, position, requirement) VALUES (?, ?, ?)",
        )
        .bind(opportunity_id.to_string())
        .bind(position as i64)
        .bind(requirement)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Builds the full domain object from an owner row: the detail row for
/// the stored type plus the ordered requirements.
async fn hydrate(conn: &mut SqliteConnection, row: &SqliteRow) -> Result<Opportunity, StoreError> {
    let id = decode::uuid(&row.try_get::<String, _>("id")?)?;
    let kind = decode::opportunity_type(&row.try_get::<String, _>("opportunity_type")?)?;

    let details = match kind {
        OpportunityType::Job => {
            let detail_row = sqlx::query(
                "SELECT employment_type, salary_range FROM opportunity_job_details
                 WHERE opportunity_id = ?",
            )
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;
            let details = match detail_row {
                Some(r) => JobDetails {
                    employment_type: r.try_get("employment_type")?,
                    salary_range: r.try_get("salary_range")?,
                },
                None => JobDetails::default(),
            };
            OpportunityDetails::Job(details)
        }
        OpportunityType::Internship => {
            let detail_row = sqlx::query(
                "SELECT duration_months, stipend FROM opportunity_internship_details
                 WHERE opportunity_id = ?",
            )
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;
            let details = match detail_row {
                Some(r) => InternshipDetails {
                    duration_months: r.try_get("duration_months")?,
                    stipend: r.try_get("stipend")?,
                },
                None => InternshipDetails::default(),
            };
            OpportunityDetails::Internship(details)
        }
    };

    let requirement_rows = sqlx::query(
        "SELECT requirement FROM opportunity_requirements WHERE opportunity_id = ? ORDER BY position ASC",
    )
    .bind(id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    let requirements = requirement_rows
        .iter()
        .map(|r| Ok(r.try_get::<String, _>("requirement")?))
        .collect::<Result<Vec<String>, StoreError>>()?;

    Ok(Opportunity {
        id,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        details,
        requirements,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::Duration;

    fn job(title: &str, location: &str, age_seconds: i64) -> Opportunity {
        let created = Utc::now() - Duration::seconds(age_seconds);
        Opportunity {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Build things".to_string(),
            location: location.to_string(),
            details: OpportunityDetails::Job(JobDetails {
                employment_type: Some("Full-time".to_string()),
                salary_range: Some("40-60k".to_string()),
            }),
            requirements: vec!["Rust".to_string(), "SQL".to_string()],
            created_at: created,
            updated_at: created,
        }
    }

    fn internship(title: &str, location: &str, age_seconds: i64) -> Opportunity {
        let created = Utc::now() - Duration::seconds(age_seconds);
        Opportunity {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Learn things".to_string(),
            location: location.to_string(),
            details: OpportunityDetails::Internship(InternshipDetails {
                duration_months: Some(6),
                stipend: Some("800/month".to_string()),
            }),
            requirements: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    async fn seed(db: &crate::Database, opportunity: &Opportunity) {
        let mut conn = db.acquire().await.unwrap();
        create_opportunity(&mut conn, opportunity).await.unwrap();
    }

    #[tokio::test]
    async fn test_round_trip_keeps_details_and_requirement_order() {
        let db = testing::db().await;
        let posted = job("Backend engineer", "Berlin", 0);
        seed(&db, &posted).await;

        let mut conn = db.acquire().await.unwrap();
        let fetched = get_opportunity(&mut conn, posted.id).await.unwrap();
        assert_eq!(fetched.title, "Backend engineer");
        assert_eq!(fetched.details, posted.details);
        assert_eq!(fetched.requirements, vec!["Rust".to_string(), "SQL".to_string()]);
        assert!(fetched.details.internship().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let db = testing::db().await;
        seed(&db, &job("Senior Rust developer", "Berlin", 300)).await;
        seed(&db, &job("Frontend developer", "Lisbon", 200)).await;
        seed(&db, &internship("Rust internship", "Berlin", 100)).await;

        let mut conn = db.acquire().await.unwrap();

        let all = list_opportunities(&mut conn, &OpportunityFilter::default())
            .await
            .unwrap();
        let titles: Vec<&str> = all.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Rust internship", "Frontend developer", "Senior Rust developer"]
        );

        let jobs_only = list_opportunities(
            &mut conn,
            &OpportunityFilter {
                opportunity_type: Some(OpportunityType::Job),
                ..OpportunityFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(jobs_only.len(), 2);

        let berlin_rust = list_opportunities(
            &mut conn,
            &OpportunityFilter {
                location: Some("berlin".to_string()),
                search: Some("rust".to_string()),
                ..OpportunityFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(berlin_rust.len(), 2);
    }

    #[tokio::test]
    async fn test_update_ignores_mismatched_detail_payload() {
        let db = testing::db().await;
        let posted = job("Data engineer", "Remote", 0);
        seed(&db, &posted).await;

        let mut conn = db.acquire().await.unwrap();
        update_opportunity(
            &mut conn,
            posted.id,
            &OpportunityPatch {
                title: Some("Senior data engineer".to_string()),
                ..OpportunityPatch::default()
            },
            None,
            Some(&InternshipDetails {
                duration_months: Some(3),
                stipend: None,
            }),
            None,
        )
        .await
        .unwrap();

        let fetched = get_opportunity(&mut conn, posted.id).await.unwrap();
        assert_eq!(fetched.title, "Senior data engineer");
        // Still a job; the internship payload went nowhere.
        assert_eq!(fetched.details, posted.details);
    }

    #[tokio::test]
    async fn test_update_replaces_matching_details_and_requirements() {
        let db = testing::db().await;
        let posted = job("Platform engineer", "Remote", 0);
        seed(&db, &posted).await;

        let mut conn = db.acquire().await.unwrap();
        update_opportunity(
            &mut conn,
            posted.id,
            &OpportunityPatch::default(),
            Some(&JobDetails {
                employment_type: Some("Contract".to_string()),
                salary_range: None,
            }),
            None,
            Some(&["Kubernetes".to_string()]),
        )
        .await
        .unwrap();

        let fetched = get_opportunity(&mut conn, posted.id).await.unwrap();
        let details = fetched.details.job().unwrap();
        assert_eq!(details.employment_type.as_deref(), Some("Contract"));
        // The payload replaces the detail row wholesale; absent fields clear.
        assert_eq!(details.salary_range, None);
        assert_eq!(fetched.requirements, vec!["Kubernetes".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_cascades_details_and_requirements() {
        let db = testing::db().await;
        let posted = job("Short-lived role", "Nowhere", 0);
        seed(&db, &posted).await;

        let mut conn = db.acquire().await.unwrap();
        delete_opportunity(&mut conn, posted.id).await.unwrap();

        let err = get_opportunity(&mut conn, posted.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Opportunity not found");

        let details = sqlx::query("SELECT 1 FROM opportunity_job_details WHERE opportunity_id = ?")
            .bind(posted.id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .unwrap();
        assert!(details.is_none());
        let requirements =
            sqlx::query("SELECT 1 FROM opportunity_requirements WHERE opportunity_id = ?")
                .bind(posted.id.to_string())
                .fetch_all(&mut *conn)
                .await
                .unwrap();
        assert!(requirements.is_empty());

        let err = delete_opportunity(&mut conn, posted.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Opportunity")));
    }
}
