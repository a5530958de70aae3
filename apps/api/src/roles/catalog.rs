//! RoleCatalog: read-mostly store of role templates.
//!
//! Templates are only ever created; the roadmap workflow never writes here.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::{NewRoleTemplate, RoleFilter, RoleRow, RoleTemplate};

#[async_trait]
pub trait RoleCatalog: Send + Sync {
    /// Lists roles matching `filter`; the default filter returns all roles.
    async fn list(&self, filter: &RoleFilter) -> Result<Vec<RoleTemplate>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<RoleTemplate, AppError>;

    /// Fails with `Validation` on a blank or already-used title.
    async fn create(&self, role: NewRoleTemplate) -> Result<RoleTemplate, AppError>;
}

pub(crate) fn role_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Role {id} not found"))
}

pub(crate) fn duplicate_title(title: &str) -> String {
    format!("A role titled '{title}' already exists")
}

#[derive(Clone)]
pub struct PgRoleCatalog {
    pool: PgPool,
}

impl PgRoleCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleCatalog for PgRoleCatalog {
    async fn list(&self, filter: &RoleFilter) -> Result<Vec<RoleTemplate>, AppError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT * FROM role_templates
            WHERE ($1::text IS NULL OR mobility = $1)
              AND ($2::text IS NULL OR $2 = ANY(must_have))
            ORDER BY created_at, id
            "#,
        )
        .bind(&filter.mobility)
        .bind(&filter.skill)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleTemplate::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<RoleTemplate, AppError> {
        sqlx::query_as::<_, RoleRow>("SELECT * FROM role_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(RoleTemplate::from)
            .ok_or_else(|| role_not_found(id))
    }

    async fn create(&self, role: NewRoleTemplate) -> Result<RoleTemplate, AppError> {
        role.validate()?;

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO role_templates
                (id, title, description, must_have, nice_to_have, personality, mobility, roadmap)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&role.title)
        .bind(&role.description)
        .bind(&role.skills.must_have)
        .bind(&role.skills.nice_to_have)
        .bind(&role.personality)
        .bind(&role.environment.mobility)
        .bind(Json(&role.roadmap))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, || duplicate_title(&role.title)))?;

        info!("Created role template '{}' ({})", row.title, row.id);
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::{RoleEnvironment, RoleSkills};
    use crate::test_support::InMemoryRoleCatalog;

    fn new_role(title: &str, mobility: &str, must_have: &[&str]) -> NewRoleTemplate {
        NewRoleTemplate {
            title: title.to_string(),
            skills: RoleSkills {
                must_have: must_have.iter().map(|s| s.to_string()).collect(),
                nice_to_have: vec![],
            },
            environment: RoleEnvironment {
                mobility: Some(mobility.to_string()),
            },
            ..Default::default()
        }
    }

    async fn seeded() -> InMemoryRoleCatalog {
        let catalog = InMemoryRoleCatalog::default();
        for role in [
            new_role("Stock Controller", "low", &["inventory", "excel"]),
            new_role("Delivery Partner", "high", &["driving"]),
            new_role("Store Keeper", "high", &["Inventory"]),
        ] {
            catalog.create(role).await.unwrap();
        }
        catalog
    }

    #[tokio::test]
    async fn test_list_without_filter_returns_all() {
        let catalog = seeded().await;
        let roles = catalog.list(&RoleFilter::default()).await.unwrap();
        assert_eq!(roles.len(), 3);
    }

    #[tokio::test]
    async fn test_skill_filter_matches_must_have_exactly() {
        let catalog = seeded().await;
        let filter = RoleFilter {
            mobility: None,
            skill: Some("inventory".into()),
        };
        let roles = catalog.list(&filter).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].title, "Stock Controller");
    }

    #[tokio::test]
    async fn test_mobility_filter() {
        let catalog = seeded().await;
        let filter = RoleFilter {
            mobility: Some("high".into()),
            skill: None,
        };
        let titles: Vec<_> = catalog
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Delivery Partner", "Store Keeper"]);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_validation_error() {
        let catalog = seeded().await;
        let err = catalog
            .create(new_role("Stock Controller", "low", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let catalog = seeded().await;
        let err = catalog.get_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
