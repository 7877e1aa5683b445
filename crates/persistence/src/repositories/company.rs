//! Company repository for database operations.

use domain::models::{Company, CreateCompanyRequest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CompanyEntity;

/// Repository for company database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new company.
    pub async fn create(&self, request: &CreateCompanyRequest) -> Result<Company, sqlx::Error> {
        let entity = sqlx::query_as::<_, CompanyEntity>(
            r#"
            INSERT INTO companies (name, shortname)
            VALUES ($1, $2)
            RETURNING id, name, shortname, suspended, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.shortname)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Find a company by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
        let entity = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, shortname, suspended, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// List all companies, suspended included, ordered by shortname.
    pub async fn list(&self) -> Result<Vec<Company>, sqlx::Error> {
        let entities = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, shortname, suspended, created_at, updated_at
            FROM companies
            ORDER BY shortname
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// List companies eligible for scheduled sync (not suspended).
    pub async fn list_active(&self) -> Result<Vec<Company>, sqlx::Error> {
        let entities = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, shortname, suspended, created_at, updated_at
            FROM companies
            WHERE suspended = FALSE
            ORDER BY shortname
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Toggle a company's suspended flag. Returns the updated row.
    pub async fn set_suspended(
        &self,
        id: Uuid,
        suspended: bool,
    ) -> Result<Company, sqlx::Error> {
        let entity = sqlx::query_as::<_, CompanyEntity>(
            r#"
            UPDATE companies
            SET suspended = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, shortname, suspended, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(suspended)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }
}
