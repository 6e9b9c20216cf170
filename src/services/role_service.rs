use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::response::{page_slice, PaginationResponse};
use crate::dto::role_dto::{CreateRolePayload, FilterItem, RoleResponse, UpdateRolePayload};
use crate::error::{Error, Result};
use crate::models::role::Role;

#[derive(Clone)]
pub struct RoleService {
    pool: PgPool,
}

impl RoleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateRolePayload) -> Result<RoleResponse> {
        tracing::info!(name = %payload.name, "creating role");

        let duplicates = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles WHERE name = $1")
            .bind(&payload.name)
            .fetch_one(&self.pool)
            .await?;
        if duplicates > 0 {
            return Err(Error::Conflict("Role name already exists".to_string()));
        }

        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(RoleResponse::from(role))
    }

    pub async fn update(&self, payload: UpdateRolePayload) -> Result<RoleResponse> {
        tracing::info!(id = %payload.id, name = %payload.name, "updating role");

        self.find_role(payload.id).await?;

        // Renaming to a name held by a different role is a conflict;
        // keeping the current name is not.
        let duplicates = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM roles WHERE name = $1 AND id <> $2",
        )
        .bind(&payload.name)
        .bind(payload.id)
        .fetch_one(&self.pool)
        .await?;
        if duplicates > 0 {
            return Err(Error::Conflict("Role name already exists".to_string()));
        }

        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payload.id)
        .bind(&payload.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(RoleResponse::from(role))
    }

    /// Hard delete. Users referencing the role keep existing with
    /// `role_id` nulled out by the foreign key action.
    pub async fn delete(&self, id: Uuid) -> Result<RoleResponse> {
        tracing::info!(%id, "deleting role");

        let role = self.find_role(id).await?;

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(RoleResponse::from(role))
    }

    pub async fn get_all(&self, page: i64, size: i64) -> Result<PaginationResponse<RoleResponse>> {
        tracing::info!(page, size, "listing roles");

        let (page, size, offset) = page_slice(page, size);

        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT * FROM roles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await?;

        Ok(PaginationResponse {
            data: roles.into_iter().map(RoleResponse::from).collect(),
            page,
            size,
            total,
        })
    }

    /// Lightweight `{label, value}` listing ordered by name. A non-positive
    /// `page` or `size` returns everything unpaginated.
    pub async fn get_filter(
        &self,
        page: i64,
        size: i64,
    ) -> Result<PaginationResponse<FilterItem>> {
        let (roles, total) = if page <= 0 || size <= 0 {
            let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
            let total = roles.len() as i64;
            (roles, total)
        } else {
            let (_, _, offset) = page_slice(page, size);
            let roles = sqlx::query_as::<_, Role>(
                r#"
                SELECT * FROM roles
                ORDER BY name ASC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
                .fetch_one(&self.pool)
                .await?;
            (roles, total)
        };

        let (page, size) = filter_page_meta(page, size, total);

        Ok(PaginationResponse {
            data: roles.into_iter().map(FilterItem::from).collect(),
            page,
            size,
            total,
        })
    }

    async fn find_role(&self, id: Uuid) -> Result<Role> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Role with id {} not found", id)))
    }
}

/// Envelope metadata for the filter listing: the unpaginated form reports
/// `page = 1` and `size = total`.
fn filter_page_meta(page: i64, size: i64, total: i64) -> (i64, i64) {
    let page = if page > 0 { page } else { 1 };
    let size = if size > 0 { size } else { total };
    (page, size)
}
