use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::response::{page_slice, PaginationResponse};
use crate::dto::user_dto::{
    CreateUserPayload, CreateUserResponse, LoginPayload, LoginResponse, RegisterPayload,
    RegisterResponse, RoleInfo, UpdateUserPayload, UpdateUserResponse, UserResponse,
};
use crate::error::{Error, Result};
use crate::models::user::{User, UserWithRole};
use crate::services::token_service::TokenService;
use crate::utils::crypto::{hash_password, verify_password};

/// Name of the role attached to self-registered accounts.
const DEFAULT_ROLE_NAME: &str = "user";

/// Single message for both unknown identifier and wrong password,
/// so a caller cannot probe which accounts exist.
const INVALID_CREDENTIALS: &str = "Email/Username or Password is Invalid";

const USER_COLUMNS_WITH_ROLE: &str = r#"
    SELECT u.*, r.name AS role_name
    FROM users u
    LEFT JOIN roles r ON r.id = u.role_id
"#;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    token_service: TokenService,
}

impl UserService {
    pub fn new(pool: PgPool, token_service: TokenService) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<RegisterResponse> {
        tracing::debug!(username = %payload.username, "registering new user");

        // Soft-deleted rows still count: a freed username/email/phone is
        // never reusable.
        let collisions = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2 OR phone_number = $3",
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&payload.phone_number)
        .fetch_one(&self.pool)
        .await?;
        if collisions > 0 {
            return Err(Error::Conflict(
                "Username, email, or phone number already exists".to_string(),
            ));
        }

        let (password_hash, salt) = hash_password(&payload.password)?;

        // Registration proceeds role-less when the default role is absent.
        let default_role_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
                .bind(DEFAULT_ROLE_NAME)
                .fetch_optional(&self.pool)
                .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone_number, password_hash, salt, role_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&payload.phone_number)
        .bind(&password_hash)
        .bind(&salt)
        .bind(default_role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RegisterResponse {
            username: user.username,
            email: user.email,
            phone_number: user.phone_number.unwrap_or_default(),
        })
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let row = sqlx::query_as::<_, UserWithRole>(&format!(
            "{} WHERE u.email = $1 OR u.username = $1",
            USER_COLUMNS_WITH_ROLE
        ))
        .bind(&payload.email_or_username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&payload.password, &row.user.password_hash)? {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.token_service.issue(row.user.id, &row.user.username)?;

        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(row.user.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(username = %row.user.username, "user logged in");

        Ok(LoginResponse {
            token,
            role: role_info(&row),
            username: row.user.username,
            email: row.user.email,
            phone_number: row.user.phone_number.unwrap_or_default(),
        })
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<CreateUserResponse> {
        tracing::debug!(username = %payload.username, "creating user");

        let collisions = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2",
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .fetch_one(&self.pool)
        .await?;
        if collisions > 0 {
            return Err(Error::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let (password_hash, salt) = hash_password(&payload.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone_number, full_name, password_hash, salt, role_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&payload.phone_number)
        .bind(&payload.full_name)
        .bind(&password_hash)
        .bind(&salt)
        .bind(payload.role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CreateUserResponse {
            username: user.username,
            email: user.email,
            phone_number: user.phone_number.unwrap_or_default(),
            full_name: user.full_name.unwrap_or_default(),
            role_id: user.role_id,
        })
    }

    pub async fn update(&self, payload: UpdateUserPayload) -> Result<UpdateUserResponse> {
        tracing::debug!(id = %payload.id, "updating user");

        let existing =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(payload.id)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_none() {
            return Err(Error::NotFound("User not found".to_string()));
        }

        if payload.username.is_some() || payload.email.is_some() {
            let duplicates = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM users
                WHERE id <> $1
                  AND (($2::text IS NOT NULL AND username = $2)
                    OR ($3::text IS NOT NULL AND email = $3))
                "#,
            )
            .bind(payload.id)
            .bind(&payload.username)
            .bind(&payload.email)
            .fetch_one(&self.pool)
            .await?;
            if duplicates > 0 {
                return Err(Error::Conflict(
                    "Username or email already in use".to_string(),
                ));
            }
        }

        let (password_hash, salt) = match &payload.password {
            Some(plain) => {
                let (hash, salt) = hash_password(plain)?;
                (Some(hash), Some(salt))
            }
            None => (None, None),
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                full_name = COALESCE($4, full_name),
                phone_number = COALESCE($5, phone_number),
                role_id = COALESCE($6, role_id),
                password_hash = COALESCE($7, password_hash),
                salt = COALESCE($8, salt),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payload.id)
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&payload.full_name)
        .bind(&payload.phone_number)
        .bind(payload.role_id)
        .bind(&password_hash)
        .bind(&salt)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateUserResponse {
            username: user.username,
            email: user.email,
            full_name: user.full_name.unwrap_or_default(),
            phone_number: user.phone_number.unwrap_or_default(),
            role_id: user.role_id,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse> {
        tracing::info!(%id, "fetching user");

        let row = self.find_user_with_role(id).await?;
        Ok(to_user_response(row))
    }

    /// Soft-deleted users are excluded from the listing; they remain
    /// reachable through `get_by_id`.
    pub async fn get_all(&self, page: i64, size: i64) -> Result<PaginationResponse<UserResponse>> {
        tracing::info!(page, size, "listing users");

        let (page, size, offset) = page_slice(page, size);

        let rows = sqlx::query_as::<_, UserWithRole>(&format!(
            r#"
            {} WHERE u.is_deleted = FALSE
            ORDER BY u.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            USER_COLUMNS_WITH_ROLE
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginationResponse {
            data: rows.into_iter().map(to_user_response).collect(),
            page,
            size,
            total,
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<UserResponse> {
        tracing::info!(%id, "soft-deleting user");

        let row = self.find_user_with_role(id).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(to_user_response(UserWithRole {
            user,
            role_name: row.role_name,
        }))
    }

    async fn find_user_with_role(&self, id: Uuid) -> Result<UserWithRole> {
        sqlx::query_as::<_, UserWithRole>(&format!(
            "{} WHERE u.id = $1",
            USER_COLUMNS_WITH_ROLE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User with id {} not found", id)))
    }
}

fn role_info(row: &UserWithRole) -> Option<RoleInfo> {
    match (row.user.role_id, &row.role_name) {
        (Some(id), Some(name)) => Some(RoleInfo {
            id,
            name: name.clone(),
        }),
        _ => None,
    }
}

fn to_user_response(row: UserWithRole) -> UserResponse {
    let role = role_info(&row);
    let user = row.user;
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name.unwrap_or_default(),
        phone_number: user.phone_number.unwrap_or_default(),
        role,
        last_login: user.last_login,
        is_active: user.is_active,
        is_deleted: user.is_deleted,
        deleted_at: user.deleted_at,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_row(role: Option<(Uuid, &str)>) -> UserWithRole {
        let now = Utc::now();
        UserWithRole {
            user: User {
                id: Uuid::new_v4(),
                username: "johndoe".to_string(),
                email: "john@example.com".to_string(),
                phone_number: None,
                password_hash: "$argon2id$...".to_string(),
                salt: "salt".to_string(),
                full_name: None,
                role_id: role.map(|(id, _)| id),
                is_active: true,
                is_deleted: false,
                deleted_at: None,
                last_login: None,
                created_at: now,
                updated_at: now,
            },
            role_name: role.map(|(_, name)| name.to_string()),
        }
    }

    #[test]
    fn missing_role_maps_to_none() {
        assert!(role_info(&sample_row(None)).is_none());
    }

    #[test]
    fn present_role_maps_to_role_info() {
        let role_id = Uuid::new_v4();
        let info = role_info(&sample_row(Some((role_id, "admin")))).unwrap();
        assert_eq!(info.id, role_id);
        assert_eq!(info.name, "admin");
    }

    #[tokio::test]
    async fn absurd_page_numbers_do_not_panic() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(50))
            .connect_lazy("postgres://localhost:1/unreachable")
            .unwrap();
        let service = UserService::new(pool, TokenService::new("test-secret"));
        assert!(service.get_all(i64::MAX, 2).await.is_err());
    }

    #[test]
    fn user_response_never_exposes_credentials() {
        let value = serde_json::to_value(to_user_response(sample_row(None))).unwrap();
        let rendered = value.to_string();
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("salt"));
        assert_eq!(value["fullName"], serde_json::json!(""));
        assert_eq!(value["phoneNumber"], serde_json::json!(""));
    }

    #[test]
    fn user_response_omits_absent_role() {
        let value = serde_json::to_value(to_user_response(sample_row(None))).unwrap();
        assert!(value.get("role").is_none());

        let role_id = Uuid::new_v4();
        let value =
            serde_json::to_value(to_user_response(sample_row(Some((role_id, "admin"))))).unwrap();
        assert_eq!(value["role"]["name"], serde_json::json!("admin"));
    }
}
