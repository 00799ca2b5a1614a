use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::ApiError;
use crate::model::user::{LoginRequest, User};

pub async fn list(State(pool): State<Pool<Sqlite>>) -> Result<Json<Vec<User>>, ApiError> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users").fetch_all(&pool).await?;
    Ok(Json(users))
}

pub async fn check_name(
    State(pool): State<Pool<Sqlite>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE name = ?1")
        .bind(&name)
        .fetch_optional(&pool)
        .await?;
    Ok(Json(json!({ "exists": row.is_some() })))
}

pub async fn detail(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}

/// Login doubles as registration. A known name must present its recorded
/// role; an unknown name is registered and answered with 201 instead of 200.
pub async fn login(
    State(pool): State<Pool<Sqlite>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("name and role are required".to_string()));
    }
    let role = req
        .role
        .ok_or_else(|| ApiError::Validation("name and role are required".to_string()))?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE name = ?1")
        .bind(&req.name)
        .fetch_optional(&pool)
        .await?;
    if let Some(user) = existing {
        if user.role != role {
            return Err(ApiError::RoleConflict {
                existing_role: user.role,
            });
        }
        info!("{} logged in", user.name);
        return Ok((StatusCode::OK, Json(user)));
    }

    let result = sqlx::query("INSERT INTO users (name, role) VALUES (?1, ?2)")
        .bind(&req.name)
        .bind(role)
        .execute(&pool)
        .await?;
    let user = User {
        id: result.last_insert_rowid(),
        name: req.name,
        role,
    };
    info!("{} registered as {:?}", user.name, user.role);
    Ok((StatusCode::CREATED, Json(user)))
}
