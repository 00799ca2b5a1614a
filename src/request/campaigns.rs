use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::ApiError;
use crate::model::campaign::{
    decode_players, encode_players, Campaign, CampaignDeleteRequest, CampaignRequest, CampaignRow,
    MembershipRequest, RosterResponse,
};

pub async fn list(State(pool): State<Pool<Sqlite>>) -> Result<Json<Vec<Campaign>>, ApiError> {
    let rows: Vec<CampaignRow> = sqlx::query_as("SELECT * FROM campaigns")
        .fetch_all(&pool)
        .await?;
    Ok(Json(rows.into_iter().map(Campaign::from).collect()))
}

pub async fn detail(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
) -> Result<Json<Campaign>, ApiError> {
    let row: CampaignRow = sqlx::query_as("SELECT * FROM campaigns WHERE id = ?1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::NotFound("campaign"))?;
    Ok(Json(row.into()))
}

pub async fn create(
    State(pool): State<Pool<Sqlite>>,
    Json(req): Json<CampaignRequest>,
) -> Result<Json<Campaign>, ApiError> {
    if req.name.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "name and description are required".to_string(),
        ));
    }
    let result =
        sqlx::query("INSERT INTO campaigns (name, description, gm_id, players) VALUES (?1, ?2, ?3, '[]')")
            .bind(&req.name)
            .bind(&req.description)
            .bind(req.gm_id)
            .execute(&pool)
            .await?;
    let campaign = Campaign {
        id: result.last_insert_rowid(),
        name: req.name,
        description: req.description,
        gm_id: req.gm_id,
        players: vec![],
    };
    info!("campaign {} created by GM {}", campaign.id, campaign.gm_id);
    Ok(Json(campaign))
}

async fn roster(pool: &Pool<Sqlite>, id: i64) -> Result<Vec<i64>, ApiError> {
    let (raw,): (String,) = sqlx::query_as("SELECT players FROM campaigns WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("campaign"))?;
    Ok(decode_players(&raw))
}

async fn store_roster(pool: &Pool<Sqlite>, id: i64, players: &[i64]) -> Result<(), ApiError> {
    sqlx::query("UPDATE campaigns SET players = ?1 WHERE id = ?2")
        .bind(encode_players(players))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Idempotent: joining a campaign you are already in leaves the roster alone.
pub async fn join(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
    Json(req): Json<MembershipRequest>,
) -> Result<Json<RosterResponse>, ApiError> {
    let mut players = roster(&pool, id).await?;
    if !players.contains(&req.user_id) {
        players.push(req.user_id);
        store_roster(&pool, id, &players).await?;
        info!("user {} joined campaign {}", req.user_id, id);
    }
    Ok(Json(RosterResponse {
        success: true,
        players,
    }))
}

/// Idempotent: leaving a campaign you are not in is a no-op.
pub async fn leave(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
    Json(req): Json<MembershipRequest>,
) -> Result<Json<RosterResponse>, ApiError> {
    let mut players = roster(&pool, id).await?;
    if players.contains(&req.user_id) {
        players.retain(|p| *p != req.user_id);
        store_roster(&pool, id, &players).await?;
        info!("user {} left campaign {}", req.user_id, id);
    }
    Ok(Json(RosterResponse {
        success: true,
        players,
    }))
}

/// Only the recorded GM may delete a campaign. Deletion cascades to the
/// campaign's characters and session updates so no orphaned rows remain.
pub async fn remove(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<i64>,
    Json(req): Json<CampaignDeleteRequest>,
) -> Result<Json<Value>, ApiError> {
    let (gm_id,): (i64,) = sqlx::query_as("SELECT gm_id FROM campaigns WHERE id = ?1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ApiError::NotFound("campaign"))?;
    if req.gm_id != gm_id {
        return Err(ApiError::Forbidden("only the campaign's GM can delete it"));
    }
    // one transaction: either the campaign and all its rows go, or nothing does
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM characters WHERE campaign_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM updates WHERE campaign_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM campaigns WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    info!("campaign {} deleted by GM {}", id, gm_id);
    Ok(Json(json!({ "success": true })))
}
