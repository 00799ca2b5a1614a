use axum::extract::{Query, State};
use axum::Json;
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::ApiError;
use crate::model::update::{Update, UpdateRequest};
use crate::model::CampaignFilter;

pub async fn list(
    State(pool): State<Pool<Sqlite>>,
    Query(filter): Query<CampaignFilter>,
) -> Result<Json<Vec<Update>>, ApiError> {
    let rows: Vec<Update> = match filter.campagna_id {
        Some(campaign_id) => {
            sqlx::query_as("SELECT * FROM updates WHERE campaign_id = ?1")
                .bind(campaign_id)
                .fetch_all(&pool)
                .await?
        }
        None => sqlx::query_as("SELECT * FROM updates").fetch_all(&pool).await?,
    };
    Ok(Json(rows))
}

pub async fn create(
    State(pool): State<Pool<Sqlite>>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Update>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("text is required".to_string()));
    }
    let campaign_id = req
        .campaign_id
        .ok_or_else(|| ApiError::Validation("campaignId is required".to_string()))?;
    let result = sqlx::query("INSERT INTO updates (text, campaign_id) VALUES (?1, ?2)")
        .bind(&req.text)
        .bind(campaign_id)
        .execute(&pool)
        .await?;
    info!("update logged for campaign {}", campaign_id);
    Ok(Json(Update {
        id: result.last_insert_rowid(),
        text: req.text,
        campaign_id,
    }))
}
