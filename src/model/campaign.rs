use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// A campaign as it travels on the wire: roster decoded to an id list.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub gm_id: i64,
    pub players: Vec<i64>,
}

/// A campaign as stored: the roster is a JSON array in a TEXT column.
#[derive(FromRow, Debug)]
pub struct CampaignRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub gm_id: i64,
    pub players: String,
}

impl From<CampaignRow> for Campaign {
    fn from(row: CampaignRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            gm_id: row.gm_id,
            players: decode_players(&row.players),
        }
    }
}

/// Malformed or empty stored rosters degrade to an empty roster, never an error.
pub fn decode_players(raw: &str) -> Vec<i64> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn encode_players(players: &[i64]) -> String {
    serde_json::to_string(players).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub gm_id: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub user_id: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDeleteRequest {
    pub gm_id: i64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct RosterResponse {
    pub success: bool,
    pub players: Vec<i64>,
}
