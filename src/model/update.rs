use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// A session-log entry. Append-only.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: i64,
    pub text: String,
    pub campaign_id: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub text: String,
    pub campaign_id: Option<i64>,
}
